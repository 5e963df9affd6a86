use clap::ValueEnum;

use crate::aggregate::group_records;
use crate::palette::ColorAssignment;
use crate::record::Record;
use crate::stats::DominantSector;

/// Partition key for the dominant-sector view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupField {
    State,
    District,
}

impl GroupField {
    pub fn label(&self) -> &'static str {
        match self {
            GroupField::State => "State",
            GroupField::District => "District",
        }
    }

    pub fn value<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            GroupField::State => &record.state,
            GroupField::District => &record.district,
        }
    }
}

const BASE_DIAMETER: f64 = 20.0;
const SIZE_SCALE: f64 = 100.0;
const MIN_DIAMETER: f64 = 5.0;

/// Marker diameter for a group of `total` societies: monotone in `total`,
/// sub-linear near the origin, never below the display floor.
pub fn marker_diameter(total: u64) -> f64 {
    (BASE_DIAMETER + (total as f64 / SIZE_SCALE).powi(2)).max(MIN_DIAMETER)
}

/// For every state (or district), the sector with the most registered
/// societies, its share of the group total, and the marker encoding.
///
/// Ties resolve to the first-encountered sector within the group, so the
/// result is deterministic for a given dataset order. Colors are assigned
/// in group iteration order.
pub fn dominant_by_group(
    records: &[Record],
    group: GroupField,
    colors: &mut ColorAssignment,
) -> Vec<DominantSector> {
    // Rows missing the group value, sector, or society name cannot
    // contribute a valid count.
    let complete: Vec<&Record> = records
        .iter()
        .filter(|r| {
            !r.society.is_empty() && !r.sector.is_empty() && !group.value(r).is_empty()
        })
        .collect();

    let mut out = Vec::new();
    for (name, rows) in group_records(complete.iter().copied(), |r| group.value(r).to_string()) {
        let total = rows.len() as u64;
        if total == 0 {
            // A zero-total group has no well-defined share.
            continue;
        }

        let sectors = group_records(rows.iter().copied(), |r| r.sector.clone());
        let mut dominant: Option<(&String, u64)> = None;
        for (sector, bucket) in &sectors {
            let count = bucket.len() as u64;
            if dominant.map_or(true, |(_, best)| count > best) {
                dominant = Some((sector, count));
            }
        }
        let Some((sector, count)) = dominant else {
            continue;
        };

        out.push(DominantSector {
            group: name,
            sector: sector.clone(),
            count,
            total,
            share: count as f64 / total as f64,
            diameter: marker_diameter(total),
            color: colors.color_for(sector).to_string(),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PALETTE;
    use chrono::NaiveDate;

    fn rec(state: &str, district: &str, sector: &str) -> Record {
        Record {
            society: format!("{state} {sector} Society"),
            state: state.to_string(),
            district: district.to_string(),
            sector: sector.to_string(),
            registered_on: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
        }
    }

    #[test]
    fn majority_sector_and_share_per_group() {
        let records = vec![
            rec("A", "d1", "X"),
            rec("A", "d1", "X"),
            rec("A", "d2", "X"),
            rec("A", "d2", "Y"),
            rec("A", "d3", "Y"),
            rec("B", "d4", "X"),
        ];

        let mut colors = ColorAssignment::new();
        let entries = dominant_by_group(&records, GroupField::State, &mut colors);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].group, "A");
        assert_eq!(entries[0].sector, "X");
        assert_eq!(entries[0].count, 3);
        assert_eq!(entries[0].total, 5);
        assert_eq!(entries[0].share, 0.6);
        assert_eq!(entries[1].group, "B");
        assert_eq!(entries[1].sector, "X");
        assert_eq!(entries[1].count, 1);
        assert_eq!(entries[1].total, 1);
        assert_eq!(entries[1].share, 1.0);
    }

    #[test]
    fn dominant_count_is_the_group_maximum_and_share_stays_in_range() {
        let records = vec![
            rec("A", "d1", "X"),
            rec("A", "d1", "Y"),
            rec("A", "d1", "Y"),
            rec("B", "d2", "Z"),
        ];

        let mut colors = ColorAssignment::new();
        for entry in dominant_by_group(&records, GroupField::State, &mut colors) {
            assert!(entry.count <= entry.total);
            assert!(entry.share > 0.0 && entry.share <= 1.0);
        }
    }

    #[test]
    fn ties_resolve_to_the_first_encountered_sector() {
        let records = vec![
            rec("A", "d1", "Y"),
            rec("A", "d1", "X"),
            rec("A", "d1", "X"),
            rec("A", "d1", "Y"),
        ];

        let mut colors = ColorAssignment::new();
        let entries = dominant_by_group(&records, GroupField::State, &mut colors);
        assert_eq!(entries[0].sector, "Y");
        assert_eq!(entries[0].count, 2);
    }

    #[test]
    fn rows_missing_a_required_field_are_discarded() {
        let mut nameless = rec("A", "d1", "X");
        nameless.society = String::new();
        let mut sectorless = rec("A", "d1", "X");
        sectorless.sector = String::new();
        let districtless = rec("A", "", "X");
        let records = vec![nameless, sectorless, districtless, rec("A", "d1", "Y")];

        let mut colors = ColorAssignment::new();
        let entries = dominant_by_group(&records, GroupField::District, &mut colors);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].group, "d1");
        assert_eq!(entries[0].sector, "Y");
        assert_eq!(entries[0].total, 1);
    }

    #[test]
    fn grouping_by_district_partitions_on_the_finer_key() {
        let records = vec![
            rec("A", "d1", "X"),
            rec("A", "d2", "Y"),
            rec("A", "d2", "Y"),
        ];

        let mut colors = ColorAssignment::new();
        let entries = dominant_by_group(&records, GroupField::District, &mut colors);
        let groups: Vec<&str> = entries.iter().map(|e| e.group.as_str()).collect();
        assert_eq!(groups, ["d1", "d2"]);
    }

    #[test]
    fn colors_follow_group_iteration_order() {
        let records = vec![rec("A", "d1", "X"), rec("B", "d2", "Y")];

        let mut colors = ColorAssignment::new();
        let entries = dominant_by_group(&records, GroupField::State, &mut colors);
        assert_eq!(entries[0].color, PALETTE[0]);
        assert_eq!(entries[1].color, PALETTE[1]);
    }

    #[test]
    fn marker_diameter_is_monotone_with_a_floor() {
        assert!(marker_diameter(0) >= MIN_DIAMETER);
        let mut previous = marker_diameter(0);
        for total in [1, 10, 100, 500, 1_000, 10_000] {
            let diameter = marker_diameter(total);
            assert!(diameter >= previous);
            assert!(diameter >= MIN_DIAMETER);
            previous = diameter;
        }
    }
}
