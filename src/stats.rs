use chrono::NaiveDate;
use serde::Serialize;

/// Record count for one (group, sub-key) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAggregate {
    pub group: String,
    pub sub: String,
    pub count: u64,
}

/// Number of distinct values observed alongside one key value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistinctCount {
    pub key: String,
    pub distinct: u64,
}

/// One row of a frequency ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedValue {
    pub value: String,
    pub count: u64,
}

/// Running registration total as of one date present in the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub total: u64,
}

/// The majority sector of one state or district, with its share of the
/// group total and the marker encoding for the comparative scatter view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DominantSector {
    pub group: String,
    pub sector: String,
    pub count: u64,
    pub total: u64,
    pub share: f64,
    pub diameter: f64,
    pub color: String,
}

/// Every derived view one refresh produces. Rebuilt from scratch each time;
/// the previous snapshot is simply dropped.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshSnapshot {
    pub total_societies: u64,
    pub sector_state_counts: Vec<GroupAggregate>,
    pub districts_per_sector: Vec<DistinctCount>,
    pub states_per_sector: Vec<DistinctCount>,
    pub societies_per_sector: Vec<RankedValue>,
    pub registrations_over_time: Vec<CumulativePoint>,
    pub top_districts: Vec<RankedValue>,
    pub dominant_sectors: Vec<DominantSector>,
}
