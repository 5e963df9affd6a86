use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::NaiveDate;

use crate::error::{PipelineError, Result};
use crate::record::{Field, Record};
use crate::stats::{CumulativePoint, DistinctCount, GroupAggregate, RankedValue};

/// Buckets records by `key`, preserving first-seen key order.
///
/// Every calculator reduces over these buckets; the grouping and the
/// reduction stay separate steps. First-seen order is the tie-break order
/// for rankings and the dominant-sector resolver, so it must survive here.
pub fn group_records<'a, K, F, I>(records: I, key: F) -> Vec<(K, Vec<&'a Record>)>
where
    I: IntoIterator<Item = &'a Record>,
    K: Eq + Hash + Clone,
    F: Fn(&Record) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a Record>)> = Vec::new();

    for record in records {
        let k = key(record);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![record]));
            }
        }
    }

    groups
}

/// Record count per (group, sub) pair, sorted by group then sub.
pub fn counts_by_keys(records: &[Record], group: Field, sub: Field) -> Vec<GroupAggregate> {
    let mut rows: Vec<GroupAggregate> =
        group_records(records, |r| (r.field(group).to_string(), r.field(sub).to_string()))
            .into_iter()
            .map(|((group, sub), bucket)| GroupAggregate {
                group,
                sub,
                count: bucket.len() as u64,
            })
            .collect();

    rows.sort_by(|a, b| a.group.cmp(&b.group).then_with(|| a.sub.cmp(&b.sub)));
    rows
}

/// Number of distinct `counted` values observed per `key` value, sorted by key.
pub fn distinct_count_by(records: &[Record], key: Field, counted: Field) -> Vec<DistinctCount> {
    let mut rows: Vec<DistinctCount> = group_records(records, |r| r.field(key).to_string())
        .into_iter()
        .map(|(key, bucket)| {
            let distinct: HashSet<&str> = bucket.iter().map(|r| r.field(counted)).collect();
            DistinctCount {
                key,
                distinct: distinct.len() as u64,
            }
        })
        .collect();

    rows.sort_by(|a, b| a.key.cmp(&b.key));
    rows
}

/// Frequency of every value of `field`, in first-seen order.
pub fn value_counts(records: &[Record], field: Field) -> Vec<RankedValue> {
    group_records(records, |r| r.field(field).to_string())
        .into_iter()
        .map(|(value, bucket)| RankedValue {
            value,
            count: bucket.len() as u64,
        })
        .collect()
}

/// The `n` most frequent values of `field`, descending by count. A stable
/// sort over the first-seen ordering makes ties deterministic.
pub fn top_n(records: &[Record], field: Field, n: usize) -> Result<Vec<RankedValue>> {
    if records.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let mut ranked = value_counts(records, field);
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    Ok(ranked)
}

/// Running registration total per distinct date, ascending. Only dates
/// present in the data are emitted; there is no gap filling.
pub fn cumulative_series(records: &[Record]) -> Vec<CumulativePoint> {
    let mut per_date: Vec<(NaiveDate, u64)> = group_records(records, |r| r.registered_on)
        .into_iter()
        .map(|(date, bucket)| (date, bucket.len() as u64))
        .collect();
    per_date.sort_by_key(|&(date, _)| date);

    let mut running = 0u64;
    per_date
        .into_iter()
        .map(|(date, count)| {
            running += count;
            CumulativePoint {
                date,
                total: running,
            }
        })
        .collect()
}
