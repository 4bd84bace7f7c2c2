//! Partitioning of derived records into facets.
//!
//! A facet is the subset of records sharing a key: a variant name, or the
//! (zipf skewness, update ratio) workload pair a run was made with. Facets
//! used for line charts are sorted by `used_local_buffer_pct`, since lines are
//! drawn through points in sequence order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{DerivedRecord, LogRecord};

/// A workload design point of the benchmark harness.
///
/// Selection uses exact float equality: the harness prints these values with
/// few digits, so parsing yields exactly the literals below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkloadPoint {
    pub zipf_skewness: f64,
    pub update_ratio: f64,
}

impl WorkloadPoint {
    pub const fn new(zipf_skewness: f64, update_ratio: f64) -> Self {
        Self {
            zipf_skewness,
            update_ratio,
        }
    }

    pub fn of(record: &LogRecord) -> Self {
        Self::new(record.zipf_skewness, record.update_ratio)
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        record.zipf_skewness == self.zipf_skewness && record.update_ratio == self.update_ratio
    }
}

impl fmt::Display for WorkloadPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zipf={} update={}", self.zipf_skewness, self.update_ratio)
    }
}

/// Workloads plotted as panels, in panel order.
pub const DESIGN_POINTS: [WorkloadPoint; 4] = [
    WorkloadPoint::new(0.8, 0.05),
    WorkloadPoint::new(0.8, 0.5),
    WorkloadPoint::new(1.3, 0.05),
    WorkloadPoint::new(1.3, 0.5),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKey {
    Variant(String),
    Workload(WorkloadPoint),
}

impl fmt::Display for FacetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetKey::Variant(name) => f.write_str(name),
            FacetKey::Workload(point) => point.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Facet<T> {
    pub key: FacetKey,
    pub records: Vec<T>,
}

/// Group records by `key`.
///
/// Facets appear in order of the first record carrying their key and keep
/// the input order of their records.
pub fn group_by<T, F>(records: impl IntoIterator<Item = T>, key: F) -> Vec<Facet<T>>
where
    F: Fn(&T) -> FacetKey,
{
    let mut facets: Vec<Facet<T>> = Vec::new();
    for record in records {
        let k = key(&record);
        match facets.iter_mut().find(|facet| facet.key == k) {
            Some(facet) => facet.records.push(record),
            None => facets.push(Facet {
                key: k,
                records: vec![record],
            }),
        }
    }
    facets
}

/// Stable ascending sort by `used_local_buffer_pct`.
pub fn sort_by_local_buffer(records: &mut [DerivedRecord]) {
    records.sort_by(|a, b| a.used_local_buffer_pct.total_cmp(&b.used_local_buffer_pct));
}

/// Group derived records by `key`, each facet sorted for plotting.
pub fn facet_by<F>(records: impl IntoIterator<Item = DerivedRecord>, key: F) -> Vec<Facet<DerivedRecord>>
where
    F: Fn(&DerivedRecord) -> FacetKey,
{
    let mut facets = group_by(records, key);
    for facet in &mut facets {
        sort_by_local_buffer(&mut facet.records);
    }
    facets
}

/// Records run with exactly `point`, sorted for plotting. May be empty.
pub fn select_workload(records: &[DerivedRecord], point: WorkloadPoint) -> Vec<DerivedRecord> {
    let mut selected: Vec<DerivedRecord> = records
        .iter()
        .filter(|r| point.matches(&r.record))
        .cloned()
        .collect();
    sort_by_local_buffer(&mut selected);
    selected
}

/// One sorted facet per requested point, in the order given.
pub fn facet_by_workload(records: &[DerivedRecord], points: &[WorkloadPoint]) -> Vec<Facet<DerivedRecord>> {
    points
        .iter()
        .map(|&point| Facet {
            key: FacetKey::Workload(point),
            records: select_workload(records, point),
        })
        .collect()
}
