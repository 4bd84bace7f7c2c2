//! Derived metrics for benchmark and edge-analysis records.
//!
//! All functions here are pure: the output depends only on the input records
//! and the [`DeriveConstants`] passed in.

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::schema::{DerivedRecord, EdgeComposition, EdgeRecord, LogRecord};

/// Sizing constants of the store under test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeriveConstants {
    pub page_size_bytes: i64,
    /// On-disk size of one key-value record.
    pub record_size_bytes: i64,
    /// Fixed offset added to the local buffer percentage.
    pub rounding_bias: f64,
}

impl Default for DeriveConstants {
    fn default() -> Self {
        Self {
            page_size_bytes: 4096,
            record_size_bytes: 160,
            rounding_bias: 0.5,
        }
    }
}

impl DeriveConstants {
    /// `(local capacity + buffered pages) * 100 / data size + bias`.
    pub fn used_local_buffer_pct(&self, record: &LogRecord, index: usize) -> Result<f64> {
        let data_size = self.record_size_bytes as f64 * record.num_elements as f64;
        if data_size == 0.0 {
            return Err(ChartError::DivisionByZero {
                field: "used_local_buffer_pct",
                index,
            });
        }
        let local_bytes = record.purely_local_capacity as f64
            + record.buffer_page_count as f64 * self.page_size_bytes as f64;
        Ok(local_bytes * 100.0 / data_size + self.rounding_bias)
    }
}

/// Derive plotted values for every record, keeping length and order.
pub fn derive_records(records: &[LogRecord], constants: &DeriveConstants) -> Result<Vec<DerivedRecord>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            Ok(DerivedRecord {
                used_local_buffer_pct: constants.used_local_buffer_pct(record, index)?,
                query_swap_count: record.query_read_count + record.query_write_count,
                record: record.clone(),
            })
        })
        .collect()
}

fn ratios_of(counts: [i64; 3], index: usize) -> Result<[f64; 3]> {
    let total: i64 = counts.iter().sum();
    if total == 0 {
        return Err(ChartError::DivisionByZero {
            field: "edge ratio",
            index,
        });
    }
    let total = total as f64;
    Ok([
        counts[0] as f64 / total,
        counts[1] as f64 / total,
        counts[2] as f64 / total,
    ])
}

/// Share of each edge category per record.
pub fn derive_edge_composition(records: &[EdgeRecord]) -> Result<Vec<EdgeComposition>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let [purely_local_ratio, in_page_ratio, cross_page_ratio] =
                ratios_of(record.counts(), index)?;
            Ok(EdgeComposition {
                record: record.clone(),
                purely_local_ratio,
                in_page_ratio,
                cross_page_ratio,
            })
        })
        .collect()
}

/// Category shares over the summed edge counts of several records.
pub fn aggregate_composition(records: &[EdgeComposition]) -> Result<[f64; 3]> {
    let mut counts = [0i64; 3];
    for composition in records {
        for (total, count) in counts.iter_mut().zip(composition.record.counts()) {
            *total += count;
        }
    }
    ratios_of(counts, 0)
}
