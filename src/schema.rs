//! Record types for the benchmark logs and the chart report written after a run.
//!
//! The benchmark harness emits one fixed schema per experiment kind. Rows of
//! the key-value store benchmark become [`LogRecord`], rows of the edge
//! analysis become [`EdgeRecord`]. Derived values live in [`DerivedRecord`] and
//! [`EdgeComposition`].

use serde::{Deserialize, Serialize};

use crate::figure::{BarChart, LineFigure};

/// Version of the [`ChartReport`] JSON layout.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Object placement strategy the harness was run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchBlocking {
    None,
    DepthFirst,
    VanEmdeBoas,
}

impl BatchBlocking {
    /// Decode the numeric code printed by the harness.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(BatchBlocking::None),
            1 => Some(BatchBlocking::DepthFirst),
            2 => Some(BatchBlocking::VanEmdeBoas),
            _ => None,
        }
    }
}

/// One row of a key-value store benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub num_elements: i64,
    pub num_iterations: i64,
    pub zipf_skewness: f64,
    pub update_ratio: f64,
    /// Bytes of purely local (never swapped) capacity.
    pub purely_local_capacity: i64,
    /// Pages held in the swap buffer.
    pub buffer_page_count: i64,
    pub batch_blocking: BatchBlocking,
    pub construction_duration_ns: i64,
    pub query_duration_ns: i64,
    pub query_read_count: i64,
    pub query_write_count: i64,
}

/// A [`LogRecord`] augmented with the values plotted on the line charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRecord {
    #[serde(flatten)]
    pub record: LogRecord,
    /// Local memory usage relative to data size, in percent.
    pub used_local_buffer_pct: f64,
    /// Pages swapped in or out while running queries.
    pub query_swap_count: i64,
}

/// One row of an edge (link) analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub num_elements: i64,
    pub purely_local_capacity: i64,
    pub batch_blocking: BatchBlocking,
    pub construction_duration_ns: i64,
    pub purely_local_edges: i64,
    pub in_page_edges: i64,
    pub cross_page_edges: i64,
}

impl EdgeRecord {
    /// Edge counts in [`EdgeCategory::ALL`] order.
    pub fn counts(&self) -> [i64; 3] {
        [
            self.purely_local_edges,
            self.in_page_edges,
            self.cross_page_edges,
        ]
    }
}

/// Where the target of a link lives relative to its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeCategory {
    PurelyLocal,
    InPage,
    CrossPage,
}

impl EdgeCategory {
    /// Segment order shared by every composition bar.
    pub const ALL: [EdgeCategory; 3] = [
        EdgeCategory::PurelyLocal,
        EdgeCategory::InPage,
        EdgeCategory::CrossPage,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EdgeCategory::PurelyLocal => "purely-local",
            EdgeCategory::InPage => "in-page",
            EdgeCategory::CrossPage => "cross-page",
        }
    }
}

/// An [`EdgeRecord`] with the share of each edge category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeComposition {
    #[serde(flatten)]
    pub record: EdgeRecord,
    pub purely_local_ratio: f64,
    pub in_page_ratio: f64,
    pub cross_page_ratio: f64,
}

impl EdgeComposition {
    /// Ratios in [`EdgeCategory::ALL`] order.
    pub fn ratios(&self) -> [f64; 3] {
        [
            self.purely_local_ratio,
            self.in_page_ratio,
            self.cross_page_ratio,
        ]
    }
}

/// Everything drawn during one run, written as JSON next to the artifacts.
///
/// Built only from ordered collections, so two runs over identical logs
/// serialize to identical bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartReport {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    pub figures: Vec<FigureReport>,
}

impl ChartReport {
    pub fn new() -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            figures: Vec::new(),
        }
    }
}

impl Default for ChartReport {
    fn default() -> Self {
        Self::new()
    }
}

/// The data behind one figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FigureReport {
    Lines {
        figure: String,
        #[serde(flatten)]
        data: LineFigure,
    },
    Bars {
        figure: String,
        #[serde(flatten)]
        data: BarChart,
    },
}
