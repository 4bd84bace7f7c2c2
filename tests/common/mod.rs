//! Shared test utilities: fixture paths, record builders and a recording renderer.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use kvs_bench_charts::figure::{BarChart, Legend, LineLayout, LinePanel};
use kvs_bench_charts::render::Renderer;
use kvs_bench_charts::schema::{BatchBlocking, EdgeRecord, LogRecord};
use kvs_bench_charts::{ChartError, Result};

// =============================================================================
// Fixture paths
// =============================================================================

pub fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

pub fn malformed(name: &str) -> PathBuf {
    data_dir().join("malformed").join(name)
}

// =============================================================================
// Record builders
// =============================================================================

pub fn record(num_elements: i64, purely_local_capacity: i64, buffer_page_count: i64) -> LogRecord {
    LogRecord {
        num_elements,
        num_iterations: 10_000,
        zipf_skewness: 0.8,
        update_ratio: 0.05,
        purely_local_capacity,
        buffer_page_count,
        batch_blocking: BatchBlocking::DepthFirst,
        construction_duration_ns: 1_000,
        query_duration_ns: 2_000,
        query_read_count: 300,
        query_write_count: 30,
    }
}

pub fn workload_record(zipf_skewness: f64, update_ratio: f64, buffer_page_count: i64, reads: i64) -> LogRecord {
    LogRecord {
        zipf_skewness,
        update_ratio,
        query_read_count: reads,
        query_write_count: 0,
        ..record(1_000_000, 0, buffer_page_count)
    }
}

pub fn edge_record(purely_local: i64, in_page: i64, cross_page: i64) -> EdgeRecord {
    EdgeRecord {
        num_elements: 1_000_000,
        purely_local_capacity: 0,
        batch_blocking: BatchBlocking::None,
        construction_duration_ns: 1_000,
        purely_local_edges: purely_local,
        in_page_edges: in_page,
        cross_page_edges: cross_page,
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

// =============================================================================
// Recording renderer
// =============================================================================

/// Remembers what would have been drawn, and where.
/// Renderer that keeps what it was asked to draw and writes a placeholder
/// file per artifact. With `fail_at` set, the artifact with that index fails.
#[derive(Default)]
pub struct RecordingRenderer {
    pub panels: Vec<(PathBuf, LinePanel)>,
    pub legends: Vec<(PathBuf, Legend)>,
    pub bars: Vec<(PathBuf, BarChart)>,
    pub fail_at: Option<usize>,
    drawn: usize,
}

impl RecordingRenderer {
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.panels
            .iter()
            .map(|(p, _)| p.clone())
            .chain(self.legends.iter().map(|(p, _)| p.clone()))
            .chain(self.bars.iter().map(|(p, _)| p.clone()))
            .collect()
    }

    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .paths()
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        names
    }

    fn write(&mut self, path: &Path) -> Result<()> {
        let index = self.drawn;
        self.drawn += 1;
        if self.fail_at == Some(index) {
            return Err(ChartError::Render {
                path: path.to_path_buf(),
                reason: "recording renderer told to fail".into(),
            });
        }
        std::fs::write(path, "<svg/>").map_err(|source| ChartError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn line_panel(&mut self, panel: &LinePanel, _layout: &LineLayout, path: &Path) -> Result<()> {
        self.write(path)?;
        self.panels.push((path.to_path_buf(), panel.clone()));
        Ok(())
    }

    fn legend(&mut self, legend: &Legend, path: &Path) -> Result<()> {
        self.write(path)?;
        self.legends.push((path.to_path_buf(), legend.clone()));
        Ok(())
    }

    fn bar_chart(&mut self, chart: &BarChart, path: &Path) -> Result<()> {
        self.write(path)?;
        self.bars.push((path.to_path_buf(), chart.clone()));
        Ok(())
    }
}
