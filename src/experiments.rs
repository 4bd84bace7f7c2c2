//! The figures drawn from the benchmark logs.
//!
//! The log file of a variant is located by naming convention; the content
//! does not say which variant produced it.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::figure::LineLayout;

/// Index structure the harness was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    BTree,
    SkipList,
}

impl Structure {
    pub fn file_tag(self) -> &'static str {
        match self {
            Structure::BTree => "btree",
            Structure::SkipList => "skiplist",
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_tag())
    }
}

fn file_slug(label: &str) -> String {
    label.to_ascii_lowercase()
}

/// `kvs_benchmark_with_<variant>_<structure>.log`
pub fn kvs_log_path(log_dir: &Path, structure: Structure, label: &str) -> PathBuf {
    log_dir.join(format!(
        "kvs_benchmark_with_{}_{}.log",
        file_slug(label),
        structure.file_tag()
    ))
}

/// `analyze_edges_of_<variant>_<structure>.log`
pub fn edge_log_path(log_dir: &Path, structure: Structure, label: &str) -> PathBuf {
    log_dir.join(format!(
        "analyze_edges_of_{}_{}.log",
        file_slug(label),
        structure.file_tag()
    ))
}

/// Panels drawn for a subset of the legend's variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelGroup {
    pub variants: &'static [&'static str],
    /// One letter per workload panel, in panel order.
    pub suffixes: &'static str,
}

/// Line charts of swapped data against local memory usage.
#[derive(Debug, Clone, PartialEq)]
pub struct LineExperiment {
    pub index: &'static str,
    pub structure: Structure,
    /// Palette and legend order.
    pub legend_variants: &'static [&'static str],
    pub groups: &'static [PanelGroup],
    pub size_in: (f64, f64),
}

impl LineExperiment {
    pub fn layout(&self) -> LineLayout {
        LineLayout {
            size_in: self.size_in,
            ..LineLayout::default()
        }
    }
}

/// Stacked bars of edge category shares, one bar per variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeExperiment {
    pub index: &'static str,
    pub structure: Structure,
    pub variants: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq)]
pub enum Experiment {
    Lines(LineExperiment),
    Edges(EdgeExperiment),
}

impl Experiment {
    pub fn index(&self) -> &'static str {
        match self {
            Experiment::Lines(e) => e.index,
            Experiment::Edges(e) => e.index,
        }
    }
}

const BTREE_VARIANTS: &[&str] = &["dfs", "vEB", "local", "local+dfs", "local+vEB", "hint"];
const SKIPLIST_VARIANTS: &[&str] = &["page", "local", "local+page", "hint"];

pub fn figure9a() -> Experiment {
    Experiment::Edges(EdgeExperiment {
        index: "9a",
        structure: Structure::BTree,
        variants: BTREE_VARIANTS,
    })
}

pub fn figure9b() -> Experiment {
    Experiment::Edges(EdgeExperiment {
        index: "9b",
        structure: Structure::SkipList,
        variants: SKIPLIST_VARIANTS,
    })
}

pub fn figure10() -> Experiment {
    Experiment::Lines(LineExperiment {
        index: "10",
        structure: Structure::BTree,
        legend_variants: BTREE_VARIANTS,
        groups: &[
            PanelGroup {
                variants: &["dfs", "local", "local+dfs", "hint"],
                suffixes: "abcd",
            },
            PanelGroup {
                variants: &["dfs", "vEB", "local+dfs", "local+vEB"],
                suffixes: "efgh",
            },
        ],
        size_in: (2.55, 1.3),
    })
}

pub fn figure12() -> Experiment {
    Experiment::Lines(LineExperiment {
        index: "12",
        structure: Structure::SkipList,
        legend_variants: SKIPLIST_VARIANTS,
        groups: &[PanelGroup {
            variants: SKIPLIST_VARIANTS,
            suffixes: "abcd",
        }],
        size_in: (2.55, 1.0),
    })
}

/// Every figure, in drawing order.
pub fn catalog() -> Vec<Experiment> {
    vec![figure9a(), figure9b(), figure10(), figure12()]
}

pub fn find(index: &str) -> Option<Experiment> {
    catalog().into_iter().find(|e| e.index() == index)
}
