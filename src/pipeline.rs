//! One chart run: load, derive, facet, compose, then render.
//!
//! All figures are built before the first artifact is written, so a bad log
//! aborts the run without leaving partial charts behind.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::RenderConfig;
use crate::derive::{derive_edge_composition, derive_records, DeriveConstants};
use crate::error::{ChartError, Result};
use crate::experiments::{edge_log_path, kvs_log_path, EdgeExperiment, Experiment, LineExperiment, Structure};
use crate::facet::{Facet, FacetKey, DESIGN_POINTS};
use crate::figure::{build_bar_chart, build_line_figure, BarLayout, Legend};
use crate::loader::{load_edge_log, load_kvs_log};
use crate::render::Renderer;
use crate::schema::{ChartReport, EdgeComposition, FigureReport};
use crate::series::{LegendScope, Variant};

pub struct ChartRun<R> {
    log_dir: PathBuf,
    out_dir: PathBuf,
    constants: DeriveConstants,
    config: RenderConfig,
    renderer: R,
}

impl<R: Renderer> ChartRun<R> {
    pub fn new(log_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>, config: RenderConfig, renderer: R) -> Self {
        Self {
            log_dir: log_dir.into(),
            out_dir: out_dir.into(),
            constants: DeriveConstants::default(),
            config,
            renderer,
        }
    }

    pub fn with_constants(mut self, constants: DeriveConstants) -> Self {
        self.constants = constants;
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Load and derive the benchmark records of each variant, in order.
    pub fn load_variants(&self, structure: Structure, labels: &[&str]) -> Result<Vec<Variant>> {
        labels
            .iter()
            .map(|label| {
                let path = kvs_log_path(&self.log_dir, structure, label);
                let records = load_kvs_log(&path)?;
                let derived = derive_records(&records, &self.constants)?;
                Ok(Variant::new(*label, derived))
            })
            .collect()
    }

    /// Load edge records, one facet per variant, in order.
    pub fn load_edge_facets(&self, structure: Structure, labels: &[&str]) -> Result<Vec<Facet<EdgeComposition>>> {
        labels
            .iter()
            .map(|label| {
                let path = edge_log_path(&self.log_dir, structure, label);
                let records = load_edge_log(&path)?;
                Ok(Facet {
                    key: FacetKey::Variant(label.to_string()),
                    records: derive_edge_composition(&records)?,
                })
            })
            .collect()
    }

    fn build_lines(&self, experiment: &LineExperiment) -> Result<Vec<FigureReport>> {
        let all = self.load_variants(experiment.structure, experiment.legend_variants)?;
        let scope = LegendScope::for_variants(&all, &self.config.palette)?;

        let mut figures = Vec::with_capacity(experiment.groups.len());
        for (i, group) in experiment.groups.iter().enumerate() {
            let variants = group
                .variants
                .iter()
                .map(|label| {
                    all.iter()
                        .find(|v| v.label == *label)
                        .cloned()
                        .ok_or_else(|| ChartError::UnknownVariant(label.to_string()))
                })
                .collect::<Result<Vec<_>>>()?;
            let group_scope = scope.restrict(group.variants)?;
            let suffixes: Vec<char> = group.suffixes.chars().collect();
            let mut data = build_line_figure(
                &group_scope,
                &variants,
                &DESIGN_POINTS,
                &suffixes,
                experiment.layout(),
                false,
            )?;
            // One legend per experiment, listing every variant of the scope.
            if i == 0 {
                data.legend = Some(Legend::from_scope(&scope));
            }
            figures.push(FigureReport::Lines {
                figure: experiment.index.to_string(),
                data,
            });
        }
        Ok(figures)
    }

    fn build_edges(&self, experiment: &EdgeExperiment) -> Result<FigureReport> {
        let facets = self.load_edge_facets(experiment.structure, experiment.variants)?;
        let data = build_bar_chart(&facets, &self.config.palette, BarLayout::default())?;
        Ok(FigureReport::Bars {
            figure: experiment.index.to_string(),
            data,
        })
    }

    /// Compute every figure without touching the output directory.
    pub fn build(&self, experiments: &[Experiment]) -> Result<ChartReport> {
        let mut report = ChartReport::new();
        for experiment in experiments {
            match experiment {
                Experiment::Lines(e) => report.figures.extend(self.build_lines(e)?),
                Experiment::Edges(e) => report.figures.push(self.build_edges(e)?),
            }
        }
        Ok(report)
    }

    /// Draw every figure of `report`. Returns the written artifact paths.
    ///
    /// Artifacts are drawn into a staging directory inside `out_dir` and
    /// moved into place once all of them succeeded; a failed draw removes
    /// the staging directory and leaves `out_dir` untouched.
    pub fn render(&mut self, report: &ChartReport) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.out_dir).map_err(|source| self.io_err(source))?;
        let staging = tempfile::Builder::new()
            .prefix(".staging")
            .tempdir_in(&self.out_dir)
            .map_err(|source| self.io_err(source))?;

        let naming = self.config.naming.clone();
        let mut staged: Vec<PathBuf> = Vec::new();
        for figure in &report.figures {
            match figure {
                FigureReport::Lines { figure, data } => {
                    for panel in &data.panels {
                        let path = naming.panel_path(staging.path(), figure, panel.suffix);
                        self.renderer.line_panel(panel, &data.layout, &path)?;
                        staged.push(path);
                    }
                    if let Some(legend) = &data.legend {
                        let path = naming.legend_path(staging.path(), figure);
                        self.renderer.legend(legend, &path)?;
                        staged.push(path);
                    }
                }
                FigureReport::Bars { figure, data } => {
                    let path = naming.figure_path(staging.path(), figure);
                    self.renderer.bar_chart(data, &path)?;
                    staged.push(path);
                }
            }
        }

        let mut written = Vec::with_capacity(staged.len());
        for from in staged {
            let relative = from.strip_prefix(staging.path()).unwrap_or(from.as_path());
            let to = self.out_dir.join(relative);
            if let Some(parent) = to.parent() {
                std::fs::create_dir_all(parent).map_err(|source| ChartError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            std::fs::rename(&from, &to).map_err(|source| ChartError::Io {
                path: to.clone(),
                source,
            })?;
            written.push(to);
        }
        Ok(written)
    }

    fn io_err(&self, source: std::io::Error) -> ChartError {
        ChartError::Io {
            path: self.out_dir.clone(),
            source,
        }
    }

    /// Build, then render.
    pub fn run(&mut self, experiments: &[Experiment]) -> Result<ChartReport> {
        let report = self.build(experiments)?;
        let written = self.render(&report)?;
        info!(artifacts = written.len(), out_dir = %self.out_dir.display(), "chart run complete");
        Ok(report)
    }
}

/// Write `report` as pretty JSON.
pub fn save_report(report: &ChartReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(|e| ChartError::render(path, e))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ChartError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, json).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "report saved");
    Ok(())
}
