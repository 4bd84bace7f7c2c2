//! Faceted comparison charts for far-memory key-value store benchmarks.
//!
//! The pipeline runs strictly in one direction:
//! [`loader`] parses harness logs, [`derive`] computes the plotted metrics,
//! [`facet`] splits records by workload or variant, [`series`] assigns each
//! variant its colour and marker, and [`figure`] lays out panels, axes, bars
//! and the shared legend. [`render`] draws the result; [`pipeline`] ties the
//! stages together for the figures listed in [`experiments`].

pub mod config;
pub mod derive;
pub mod error;
pub mod experiments;
pub mod facet;
pub mod figure;
pub mod loader;
pub mod pipeline;
pub mod render;
pub mod schema;
pub mod series;

pub use config::{OutputNaming, RenderConfig};
pub use error::{ChartError, Result};
pub use pipeline::ChartRun;
