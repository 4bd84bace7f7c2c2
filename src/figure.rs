//! Figure layout: panels, axes, stacked composition bars and legends.
//!
//! Everything here is computed data. Drawing it is the job of a
//! [`Renderer`](crate::render::Renderer), so the numbers handed to the plotting
//! surface can be checked and serialized on their own.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::derive::aggregate_composition;
use crate::error::{ChartError, Result};
use crate::facet::{Facet, WorkloadPoint};
use crate::schema::{EdgeCategory, EdgeComposition};
use crate::series::{compose_series, LegendEntry, LegendScope, Palette, Rgb, Series, Variant};

/// Local buffer capacity equals data size here.
pub const REFERENCE_LINE_X: f64 = 100.0;

/// The x axis gets `X_TICK_DIVISIONS + 1` evenly spaced ticks.
pub const X_TICK_DIVISIONS: usize = 8;

/// Share of the data span added above the largest y value.
pub const Y_HEADROOM: f64 = 0.05;

/// Segments narrower than this percentage get no label.
pub const LABEL_VISIBILITY_PCT: f64 = 0.1;

/// HLS lightness under which a segment label is drawn in white.
pub const LABEL_LIGHTNESS_MIDPOINT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineLayout {
    /// Width and height in inches.
    pub size_in: (f64, f64),
    pub x_label: String,
    pub y_label: String,
}

impl Default for LineLayout {
    fn default() -> Self {
        Self {
            size_in: (2.55, 1.3),
            x_label: "L = (local memory usage)/(data size) [%]".to_string(),
            y_label: "amount of swapped data".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxis {
    pub max: f64,
    pub ticks: Vec<f64>,
}

impl XAxis {
    /// `[0, x_max]` with ticks at `i * x_max / 8`.
    pub fn new(max: f64) -> Self {
        let ticks = (0..=X_TICK_DIVISIONS)
            .map(|i| max * i as f64 / X_TICK_DIVISIONS as f64)
            .collect();
        Self { max, ticks }
    }

    /// Shared by every panel of a group: the largest local buffer percentage
    /// of any variant in it, or the reference line when all are empty.
    pub fn for_variants(variants: &[Variant]) -> Self {
        let max = variants
            .iter()
            .filter_map(Variant::max_local_buffer_pct)
            .fold(None, |acc: Option<f64>, x| Some(acc.map_or(x, |m| m.max(x))))
            .unwrap_or(REFERENCE_LINE_X);
        Self::new(max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YAxis {
    /// Always 0.
    pub min: f64,
    pub max: f64,
    /// Shared power of ten for tick labels.
    pub exponent: i32,
}

impl YAxis {
    /// Range of the drawn points with headroom above; the floor is pinned to 0.
    pub fn auto(series: &[Series]) -> Self {
        let (lo, hi) = series
            .iter()
            .flat_map(|s| s.y.iter().copied())
            .fold(None, |acc: Option<(f64, f64)>, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
            .unwrap_or((0.0, 0.0));

        let span = hi - lo;
        let top = if span > 0.0 {
            hi + span * Y_HEADROOM
        } else {
            hi + hi.abs() * Y_HEADROOM
        };
        let max = if top > 0.0 { top } else { 1.0 };
        Self {
            min: 0.0,
            max,
            exponent: sci_exponent(max),
        }
    }

    pub fn tick_label(&self, value: f64) -> String {
        format_sci_tick(value, self.exponent)
    }
}

/// Power of ten used for scientific tick labels of an axis ending at `top`.
pub fn sci_exponent(top: f64) -> i32 {
    if top > 0.0 && top.is_finite() {
        top.log10().floor() as i32
    } else {
        0
    }
}

pub fn format_sci_tick(value: f64, exponent: i32) -> String {
    let scaled = value / 10f64.powi(exponent);
    let text = format!("{:.1}", scaled);
    text.strip_suffix(".0").map(str::to_string).unwrap_or(text)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePanel {
    /// Letter appended to the figure index in the artifact name.
    pub suffix: char,
    pub workload: WorkloadPoint,
    pub series: Vec<Series>,
    pub x_axis: XAxis,
    pub y_axis: YAxis,
    pub reference_x: f64,
}

impl LinePanel {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(Series::is_empty)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
    pub columns: usize,
}

impl Legend {
    pub fn from_scope(scope: &LegendScope) -> Self {
        Self {
            entries: scope.entries().to_vec(),
            columns: scope.len().max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineFigure {
    pub layout: LineLayout,
    pub panels: Vec<LinePanel>,
    /// Standalone legend shared by all panels.
    pub legend: Option<Legend>,
}

/// Build one panel per workload point. Panel `i` is named with `suffixes[i]`.
///
/// Identities come from `scope`, which may list more variants than are drawn;
/// the legend, when requested, lists the whole scope.
pub fn build_line_figure(
    scope: &LegendScope,
    variants: &[Variant],
    points: &[WorkloadPoint],
    suffixes: &[char],
    layout: LineLayout,
    emit_legend: bool,
) -> Result<LineFigure> {
    if suffixes.len() < points.len() {
        return Err(ChartError::InvalidConfig(format!(
            "{} panels but only {} suffixes",
            points.len(),
            suffixes.len()
        )));
    }

    let x_axis = XAxis::for_variants(variants);
    let mut panels = Vec::with_capacity(points.len());
    for (i, &point) in points.iter().enumerate() {
        let series = compose_series(scope, variants, point)?;
        if series.iter().all(Series::is_empty) {
            warn!(workload = %point, "no records for panel, rendering it empty");
        }
        panels.push(LinePanel {
            suffix: suffixes[i],
            workload: point,
            y_axis: YAxis::auto(&series),
            x_axis: x_axis.clone(),
            series,
            reference_x: REFERENCE_LINE_X,
        });
    }

    Ok(LineFigure {
        layout,
        panels,
        legend: emit_legend.then(|| Legend::from_scope(scope)),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelColor {
    White,
    Black,
}

impl LabelColor {
    /// Contrasting text colour for a segment filled with `fill`.
    pub fn for_fill(fill: Rgb) -> Self {
        if fill.lightness() < LABEL_LIGHTNESS_MIDPOINT {
            LabelColor::White
        } else {
            LabelColor::Black
        }
    }
}

/// `"N%"` with the percentage truncated, or empty below the visibility threshold.
pub fn segment_label(percentage: f64) -> String {
    if percentage < LABEL_VISIBILITY_PCT {
        String::new()
    } else {
        format!("{}%", percentage as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSegment {
    pub category: EdgeCategory,
    pub offset: f64,
    pub width: f64,
    pub label: String,
    pub fill: Rgb,
    pub label_color: LabelColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    /// In [`EdgeCategory::ALL`] order; empty for a variant without records.
    pub segments: Vec<BarSegment>,
}

impl Bar {
    /// Stack `ratios` left to right, each segment `ratio * 100` wide.
    pub fn stacked(label: impl Into<String>, ratios: [f64; 3], palette: &Palette) -> Self {
        let mut offset = 0.0;
        let segments = EdgeCategory::ALL
            .iter()
            .zip(ratios)
            .enumerate()
            .map(|(i, (&category, ratio))| {
                let width = ratio * 100.0;
                let fill = palette.color(i);
                let segment = BarSegment {
                    category,
                    offset,
                    width,
                    label: segment_label(width),
                    fill,
                    label_color: LabelColor::for_fill(fill),
                };
                offset += width;
                segment
            })
            .collect();
        Self {
            label: label.into(),
            segments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarLayout {
    pub size_in: (f64, f64),
    pub x_label: String,
}

impl Default for BarLayout {
    fn default() -> Self {
        Self {
            size_in: (5.9, 0.84),
            x_label: "composition ratio of links in each category [%]".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySwatch {
    pub label: String,
    pub fill: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub layout: BarLayout,
    /// Top to bottom.
    pub bars: Vec<Bar>,
    pub categories: Vec<CategorySwatch>,
}

/// One horizontal bar per facet, segments coloured by category.
pub fn build_bar_chart(facets: &[Facet<EdgeComposition>], palette: &Palette, layout: BarLayout) -> Result<BarChart> {
    palette.validate()?;
    let mut bars = Vec::with_capacity(facets.len());
    for facet in facets {
        let label = facet.key.to_string();
        if facet.records.is_empty() {
            warn!(facet = %label, "no records for bar, rendering it empty");
            bars.push(Bar {
                label,
                segments: Vec::new(),
            });
            continue;
        }
        let ratios = aggregate_composition(&facet.records)?;
        bars.push(Bar::stacked(label, ratios, palette));
    }

    let categories = EdgeCategory::ALL
        .iter()
        .enumerate()
        .map(|(i, category)| CategorySwatch {
            label: category.label().to_string(),
            fill: palette.color(i),
        })
        .collect();

    Ok(BarChart {
        layout,
        bars,
        categories,
    })
}
