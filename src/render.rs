//! Drawing computed figures to vector artifacts.
//!
//! [`Renderer`] is the seam between the chart pipeline and the plotting
//! surface. [`SvgRenderer`] draws with `plotters` onto SVG files.

use std::fmt;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use crate::config::RenderConfig;
use crate::error::{ChartError, Result};
use crate::figure::{BarChart, LabelColor, Legend, LineLayout, LinePanel};
use crate::series::{Marker, Rgb};

/// A surface able to persist the three kinds of artifacts.
pub trait Renderer {
    fn line_panel(&mut self, panel: &LinePanel, layout: &LineLayout, path: &Path) -> Result<()>;
    fn legend(&mut self, legend: &Legend, path: &Path) -> Result<()>;
    fn bar_chart(&mut self, chart: &BarChart, path: &Path) -> Result<()>;
}

/// Segments (drawn and skipped) making up the dashed reference line.
const REFERENCE_DASHES: usize = 25;

pub struct SvgRenderer {
    config: RenderConfig,
}

impl SvgRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn font_px(&self) -> u32 {
        self.config.px(self.config.font_size_pt)
    }

    fn marker_px(&self) -> i32 {
        self.config.px(self.config.marker_size_pt) as i32
    }
}

fn drawing_err<'a, E: fmt::Display>(path: &'a Path) -> impl Fn(E) -> ChartError + 'a {
    move |e| ChartError::render(path, e)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ChartError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Draw a marker glyph centred on the backend pixel `at`.
fn draw_marker<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    marker: Marker,
    at: (i32, i32),
    size: i32,
    color: RGBColor,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let s = size;
    let (x, y) = at;
    let filled = color.filled();
    let outline = |points: &[(i32, i32)]| points.iter().map(|&(dx, dy)| (x + dx, y + dy)).collect::<Vec<_>>();
    match marker {
        Marker::Circle => area.draw(&Circle::new(at, s, filled)),
        Marker::Cross => area.draw(&Cross::new(at, s, color.stroke_width(1))),
        Marker::TriangleUp => area.draw(&TriangleMarker::new(at, s, filled)),
        Marker::TriangleDown => area.draw(&Polygon::new(outline(&[(-s, -s), (s, -s), (0, s)]), filled)),
        Marker::Diamond => area.draw(&Polygon::new(outline(&[(0, -s), (s, 0), (0, s), (-s, 0)]), filled)),
        Marker::ThinDiamond => {
            let w = (s * 2 / 3).max(1);
            area.draw(&Polygon::new(outline(&[(0, -s), (w, 0), (0, s), (-w, 0)]), filled))
        }
        Marker::Square => area.draw(&Polygon::new(outline(&[(-s, -s), (s, -s), (s, s), (-s, s)]), filled)),
        Marker::Star => {
            let points: Vec<(i32, i32)> = (0..10)
                .map(|i| {
                    let r = if i % 2 == 0 { s as f64 } else { s as f64 * 0.45 };
                    let angle = std::f64::consts::PI * (i as f64) / 5.0;
                    ((r * angle.sin()).round() as i32, (-r * angle.cos()).round() as i32)
                })
                .collect();
            area.draw(&Polygon::new(outline(&points), filled))
        }
    }
}

impl Renderer for SvgRenderer {
    fn line_panel(&mut self, panel: &LinePanel, layout: &LineLayout, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        let err = drawing_err(path);
        let size = self.config.canvas(layout.size_in);
        let font = self.font_px();
        let family = self.config.font_family.as_str();

        let root = SVGBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(&err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(font / 2 + 2)
            .x_label_area_size(font * 3)
            .y_label_area_size(font * 4)
            .build_cartesian_2d(0.0..panel.x_axis.max, panel.y_axis.min..panel.y_axis.max)
            .map_err(&err)?;

        let y_axis = panel.y_axis.clone();
        let y_desc = if y_axis.exponent == 0 {
            layout.y_label.clone()
        } else {
            format!("{} (×10^{})", layout.y_label, y_axis.exponent)
        };
        // x ticks are drawn by hand at the precomputed positions.
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(0)
            .y_labels(6)
            .y_label_formatter(&|y| y_axis.tick_label(*y))
            .x_desc(layout.x_label.as_str())
            .y_desc(y_desc)
            .label_style((family, font))
            .axis_desc_style((family, font))
            .draw()
            .map_err(&err)?;

        let tick_len = (font / 3).max(2) as i32;
        let tick_style = TextStyle::from((family, font))
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        for &tick in &panel.x_axis.ticks {
            let (px, py) = chart.backend_coord(&(tick, panel.y_axis.min));
            root.draw(&PathElement::new(vec![(px, py), (px, py + tick_len)], BLACK.stroke_width(1)))
                .map_err(&err)?;
            root.draw(&Text::new(format!("{:.0}", tick), (px, py + tick_len + 1), tick_style.clone()))
                .map_err(&err)?;
        }

        if (0.0..=panel.x_axis.max).contains(&panel.reference_x) {
            let (lo, hi) = (panel.y_axis.min, panel.y_axis.max);
            let step = (hi - lo) / REFERENCE_DASHES as f64;
            let x = panel.reference_x;
            chart
                .draw_series((0..REFERENCE_DASHES).step_by(2).map(|i| {
                    let y0 = lo + step * i as f64;
                    PathElement::new(vec![(x, y0), (x, y0 + step)], BLACK.stroke_width(1))
                }))
                .map_err(&err)?;
        }

        let marker_size = self.marker_px();
        for series in &panel.series {
            let color = rgb(series.identity.color);
            chart
                .draw_series(LineSeries::new(
                    series.points(),
                    color.stroke_width(self.config.line_width_px),
                ))
                .map_err(&err)?;
            for point in series.points() {
                let at = chart.backend_coord(&point);
                draw_marker(&root, series.identity.marker, at, marker_size, color).map_err(&err)?;
            }
        }

        root.present().map_err(&err)?;
        info!(path = %path.display(), workload = %panel.workload, "rendered panel");
        Ok(())
    }

    fn legend(&mut self, legend: &Legend, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        let err = drawing_err(path);
        let font = self.font_px() as i32;
        let family = self.config.font_family.as_str();

        let count = legend.entries.len().max(1);
        let columns = self.config.legend_columns.unwrap_or(legend.columns).clamp(1, count);
        let rows = (count + columns - 1) / columns;
        let longest = legend
            .entries
            .iter()
            .map(|e| e.label.chars().count())
            .max()
            .unwrap_or(0) as i32;

        let pad = font;
        let swatch = font * 2;
        let row_h = font * 2;
        let cell_w = swatch + font / 2 + longest * font * 3 / 5 + font;
        let width = (pad * 2 + cell_w * columns as i32) as u32;
        let height = (pad * 2 + row_h * rows as i32) as u32;

        let root = SVGBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(&err)?;
        root.draw(&Rectangle::new(
            [(1, 1), (width as i32 - 2, height as i32 - 2)],
            BLACK.mix(0.3).stroke_width(1),
        ))
        .map_err(&err)?;

        let marker_size = self.marker_px();
        let text_style = TextStyle::from((family, font as u32))
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for (i, entry) in legend.entries.iter().enumerate() {
            let col = (i % columns) as i32;
            let row = (i / columns) as i32;
            let x0 = pad + col * cell_w;
            let yc = pad + row * row_h + row_h / 2;
            let color = rgb(entry.identity.color);

            root.draw(&PathElement::new(
                vec![(x0, yc), (x0 + swatch, yc)],
                color.stroke_width(self.config.line_width_px),
            ))
            .map_err(&err)?;
            draw_marker(&root, entry.identity.marker, (x0 + swatch / 2, yc), marker_size, color).map_err(&err)?;
            root.draw(&Text::new(
                entry.label.clone(),
                (x0 + swatch + font / 2, yc),
                text_style.clone(),
            ))
            .map_err(&err)?;
        }

        root.present().map_err(&err)?;
        info!(path = %path.display(), entries = legend.entries.len(), "rendered legend");
        Ok(())
    }

    fn bar_chart(&mut self, chart: &BarChart, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        let err = drawing_err(path);
        let size = self.config.canvas(chart.layout.size_in);
        let font = self.font_px();
        let family = self.config.font_family.as_str();

        let root = SVGBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(&err)?;
        let (plot_area, legend_area) = {
            let (top, rest) = root.split_vertically(font * 2);
            (rest, top)
        };

        // Bar `i` sits at y = n - 1 - i so the first bar is on top.
        let n = chart.bars.len().max(1);
        let longest = chart.bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0) as u32;

        let mut ctx = ChartBuilder::on(&plot_area)
            .margin(font / 2 + 2)
            .x_label_area_size(font * 3)
            .y_label_area_size(longest * font * 3 / 5 + font)
            .build_cartesian_2d(0f64..100f64, -0.5..(n as f64 - 0.5))
            .map_err(&err)?;

        ctx.configure_mesh()
            .disable_mesh()
            .x_labels(6)
            .x_label_formatter(&|x| format!("{:.0}", x))
            .y_labels(0)
            .x_desc(chart.layout.x_label.as_str())
            .label_style((family, font))
            .axis_desc_style((family, font))
            .draw()
            .map_err(&err)?;

        let bar_label = TextStyle::from((family, font))
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));
        for (i, bar) in chart.bars.iter().enumerate() {
            let (px, py) = ctx.backend_coord(&(0.0, (n - 1 - i) as f64));
            root.draw(&Text::new(bar.label.clone(), (px - font as i32 / 2, py), bar_label.clone()))
                .map_err(&err)?;
        }

        for (i, bar) in chart.bars.iter().enumerate() {
            let yc = (n - 1 - i) as f64;
            ctx.draw_series(bar.segments.iter().map(|seg| {
                Rectangle::new(
                    [(seg.offset, yc - 0.4), (seg.offset + seg.width, yc + 0.4)],
                    rgb(seg.fill).filled(),
                )
            }))
            .map_err(&err)?;

            for seg in bar.segments.iter().filter(|s| !s.label.is_empty()) {
                let text_color = match seg.label_color {
                    LabelColor::White => WHITE,
                    LabelColor::Black => BLACK,
                };
                let style = TextStyle::from((family, font))
                    .color(&text_color)
                    .pos(Pos::new(HPos::Center, VPos::Center));
                ctx.draw_series(std::iter::once(Text::new(
                    seg.label.clone(),
                    (seg.offset + seg.width / 2.0, yc),
                    style,
                )))
                .map_err(&err)?;
            }
        }

        // Category legend, one row across the top.
        let font = font as i32;
        let mut x = font;
        let yc = font;
        let legend_text = TextStyle::from((family, font as u32))
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for swatch in &chart.categories {
            legend_area
                .draw(&Rectangle::new(
                    [(x, yc - font / 2), (x + font * 2, yc + font / 2)],
                    rgb(swatch.fill).filled(),
                ))
                .map_err(&err)?;
            legend_area
                .draw(&Text::new(
                    swatch.label.clone(),
                    (x + font * 2 + font / 2, yc),
                    legend_text.clone(),
                ))
                .map_err(&err)?;
            x += font * 3 + swatch.label.chars().count() as i32 * font * 3 / 5 + font;
        }

        root.present().map_err(&err)?;
        info!(path = %path.display(), bars = chart.bars.len(), "rendered bar chart");
        Ok(())
    }
}
