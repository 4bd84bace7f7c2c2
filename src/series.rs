//! Visual identities and coordinate series for variants.
//!
//! Variants are kept in an ordered list; their position decides both the
//! palette slot and the legend order. A [`LegendScope`] fixes one identity per
//! variant, and every panel built from the scope reuses it, so a single
//! shared legend stays correct for all of them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::facet::{select_workload, sort_by_local_buffer, WorkloadPoint};
use crate::schema::DerivedRecord;

/// 24-bit sRGB colour, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lightness of the HLS model, in `[0, 1]`.
    pub fn lightness(self) -> f64 {
        let Rgb(r, g, b) = self;
        let max = r.max(g).max(b) as f64 / 255.0;
        let min = r.min(g).min(b) as f64 / 255.0;
        (max + min) / 2.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Rgb::from_hex(&value).ok_or_else(|| format!("invalid colour '{}'", value))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Circle,
    Cross,
    TriangleDown,
    Diamond,
    Square,
    Star,
    TriangleUp,
    ThinDiamond,
}

impl Marker {
    pub const ALL: [Marker; 8] = [
        Marker::Circle,
        Marker::Cross,
        Marker::TriangleDown,
        Marker::Diamond,
        Marker::Square,
        Marker::Star,
        Marker::TriangleUp,
        Marker::ThinDiamond,
    ];
}

/// "tableau-colorblind10" colour cycle.
pub const COLORBLIND10: [&str; 10] = [
    "#006BA4", "#FF800E", "#ABABAB", "#595959", "#5F9ED1", "#C85200", "#898989", "#A2C8EC",
    "#FFBC79", "#CFCFCF",
];

/// Two independent cycles: colours and markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub colors: Vec<Rgb>,
    pub markers: Vec<Marker>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: COLORBLIND10.iter().filter_map(|hex| Rgb::from_hex(hex)).collect(),
            markers: Marker::ALL.to_vec(),
        }
    }
}

impl Palette {
    pub fn validate(&self) -> Result<()> {
        if self.colors.is_empty() || self.markers.is_empty() {
            return Err(ChartError::InvalidConfig(
                "palette needs at least one colour and one marker".into(),
            ));
        }
        Ok(())
    }

    /// Identity of the variant at `position`. Callers validate first.
    pub fn identity(&self, position: usize) -> VisualIdentity {
        VisualIdentity {
            color: self.colors[position % self.colors.len()],
            marker: self.markers[position % self.markers.len()],
        }
    }

    pub fn color(&self, position: usize) -> Rgb {
        self.colors[position % self.colors.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualIdentity {
    pub color: Rgb,
    pub marker: Marker,
}

/// A configuration of the store under test and its records.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub label: String,
    pub records: Vec<DerivedRecord>,
}

impl Variant {
    /// Records are sorted by `used_local_buffer_pct` on construction.
    pub fn new(label: impl Into<String>, mut records: Vec<DerivedRecord>) -> Self {
        sort_by_local_buffer(&mut records);
        Self {
            label: label.into(),
            records,
        }
    }

    /// Largest `used_local_buffer_pct`, i.e. the last record after sorting.
    pub fn max_local_buffer_pct(&self) -> Option<f64> {
        self.records.last().map(|r| r.used_local_buffer_pct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub identity: VisualIdentity,
}

/// Identities for an ordered set of variant labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendScope {
    entries: Vec<LegendEntry>,
}

impl LegendScope {
    pub fn assign<'a>(labels: impl IntoIterator<Item = &'a str>, palette: &Palette) -> Result<Self> {
        palette.validate()?;
        let mut entries: Vec<LegendEntry> = Vec::new();
        for (position, label) in labels.into_iter().enumerate() {
            if entries.iter().any(|e| e.label == label) {
                return Err(ChartError::DuplicateVariant(label.to_string()));
            }
            let identity = palette.identity(position);
            if let Some(taken) = entries.iter().find(|e| e.identity == identity) {
                return Err(ChartError::InvalidConfig(format!(
                    "palette gives '{}' the same colour and marker as '{}'",
                    label, taken.label
                )));
            }
            entries.push(LegendEntry {
                label: label.to_string(),
                identity,
            });
        }
        Ok(Self { entries })
    }

    pub fn for_variants(variants: &[Variant], palette: &Palette) -> Result<Self> {
        Self::assign(variants.iter().map(|v| v.label.as_str()), palette)
    }

    /// Sub-scope in the order of `labels`, keeping this scope's identities.
    pub fn restrict(&self, labels: &[&str]) -> Result<Self> {
        let mut entries: Vec<LegendEntry> = Vec::with_capacity(labels.len());
        for label in labels {
            if entries.iter().any(|e| e.label == *label) {
                return Err(ChartError::DuplicateVariant(label.to_string()));
            }
            let entry = self
                .entries
                .iter()
                .find(|e| e.label == *label)
                .ok_or_else(|| ChartError::UnknownVariant(label.to_string()))?;
            entries.push(entry.clone());
        }
        Ok(Self { entries })
    }

    pub fn identity(&self, label: &str) -> Result<VisualIdentity> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.identity)
            .ok_or_else(|| ChartError::UnknownVariant(label.to_string()))
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Coordinates of one variant in one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub identity: VisualIdentity,
    /// `used_local_buffer_pct`, ascending.
    pub x: Vec<f64>,
    /// `query_swap_count` aligned with `x`.
    pub y: Vec<f64>,
}

impl Series {
    pub fn from_records(label: &str, identity: VisualIdentity, records: &[DerivedRecord]) -> Self {
        Self {
            label: label.to_string(),
            identity,
            x: records.iter().map(|r| r.used_local_buffer_pct).collect(),
            y: records.iter().map(|r| r.query_swap_count as f64).collect(),
        }
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Consumes the series; the points can be read once.
    pub fn into_points(self) -> impl Iterator<Item = (f64, f64)> {
        self.x.into_iter().zip(self.y)
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// One series per variant, in variant order, for the records run with `point`.
pub fn compose_series(scope: &LegendScope, variants: &[Variant], point: WorkloadPoint) -> Result<Vec<Series>> {
    variants
        .iter()
        .map(|variant| {
            let identity = scope.identity(&variant.label)?;
            let records = select_workload(&variant.records, point);
            Ok(Series::from_records(&variant.label, identity, &records))
        })
        .collect()
}
