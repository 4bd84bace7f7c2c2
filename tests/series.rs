//! Palette assignment, legend scopes and coordinate series.

mod common;

use std::collections::HashSet;

use common::workload_record;
use kvs_bench_charts::derive::{derive_records, DeriveConstants};
use kvs_bench_charts::facet::WorkloadPoint;
use kvs_bench_charts::series::{compose_series, LegendScope, Marker, Palette, Rgb, Variant};
use kvs_bench_charts::{ChartError, RenderConfig};

const LABELS: [&str; 8] = ["dfs", "vEB", "local", "local+dfs", "local+vEB", "hint", "page", "local+page"];

fn variant(label: &str, pages: &[i64]) -> Variant {
    let records: Vec<_> = pages
        .iter()
        .enumerate()
        .map(|(i, &p)| workload_record(0.8, 0.05, p, 100 * (i as i64 + 1)))
        .collect();
    Variant::new(label, derive_records(&records, &DeriveConstants::default()).unwrap())
}

// =============================================================================
// Identities
// =============================================================================

#[test]
fn identities_follow_input_order() {
    let palette = Palette::default();
    let scope = LegendScope::assign(["hint", "dfs"], &palette).unwrap();
    assert_eq!(scope.identity("hint").unwrap(), palette.identity(0));
    assert_eq!(scope.identity("dfs").unwrap(), palette.identity(1));
    assert_eq!(scope.labels().collect::<Vec<_>>(), vec!["hint", "dfs"]);
}

#[test]
fn default_palette_is_colorblind10_with_eight_markers() {
    let palette = Palette::default();
    assert_eq!(palette.colors.len(), 10);
    assert_eq!(palette.colors[0], Rgb(0x00, 0x6B, 0xA4));
    assert_eq!(palette.markers, Marker::ALL.to_vec());
}

#[test]
fn identities_are_unique_for_any_order_of_eight() {
    let palette = Palette::default();
    let orders: Vec<Vec<&str>> = vec![
        LABELS.to_vec(),
        LABELS.iter().rev().copied().collect(),
        vec![LABELS[3], LABELS[0], LABELS[7], LABELS[1], LABELS[5], LABELS[2], LABELS[6], LABELS[4]],
    ];
    for order in orders {
        let scope = LegendScope::assign(order.iter().copied(), &palette).unwrap();
        let unique: HashSet<_> = scope.entries().iter().map(|e| e.identity).collect();
        assert_eq!(unique.len(), order.len());
    }
}

#[test]
fn duplicate_label_is_rejected() {
    let err = LegendScope::assign(["dfs", "dfs"], &Palette::default()).unwrap_err();
    assert!(matches!(err, ChartError::DuplicateVariant(name) if name == "dfs"));
}

#[test]
fn empty_palette_is_invalid() {
    let palette = Palette {
        colors: Vec::new(),
        markers: Marker::ALL.to_vec(),
    };
    assert!(matches!(
        LegendScope::assign(["dfs"], &palette),
        Err(ChartError::InvalidConfig(_))
    ));
}

#[test]
fn short_palette_cycle_is_rejected_when_identities_repeat() {
    let config = RenderConfig::from_json_str(
        r##"{ "palette": { "colors": ["#006BA4", "#FF800E"], "markers": ["circle", "cross"] } }"##,
    )
    .unwrap();
    assert!(LegendScope::assign(["dfs", "vEB"], &config.palette).is_ok());
    let err = LegendScope::assign(["dfs", "vEB", "local"], &config.palette).unwrap_err();
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}

#[test]
fn restrict_keeps_parent_identities() {
    let scope = LegendScope::assign(LABELS[..6].iter().copied(), &Palette::default()).unwrap();
    let sub = scope.restrict(&["hint", "dfs"]).unwrap();
    assert_eq!(sub.len(), 2);
    assert_eq!(sub.identity("hint").unwrap(), scope.identity("hint").unwrap());
    assert_eq!(sub.entries()[0].label, "hint");
    assert!(matches!(scope.restrict(&["page"]), Err(ChartError::UnknownVariant(_))));
}

#[test]
fn rgb_hex_round_trip_and_lightness() {
    let c = Rgb::from_hex("#FF800E").unwrap();
    assert_eq!(c, Rgb(255, 128, 14));
    assert_eq!(c.to_string(), "#FF800E");
    assert!(Rgb::from_hex("#12345").is_none());
    assert!((Rgb(0, 0, 0).lightness()).abs() < 1e-12);
    assert!((Rgb(255, 255, 255).lightness() - 1.0).abs() < 1e-12);
}

// =============================================================================
// Series
// =============================================================================

#[test]
fn series_are_sorted_and_aligned() {
    let scope = LegendScope::assign(["a"], &Palette::default()).unwrap();
    let variants = vec![variant("a", &[300, 100, 200])];
    let series = compose_series(&scope, &variants, WorkloadPoint::new(0.8, 0.05)).unwrap();
    assert_eq!(series.len(), 1);
    let s = &series[0];
    assert_eq!(s.x.len(), s.y.len());
    assert!(s.x.windows(2).all(|w| w[0] <= w[1]));
    // reads were 100, 200, 300 for pages 300, 100, 200
    assert_eq!(s.y, vec![200.0, 300.0, 100.0]);
}

#[test]
fn empty_facet_gives_empty_series() {
    let scope = LegendScope::assign(["a", "b"], &Palette::default()).unwrap();
    let variants = vec![variant("a", &[1, 2]), variant("b", &[3])];
    let series = compose_series(&scope, &variants, WorkloadPoint::new(1.3, 0.5)).unwrap();
    assert_eq!(series.len(), 2);
    assert!(series.iter().all(|s| s.is_empty()));
}

#[test]
fn series_points_are_read_in_order() {
    let scope = LegendScope::assign(["a"], &Palette::default()).unwrap();
    let variants = vec![variant("a", &[2, 1])];
    let series = compose_series(&scope, &variants, WorkloadPoint::new(0.8, 0.05))
        .unwrap()
        .remove(0);
    let expected: Vec<(f64, f64)> = series.points().collect();
    let consumed: Vec<(f64, f64)> = series.into_points().collect();
    assert_eq!(expected, consumed);
    assert_eq!(consumed.len(), 2);
}

#[test]
fn variant_outside_scope_is_an_error() {
    let scope = LegendScope::assign(["a"], &Palette::default()).unwrap();
    let variants = vec![variant("b", &[1])];
    assert!(matches!(
        compose_series(&scope, &variants, WorkloadPoint::new(0.8, 0.05)),
        Err(ChartError::UnknownVariant(_))
    ));
}
