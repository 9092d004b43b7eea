//! Tests for groups, colour ranges and selection
//!
//! Tests cover:
//! - Range union and degenerate normalization
//! - Group registration and the reverse member map
//! - Batched group mutation with a single notification
//! - Rejection of invalid property values
//! - Mutually exclusive plot/group selection
//! - Mixed property values across a selection

use cloudview::color::Colormap;
use cloudview::events::PlotEvent;
use cloudview::group::{ColorRange, ColorRangeAccumulator, Selection};
use cloudview::manager::PlotManager;
use cloudview::plot::NewPlot;
use cloudview::property::{PlotProperty, PropertyValue};

use crate::common::synthetic::diagonal;
use crate::common::{count_plots_changed, drain};

fn manager_with_plots(n: usize) -> PlotManager {
    let mut manager = PlotManager::new();
    for _ in 0..n {
        manager.add_plot(NewPlot::new(diagonal(4))).unwrap();
    }
    manager
}

// ============================================
// Colour Range Tests
// ============================================

#[test]
fn test_range_union_of_members() {
    let mut acc = ColorRangeAccumulator::new();
    assert_eq!(acc.finish(), None);
    acc.include(&[0.0, 10.0]);
    acc.include(&[5.0, 20.0]);
    assert_eq!(acc.finish(), Some(ColorRange::new(0.0, 20.0)));
}

#[test]
fn test_accumulator_skips_members_without_values() {
    let mut acc = ColorRangeAccumulator::new();
    assert_eq!(acc.include(&[]), None);
    assert_eq!(acc.include(&[f64::NAN]), None);
    assert_eq!(acc.finish(), None);
    acc.include_range(ColorRange::new(-1.0, 1.0));
    assert_eq!(acc.finish(), Some(ColorRange::new(-1.0, 1.0)));
}

#[test]
fn test_infinite_values_do_not_widen_range() {
    let range = ColorRange::of(&[0.0, 5.0, 10.0, f64::INFINITY]).unwrap();
    assert_eq!(range, ColorRange::new(0.0, 10.0));
    assert_eq!(range.normalize(f64::INFINITY), 1.0);
    assert_eq!(range.normalize(f64::NEG_INFINITY), 0.0);
}

#[test]
fn test_normalize_endpoints() {
    let range = ColorRange::new(-2.0, 6.0);
    assert_eq!(range.normalize(-2.0), 0.0);
    assert_eq!(range.normalize(6.0), 1.0);
    assert_eq!(range.normalize(2.0), 0.5);
}

#[test]
fn test_degenerate_range_maps_to_midpoint() {
    let range = ColorRange::new(3.0, 3.0);
    assert!(range.is_degenerate());
    for v in [3.0, -100.0, 1e9] {
        assert_eq!(range.normalize(v), 0.5);
    }
}

// ============================================
// Registration Tests
// ============================================

#[test]
fn test_register_group_assigns_increasing_ids() {
    let mut manager = manager_with_plots(4);
    let a = manager.register_group("a", &[0, 1], "value", ColorRange::new(0.0, 1.0));
    let b = manager.register_group("b", &[2, 3], "value", ColorRange::new(0.0, 2.0));
    assert!(b > a);
    assert_eq!(manager.group_of(1), Some(a));
    assert_eq!(manager.group_of(3), Some(b));
    assert_eq!(manager.group(b).unwrap().members, vec![2, 3]);
    assert_eq!(manager.group_count(), 2);
}

#[test]
fn test_register_group_does_not_touch_plots() {
    let mut manager = manager_with_plots(2);
    let rx = manager.subscribe();
    manager.register_group("g", &[0, 1], "value", ColorRange::new(0.0, 1.0));
    assert!(manager.global_range(0).is_none());
    assert!(drain(&rx).is_empty());
}

// ============================================
// Batch Mutation Tests
// ============================================

fn assert_single_notification(members: usize) {
    let mut manager = manager_with_plots(members);
    let indices: Vec<usize> = (0..members).collect();
    let id = manager.register_group("g", &indices, "value", ColorRange::new(0.0, 1.0));
    let rx = manager.subscribe();

    assert!(manager.set_group_property(id, PlotProperty::Size(9.0)));
    let events = drain(&rx);
    assert_eq!(events, vec![PlotEvent::PlotsChanged]);
    assert!(manager.all().iter().all(|p| p.style().size == 9.0));
}

#[test]
fn test_group_property_single_member() {
    assert_single_notification(1);
}

#[test]
fn test_group_property_ten_members() {
    assert_single_notification(10);
}

#[test]
fn test_group_property_thousand_members() {
    assert_single_notification(1000);
}

#[test]
fn test_group_property_unchanged_emits_nothing() {
    let mut manager = manager_with_plots(3);
    let id = manager.register_group("g", &[0, 1, 2], "value", ColorRange::new(0.0, 1.0));
    let rx = manager.subscribe();
    assert!(!manager.set_group_property(id, PlotProperty::DrawLines(false)));
    assert!(drain(&rx).is_empty());
}

#[test]
fn test_group_property_partial_change_still_one_event() {
    let mut manager = manager_with_plots(3);
    manager.set_plot_property(1, PlotProperty::Size(5.0));
    let id = manager.register_group("g", &[0, 1, 2], "value", ColorRange::new(0.0, 1.0));
    let rx = manager.subscribe();
    assert!(manager.set_group_property(id, PlotProperty::Size(5.0)));
    assert_eq!(count_plots_changed(&drain(&rx)), 1);
}

#[test]
fn test_group_rejects_nan_size() {
    let mut manager = manager_with_plots(3);
    let id = manager.register_group("g", &[0, 1, 2], "value", ColorRange::new(0.0, 1.0));
    let before = manager.get(0).unwrap().style().size;
    let rx = manager.subscribe();

    // NaN never compares equal, so an unchecked write would notify every time
    assert!(!manager.set_group_property(id, PlotProperty::Size(f32::NAN)));
    assert!(!manager.set_group_property(id, PlotProperty::Size(f32::NAN)));
    assert_eq!(count_plots_changed(&drain(&rx)), 0);
    assert!(manager.all().iter().all(|p| p.style().size == before));
}

#[test]
fn test_plot_rejects_invalid_values() {
    let mut manager = manager_with_plots(1);
    let before = manager.get(0).unwrap().style().clone();
    let rx = manager.subscribe();

    assert!(!manager.set_plot_property(0, PlotProperty::LineWidth(-5.0)));
    assert!(!manager.set_plot_property(0, PlotProperty::Size(f32::INFINITY)));
    assert!(!manager.set_plot_property(0, PlotProperty::OffsetX(f64::NAN)));
    assert!(drain(&rx).is_empty());
    assert_eq!(manager.get(0).unwrap().style(), &before);
    assert_eq!(manager.get(0).unwrap().placement().offset_x, 0.0);
}

#[test]
fn test_group_visibility_is_batched() {
    let mut manager = manager_with_plots(50);
    let indices: Vec<usize> = (0..50).collect();
    let id = manager.register_group("g", &indices, "value", ColorRange::new(0.0, 1.0));
    let rx = manager.subscribe();

    assert!(manager.set_group_visibility(id, false));
    assert_eq!(drain(&rx), vec![PlotEvent::PlotsChanged]);
    assert!(manager.all().iter().all(|p| !p.is_visible()));
}

#[test]
fn test_unknown_group_is_noop() {
    let mut manager = manager_with_plots(1);
    let rx = manager.subscribe();
    assert!(!manager.set_group_property(7, PlotProperty::Size(2.0)));
    assert!(!manager.set_group_visibility(7, false));
    assert!(!manager.select_group(7));
    assert!(drain(&rx).is_empty());
}

// ============================================
// Selection Tests
// ============================================

#[test]
fn test_selection_is_exclusive() {
    let mut manager = manager_with_plots(3);
    let id = manager.register_group("g", &[1, 2], "value", ColorRange::new(0.0, 1.0));
    let rx = manager.subscribe();

    assert!(manager.select_group(id));
    assert!(manager.is_group_selected());
    assert_eq!(manager.selected_targets(), vec![1, 2]);

    assert!(manager.select_plot(0));
    assert_eq!(manager.selection(), Selection::Plot(0));
    assert!(!manager.is_group_selected());
    assert_eq!(manager.selected_targets(), vec![0]);

    assert_eq!(
        drain(&rx),
        vec![
            PlotEvent::GroupSelectionChanged(id),
            PlotEvent::SelectionChanged(0)
        ]
    );
}

#[test]
fn test_reselecting_is_silent() {
    let mut manager = manager_with_plots(2);
    manager.select_plot(1);
    let rx = manager.subscribe();
    assert!(!manager.select_plot(1));
    assert!(drain(&rx).is_empty());
}

#[test]
fn test_selected_properties_report_mixed_values() {
    let mut manager = manager_with_plots(2);
    manager.set_plot_property(1, PlotProperty::Colormap(Colormap::Magma));
    let id = manager.register_group("g", &[0, 1], "value", ColorRange::new(0.0, 1.0));
    manager.select_group(id);

    let props = manager.selected_properties().unwrap();
    assert!(props.colormap.is_mixed());
    assert_eq!(props.visible, PropertyValue::Uniform(true));

    assert!(manager.set_selected_property(PlotProperty::Colormap(Colormap::Inferno)));
    let props = manager.selected_properties().unwrap();
    assert_eq!(props.colormap.uniform(), Some(&Colormap::Inferno));
}

#[test]
fn test_selected_visibility_routes_to_single_plot() {
    let mut manager = manager_with_plots(2);
    manager.select_plot(1);
    assert!(manager.set_selected_visibility(false));
    assert!(manager.get(0).unwrap().is_visible());
    assert!(!manager.get(1).unwrap().is_visible());
}
