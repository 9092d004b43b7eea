//! Tests for the plot store and the manager's entity operations
//!
//! Tests cover:
//! - Index assignment and shape validation
//! - Property and visibility mutation with change detection
//! - Stale-index no-ops
//! - Labels, names and logical removal
//! - Notifications emitted per mutation

use cloudview::color::{Colormap, Rgba};
use cloudview::error::ViewerError;
use cloudview::events::PlotEvent;
use cloudview::manager::PlotManager;
use cloudview::plot::{NewPlot, Placement};
use cloudview::property::{PlotProperty, PropertyName};
use cloudview::store::PlotStore;

use crate::common::synthetic::diagonal;
use crate::common::drain;

// ============================================
// Store Tests
// ============================================

#[test]
fn test_add_assigns_sequential_indices() {
    let mut store = PlotStore::new();
    assert_eq!(store.add(NewPlot::new(diagonal(3))).unwrap(), 0);
    assert_eq!(store.add(NewPlot::new(diagonal(5))).unwrap(), 1);
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(1).unwrap().point_count(), 5);
}

#[test]
fn test_add_rejects_length_mismatch_without_storing() {
    let mut store = PlotStore::new();
    let result = store.add(NewPlot::new(diagonal(3)).with_colors(vec![1.0, 2.0]));
    assert!(matches!(
        result,
        Err(ViewerError::LengthMismatch {
            points: 3,
            colors: 2
        })
    ));
    assert!(store.is_empty());
}

#[test]
fn test_empty_plot_is_valid() {
    let mut store = PlotStore::new();
    let index = store.add(NewPlot::new(Vec::new())).unwrap();
    assert_eq!(store.get(index).unwrap().point_count(), 0);
}

#[test]
fn test_set_property_detects_unchanged_values() {
    let mut store = PlotStore::new();
    let index = store.add(NewPlot::new(diagonal(2))).unwrap();

    assert!(store.set_property(index, &PlotProperty::Size(7.0)));
    assert!(!store.set_property(index, &PlotProperty::Size(7.0)));
    assert_eq!(store.get(index).unwrap().style().size, 7.0);

    assert!(store.set_property(index, &PlotProperty::Colormap(Colormap::Viridis)));
    assert!(store.set_property(index, &PlotProperty::LineColor(Some(Rgba::BLACK))));
    assert!(!store.set_property(index, &PlotProperty::LineColor(Some(Rgba::BLACK))));
}

#[test]
fn test_out_of_range_index_is_noop() {
    let mut store = PlotStore::new();
    assert!(!store.set_property(3, &PlotProperty::Size(1.0)));
    assert!(!store.set_visibility(3, false));
    assert!(!store.remove(3));
    assert!(store.get(3).is_none());
}

#[test]
fn test_offset_change_keeps_points_buffer() {
    let mut store = PlotStore::new();
    let index = store.add(NewPlot::new(diagonal(100))).unwrap();
    let before = store.get(index).unwrap().points().as_ptr();

    assert!(store.set_property(index, &PlotProperty::OffsetX(5.0)));
    assert!(store.set_property(index, &PlotProperty::OffsetY(-2.0)));

    let plot = store.get(index).unwrap();
    assert_eq!(plot.points().as_ptr(), before);
    assert_eq!(plot.points()[10], [10.0, 10.0]);
    assert_eq!(plot.placement(), Placement::new(5.0, -2.0));
}

#[test]
fn test_labels_follow_renames_and_use_separators() {
    let mut store = PlotStore::new();
    store.add(NewPlot::new(diagonal(1500))).unwrap();
    store.add(NewPlot::new(diagonal(2)).with_name("curve")).unwrap();
    assert_eq!(store.labels(), ["Plot 1 (1,500 pts)", "curve (2 pts)"]);

    assert!(store.set_name(0, "cloud"));
    assert!(!store.set_name(0, "cloud"));
    assert_eq!(store.labels()[0], "cloud (1,500 pts)");
}

#[test]
fn test_remove_is_logical() {
    let mut store = PlotStore::new();
    store.add(NewPlot::new(diagonal(2))).unwrap();
    store.add(NewPlot::new(diagonal(2))).unwrap();

    assert!(store.remove(0));
    assert!(!store.remove(0));
    assert_eq!(store.len(), 2);
    assert!(store.get(0).unwrap().is_removed());
    assert!(!store.get(0).unwrap().is_visible());
    assert!(!store.set_visibility(0, true));
    assert_eq!(store.visible().count(), 1);

    // Index 0 is never reused
    assert_eq!(store.add(NewPlot::new(diagonal(2))).unwrap(), 2);
}

#[test]
fn test_array_parent_labels() {
    let mut store = PlotStore::new();
    let mut parent = NewPlot::new(diagonal(4));
    parent.is_array_parent = true;
    store.add(parent).unwrap();
    store.add(NewPlot::new(diagonal(2))).unwrap();

    let labels = store.array_labels();
    assert_eq!(labels, vec![(0, "Array 1 (4 pts)".to_string())]);
    assert!(store.is_array_parent(0));
    assert!(!store.is_array_parent(1));
}

// ============================================
// Property Parsing Tests
// ============================================

#[test]
fn test_property_parse_accepts_known_names() {
    assert_eq!(
        PlotProperty::parse("size", "3.5").unwrap(),
        PlotProperty::Size(3.5)
    );
    assert_eq!(
        PlotProperty::parse("colormap", "Plasma").unwrap(),
        PlotProperty::Colormap(Colormap::Plasma)
    );
    assert_eq!(
        PlotProperty::parse("draw_lines", "yes").unwrap(),
        PlotProperty::DrawLines(true)
    );
    assert_eq!(
        PlotProperty::parse("line_color", "none").unwrap(),
        PlotProperty::LineColor(None)
    );
    assert_eq!(PlotProperty::Size(1.0).name(), PropertyName::Size);
}

#[test]
fn test_property_parse_rejects_bad_input() {
    assert!(matches!(
        PlotProperty::parse("opacity", "1"),
        Err(ViewerError::UnknownProperty(_))
    ));
    assert!(matches!(
        PlotProperty::parse("size", "-1"),
        Err(ViewerError::InvalidProperty { .. })
    ));
    assert!(matches!(
        PlotProperty::parse("offset_x", "NaN"),
        Err(ViewerError::InvalidProperty { .. })
    ));
    assert!(PlotProperty::parse("draw_lines", "maybe").is_err());
}

// ============================================
// Manager Notification Tests
// ============================================

#[test]
fn test_manager_emits_one_event_per_change() {
    let mut manager = PlotManager::new();
    let rx = manager.subscribe();

    let index = manager.add_plot(NewPlot::new(diagonal(3))).unwrap();
    assert!(manager.set_plot_property(index, PlotProperty::Size(4.0)));
    assert!(!manager.set_plot_property(index, PlotProperty::Size(4.0)));
    assert!(manager.set_visibility(index, false));
    assert!(!manager.set_visibility(index, false));
    assert!(manager.remove_plot(index));

    assert_eq!(
        drain(&rx),
        vec![
            PlotEvent::PlotAdded(0),
            PlotEvent::PropertiesChanged(0),
            PlotEvent::VisibilityChanged {
                index: 0,
                visible: false
            },
            PlotEvent::PlotRemoved(0),
        ]
    );
}

#[test]
fn test_manager_failed_add_emits_nothing() {
    let mut manager = PlotManager::new();
    let rx = manager.subscribe();
    assert!(manager
        .add_plot(NewPlot::new(diagonal(2)).with_colors(vec![0.0]))
        .is_err());
    assert_eq!(manager.plot_count(), 0);
    assert!(drain(&rx).is_empty());
}

#[test]
fn test_manager_stale_index_is_silent() {
    let mut manager = PlotManager::new();
    let rx = manager.subscribe();
    assert!(!manager.set_plot_property(42, PlotProperty::Size(1.0)));
    assert!(!manager.set_visibility(42, true));
    assert!(!manager.select_plot(42));
    assert!(manager.plot_info(42).is_none());
    assert!(drain(&rx).is_empty());
}

#[test]
fn test_plot_info_snapshot() {
    let mut manager = PlotManager::new();
    let index = manager
        .add_plot(
            NewPlot::new(diagonal(3))
                .with_colors(vec![0.0, 1.0, 2.0])
                .with_placement(Placement::new(1.0, 2.0))
                .with_name("pts"),
        )
        .unwrap();
    let info = manager.plot_info(index).unwrap();
    assert_eq!(info.name, "pts (3 pts)");
    assert_eq!(info.point_count, 3);
    assert!(info.has_color_data);
    assert_eq!((info.offset_x, info.offset_y), (1.0, 2.0));
    assert_eq!(manager.plot_name(index), Some("pts"));
}
