//! Tests for the view rectangle and busy state
//!
//! Tests cover:
//! - Extents, centre and containment
//! - Padding, including degenerate rectangles
//! - Axis scaling around the centre
//! - Fitting bounds to point sets

use cloudview::state::{BusyState, ViewRect};

// ============================================
// Geometry Tests
// ============================================

#[test]
fn test_extents_and_center() {
    let rect = ViewRect::new(-2.0, 4.0, 1.0, 3.0);
    assert_eq!(rect.width(), 6.0);
    assert_eq!(rect.height(), 2.0);
    assert_eq!(rect.center(), [1.0, 2.0]);
}

#[test]
fn test_contains_is_inclusive() {
    let rect = ViewRect::new(0.0, 1.0, 0.0, 1.0);
    assert!(rect.contains(0.0, 0.0));
    assert!(rect.contains(1.0, 1.0));
    assert!(!rect.contains(1.0 + 1e-9, 0.5));
    assert!(!rect.contains(0.5, f64::NAN));
}

#[test]
fn test_padding_scales_with_extent() {
    let padded = ViewRect::new(0.0, 10.0, 0.0, 20.0).padded(0.1);
    assert_eq!(padded, ViewRect::new(-1.0, 11.0, -2.0, 22.0));
}

#[test]
fn test_inverted_rect_gets_no_padding() {
    let rect = ViewRect::new(5.0, 1.0, 0.0, 0.0);
    assert_eq!(rect.padded(0.1), rect);
}

// ============================================
// Scaling Tests
// ============================================

#[test]
fn test_scaled_zooms_around_center() {
    let rect = ViewRect::new(0.0, 10.0, 0.0, 10.0);
    assert_eq!(rect.scaled(2.0, 1.0), ViewRect::new(2.5, 7.5, 0.0, 10.0));
    assert_eq!(rect.scaled(0.5, 0.5), ViewRect::new(-5.0, 15.0, -5.0, 15.0));
}

#[test]
fn test_invalid_scale_leaves_axis_unchanged() {
    let rect = ViewRect::new(0.0, 4.0, 0.0, 4.0);
    assert_eq!(rect.scaled(0.0, f64::NAN), rect);
    assert_eq!(rect.scaled(-1.0, f64::INFINITY), rect);
}

// ============================================
// Fitting Tests
// ============================================

#[test]
fn test_bounds_of_points() {
    let rect = ViewRect::bounds_of(&[[0.0, 0.0], [10.0, 20.0], [5.0, 5.0]], 0.1).unwrap();
    assert_eq!(rect, ViewRect::new(-1.0, 11.0, -2.0, 22.0));
}

#[test]
fn test_bounds_of_single_point_has_area() {
    let rect = ViewRect::bounds_of(&[[3.0, 4.0]], 0.0).unwrap();
    assert_eq!(rect, ViewRect::new(2.0, 4.0, 3.0, 5.0));
}

#[test]
fn test_bounds_of_empty_is_none() {
    assert!(ViewRect::bounds_of(&[], 0.1).is_none());
}

// ============================================
// Busy State Tests
// ============================================

#[test]
fn test_busy_state_default_is_idle() {
    assert_eq!(BusyState::default(), BusyState::Idle);
    assert_ne!(BusyState::Busy("Loading".into()), BusyState::Idle);
}
