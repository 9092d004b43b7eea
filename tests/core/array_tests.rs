//! Tests for structured arrays, plot requests and the array registry
//!
//! Tests cover:
//! - Column validation
//! - Request validation before any data is produced
//! - Transform flag resolution
//! - Registry field bookkeeping

use cloudview::array::{process_request, ArrayRegistry, PlotRequest, StructuredArray, TransformRequest};
use cloudview::error::ViewerError;
use cloudview::group::ColorRange;
use cloudview::transform::{AffineTransformEngine, TransformMode, TransformParams};

use crate::common::synthetic::{colored_array, multi_field_array};

// ============================================
// Structured Array Tests
// ============================================

#[test]
fn test_from_columns_keeps_order() {
    let array = StructuredArray::from_columns(vec![
        ("b", vec![1.0, 2.0]),
        ("a", vec![3.0, 4.0]),
    ])
    .unwrap();
    assert_eq!(array.field_names(), ["b", "a"]);
    assert_eq!(array.field("a"), Some(&[3.0, 4.0][..]));
    assert_eq!(array.len(), 2);
    assert!(array.field("c").is_none());
}

#[test]
fn test_from_columns_rejects_ragged() {
    let result = StructuredArray::from_columns(vec![("x", vec![1.0, 2.0]), ("y", vec![1.0])]);
    assert!(matches!(
        result,
        Err(ViewerError::RaggedColumns {
            expected: 2,
            found: 1,
            ..
        })
    ));
}

#[test]
fn test_from_columns_rejects_duplicates() {
    let result = StructuredArray::from_columns(vec![("x", vec![1.0]), ("x", vec![2.0])]);
    assert!(matches!(result, Err(ViewerError::DuplicateField(name)) if name == "x"));
}

// ============================================
// Request Processing Tests
// ============================================

#[test]
fn test_process_raw_request() {
    let array = colored_array(5, 0.0, 10.0);
    let request = PlotRequest::new("x", "y").color_field("value");
    let processed = process_request(&array, &request, &AffineTransformEngine).unwrap();

    assert_eq!(processed.plot.points.len(), 5);
    assert_eq!(processed.plot.points[4], [1.0, 1.0]);
    assert_eq!(processed.transform_params.mode, TransformMode::Raw);
    assert_eq!(processed.color_range, Some(ColorRange::new(0.0, 10.0)));
    assert_eq!(processed.plot.name.as_deref(), Some("y"));
    assert!(processed.plot.is_array_parent);
}

#[test]
fn test_missing_fields_are_reported_by_role() {
    let array = colored_array(3, 0.0, 1.0);
    let engine = AffineTransformEngine;

    let err = process_request(&array, &PlotRequest::new("nope", "y"), &engine).unwrap_err();
    assert!(matches!(err, ViewerError::FieldNotFound { role: "X", .. }));

    let err = process_request(&array, &PlotRequest::new("x", "nope"), &engine).unwrap_err();
    assert!(matches!(err, ViewerError::FieldNotFound { role: "Y", .. }));

    let request = PlotRequest::new("x", "y").color_field("nope");
    match process_request(&array, &request, &engine).unwrap_err() {
        ViewerError::FieldNotFound {
            role,
            field,
            available,
        } => {
            assert_eq!(role, "Color");
            assert_eq!(field, "nope");
            assert_eq!(available, vec!["x", "y", "value"]);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_single_field_array_is_rejected() {
    let array = StructuredArray::from_columns(vec![("x", vec![1.0, 2.0])]).unwrap();
    let err = process_request(&array, &PlotRequest::new("x", "x"), &AffineTransformEngine)
        .unwrap_err();
    assert!(matches!(err, ViewerError::TooFewFields { found: 1 }));
}

#[test]
fn test_normalize_and_center_conflict() {
    let array = colored_array(3, 0.0, 1.0);
    let request = PlotRequest::new("x", "y").normalize(true).center(true);
    assert!(matches!(request.transform(), Err(ViewerError::ConflictingTransform)));
    assert!(matches!(
        process_request(&array, &request, &AffineTransformEngine),
        Err(ViewerError::ConflictingTransform)
    ));
}

#[test]
fn test_saved_params_win_over_flags() {
    let params = TransformParams {
        mode: TransformMode::Normalize,
        shift_x: 1.0,
        shift_y: 1.0,
        scale_x: 2.0,
        scale_y: 2.0,
    };
    let request = PlotRequest::new("x", "y")
        .normalize(true)
        .center(true)
        .transform_params(params);
    assert_eq!(request.transform().unwrap(), TransformRequest::Replay(params));
}

#[test]
fn test_normalized_request_fits_unit_square() {
    let array = multi_field_array(11);
    let request = PlotRequest::new("x", "z").normalize(true);
    let processed = process_request(&array, &request, &AffineTransformEngine).unwrap();
    let (lo, hi) = processed.plot.points.iter().fold(
        ([f64::MAX; 2], [f64::MIN; 2]),
        |(lo, hi), p| {
            (
                [lo[0].min(p[0]), lo[1].min(p[1])],
                [hi[0].max(p[0]), hi[1].max(p[1])],
            )
        },
    );
    assert_eq!(lo, [0.0, 0.0]);
    assert!((hi[0] - 1.0).abs() < 1e-12 && (hi[1] - 1.0).abs() < 1e-12);
}

#[test]
fn test_request_builders() {
    let request = PlotRequest::new("x", "y")
        .offset(1.0, -1.0)
        .visible(false)
        .name("custom");
    assert_eq!(request.placement.offset_x, 1.0);
    assert_eq!(request.placement.offset_y, -1.0);
    assert!(!request.visible);
    assert_eq!(request.display_name(), "custom");
    assert_eq!(PlotRequest::new("x", "y").display_name(), "y");
}

// ============================================
// Registry Tests
// ============================================

#[test]
fn test_registry_tracks_fields() {
    let mut registry = ArrayRegistry::new();
    let array = multi_field_array(4);
    let index = registry.register(
        array,
        PlotRequest::new("x", "y"),
        &TransformParams::identity(),
        None,
    );

    assert_eq!(registry.name(index), Some("Array 1"));
    assert_eq!(registry.fields(index), vec!["value", "y", "z"]);
    assert!(registry.active_fields(index).is_empty());

    registry.register_field_plot(index, "y", 7);
    assert!(registry.is_field_active(index, "y"));
    assert_eq!(registry.field_plot(index, "y"), Some(7));
    assert_eq!(registry.field_of_plot(7), Some((index, "y")));
    assert_eq!(registry.active_fields(index), vec!["y"]);

    assert_eq!(registry.unregister_field_plot(index, "y"), Some(7));
    assert_eq!(registry.unregister_field_plot(index, "y"), None);
    assert!(registry.field_of_plot(7).is_none());
}

#[test]
fn test_registry_keeps_transform_as_map() {
    let mut registry = ArrayRegistry::new();
    let params = TransformParams {
        mode: TransformMode::Center,
        shift_x: 0.5,
        shift_y: -0.5,
        scale_x: 1.0,
        scale_y: 1.0,
    };
    let index = registry.register(
        colored_array(2, 0.0, 1.0),
        PlotRequest::new("x", "y").name("cloud"),
        &params,
        Some(ColorRange::new(0.0, 1.0)),
    );
    let entry = registry.get(index).unwrap();
    assert_eq!(entry.name, "cloud");
    assert_eq!(TransformParams::from_map(&entry.transform).unwrap(), params);
    assert_eq!(entry.color_range, Some(ColorRange::new(0.0, 1.0)));
    assert_eq!(registry.indices().collect::<Vec<_>>(), vec![index]);
}

#[test]
fn test_unknown_array_queries_are_empty() {
    let registry = ArrayRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.fields(3).is_empty());
    assert!(registry.name(3).is_none());
    assert!(!registry.is_field_active(3, "y"));
}
