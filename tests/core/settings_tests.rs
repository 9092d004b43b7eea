//! Tests for viewer settings persistence
//!
//! Tests cover:
//! - Default settings values
//! - Serialization/deserialization
//! - Settings roundtrip through a file
//! - Corrupt and missing files
//! - Clamping out-of-range values on load
//! - Derived render and cull options

use cloudview::color::{Colormap, Rgba};
use cloudview::cull::LocalRangePolicy;
use cloudview::render::grid_positions;
use cloudview::settings::ViewerConfig;
use cloudview::state::{
    CULL_MARGIN, DEFAULT_MAX_DISPLAY_POINTS, LINE_ALPHA, MAX_GRID_POWER, SCATTER_ALPHA,
};

fn temp_settings_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("cloudview-test-{}-{}", name, std::process::id()))
        .join("settings.json")
}

// ============================================
// Default Settings Tests
// ============================================

#[test]
fn test_settings_default_values() {
    let config = ViewerConfig::default();
    assert_eq!(config.version, 1);
    assert_eq!(config.max_display_points, DEFAULT_MAX_DISPLAY_POINTS);
    assert_eq!(config.cull_margin, CULL_MARGIN);
    assert_eq!(config.scatter_alpha, SCATTER_ALPHA);
    assert_eq!(config.line_alpha, LINE_ALPHA);
    assert_eq!(config.tick_interval_ms, 16);
    assert!(config.prefer_equal_aspect);
    assert_eq!(config.local_range, LocalRangePolicy::VisibleSubset);
    assert_eq!(config.grid_power, 0);
}

// ============================================
// Serialization Tests
// ============================================

#[test]
fn test_settings_serialize_uses_readable_enums() {
    let config = ViewerConfig {
        default_colormap: Colormap::Viridis,
        local_range: LocalRangePolicy::FullData,
        ..ViewerConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"viridis\""));
    assert!(json.contains("\"full_data\""));
}

#[test]
fn test_settings_empty_object_is_default() {
    let config: ViewerConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, ViewerConfig::default());
}

#[test]
fn test_settings_roundtrip_through_file() {
    let path = temp_settings_path("roundtrip");
    let config = ViewerConfig {
        max_display_points: 1234,
        grid_power: 3,
        grid_color: Rgba::rgb(1, 2, 3),
        prefer_equal_aspect: false,
        ..ViewerConfig::default()
    };
    config.save_to(&path).unwrap();
    assert_eq!(ViewerConfig::load_from(&path), config);
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_settings_missing_file_is_default() {
    let path = temp_settings_path("missing");
    assert_eq!(ViewerConfig::load_from(&path), ViewerConfig::default());
}

#[test]
fn test_settings_corrupt_file_is_default() {
    let path = temp_settings_path("corrupt");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(ViewerConfig::load_from(&path), ViewerConfig::default());
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_settings_huge_grid_power_is_clamped() {
    let path = temp_settings_path("grid-power");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{"grid_power": 4000000000, "max_display_points": 77}"#).unwrap();
    let config = ViewerConfig::load_from(&path);
    assert_eq!(config.grid_power, MAX_GRID_POWER);
    assert_eq!(config.max_display_points, 77);
    let options = config.render_options();
    assert!(grid_positions(-5.0, 5.0, options.grid_power)
        .iter()
        .all(|y| y.is_finite()));
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

// ============================================
// Derived Options Tests
// ============================================

#[test]
fn test_render_and_cull_options_follow_config() {
    let config = ViewerConfig {
        max_display_points: 50,
        cull_margin: 0.25,
        line_alpha: 0.3,
        local_range: LocalRangePolicy::FullData,
        ..ViewerConfig::default()
    };
    let render = config.render_options();
    assert_eq!(render.max_display_points, 50);
    assert_eq!(render.line_alpha, 0.3);
    let cull = config.cull_options();
    assert_eq!(cull.margin, 0.25);
    assert_eq!(cull.local_range, LocalRangePolicy::FullData);
}

#[test]
fn test_default_style_follows_config() {
    let config = ViewerConfig {
        default_point_size: 5.0,
        default_colormap: Colormap::Magma,
        default_line_width: 2.5,
        ..ViewerConfig::default()
    };
    let style = config.default_style();
    assert_eq!(style.size, 5.0);
    assert_eq!(style.colormap, Colormap::Magma);
    assert_eq!(style.line_width, 2.5);
    assert!(!style.draw_lines);
}

#[test]
fn test_config_dir_ends_with_app_name() {
    if let Some(dir) = ViewerConfig::get_config_dir() {
        let name = dir.file_name().unwrap().to_string_lossy().to_lowercase();
        assert_eq!(name, "cloudview");
    }
}
