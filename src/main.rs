//! CloudView - An interactive 2D point-cloud viewer written in Rust
//!
//! Launches the viewer with a small demo scene: a colour-mapped spiral and a
//! group of phase-shifted waves sharing one colour scale.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cloudview::app::CloudViewApp;
use cloudview::array::StructuredArray;
use cloudview::settings::ViewerConfig;
use cloudview::viewer::Viewer;

/// Archimedean spiral with its radius as the colour field
fn spiral(n: usize) -> anyhow::Result<StructuredArray> {
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    let mut radius = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f64 / n as f64 * 12.0 * std::f64::consts::PI;
        let r = 0.2 * t;
        x.push(r * t.cos());
        y.push(r * t.sin());
        radius.push(r);
    }
    Ok(StructuredArray::from_columns(vec![
        ("x", x),
        ("y", y),
        ("radius", radius),
    ])?)
}

/// Sine and cosine of one phase, with amplitude as the colour field
fn wave(n: usize, phase: f64) -> anyhow::Result<StructuredArray> {
    let x: Vec<f64> = (0..n).map(|i| i as f64 / n as f64 * 10.0).collect();
    let sin: Vec<f64> = x.iter().map(|t| (t + phase).sin()).collect();
    let cos: Vec<f64> = x.iter().map(|t| (t + phase).cos()).collect();
    let amplitude: Vec<f64> = sin.iter().map(|v| v.abs() * (1.0 + phase)).collect();
    Ok(StructuredArray::from_columns(vec![
        ("t", x),
        ("sin", sin),
        ("cos", cos),
        ("amplitude", amplitude),
    ])?)
}

fn populate(viewer: &mut Viewer) -> anyhow::Result<()> {
    let request = viewer.request("x", "y").color_field("radius").name("Spiral");
    viewer
        .add_plot(spiral(20_000)?, request)
        .context("failed to add spiral")?;

    let template = viewer.request("t", "sin");
    let mut group = viewer.plot_group("amplitude", Some("Waves".to_string()));
    for k in 0..4 {
        let phase = k as f64 * 0.5;
        let request = template
            .clone()
            .offset(-5.0, -8.0 - k as f64 * 1.5)
            .name(format!("Wave {}", k + 1));
        group.add_plot(wave(2_000, phase)?, request)?;
    }
    group.finish().context("failed to add wave group")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Initialize logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut viewer = Viewer::new(ViewerConfig::load());
    populate(&mut viewer)?;

    // Configure native options
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("CloudView - Point Cloud Viewer")
            .with_app_id("CloudView"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "CloudView",
        native_options,
        Box::new(move |cc| Ok(Box::new(CloudViewApp::new(cc, viewer)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start viewer: {}", e))
}
