//! Common test utilities shared across all test modules
//!
//! Synthetic data generators and small helpers for driving the manager and
//! the viewer without a UI.

#![allow(dead_code)]

use std::sync::mpsc::Receiver;

use cloudview::array::StructuredArray;
use cloudview::events::PlotEvent;

/// Collect every event currently queued on a receiver
pub fn drain(rx: &Receiver<PlotEvent>) -> Vec<PlotEvent> {
    rx.try_iter().collect()
}

/// Count queued `PlotsChanged` events
pub fn count_plots_changed(events: &[PlotEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, PlotEvent::PlotsChanged))
        .count()
}

/// Assert two floats are within `eps`
pub fn assert_close(actual: f64, expected: f64, eps: f64) {
    assert!(
        (actual - expected).abs() <= eps,
        "expected {} to be within {} of {}",
        actual,
        eps,
        expected
    );
}

/// Test data generators for synthetic tests
pub mod synthetic {
    use super::*;

    /// `n` points on a diagonal line from (0, 0) to (n - 1, n - 1)
    pub fn diagonal(n: usize) -> Vec<[f64; 2]> {
        (0..n).map(|i| [i as f64, i as f64]).collect()
    }

    /// `n` values evenly spaced over `[lo, hi]`
    pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![lo],
            _ => (0..n)
                .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
                .collect(),
        }
    }

    /// Array with `x`, `y` and a `value` colour field spanning `[lo, hi]`
    pub fn colored_array(n: usize, lo: f64, hi: f64) -> StructuredArray {
        let x = linspace(0.0, 1.0, n);
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        StructuredArray::from_columns(vec![("x", x), ("y", y), ("value", linspace(lo, hi, n))])
            .expect("synthetic array is well formed")
    }

    /// Array with `x`, `y`, `z` and `value` columns
    pub fn multi_field_array(n: usize) -> StructuredArray {
        let x = linspace(-1.0, 1.0, n);
        let y: Vec<f64> = x.iter().map(|v| v.sin()).collect();
        let z: Vec<f64> = x.iter().map(|v| v.cos() * 2.0).collect();
        let value = linspace(0.0, 1.0, n);
        StructuredArray::from_columns(vec![("x", x), ("y", y), ("z", z), ("value", value)])
            .expect("synthetic array is well formed")
    }
}
