//! UI rendering modules for the CloudView application.
//!
//! - `plot_canvas` - Plot area: view limits, scene painting and colour legend
//! - `plot_panel` - Plot and group list, array fields and selection properties
//! - `status_bar` - Busy indicator and frame statistics
//! - `toast` - Toast notification system

pub mod plot_canvas;
pub mod plot_panel;
pub mod status_bar;
pub mod toast;
