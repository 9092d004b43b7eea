//! CloudView - An interactive 2D point-cloud viewer written in Rust
//!
//! This library provides the plot model, the viewport culling and batched
//! rendering pipeline, and a graphical user interface built on eframe.
//!
//! ## Module Structure
//!
//! - [`state`] - Core identifiers, the view rectangle and tuning constants
//! - [`error`] - Error types for data-shape failures
//! - [`color`] - RGBA colours and colormaps
//! - [`plot`] - Plot entities, styles and placement
//! - [`property`] - Typed, validated plot properties and selection values
//! - [`store`] - Append-only plot store
//! - [`group`] - Colour ranges, plot groups and the selection
//! - [`events`] - Change notifications
//! - [`manager`] - Plot manager tying store, groups, selection and events
//! - [`transform`] - Normalize / center / replayable coordinate transforms
//! - [`array`] - Structured arrays, plot requests and the array registry
//! - [`cull`] - Viewport culling and local colour normalization
//! - [`render`] - Retained draw surface and the batched renderer
//! - [`busy`] - Busy scope shared between pipeline and UI
//! - [`viewer`] - The full pipeline: add, cull, render, defer
//! - [`group_builder`] - Deferred construction of plot groups
//! - [`settings`] - Viewer configuration persistence
//! - [`app`] - Main application state and eframe::App implementation
//! - [`ui`] - User interface components
//!   - `plot_canvas` - Plot area and scene painting
//!   - `plot_panel` - Plot list and selection properties
//!   - `status_bar` - Busy state and frame statistics
//!   - `toast` - Toast notification system

pub mod app;
pub mod array;
pub mod busy;
pub mod color;
pub mod cull;
pub mod error;
pub mod events;
pub mod group;
pub mod group_builder;
pub mod manager;
pub mod plot;
pub mod property;
pub mod render;
pub mod settings;
pub mod state;
pub mod store;
pub mod transform;
pub mod ui;
pub mod viewer;
