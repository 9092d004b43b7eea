//! Core module tests
//!
//! Tests for:
//! - Plot store and manager
//! - Groups, colour ranges and selection
//! - Viewport culling
//! - Batched rendering against the retained scene
//! - Coordinate transforms
//! - Structured arrays and the array registry
//! - The viewer pipeline
//! - View rectangle geometry
//! - Settings persistence

pub mod array_tests;
pub mod group_tests;
pub mod settings_tests;
pub mod state_tests;
pub mod store_tests;
