//! Shared rig types, configuration loading and errors.
//!
//! # Invariants
//! - A validated `RigConfig` has a finite, positive radius and a finite elevation.
//! - Configuration is read-only: nothing in the workspace writes a rig back to disk.

mod config;
mod error;
mod types;

pub use config::ConfigOverrides;
pub use error::RigError;
pub use types::{
    CameraPosition, DEFAULT_CAMERA_COUNT, DEFAULT_ELEVATION_DEG, DEFAULT_RADIUS, RigConfig,
};
