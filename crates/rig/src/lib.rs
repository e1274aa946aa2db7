//! Rig geometry: camera ring layout and the reference head surface.
//!
//! # Invariants
//! - The ring holds exactly `camera_count` cameras, evenly spaced in azimuth.
//! - Every head mesh point lies on the sphere of the requested radius.
//! - All geometry is derived once from a `RigConfig` and never mutated.

pub mod head;
pub mod ring;
pub mod scene;

pub use head::{HEAD_RADIUS, HEAD_RESOLUTION, HeadMesh};
pub use ring::{azimuths, camera_position, ring_layout};
pub use scene::Rig;
