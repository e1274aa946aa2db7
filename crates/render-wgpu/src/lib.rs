//! wgpu render backend for the rig plot.
//!
//! Draws the bounding cube and a floor grid as lines, one octahedron marker per
//! camera, and the head as a translucent surface. The viewer orbits the
//! scene centre with a Z-up orbit camera.
//!
//! # Invariants
//! - Renderer never mutates the rig.
//! - GPU buffers are built once from the rig; only the view uniform changes
//!   per frame.

mod camera;
mod gpu;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::WgpuRenderer;
