//! Rendering Adapter: renderer-agnostic plot interface.
//!
//! # Invariants
//! - Renderers never mutate the rig.
//! - Every backend frames the same cubic bounds, so all three axes share one
//!   scale.

mod bounds;
mod renderer;

pub use bounds::SceneBounds;
pub use renderer::{DebugTextRenderer, HEAD_ALPHA, PlotLabels, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "headrig-render v0.1.0"
}
