//! Developer Tooling: read-only rig inspection.
//!
//! # Invariants
//! - Inspection never mutates the rig.

mod inspector;

pub use inspector::{CameraInfo, LayoutEntry, RigInspector, RigSummary};

pub fn crate_info() -> &'static str {
    "headrig-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
