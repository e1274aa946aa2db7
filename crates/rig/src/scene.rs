use glam::Vec3;
use headrig_common::{CameraPosition, RigConfig, RigError};

use crate::head::HeadMesh;
use crate::ring::ring_layout;

/// A computed rig: the camera ring plus the reference head it surrounds.
///
/// Everything is derived from the config at construction. Renderers and
/// inspectors only read it.
#[derive(Debug, Clone)]
pub struct Rig {
    config: RigConfig,
    cameras: Vec<CameraPosition>,
    head: HeadMesh,
}

impl Rig {
    /// Validate `config` and compute the ring and the reference head.
    pub fn build(config: RigConfig) -> Result<Self, RigError> {
        Self::with_head(config, HeadMesh::head())
    }

    /// Like [`Rig::build`] but with a caller-supplied head mesh.
    pub fn with_head(config: RigConfig, head: HeadMesh) -> Result<Self, RigError> {
        config.validate()?;
        if !config.elevation_in_range() {
            tracing::warn!(
                elevation_deg = config.elevation_deg,
                "elevation outside [-90, 90]; the ring wraps over the pole"
            );
        }
        if config.camera_count == 0 {
            tracing::warn!("camera count is zero; the ring is empty");
        }
        let cameras = ring_layout(&config);
        Ok(Self {
            config,
            cameras,
            head,
        })
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    pub fn cameras(&self) -> &[CameraPosition] {
        &self.cameras
    }

    pub fn head(&self) -> &HeadMesh {
        &self.head
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    /// Look up one camera by index.
    pub fn camera(&self, index: usize) -> Result<&CameraPosition, RigError> {
        self.cameras
            .get(index)
            .ok_or(RigError::CameraIndexOutOfRange {
                index,
                count: self.cameras.len(),
            })
    }

    /// Every point a renderer has to fit in view: cameras first, then the head.
    pub fn all_points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.cameras
            .iter()
            .map(|c| c.position)
            .chain(self.head.points().iter().copied())
    }
}
