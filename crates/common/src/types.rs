use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::RigError;

/// Number of cameras on the default rig.
pub const DEFAULT_CAMERA_COUNT: usize = 12;
/// Default ring radius in meters.
pub const DEFAULT_RADIUS: f32 = 0.25;
/// Default ring elevation in degrees (0 = horizontal plane).
pub const DEFAULT_ELEVATION_DEG: f32 = 0.0;

/// Parameters of a ring-shaped camera rig.
///
/// Set once at start-up and never mutated afterwards. Fields missing from a
/// config file fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub camera_count: usize,
    /// Distance from the vertical axis to each camera, in meters.
    pub radius: f32,
    /// Tilt of the ring relative to the XY plane, in degrees.
    pub elevation_deg: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            camera_count: DEFAULT_CAMERA_COUNT,
            radius: DEFAULT_RADIUS,
            elevation_deg: DEFAULT_ELEVATION_DEG,
        }
    }
}

impl RigConfig {
    pub fn new(camera_count: usize, radius: f32, elevation_deg: f32) -> Self {
        Self {
            camera_count,
            radius,
            elevation_deg,
        }
    }

    /// Elevation converted to radians.
    pub fn elevation_rad(&self) -> f32 {
        self.elevation_deg.to_radians()
    }

    /// Reject configurations no ring can be built from.
    ///
    /// A zero camera count is accepted and produces an empty ring.
    pub fn validate(&self) -> Result<(), RigError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(RigError::InvalidRadius(self.radius));
        }
        if !self.elevation_deg.is_finite() {
            return Err(RigError::InvalidElevation(self.elevation_deg));
        }
        Ok(())
    }

    /// Whether the elevation lies in the conventional [-90, 90] range.
    pub fn elevation_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.elevation_deg)
    }
}

/// Position of one camera on the ring, in meters.
///
/// Cameras have no identity beyond their index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPosition {
    pub index: usize,
    pub position: Vec3,
}

impl CameraPosition {
    pub fn new(index: usize, position: Vec3) -> Self {
        Self { index, position }
    }

    /// Horizontal distance from the vertical axis.
    pub fn horizontal_distance(&self) -> f32 {
        self.position.truncate().length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_reference_rig() {
        let c = RigConfig::default();
        assert_eq!(c.camera_count, 12);
        assert_eq!(c.radius, 0.25);
        assert_eq!(c.elevation_deg, 0.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_cameras_is_valid() {
        let c = RigConfig::new(0, 0.25, 0.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn non_positive_radius_rejected() {
        assert!(matches!(
            RigConfig::new(12, 0.0, 0.0).validate(),
            Err(RigError::InvalidRadius(_))
        ));
        assert!(matches!(
            RigConfig::new(12, -0.25, 0.0).validate(),
            Err(RigError::InvalidRadius(_))
        ));
        assert!(matches!(
            RigConfig::new(12, f32::NAN, 0.0).validate(),
            Err(RigError::InvalidRadius(_))
        ));
    }

    #[test]
    fn non_finite_elevation_rejected() {
        assert!(matches!(
            RigConfig::new(12, 0.25, f32::INFINITY).validate(),
            Err(RigError::InvalidElevation(_))
        ));
    }

    #[test]
    fn elevation_range_check() {
        assert!(RigConfig::new(12, 0.25, 90.0).elevation_in_range());
        assert!(RigConfig::new(12, 0.25, -90.0).elevation_in_range());
        assert!(!RigConfig::new(12, 0.25, 120.0).elevation_in_range());
    }

    #[test]
    fn horizontal_distance_ignores_z() {
        let cam = CameraPosition::new(0, Vec3::new(3.0, 4.0, 10.0));
        assert!((cam.horizontal_distance() - 5.0).abs() < 1e-6);
    }
}
