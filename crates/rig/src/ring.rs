use std::f32::consts::TAU;

use glam::Vec3;
use headrig_common::{CameraPosition, RigConfig};

/// Azimuth of every camera, in radians: `2π·i / n` for `i` in `0..n`.
///
/// The full turn is excluded so the last camera does not land on the first.
pub fn azimuths(camera_count: usize) -> Vec<f32> {
    (0..camera_count)
        .map(|i| TAU * i as f32 / camera_count as f32)
        .collect()
}

/// Position of the camera at `index` on the ring described by `config`.
///
/// Returns `None` for a ring with no cameras. Otherwise `index` is not
/// bounds-checked against `camera_count`; indices past the end wrap around
/// the ring.
pub fn camera_position(config: &RigConfig, index: usize) -> Option<CameraPosition> {
    if config.camera_count == 0 {
        return None;
    }
    let azimuth = TAU * index as f32 / config.camera_count as f32;
    let position = polar_to_cartesian(config.radius, azimuth, config.elevation_rad());
    Some(CameraPosition::new(index, position))
}

/// Compute one position per camera, evenly spaced around the ring.
///
/// A camera count of zero yields an empty layout.
pub fn ring_layout(config: &RigConfig) -> Vec<CameraPosition> {
    let elevation = config.elevation_rad();
    let cameras: Vec<CameraPosition> = azimuths(config.camera_count)
        .into_iter()
        .enumerate()
        .map(|(i, az)| {
            CameraPosition::new(i, polar_to_cartesian(config.radius, az, elevation))
        })
        .collect();

    tracing::debug!(
        cameras = cameras.len(),
        radius = config.radius,
        elevation_deg = config.elevation_deg,
        "computed ring layout"
    );
    cameras
}

/// Z-up spherical to Cartesian conversion: azimuth from +X around Z,
/// elevation up from the XY plane.
fn polar_to_cartesian(radius: f32, azimuth: f32, elevation: f32) -> Vec3 {
    let horizontal = radius * elevation.cos();
    Vec3::new(
        horizontal * azimuth.cos(),
        horizontal * azimuth.sin(),
        radius * elevation.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < EPS
    }

    #[test]
    fn layout_has_one_position_per_camera() {
        for n in 1..=64 {
            let cams = ring_layout(&RigConfig::new(n, 0.25, 10.0));
            assert_eq!(cams.len(), n);
            for (i, cam) in cams.iter().enumerate() {
                assert_eq!(cam.index, i);
            }
        }
    }

    #[test]
    fn zero_cameras_yields_empty_layout() {
        assert!(ring_layout(&RigConfig::new(0, 0.25, 0.0)).is_empty());
        assert!(azimuths(0).is_empty());
    }

    #[test]
    fn azimuths_are_uniformly_spaced() {
        for n in [1usize, 2, 3, 7, 12, 36] {
            let az = azimuths(n);
            assert_eq!(az[0], 0.0);
            let step = TAU / n as f32;
            for pair in az.windows(2) {
                assert!((pair[1] - pair[0] - step).abs() < 1e-5);
            }
            // Last camera stops one step short of a full turn.
            assert!((az[n - 1] + step - TAU).abs() < 1e-5);
        }
    }

    #[test]
    fn horizontal_ring_lies_on_circle() {
        let config = RigConfig::new(12, 0.25, 0.0);
        for cam in ring_layout(&config) {
            assert_eq!(cam.position.z, 0.0);
            assert!((cam.horizontal_distance() - 0.25).abs() < EPS);
        }
    }

    #[test]
    fn vertical_elevation_collapses_to_pole() {
        let config = RigConfig::new(8, 0.25, 90.0);
        for cam in ring_layout(&config) {
            assert!(approx(cam.position, Vec3::new(0.0, 0.0, 0.25)));
        }
    }

    #[test]
    fn reference_rig_positions() {
        let cams = ring_layout(&RigConfig::new(12, 0.25, 0.0));
        assert!(approx(cams[0].position, Vec3::new(0.25, 0.0, 0.0)));
        assert!(approx(cams[3].position, Vec3::new(0.0, 0.25, 0.0)));
        assert!(approx(cams[6].position, Vec3::new(-0.25, 0.0, 0.0)));
        assert!(approx(cams[9].position, Vec3::new(0.0, -0.25, 0.0)));
    }

    #[test]
    fn elevated_ring_keeps_distance_and_height() {
        let config = RigConfig::new(10, 0.4, 30.0);
        let expected_z = 0.4 * 30.0_f32.to_radians().sin();
        for cam in ring_layout(&config) {
            assert!((cam.position.length() - 0.4).abs() < EPS);
            assert!((cam.position.z - expected_z).abs() < EPS);
        }
    }

    #[test]
    fn single_camera_matches_layout() {
        let config = RigConfig::new(12, 0.25, 15.0);
        let cams = ring_layout(&config);
        for i in 0..12 {
            let cam = camera_position(&config, i).unwrap();
            assert!(approx(cam.position, cams[i].position));
        }
    }

    #[test]
    fn empty_ring_has_no_camera_position() {
        let config = RigConfig::new(0, 0.25, 0.0);
        assert!(camera_position(&config, 0).is_none());
        assert!(camera_position(&config, 5).is_none());
    }

    #[test]
    fn camera_position_wraps_past_end() {
        let config = RigConfig::new(4, 0.25, 0.0);
        let wrapped = camera_position(&config, 5).unwrap();
        let first_lap = camera_position(&config, 1).unwrap();
        assert!(approx(wrapped.position, first_lap.position));
    }
}
