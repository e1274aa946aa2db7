use std::f32::consts::PI;

use headrig_common::RigError;
use headrig_rig::Rig;
use serde::Serialize;

/// Rig inspector for developer tooling.
///
/// Provides read-only queries against a computed rig for the CLI, the viewer
/// side panel and logs.
pub struct RigInspector;

impl RigInspector {
    /// Produce a summary of the rig geometry.
    pub fn summary(rig: &Rig) -> RigSummary {
        let config = rig.config();
        let n = rig.camera_count();
        let horizontal = config.radius * config.elevation_rad().cos().abs();
        let (angular_spacing_deg, neighbour_spacing) = match n {
            0 => (0.0, 0.0),
            1 => (360.0, 0.0),
            _ => (360.0 / n as f32, 2.0 * horizontal * (PI / n as f32).sin()),
        };
        RigSummary {
            camera_count: n,
            radius: config.radius,
            elevation_deg: config.elevation_deg,
            ring_height: config.radius * config.elevation_rad().sin(),
            angular_spacing_deg,
            neighbour_spacing,
            head_radius: rig.head().radius(),
            head_clearance: config.radius - rig.head().radius(),
            head_points: rig.head().points().len(),
        }
    }

    /// Details of the camera at `index`.
    pub fn inspect_camera(rig: &Rig, index: usize) -> Result<CameraInfo, RigError> {
        let cam = rig.camera(index)?;
        let p = cam.position;
        let azimuth_deg = 360.0 * index as f32 / rig.camera_count() as f32;
        Ok(CameraInfo {
            index,
            azimuth_deg,
            position: p.to_array(),
            distance: p.length(),
        })
    }

    /// Details of every camera, in index order.
    pub fn list_cameras(rig: &Rig) -> Vec<CameraInfo> {
        (0..rig.camera_count())
            .filter_map(|i| Self::inspect_camera(rig, i).ok())
            .collect()
    }

    /// Flat per-camera records for machine-readable layout output.
    pub fn layout(rig: &Rig) -> Vec<LayoutEntry> {
        Self::list_cameras(rig)
            .into_iter()
            .map(LayoutEntry::from)
            .collect()
    }
}

/// Summary of rig geometry for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct RigSummary {
    pub camera_count: usize,
    pub radius: f32,
    pub elevation_deg: f32,
    /// Z of every camera.
    pub ring_height: f32,
    pub angular_spacing_deg: f32,
    /// Chord length between consecutive cameras.
    pub neighbour_spacing: f32,
    pub head_radius: f32,
    /// Ring radius minus head radius; negative means cameras sit inside the head.
    pub head_clearance: f32,
    pub head_points: usize,
}

impl std::fmt::Display for RigSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rig: cameras={} radius={:.3} m elevation={:.1} deg height={:.3} m \
             spacing={:.1} deg ({:.3} m) head_radius={:.3} m clearance={:.3} m",
            self.camera_count,
            self.radius,
            self.elevation_deg,
            self.ring_height,
            self.angular_spacing_deg,
            self.neighbour_spacing,
            self.head_radius,
            self.head_clearance,
        )
    }
}

/// Detailed info about a single camera.
#[derive(Debug, Clone, Serialize)]
pub struct CameraInfo {
    pub index: usize,
    pub azimuth_deg: f32,
    pub position: [f32; 3],
    /// Distance from the head centre.
    pub distance: f32,
}

impl std::fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Camera [{:02}] az={:6.1} deg pos=({:.4}, {:.4}, {:.4}) dist={:.4} m",
            self.index,
            self.azimuth_deg,
            self.position[0],
            self.position[1],
            self.position[2],
            self.distance,
        )
    }
}

/// One camera of a layout: `{index, azimuth_deg, x, y, z}`.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutEntry {
    pub index: usize,
    pub azimuth_deg: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<CameraInfo> for LayoutEntry {
    fn from(info: CameraInfo) -> Self {
        let [x, y, z] = info.position;
        Self {
            index: info.index,
            azimuth_deg: info.azimuth_deg,
            x,
            y,
            z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headrig_common::RigConfig;

    #[test]
    fn summary_reference_rig() {
        let rig = Rig::build(RigConfig::default()).unwrap();
        let s = RigInspector::summary(&rig);
        assert_eq!(s.camera_count, 12);
        assert!((s.angular_spacing_deg - 30.0).abs() < 1e-5);
        // 2 * 0.25 * sin(15 deg)
        assert!((s.neighbour_spacing - 0.129_409_52).abs() < 1e-5);
        assert!((s.head_clearance - 0.15).abs() < 1e-6);
        assert_eq!(s.ring_height, 0.0);
        assert_eq!(s.head_points, 2500);
    }

    #[test]
    fn summary_empty_ring() {
        let rig = Rig::build(RigConfig::new(0, 0.25, 0.0)).unwrap();
        let s = RigInspector::summary(&rig);
        assert_eq!(s.camera_count, 0);
        assert_eq!(s.angular_spacing_deg, 0.0);
        assert_eq!(s.neighbour_spacing, 0.0);
    }

    #[test]
    fn neighbour_spacing_matches_positions() {
        let rig = Rig::build(RigConfig::new(7, 0.3, 25.0)).unwrap();
        let s = RigInspector::summary(&rig);
        let cams = rig.cameras();
        for pair in cams.windows(2) {
            let d = (pair[1].position - pair[0].position).length();
            assert!((d - s.neighbour_spacing).abs() < 1e-5);
        }
    }

    #[test]
    fn inspect_camera_found() {
        let rig = Rig::build(RigConfig::default()).unwrap();
        let info = RigInspector::inspect_camera(&rig, 3).unwrap();
        assert!((info.azimuth_deg - 90.0).abs() < 1e-5);
        assert!((info.position[1] - 0.25).abs() < 1e-6);
        assert!((info.distance - 0.25).abs() < 1e-6);
    }

    #[test]
    fn inspect_camera_out_of_range() {
        let rig = Rig::build(RigConfig::new(4, 0.25, 0.0)).unwrap();
        assert!(matches!(
            RigInspector::inspect_camera(&rig, 9),
            Err(RigError::CameraIndexOutOfRange { index: 9, count: 4 })
        ));
    }

    #[test]
    fn list_cameras_in_order() {
        let rig = Rig::build(RigConfig::new(5, 0.25, 0.0)).unwrap();
        let infos = RigInspector::list_cameras(&rig);
        assert_eq!(infos.len(), 5);
        for (i, info) in infos.iter().enumerate() {
            assert_eq!(info.index, i);
        }
    }

    #[test]
    fn displays() {
        let rig = Rig::build(RigConfig::default()).unwrap();
        let s = format!("{}", RigInspector::summary(&rig));
        assert!(s.contains("cameras=12"));
        assert!(s.contains("spacing=30.0 deg"));
        let c = format!("{}", RigInspector::inspect_camera(&rig, 0).unwrap());
        assert!(c.starts_with("Camera [00]"));
    }

    #[test]
    fn camera_info_serializes() {
        let rig = Rig::build(RigConfig::default()).unwrap();
        let info = RigInspector::inspect_camera(&rig, 0).unwrap();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["index"], 0);
        assert!(json["position"].is_array());
    }

    #[test]
    fn layout_entries_have_flat_coordinates() {
        let rig = Rig::build(RigConfig::default()).unwrap();
        let json = serde_json::to_value(RigInspector::layout(&rig)).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 12);
        let first = entries[0].as_object().unwrap();
        let mut keys: Vec<&str> = first.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["azimuth_deg", "index", "x", "y", "z"]);
        assert!((first["x"].as_f64().unwrap() - 0.25).abs() < 1e-6);
        assert_eq!(entries[3]["index"], 3);
        assert!((entries[3]["y"].as_f64().unwrap() - 0.25).abs() < 1e-6);
    }
}
