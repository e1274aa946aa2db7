use glam::{Mat4, Vec2, Vec3};
use headrig_render::RenderView;

/// Orbit camera circling a fixed target, Z up.
/// Viewer motion is inspection only; it never touches the rig.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Radians around Z, measured from +X.
    pub azimuth: f32,
    /// Radians above the XY plane.
    pub elevation: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    pub zoom_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_view(&RenderView::default())
    }
}

impl OrbitCamera {
    const MAX_ELEVATION_DEG: f32 = 89.0;
    const MIN_DISTANCE: f32 = 0.05;

    /// Orbit camera reproducing `view`.
    pub fn from_view(view: &RenderView) -> Self {
        let offset = view.eye - view.target;
        let distance = offset.length().max(Self::MIN_DISTANCE);
        let elevation = (offset.z / distance).clamp(-1.0, 1.0).asin();
        let azimuth = offset.y.atan2(offset.x);
        Self {
            target: view.target,
            distance,
            azimuth,
            elevation,
            fov: view.fov_degrees.to_radians(),
            aspect: 1.0,
            near: (distance * 0.01).max(1e-4),
            far: distance * 10.0,
            sensitivity: 0.005,
            zoom_speed: 0.1,
        }
    }

    /// Eye position in rig space.
    pub fn position(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        self.target + Vec3::new(cos_el * cos_az, cos_el * sin_az, sin_el) * self.distance
    }

    /// Drag by `dx`, `dy` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * self.sensitivity;
        self.elevation += dy * self.sensitivity;
        let limit = Self::MAX_ELEVATION_DEG.to_radians();
        self.elevation = self.elevation.clamp(-limit, limit);
    }

    /// Scroll by `steps`; positive moves closer.
    pub fn zoom(&mut self, steps: f32) {
        let factor = (1.0 - self.zoom_speed).powf(steps);
        self.distance = (self.distance * factor).max(Self::MIN_DISTANCE);
        self.near = (self.distance * 0.01).max(1e-4);
        self.far = self.far.max(self.distance * 10.0);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Z)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Pixel coordinates of `point` on a `width`×`height` viewport, origin top
    /// left. `None` when the point is behind the camera.
    pub fn project_to_screen(&self, point: Vec3, width: f32, height: f32) -> Option<Vec2> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x * 0.5 + 0.5) * width,
            (0.5 - ndc.y * 0.5) * height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = OrbitCamera::default();
        assert!(cam.position().z > 0.0);
        let vp = cam.view_projection();
        // Should produce a valid matrix (no NaN)
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn from_view_round_trips_eye() {
        let view = RenderView {
            eye: Vec3::new(0.3, -0.4, 0.5),
            target: Vec3::new(0.0, 0.0, 0.1),
            fov_degrees: 45.0,
        };
        let cam = OrbitCamera::from_view(&view);
        assert!((cam.position() - view.eye).length() < 1e-5);
    }

    #[test]
    fn target_projects_to_centre() {
        let mut cam = OrbitCamera::default();
        cam.aspect = 1.0;
        let p = cam.project_to_screen(cam.target, 800.0, 600.0).unwrap();
        assert!((p - Vec2::new(400.0, 300.0)).length() < 1e-2);
    }

    #[test]
    fn point_behind_camera_is_hidden() {
        let cam = OrbitCamera::default();
        let behind = cam.position() + (cam.position() - cam.target);
        assert!(cam.project_to_screen(behind, 800.0, 600.0).is_none());
    }

    #[test]
    fn rotate_clamps_elevation() {
        let mut cam = OrbitCamera::default();
        cam.rotate(0.0, 1.0e6);
        assert!(cam.elevation <= 89.0_f32.to_radians() + 1e-6);
        cam.rotate(0.0, -1.0e6);
        assert!(cam.elevation >= -89.0_f32.to_radians() - 1e-6);
    }

    #[test]
    fn zoom_keeps_minimum_distance() {
        let mut cam = OrbitCamera::default();
        let start = cam.distance;
        cam.zoom(1.0);
        assert!(cam.distance < start);
        cam.zoom(1000.0);
        assert!(cam.distance >= 0.05);
    }
}
