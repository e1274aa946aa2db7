use std::fmt::Write as _;

use glam::Vec3;
use headrig_rig::Rig;

use crate::bounds::SceneBounds;

/// Opacity of the head surface.
pub const HEAD_ALPHA: f32 = 0.3;

/// Title and axis labels of the rig plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLabels {
    pub title: String,
    pub x: String,
    pub y: String,
    pub z: String,
}

impl Default for PlotLabels {
    fn default() -> Self {
        Self {
            title: "Camera Placement Around Head".into(),
            x: "X (m)".into(),
            y: "Y (m)".into(),
            z: "Z (m)".into(),
        }
    }
}

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Viewer position in rig space.
    pub eye: Vec3,
    /// Point the viewer is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl RenderView {
    /// Azimuth of the default viewpoint, degrees from +X around Z.
    pub const DEFAULT_AZIMUTH_DEG: f32 = -60.0;
    /// Elevation of the default viewpoint above the XY plane, in degrees.
    pub const DEFAULT_ELEVATION_DEG: f32 = 30.0;

    /// A view looking at the centre of `bounds` from the default direction,
    /// far enough back that the whole cube fits the field of view.
    pub fn framing(bounds: &SceneBounds, fov_degrees: f32) -> Self {
        let half_fov = (fov_degrees.to_radians() * 0.5).max(1e-3);
        let distance = bounds.bounding_radius() / half_fov.sin();
        let az = Self::DEFAULT_AZIMUTH_DEG.to_radians();
        let el = Self::DEFAULT_ELEVATION_DEG.to_radians();
        let dir = Vec3::new(el.cos() * az.cos(), el.cos() * az.sin(), el.sin());
        Self {
            eye: bounds.center + dir * distance,
            target: bounds.center,
            fov_degrees,
        }
    }

    /// Default framing for `rig`; falls back to [`RenderView::default`] when
    /// the rig has nothing to show.
    pub fn for_rig(rig: &Rig) -> Self {
        let fov = Self::default().fov_degrees;
        SceneBounds::of_rig(rig)
            .map(|b| Self::framing(&b, fov))
            .unwrap_or_default()
    }
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.5, -0.8, 0.6),
            target: Vec3::ZERO,
            fov_degrees: 45.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the rig and a view configuration, then produces
/// output. It never mutates the rig.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render the rig plot from the given view.
    fn render(&self, rig: &Rig, view: &RenderView) -> Self::Output;
}

/// Text renderer for the CLI, logs and tests.
///
/// Produces a human-readable listing of everything the 3D plot shows.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    labels: PlotLabels,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(labels: PlotLabels) -> Self {
        Self { labels }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, rig: &Rig, view: &RenderView) -> String {
        let config = rig.config();
        let head = rig.head();
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "=== {} ===", self.labels.title);
        let _ = writeln!(
            out,
            "Rig: cameras={} radius={:.3} m elevation={:.1} deg",
            config.camera_count, config.radius, config.elevation_deg
        );
        let _ = writeln!(
            out,
            "View: eye=({:.3}, {:.3}, {:.3}) target=({:.3}, {:.3}, {:.3}) fov={:.0}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        );
        let _ = writeln!(
            out,
            "Axes: {} | {} | {}",
            self.labels.x, self.labels.y, self.labels.z
        );
        match SceneBounds::of_rig(rig) {
            Some(b) => {
                let _ = writeln!(
                    out,
                    "Bounds: center=({:.3}, {:.3}, {:.3}) edge={:.3} m",
                    b.center.x,
                    b.center.y,
                    b.center.z,
                    b.edge()
                );
            }
            None => {
                let _ = writeln!(out, "Bounds: empty");
            }
        }
        let _ = writeln!(
            out,
            "Head: radius={:.3} m grid={}x{} points={} alpha={:.1}",
            head.radius(),
            head.rows(),
            head.cols(),
            head.points().len(),
            HEAD_ALPHA
        );
        let _ = writeln!(out, "Cameras: {}", rig.camera_count());
        for cam in rig.cameras() {
            let p = cam.position;
            let _ = writeln!(
                out,
                "  [{:02}] pos=({:.4}, {:.4}, {:.4})",
                cam.index, p.x, p.y, p.z
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headrig_common::RigConfig;

    #[test]
    fn debug_renderer_reference_rig() {
        let rig = Rig::build(RigConfig::default()).unwrap();
        let renderer = DebugTextRenderer::new();
        let output = renderer.render(&rig, &RenderView::for_rig(&rig));

        assert!(output.contains("=== Camera Placement Around Head ==="));
        assert!(output.contains("cameras=12"));
        assert!(output.contains("X (m) | Y (m) | Z (m)"));
        assert!(output.contains("grid=50x50 points=2500"));
        assert!(output.contains("[00] pos=(0.2500, 0.0000, 0.0000)"));
        assert!(output.contains("[06] pos=(-0.2500,"));
        assert_eq!(output.matches("] pos=").count(), 12);
    }

    #[test]
    fn debug_renderer_empty_ring() {
        let rig = Rig::build(RigConfig::new(0, 0.25, 0.0)).unwrap();
        let output = DebugTextRenderer::new().render(&rig, &RenderView::default());
        assert!(output.contains("Cameras: 0"));
        assert!(!output.contains("] pos="));
    }

    #[test]
    fn custom_labels() {
        let rig = Rig::build(RigConfig::new(2, 0.25, 0.0)).unwrap();
        let labels = PlotLabels {
            title: "Test Rig".into(),
            ..PlotLabels::default()
        };
        let output = DebugTextRenderer::with_labels(labels).render(&rig, &RenderView::default());
        assert!(output.starts_with("=== Test Rig ==="));
    }

    #[test]
    fn framing_sees_whole_cube() {
        let rig = Rig::build(RigConfig::default()).unwrap();
        let bounds = SceneBounds::of_rig(&rig).unwrap();
        let view = RenderView::framing(&bounds, 45.0);
        assert_eq!(view.target, bounds.center);
        let distance = (view.eye - view.target).length();
        let half_fov = 22.5_f32.to_radians();
        assert!(bounds.bounding_radius() / distance <= half_fov.sin() + 1e-5);
        // Looking down onto the ring from the default elevation.
        assert!(view.eye.z > view.target.z);
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 45.0);
        assert_eq!(view.target, Vec3::ZERO);
    }
}
