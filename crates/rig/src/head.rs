use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Radius of the reference head, in meters.
pub const HEAD_RADIUS: f32 = 0.1;
/// Samples along each of the two sphere parameters.
pub const HEAD_RESOLUTION: usize = 50;

/// Grid of points on a sphere, sampled over `u ∈ [0, 2π]` (rows) and
/// `v ∈ [0, π]` (columns).
///
/// Both parameter ranges include their end points, so the first and last rows
/// coincide and each pole is a degenerate column.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadMesh {
    radius: f32,
    resolution: usize,
    /// Row-major: `points[row * resolution + col]`.
    points: Vec<Vec3>,
}

impl HeadMesh {
    /// Sample the standard sphere parameterization:
    /// `x = r·cos(u)·sin(v)`, `y = r·sin(u)·sin(v)`, `z = r·cos(v)`.
    pub fn generate(radius: f32, resolution: usize) -> Self {
        let us = linspace(0.0, TAU, resolution);
        let vs = linspace(0.0, PI, resolution);

        let mut points = Vec::with_capacity(resolution * resolution);
        for &u in &us {
            let (sin_u, cos_u) = u.sin_cos();
            for &v in &vs {
                let (sin_v, cos_v) = v.sin_cos();
                points.push(Vec3::new(
                    radius * cos_u * sin_v,
                    radius * sin_u * sin_v,
                    radius * cos_v,
                ));
            }
        }

        tracing::debug!(radius, resolution, points = points.len(), "generated head mesh");
        Self {
            radius,
            resolution,
            points,
        }
    }

    /// The reference head: radius 0.1 m, 50×50 samples.
    pub fn head() -> Self {
        Self::generate(HEAD_RADIUS, HEAD_RESOLUTION)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Number of `u` samples.
    pub fn rows(&self) -> usize {
        self.resolution
    }

    /// Number of `v` samples.
    pub fn cols(&self) -> usize {
        self.resolution
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn point(&self, row: usize, col: usize) -> Option<Vec3> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        self.points.get(row * self.cols() + col).copied()
    }

    /// Outward unit normals, one per point.
    pub fn normals(&self) -> Vec<Vec3> {
        self.points.iter().map(|p| p.normalize_or_zero()).collect()
    }

    /// Two triangles per grid quad, indexing into `points()`.
    pub fn triangle_indices(&self) -> Vec<u32> {
        let cols = self.cols();
        if self.rows() < 2 || cols < 2 {
            return Vec::new();
        }
        let mut indices = Vec::with_capacity((self.rows() - 1) * (cols - 1) * 6);
        for r in 0..self.rows() - 1 {
            for c in 0..cols - 1 {
                let a = (r * cols + c) as u32;
                let b = a + 1;
                let d = a + cols as u32;
                let e = d + 1;
                indices.extend_from_slice(&[a, d, b, b, d, e]);
            }
        }
        indices
    }

    /// Largest deviation of any point's distance from the origin from the
    /// mesh radius.
    pub fn max_radius_error(&self) -> f32 {
        self.points
            .iter()
            .map(|p| (p.length() - self.radius).abs())
            .fold(0.0, f32::max)
    }
}

/// `n` evenly spaced samples over `[start, end]`, end point included.
fn linspace(start: f32, end: f32, n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f32;
            (0..n).map(|i| start + step * i as f32).collect()
        }
    }
}
