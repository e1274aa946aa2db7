use glam::Vec3;
use headrig_rig::Rig;

/// Smallest cube edge, in meters, so a single-point scene still has volume.
const MIN_EDGE: f32 = 0.01;

/// Axis-aligned cube enclosing a point set.
///
/// The cube is centred on the point set's bounding-box centre and its edge is
/// the largest of the three extents, so X, Y and Z are drawn at one scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub center: Vec3,
    pub half_edge: f32,
}

impl SceneBounds {
    /// Cubic bounds of `points`, or `None` for an empty set.
    pub fn cubic(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        let edge = (max - min).max_element().max(MIN_EDGE);
        Some(Self {
            center: (min + max) * 0.5,
            half_edge: edge * 0.5,
        })
    }

    /// Cubic bounds of every camera and head point of `rig`.
    pub fn of_rig(rig: &Rig) -> Option<Self> {
        Self::cubic(rig.all_points())
    }

    pub fn edge(&self) -> f32 {
        self.half_edge * 2.0
    }

    pub fn min(&self) -> Vec3 {
        self.center - Vec3::splat(self.half_edge)
    }

    pub fn max(&self) -> Vec3 {
        self.center + Vec3::splat(self.half_edge)
    }

    /// Radius of the sphere through the cube's corners.
    pub fn bounding_radius(&self) -> f32 {
        self.half_edge * 3.0_f32.sqrt()
    }

    pub fn contains(&self, p: Vec3) -> bool {
        let d = (p - self.center).abs();
        d.max_element() <= self.half_edge + 1e-6
    }

    /// The eight cube corners, bit 0 picks X, bit 1 Y, bit 2 Z.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min(), self.max());
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            )
        })
    }

    /// The twelve cube edges as corner pairs.
    pub fn edges(&self) -> [(Vec3, Vec3); 12] {
        let c = self.corners();
        [
            (c[0], c[1]),
            (c[2], c[3]),
            (c[4], c[5]),
            (c[6], c[7]),
            (c[0], c[2]),
            (c[1], c[3]),
            (c[4], c[6]),
            (c[5], c[7]),
            (c[0], c[4]),
            (c[1], c[5]),
            (c[2], c[6]),
            (c[3], c[7]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headrig_common::RigConfig;

    #[test]
    fn empty_set_has_no_bounds() {
        assert!(SceneBounds::cubic(Vec::new()).is_none());
    }

    #[test]
    fn flat_ring_becomes_cube() {
        let rig = Rig::build(RigConfig::default()).unwrap();
        let b = SceneBounds::of_rig(&rig).unwrap();
        // The ring spans 0.5 m horizontally; the head 0.2 m vertically.
        assert!((b.edge() - 0.5).abs() < 1e-5);
        assert!(b.center.length() < 1e-5);
        for p in rig.all_points() {
            assert!(b.contains(p));
        }
    }

    #[test]
    fn single_point_gets_minimum_edge() {
        let b = SceneBounds::cubic([Vec3::ONE]).unwrap();
        assert_eq!(b.center, Vec3::ONE);
        assert!((b.edge() - 0.01).abs() < 1e-7);
    }

    #[test]
    fn corners_and_edges() {
        let b = SceneBounds {
            center: Vec3::ZERO,
            half_edge: 1.0,
        };
        let corners = b.corners();
        assert_eq!(corners[0], Vec3::splat(-1.0));
        assert_eq!(corners[7], Vec3::splat(1.0));
        for (a, z) in b.edges() {
            assert!(((a - z).length() - 2.0).abs() < 1e-6);
        }
    }
}
