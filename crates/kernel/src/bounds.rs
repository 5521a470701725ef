use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned box on the horizontal XZ plane.
///
/// `center.x` is world X and `center.y` is world Z. Boxes are derived from
/// the owning entity's position and must be refreshed before any test.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb2d {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb2d {
    /// Half-extents are stored as absolute values.
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// Box centered on the XZ projection of a world position.
    pub fn around(position: Vec3, half_extents: Vec2) -> Self {
        Self::new(planar(position), half_extents)
    }

    /// Re-center on the XZ projection of a world position.
    pub fn sync_to(&mut self, position: Vec3) {
        self.center = planar(position);
    }

    /// Inclusive overlap test: touching boxes intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        let delta = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents;
        delta.x <= reach.x && delta.y <= reach.y
    }

    /// Overlap depth per axis. A negative component means the boxes are
    /// separated along that axis.
    pub fn penetration(&self, other: &Self) -> Vec2 {
        (self.half_extents + other.half_extents) - (self.center - other.center).abs()
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }
}

/// XZ projection of a world position.
pub fn planar(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(cx: f32, cz: f32, hx: f32, hz: f32) -> Aabb2d {
        Aabb2d::new(Vec2::new(cx, cz), Vec2::new(hx, hz))
    }

    #[test]
    fn overlapping_boxes_intersect() {
        let a = boxed(0.0, 0.0, 1.0, 1.0);
        let b = boxed(1.5, -1.5, 1.0, 1.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn separated_on_one_axis_does_not_intersect() {
        let a = boxed(0.0, 0.0, 1.0, 1.0);
        // Overlaps on X, separated on Z.
        let b = boxed(0.5, 2.5, 1.0, 1.0);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn touching_edges_count_as_intersecting() {
        let a = boxed(0.0, 0.0, 1.0, 1.0);
        let b = boxed(2.0, 0.0, 1.0, 1.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn intersection_is_symmetric() {
        let cases = [
            (boxed(0.0, 0.0, 0.5, 0.4), boxed(3.0, -2.0, 1.2, 1.2)),
            (boxed(2.6, -1.0, 0.5, 0.4), boxed(3.0, -2.0, 1.2, 1.2)),
            (boxed(-6.0, 2.0, 0.7, 0.7), boxed(-5.0, 2.5, 0.5, 0.4)),
            (boxed(0.0, 0.0, 0.0, 0.0), boxed(0.0, 0.0, 0.0, 0.0)),
        ];
        for (a, b) in cases {
            assert_eq!(a.intersects(&b), b.intersects(&a));
        }
    }

    #[test]
    fn negative_half_extents_are_normalized() {
        let a = boxed(0.0, 0.0, -1.0, -2.0);
        assert_eq!(a.half_extents, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn sync_tracks_xz_and_ignores_height() {
        let mut a = Aabb2d::around(Vec3::ZERO, Vec2::splat(0.5));
        a.sync_to(Vec3::new(3.0, 10.0, -4.0));
        assert_eq!(a.center, Vec2::new(3.0, -4.0));
        assert_eq!(a.min(), Vec2::new(2.5, -4.5));
        assert_eq!(a.max(), Vec2::new(3.5, -3.5));
    }

    #[test]
    fn penetration_reports_per_axis_depth() {
        let a = boxed(0.0, 0.0, 1.0, 1.0);
        let b = boxed(1.5, 0.5, 1.0, 1.0);
        let p = a.penetration(&b);
        assert!((p.x - 0.5).abs() < 1e-6);
        assert!((p.y - 1.5).abs() < 1e-6);
    }
}
