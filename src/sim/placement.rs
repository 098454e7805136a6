//! World placement: transform and bounding box as one value
//!
//! The box is stored relative to the transform's translation, so moving the
//! transform moves the box with it and the two cannot drift apart.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Smallest box containing every point (inverted if there are none)
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(
            Self::new(Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |acc, p| Self::new(acc.min.min(p), acc.max.max(p)),
        )
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    #[inline]
    pub fn translated(&self, delta: Vec3) -> Self {
        Self::new(self.min + delta, self.max + delta)
    }

    /// Overlap test ignoring depth (the playfield is the XY plane)
    pub fn overlaps_xy(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Transform plus a bounding box kept relative to its translation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    transform: Mat4,
    source_index: usize,
    local: Aabb,
}

impl Placement {
    /// Build from a world transform and the world-space box it currently has
    pub fn new(transform: Mat4, source_index: usize, world_bounds: Aabb) -> Self {
        let translation = transform.w_axis.truncate();
        Self {
            transform,
            source_index,
            local: world_bounds.translated(-translation),
        }
    }

    /// Build from a box already expressed relative to the translation
    pub fn from_local(transform: Mat4, source_index: usize, local: Aabb) -> Self {
        Self {
            transform,
            source_index,
            local,
        }
    }

    /// Axis-aligned placement at `position` with the given half extents
    pub fn at(position: Vec3, half_extents: Vec3) -> Self {
        Self::from_local(
            Mat4::from_translation(position),
            0,
            Aabb::from_center_half_extents(Vec3::ZERO, half_extents),
        )
    }

    #[inline]
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Index of the transform slot this placement was loaded from
    #[inline]
    pub fn source_index(&self) -> usize {
        self.source_index
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    #[inline]
    pub fn local_bounds(&self) -> Aabb {
        self.local
    }

    /// Current world-space bounds
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.local.translated(self.translation())
    }

    pub fn translate(&mut self, delta: Vec3) {
        let w = self.transform.w_axis;
        self.transform.w_axis = (w.truncate() + delta).extend(w.w);
    }

    pub fn set_translation(&mut self, position: Vec3) {
        let w = self.transform.w_axis.w;
        self.transform.w_axis = position.extend(w);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_translation() {
        let mut p = Placement::at(Vec3::new(1.0, 2.0, 0.0), Vec3::new(0.5, 0.25, 0.1));
        assert_eq!(p.bounds().min, Vec3::new(0.5, 1.75, -0.1));

        p.translate(Vec3::new(0.5, -1.0, 0.0));
        assert_eq!(p.translation(), Vec3::new(1.5, 1.0, 0.0));
        assert_eq!(p.bounds().max, Vec3::new(2.0, 1.25, 0.1));

        p.set_translation(Vec3::ZERO);
        assert_eq!(p.bounds().center(), Vec3::ZERO);
        assert_eq!(p.bounds().half_extents(), Vec3::new(0.5, 0.25, 0.1));
    }

    #[test]
    fn test_new_keeps_offset_box() {
        // Box authored off-center relative to the origin
        let transform = Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0));
        let world = Aabb::new(Vec3::new(3.5, -1.0, -1.0), Vec3::new(4.5, 1.0, 1.0));
        let mut p = Placement::new(transform, 7, world);
        assert_eq!(p.source_index(), 7);
        assert_eq!(p.bounds(), world);

        p.translate(Vec3::X);
        assert_eq!(p.bounds().min.x, 4.5);
    }

    #[test]
    fn test_from_points() {
        let aabb = Aabb::from_points([Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 3.0, 0.5)]);
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 0.5));
    }

    #[test]
    fn test_overlap_xy_ignores_depth() {
        let a = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Vec3::new(0.5, 0.5, 5.0), Vec3::new(2.0, 2.0, 6.0));
        assert!(a.overlaps_xy(&b));
        let c = a.translated(Vec3::new(1.5, 0.0, 0.0));
        assert!(!a.overlaps_xy(&c));
    }
}
