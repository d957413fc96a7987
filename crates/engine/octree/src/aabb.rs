//! Axis-aligned bounding boxes and octant subdivision
//!
//! Octant indexing uses binary coordinates: bit 0 selects the upper X half,
//! bit 1 the upper Y half, bit 2 the upper Z half, so index = x | y<<1 | z<<2.
//! The mapping is fixed; the compacted buffer's children mask relies on it.

use glam::Vec3;

/// Axis-aligned box described by per-axis minimum and maximum extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Inverted box that grows to fit the first point added to it.
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn half_size(&self) -> Vec3 {
        (self.max - self.min) / 2.0
    }

    /// True when min <= max on every axis. [`Aabb::EMPTY`] is not valid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    /// Expand the box to contain `point`.
    #[inline]
    pub fn grow(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// True when `point` lies inside or on the boundary of the box.
    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Child box for octant `index` (0-7), split at the midpoint.
    ///
    /// Bit 0 selects the upper X half, bit 1 the upper Y half, bit 2 the
    /// upper Z half. The eight octants tile the box exactly; neighboring
    /// octants share their boundary planes.
    pub fn octant(&self, index: usize) -> Aabb {
        debug_assert!(index < 8, "octant index must be 0-7");
        let mid = self.center();
        let min = Vec3::new(
            if index & 1 != 0 { mid.x } else { self.min.x },
            if index & 2 != 0 { mid.y } else { self.min.y },
            if index & 4 != 0 { mid.z } else { self.min.z },
        );
        let max = Vec3::new(
            if index & 1 != 0 { self.max.x } else { mid.x },
            if index & 2 != 0 { self.max.y } else { mid.y },
            if index & 4 != 0 { self.max.z } else { mid.z },
        );
        Aabb { min, max }
    }
}
