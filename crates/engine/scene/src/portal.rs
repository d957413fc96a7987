//! Portal planes and pair traversal
//!
//! A portal is a rectangle centered on a point, facing along a normal. Two
//! portals form a linked pair: a displacement ray entering one exits the
//! other with its position and direction rotated by the pair's alignment.

use glam::{Mat4, Vec3};

/// Minimum |cosine| between a ray and the portal normal for the plane
/// intersection to be well conditioned.
const FACING_EPSILON: f32 = 1e-4;

/// Offset applied past the exit plane so a teleported ray cannot land
/// exactly on the destination portal and re-enter it.
const EXIT_NUDGE: f32 = 1e-3;

/// One side of a portal pair.
#[derive(Debug, Clone, Copy)]
pub struct Portal {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Portal {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            normal: normal.normalize(),
        }
    }

    /// Rotation carrying this portal's facing onto `destination`'s.
    ///
    /// Identity when the facings are parallel - including exactly opposite
    /// facings, where no rotation axis is defined.
    pub fn alignment_to(&self, destination: &Portal) -> Mat4 {
        let angle = self.normal.dot(destination.normal).clamp(-1.0, 1.0).acos();
        let axis = self.normal.cross(destination.normal);
        if axis.length_squared() > 0.0 {
            Mat4::from_axis_angle(axis.normalize(), angle)
        } else {
            Mat4::IDENTITY
        }
    }

    /// Distance along `direction` where the ray pierces the `width` x
    /// `height` portal rectangle, if it does so within `max_t`.
    ///
    /// The rectangle's right/up frame is derived from the world up axis, so
    /// a portal facing straight up or down has no stable frame and never
    /// intersects.
    pub fn intersect_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_t: f32,
        width: f32,
        height: f32,
    ) -> Option<f32> {
        let facing = self.normal.dot(direction);
        if facing.abs() <= FACING_EPSILON {
            return None;
        }

        let t = (self.position - origin).dot(self.normal) / facing;
        if t < 0.0 || t > max_t {
            return None;
        }

        let right = self.normal.cross(Vec3::Y);
        if right.length() <= FACING_EPSILON {
            return None;
        }
        let right = right.normalize();
        let up = right.cross(self.normal).normalize();

        let offset = origin + t * direction - self.position;
        if offset.dot(right).abs() < 0.5 * width && offset.dot(up).abs() < 0.5 * height {
            Some(t)
        } else {
            None
        }
    }
}

/// Result of carrying a displacement through a portal pair.
#[derive(Debug, Clone, Copy)]
pub struct Teleport {
    /// Exit position, with the remaining travel applied past the exit plane
    pub position: Vec3,
    /// Exit travel direction
    pub direction: Vec3,
    /// Rotation to apply to any other direction carried through, e.g. the
    /// camera look direction
    pub rotation: Mat4,
}

/// Two linked portals sharing one rectangle extent.
#[derive(Debug, Clone, Copy)]
pub struct PortalPair {
    pub first: Portal,
    pub second: Portal,
    pub width: f32,
    pub height: f32,
}

impl PortalPair {
    pub fn new(first: Portal, second: Portal, width: f32, height: f32) -> Self {
        Self {
            first,
            second,
            width,
            height,
        }
    }

    /// Route a displacement ray through whichever portal it crosses first.
    ///
    /// `distance` is the length of the displacement; travel remaining after
    /// the crossing continues from the destination portal, plus a small
    /// nudge off the exit plane.
    pub fn traverse(&self, origin: Vec3, direction: Vec3, distance: f32) -> Option<Teleport> {
        let hit_first = self
            .first
            .intersect_ray(origin, direction, distance, self.width, self.height);
        let hit_second = self
            .second
            .intersect_ray(origin, direction, distance, self.width, self.height);

        let (entry, exit, t) = match (hit_first, hit_second) {
            (None, None) => return None,
            (Some(t), None) => (&self.first, &self.second, t),
            (None, Some(t)) => (&self.second, &self.first, t),
            (Some(t1), Some(t2)) => {
                if t1 <= t2 {
                    (&self.first, &self.second, t1)
                } else {
                    (&self.second, &self.first, t2)
                }
            }
        };

        let rotation = entry.alignment_to(exit);
        let entry_offset = origin + t * direction - entry.position;
        let out_direction = rotation.transform_vector3(direction).normalize();
        let mut position = rotation.transform_point3(entry_offset) + exit.position;
        position += (distance - t + EXIT_NUDGE) * out_direction;

        Some(Teleport {
            position,
            direction: out_direction,
            rotation,
        })
    }
}
