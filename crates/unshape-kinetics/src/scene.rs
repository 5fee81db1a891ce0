//! Static scenery for the ground probe.
//!
//! Surfaces are scene geometry that bodies can stand above but never collide
//! with: they only feed the downward probe that drives potential energy.

use glam::Vec3;

use crate::geometry::{Ray, RayHit};

/// A static, non-colliding surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Surface {
    /// Infinite horizontal plane at `y = height`.
    Plane {
        /// Height of the plane.
        height: f32,
    },
    /// Axis-aligned slab.
    Slab {
        /// Center of the slab.
        center: Vec3,
        /// Half-extents along each axis.
        half_extents: Vec3,
    },
}

impl Surface {
    /// Create a horizontal plane.
    pub fn plane(height: f32) -> Self {
        Surface::Plane { height }
    }

    /// Create a slab from its center and full size.
    pub fn slab(center: Vec3, size: Vec3) -> Self {
        Surface::Slab {
            center,
            half_extents: size * 0.5,
        }
    }

    /// Cast a ray against the surface.
    pub fn cast_ray(&self, ray: &Ray) -> Option<RayHit> {
        match *self {
            Surface::Plane { height } => ray.cast_plane(height),
            Surface::Slab {
                center,
                half_extents,
            } => ray.cast_box(center, half_extents),
        }
    }
}
