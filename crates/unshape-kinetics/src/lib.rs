//! Sphere and box kinematics for unshape.
//!
//! A small, tick-driven rigid body core:
//! - `RigidBody` - position, velocity, acceleration, mass, shape and the
//!   derived kinetic/potential energy and momentum
//! - `integrator` - advances one body per tick under gravity, lateral
//!   acceleration and the resting/friction rules
//! - `collision` / `resolve` - pairwise contact detection and velocity
//!   response for sphere/sphere, box/box and mixed pairs
//! - `PhysicsWorld` - owns the bodies and configuration and steps them
//!
//! Positions advance by the full velocity each tick; `dt_scale` only scales
//! how much acceleration feeds into velocity.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use unshape_kinetics::{Physics, PhysicsWorld, RigidBody, Shape};
//!
//! let mut world = PhysicsWorld::new(Physics::default());
//! world.add_body(RigidBody::new_static(
//!     Vec3::ZERO,
//!     Shape::cuboid(100.0, 1.0, 100.0),
//! ));
//! let ball = world.add_body(RigidBody::new(Vec3::Y * 5.0, Shape::sphere(1.0), 1.0));
//!
//! world.step(0.001);
//! assert!(world.bodies[ball].position.y < 5.0);
//! ```

pub mod body;
pub mod collision;
pub mod error;
pub mod geometry;
pub mod integrator;
pub mod resolve;
pub mod scene;
pub mod world;

pub use body::RigidBody;
pub use collision::{ContactAxes, PairKind};
pub use error::KineticsError;
pub use geometry::{Axis, Ray, RayHit};
pub use scene::Surface;
pub use world::{MixedPairOrder, Physics, PhysicsConfig, PhysicsWorld};

use glam::Vec3;

/// Collision shape of a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Sphere centered on the body position.
    Sphere {
        /// Radius of the sphere.
        radius: f32,
    },
    /// Axis-aligned box centered on the body position.
    Box {
        /// Full size along x.
        width: f32,
        /// Full size along y.
        height: f32,
        /// Full size along z.
        depth: f32,
    },
}

/// Shape tag without dimensions, used for pair dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Sphere,
    Box,
}

impl Shape {
    /// Create a sphere shape.
    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere { radius }
    }

    /// Create a box shape from its full dimensions.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Shape::Box {
            width,
            height,
            depth,
        }
    }

    /// The shape tag.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Sphere { .. } => ShapeKind::Sphere,
            Shape::Box { .. } => ShapeKind::Box,
        }
    }

    /// Half-extent along one axis (radius for spheres).
    pub fn half_extent(&self, axis: Axis) -> f32 {
        self.half_extents()[axis.index()]
    }

    /// Half-extents along all three axes.
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Shape::Sphere { radius } => Vec3::splat(radius),
            Shape::Box {
                width,
                height,
                depth,
            } => Vec3::new(width, height, depth) * 0.5,
        }
    }

    /// Distance from the center to the bottom of the shape.
    pub fn vertical_extent(&self) -> f32 {
        self.half_extent(Axis::Y)
    }

    /// Cast a ray against this shape placed at `center`.
    pub fn cast_ray(&self, center: Vec3, ray: &Ray) -> Option<RayHit> {
        match *self {
            Shape::Sphere { radius } => ray.cast_sphere(center, radius),
            Shape::Box { .. } => ray.cast_box(center, self.half_extents()),
        }
    }

    /// Whether every dimension is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        let he = self.half_extents();
        he.is_finite() && he.min_element() > 0.0
    }
}
