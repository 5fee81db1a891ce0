//! Rigid body state.
//!
//! Provides the `RigidBody` type with position, velocity, acceleration, mass
//! and shape, plus the energy and momentum derived from them each tick.

use glam::{Quat, Vec3};

use crate::error::{KineticsError, Result};
use crate::geometry::{RayHit, round2};
use crate::{Axis, Shape};

/// Speed below which a body counts as stopped.
pub const REST_SPEED: f32 = 1.0 / 10000.0;

/// Potential energy below which a body may be grounded.
pub const GROUNDED_POTENTIAL: f32 = 0.1;

/// Kinetic energy at or below which a body may be grounded.
pub const GROUNDED_KINETIC: f32 = 0.0025;

/// Lateral speed bound used by the wall-rest predicate.
const WALL_REST_SPEED: f32 = 0.3;

/// A body in the kinetics simulation.
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// Position in world space.
    pub position: Vec3,
    /// Linear velocity, in distance per tick.
    pub velocity: Vec3,
    /// Lateral acceleration. Only `x` and `z` are used; gravity drives `y`.
    pub acceleration: Vec3,
    /// Visual orientation, spun from the velocity every tick.
    pub orientation: Quat,
    /// Mass.
    pub mass: f32,
    /// Collision shape.
    pub shape: Shape,
    /// Whether grounded bodies lose lateral speed.
    pub friction: bool,
    /// Whether physics is disabled for this body (never integrated or moved
    /// by collisions, but still collided against).
    pub is_static: bool,
    kinetic_energy: f32,
    potential_energy: f32,
    momentum: f32,
}

impl RigidBody {
    /// Create a new dynamic body at rest.
    pub fn new(position: Vec3, shape: Shape, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            mass,
            shape,
            friction: true,
            is_static: false,
            kinetic_energy: 0.0,
            potential_energy: f32::INFINITY,
            momentum: 0.0,
        }
    }

    /// Create a static body.
    pub fn new_static(position: Vec3, shape: Shape) -> Self {
        Self {
            is_static: true,
            ..Self::new(position, shape, 1.0)
        }
    }

    /// Create a dynamic body, rejecting non-positive mass or degenerate shapes.
    pub fn try_new(position: Vec3, shape: Shape, mass: f32) -> Result<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(KineticsError::InvalidBody(format!(
                "mass must be positive and finite, got {mass}"
            )));
        }
        if !shape.is_valid() {
            return Err(KineticsError::InvalidBody(format!(
                "shape dimensions must be positive and finite, got {shape:?}"
            )));
        }
        if !position.is_finite() {
            return Err(KineticsError::InvalidBody(format!(
                "position must be finite, got {position}"
            )));
        }
        Ok(Self::new(position, shape, mass))
    }

    /// Set the initial velocity.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self.refresh_motion();
        self
    }

    /// Set the lateral acceleration.
    pub fn with_acceleration(mut self, acceleration: Vec3) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Set whether grounded friction applies.
    pub fn with_friction(mut self, friction: bool) -> Self {
        self.friction = friction;
        self
    }

    /// Kinetic energy as of the last refresh, `m|v|^2 / 4` to two decimals.
    pub fn kinetic_energy(&self) -> f32 {
        self.kinetic_energy
    }

    /// Potential energy above the ground found by the last probe, or
    /// infinity if nothing was below.
    pub fn potential_energy(&self) -> f32 {
        self.potential_energy
    }

    /// Momentum magnitude as of the last refresh.
    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    /// Current speed.
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Recompute every derived quantity.
    ///
    /// `ground` is the result of a downward probe from the body position.
    pub fn refresh_energy(&mut self, gravity: f32, ground: Option<RayHit>) {
        self.refresh_motion();
        self.potential_energy = match ground {
            Some(hit) => {
                let height = (hit.distance - self.shape.vertical_extent()).max(0.0);
                -self.mass * gravity * height
            }
            None => f32::INFINITY,
        };
    }

    /// Recompute kinetic energy and momentum from the current velocity.
    pub(crate) fn refresh_motion(&mut self) {
        let speed = self.speed();
        self.kinetic_energy = if speed > REST_SPEED {
            round2(self.mass * speed * speed / 4.0)
        } else {
            0.0
        };
        self.momentum = self.mass * speed;
    }

    /// Resting on the ground: low potential and kinetic energy.
    pub fn is_grounded(&self) -> bool {
        self.potential_energy < GROUNDED_POTENTIAL && self.kinetic_energy <= GROUNDED_KINETIC
    }

    /// Resting against a wall.
    ///
    /// The accumulator starts false and is only ever AND-ed, so this never
    /// holds. Kept as is; lateral motion is never stopped through this path.
    pub fn is_wall_resting(&self) -> bool {
        let mut resting = false;
        for axis in Axis::ALL {
            resting = resting
                && self.kinetic_energy < 0.0
                && self.velocity[axis.index()].abs() <= WALL_REST_SPEED;
            if resting {
                break;
            }
        }
        resting
    }

    /// Zero the velocity once it drops below [`REST_SPEED`].
    pub fn snap_to_rest(&mut self) {
        if self.speed() < REST_SPEED {
            self.velocity = Vec3::ZERO;
        }
    }

    /// Spin the visual orientation in proportion to the velocity.
    ///
    /// Local rotation about z by the x speed, about x by the y speed, and
    /// about y by the z speed, one full turn per unit.
    pub fn spin(&mut self) {
        let turn = -std::f32::consts::TAU * self.velocity;
        self.orientation = (self.orientation
            * Quat::from_rotation_z(turn.x)
            * Quat::from_rotation_x(turn.y)
            * Quat::from_rotation_y(turn.z))
        .normalize();
    }
}
