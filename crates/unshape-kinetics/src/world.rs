//! Kinetics simulation world.
//!
//! Contains the `PhysicsWorld` container that drives the tick: ground probe
//! and integration for every body, then pairwise collision response.

use std::ops::Range;

use glam::{Quat, Vec3};
use tracing::debug_span;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collision::{self, PairKind};
use crate::error::{KineticsError, Result};
use crate::geometry::{self, Ray, RayHit};
use crate::{RigidBody, ShapeKind, Surface, integrator, resolve};

/// Argument order for sphere/box pairs.
///
/// The box resolver treats its first argument as the moving body it probes
/// from and bounces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum MixedPairOrder {
    /// Always pass the later-added body first, whatever its shape.
    ///
    /// A sphere added before the box it lands on is never resolved against
    /// it, since the (usually static) box is probed from instead.
    #[default]
    Reference,
    /// Pass the sphere first.
    SphereFirst,
}

/// Configuration for the kinetics simulation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(default, deny_unknown_fields, rename_all = "camelCase")
)]
pub struct Physics {
    /// Vertical acceleration (negative is down).
    pub gravity: f32,
    /// Fraction of speed removed by every collision response, in `[0, 1]`.
    pub energy_loss: f32,
    /// Seeds each added body's friction flag.
    pub friction: bool,
    /// Use momentum conservation for sphere/sphere speeds.
    pub momentum: bool,
    /// Run collision detection at all.
    pub collisions_enabled: bool,
    /// Run collision response.
    pub bounce: bool,
    /// Argument order for sphere/box pairs.
    pub mixed_pair_order: MixedPairOrder,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: -9.8,
            energy_loss: 0.0,
            friction: true,
            momentum: true,
            collisions_enabled: true,
            bounce: true,
            mixed_pair_order: MixedPairOrder::Reference,
        }
    }
}

impl Physics {
    /// Check that every value is in range.
    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() {
            return Err(KineticsError::InvalidConfig(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if !(0.0..=1.0).contains(&self.energy_loss) {
            return Err(KineticsError::InvalidConfig(format!(
                "energy loss must be within [0, 1], got {}",
                self.energy_loss
            )));
        }
        Ok(())
    }

    /// Whether a tick runs collision response.
    pub fn resolves_collisions(&self) -> bool {
        self.bounce && self.collisions_enabled
    }
}

/// Backwards-compatible type alias.
pub type PhysicsConfig = Physics;

/// The kinetics simulation world.
#[derive(Clone, Debug)]
pub struct PhysicsWorld {
    /// All bodies, in insertion order.
    pub bodies: Vec<RigidBody>,
    /// Static scenery seen by the ground probe.
    pub scenery: Vec<Surface>,
    /// Configuration.
    pub config: Physics,
}

impl PhysicsWorld {
    /// Create a new world.
    pub fn new(config: Physics) -> Self {
        Self {
            bodies: Vec::new(),
            scenery: Vec::new(),
            config,
        }
    }

    /// Create a new world, validating the configuration.
    pub fn try_new(config: Physics) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Add a body and return its index.
    ///
    /// The body's friction flag is taken from the world configuration.
    pub fn add_body(&mut self, mut body: RigidBody) -> usize {
        body.friction = self.config.friction;
        let index = self.bodies.len();
        self.bodies.push(body);
        index
    }

    /// Add several bodies, returning their index range.
    pub fn add_bodies(&mut self, bodies: impl IntoIterator<Item = RigidBody>) -> Range<usize> {
        let start = self.bodies.len();
        for body in bodies {
            self.add_body(body);
        }
        start..self.bodies.len()
    }

    /// Remove a body by index. Later bodies shift down by one.
    pub fn remove(&mut self, index: usize) -> Option<RigidBody> {
        if index < self.bodies.len() {
            Some(self.bodies.remove(index))
        } else {
            None
        }
    }

    /// Get a body by index.
    pub fn body(&self, index: usize) -> Option<&RigidBody> {
        self.bodies.get(index)
    }

    /// Get a mutable body by index.
    pub fn body_mut(&mut self, index: usize) -> Option<&mut RigidBody> {
        self.bodies.get_mut(index)
    }

    /// Add static scenery for the ground probe.
    pub fn add_surface(&mut self, surface: Surface) {
        self.scenery.push(surface);
    }

    /// Step the simulation forward one tick.
    pub fn step(&mut self, dt_scale: f32) {
        for index in 0..self.bodies.len() {
            if self.bodies[index].is_static {
                continue;
            }
            let ground = self.probe_ground(index);
            integrator::integrate(&mut self.bodies[index], &self.config, ground, dt_scale);
        }

        if self.config.resolves_collisions() {
            self.resolve_collisions();
        }
    }

    /// Nearest surface straight below a body, ignoring the body itself.
    pub fn probe_ground(&self, index: usize) -> Option<RayHit> {
        let ray = Ray::downward(self.bodies[index].position);

        let from_bodies = self
            .bodies
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != index)
            .filter_map(|(_, body)| body.shape.cast_ray(body.position, &ray))
            .fold(None, |best, hit| geometry::nearest(best, Some(hit)));

        self.scenery
            .iter()
            .filter_map(|surface| surface.cast_ray(&ray))
            .fold(from_bodies, |best, hit| geometry::nearest(best, Some(hit)))
    }

    /// Resolve every unordered pair once, in insertion order.
    fn resolve_collisions(&mut self) {
        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                if self.bodies[i].is_static && self.bodies[j].is_static {
                    continue;
                }

                let kind = collision::classify(&self.bodies[i], &self.bodies[j]);
                let order = self.config.mixed_pair_order;
                let (earlier, later) = {
                    let (left, right) = self.bodies.split_at_mut(j);
                    (&mut left[i], &mut right[0])
                };

                let (first, second) = match (kind, order) {
                    (PairKind::Mixed, MixedPairOrder::Reference) => (later, earlier),
                    (PairKind::Mixed, MixedPairOrder::SphereFirst)
                        if later.shape.kind() == ShapeKind::Sphere =>
                    {
                        (later, earlier)
                    }
                    _ => (earlier, later),
                };

                let _pair = debug_span!("pair", i, j, ?kind).entered();
                resolve::resolver_for(kind)(first, second, &self.config);
            }
        }
    }

    /// Get positions of all bodies.
    pub fn positions(&self) -> Vec<Vec3> {
        self.bodies.iter().map(|b| b.position).collect()
    }

    /// Get orientations of all bodies.
    pub fn orientations(&self) -> Vec<Quat> {
        self.bodies.iter().map(|b| b.orientation).collect()
    }

    /// Sum of the bodies' cached kinetic energies.
    pub fn kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(|b| b.kinetic_energy()).sum()
    }
}
