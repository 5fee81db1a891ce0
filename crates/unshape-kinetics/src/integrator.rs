//! Per-body time stepping.
//!
//! Velocities are in distance per tick: acceleration is scaled by `dt_scale`
//! before it feeds the velocity, and the position then moves by the whole
//! velocity.

use tracing::trace;

use crate::{Physics, RayHit, RigidBody};

/// Per-tick lateral damping applied to grounded bodies with friction.
pub const FRICTION_DAMPING: f32 = 0.99;

/// Advance one body by one tick.
///
/// `ground` is the downward probe result for the body's current position.
pub fn integrate(body: &mut RigidBody, config: &Physics, ground: Option<RayHit>, dt_scale: f32) {
    if body.is_static {
        return;
    }

    body.refresh_energy(config.gravity, ground);

    if config.gravity.abs() > 0.0 {
        integrate_vertical(body, config.gravity, dt_scale);
    }
    integrate_lateral(body, dt_scale);

    body.snap_to_rest();
    body.spin();
}

/// Gravity, or rest on the ground.
fn integrate_vertical(body: &mut RigidBody, gravity: f32, dt_scale: f32) {
    if !body.is_grounded() {
        body.velocity.y += gravity * dt_scale;
        body.position.y += body.velocity.y;
    } else {
        trace!(
            potential = body.potential_energy(),
            kinetic = body.kinetic_energy(),
            "grounded"
        );
        body.velocity.y = 0.0;
        if body.friction {
            body.velocity.x *= FRICTION_DAMPING;
            body.velocity.z *= FRICTION_DAMPING;
        }
    }
}

/// Lateral acceleration and motion along x and z.
fn integrate_lateral(body: &mut RigidBody, dt_scale: f32) {
    if body.is_wall_resting() {
        return;
    }
    body.velocity.x += body.acceleration.x * dt_scale;
    body.velocity.z += body.acceleration.z * dt_scale;

    body.position.x += body.velocity.x;
    body.position.z += body.velocity.z;
}
