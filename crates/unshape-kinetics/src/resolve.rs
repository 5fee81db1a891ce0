//! Collision response.
//!
//! Each resolver takes an ordered pair of bodies, runs its own contact test
//! and mutates velocities (and for box contacts, the vertical position) in
//! place. Static bodies are never changed.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use tracing::debug;

use crate::collision::{self, PairKind};
use crate::geometry::round2;
use crate::{Axis, Physics, RigidBody, ShapeKind};

/// A collision resolver for an ordered pair of bodies.
pub type Resolver = fn(&mut RigidBody, &mut RigidBody, &Physics);

/// Look up the resolver for a pair kind.
pub fn resolver_for(kind: PairKind) -> Resolver {
    match kind {
        PairKind::SphereSphere => resolve_sphere_sphere,
        PairKind::BoxBox | PairKind::Mixed => resolve_box_contact,
    }
}

/// Look up the resolver for a pair of shape tags.
pub fn dispatch(a: ShapeKind, b: ShapeKind) -> Resolver {
    resolver_for(PairKind::of(a, b))
}

/// Post-collision speeds `(first, second)` from one-dimensional momentum
/// conservation, rounded to two decimals.
///
/// Uses the momenta cached at the start of the tick and the current speeds.
pub fn post_collision_speeds(a: &RigidBody, b: &RigidBody) -> (f32, f32) {
    let speed_a = a.speed();
    let speed_b = b.speed();
    let momentum_delta = a.mass * (speed_b - speed_a);
    let total_mass = a.mass + b.mass;

    let second = round2((a.momentum() + b.momentum() - momentum_delta) / total_mass);
    let first = round2(speed_b - speed_a + second);
    (first, second)
}

/// Rotate `velocity` toward the direction it should leave a contact with.
///
/// The rotation is about `velocity x (sep - velocity)` by the angle between
/// `velocity` and `sep - velocity`, with `sep` the unit separation vector
/// pointing away from the other body.
pub fn deflect(velocity: Vec3, separation: Vec3) -> Vec3 {
    let adjusted = separation.normalize_or_zero() - velocity;
    if adjusted.length_squared() == 0.0 || velocity.length_squared() == 0.0 {
        return velocity;
    }

    let angle = velocity.angle_between(adjusted);
    let axis = velocity.cross(adjusted).normalize_or_zero();
    let axis = if axis != Vec3::ZERO {
        axis
    } else if angle > FRAC_PI_2 {
        // Antiparallel: any perpendicular axis gives the same half turn.
        velocity.normalize().any_orthonormal_vector()
    } else {
        return velocity;
    };

    Quat::from_axis_angle(axis, angle) * velocity
}

/// Sphere/sphere response.
///
/// With momentum enabled, speeds follow [`post_collision_speeds`]; otherwise
/// both leave at unit speed. Each dynamic sphere is deflected away from the
/// other and scaled by `1 - energy_loss`.
pub fn resolve_sphere_sphere(a: &mut RigidBody, b: &mut RigidBody, config: &Physics) {
    if !collision::spheres_touch(a, b) {
        return;
    }
    debug!(kind = ?PairKind::SphereSphere, "spheres colliding");

    let (speed_a, speed_b) = if config.momentum {
        post_collision_speeds(a, b)
    } else {
        (1.0, 1.0)
    };

    let separation = a.position - b.position;
    let keep = 1.0 - config.energy_loss;

    if !a.is_static {
        leave_contact(a, separation, speed_a * keep);
    }
    if !b.is_static {
        leave_contact(b, -separation, speed_b * keep);
    }
}

fn leave_contact(body: &mut RigidBody, separation: Vec3, speed: f32) {
    if body.velocity == Vec3::ZERO {
        body.velocity = Vec3::X;
    }
    body.velocity = deflect(body.velocity, separation).normalize_or_zero() * speed;
}

/// Box-involved response for box/box and mixed pairs.
///
/// Reflects each contact-axis component of `first`'s velocity, losing
/// `energy_loss`; on a vertical contact `first` is snapped to resting distance
/// from `second` so it cannot sink in.
pub fn resolve_box_contact(first: &mut RigidBody, second: &mut RigidBody, config: &Physics) {
    if first.is_static {
        return;
    }
    let Some(contact) = collision::probe_contact(first, second) else {
        return;
    };
    debug!(
        first = ?first.shape.kind(),
        second = ?second.shape.kind(),
        normal = %contact.normal,
        "box contact"
    );

    for axis in contact.iter() {
        let i = axis.index();
        first.velocity[i] *= -(contact.normal[i].abs() - config.energy_loss);

        if axis == Axis::Y {
            let rest = second.shape.vertical_extent() + first.shape.vertical_extent();
            let side = if first.position.y < second.position.y {
                -1.0
            } else {
                1.0
            };
            first.position.y = second.position.y + side * rest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shape;

    fn moving_sphere(x: f32, vx: f32) -> RigidBody {
        let mut body = RigidBody::new(Vec3::new(x, 0.0, 0.0), Shape::sphere(1.0), 1.0)
            .with_velocity(Vec3::X * vx);
        body.refresh_energy(0.0, None);
        body
    }

    fn ground() -> RigidBody {
        RigidBody::new_static(Vec3::ZERO, Shape::cuboid(20.0, 1.0, 20.0))
    }

    #[test]
    fn test_dispatch_routes_by_shape() {
        let mut a = moving_sphere(-0.9, 0.5);
        let mut b = moving_sphere(0.9, -0.5);
        dispatch(a.shape.kind(), b.shape.kind())(&mut a, &mut b, &Physics::default());
        assert!(a.velocity.x < 0.0);

        let mut ball = RigidBody::new(Vec3::new(0.0, 1.2, 0.0), Shape::sphere(1.0), 1.0)
            .with_velocity(Vec3::new(0.0, -0.4, 0.0));
        let mut floor = ground();
        let resolve = dispatch(floor.shape.kind(), ball.shape.kind());
        resolve(&mut ball, &mut floor, &Physics::default());
        assert!(ball.velocity.y > 0.0);
    }

    #[test]
    fn test_box_kinds_share_box_resolver() {
        let config = Physics::default();
        for kind in [PairKind::BoxBox, PairKind::Mixed] {
            let mut crate_box =
                RigidBody::new(Vec3::new(0.0, 1.4, 0.0), Shape::cuboid(2.0, 2.0, 2.0), 1.0)
                    .with_velocity(Vec3::new(0.0, -0.3, 0.0));
            let mut floor = ground();
            resolver_for(kind)(&mut crate_box, &mut floor, &config);
            assert_eq!(crate_box.position.y, 1.5, "{kind:?}");
            assert!((crate_box.velocity.y - 0.3).abs() < 1e-6, "{kind:?}");
        }
    }

    #[test]
    fn test_sphere_kind_ignores_box_contact() {
        // The sphere resolver only runs its own touch test.
        let mut crate_box =
            RigidBody::new(Vec3::new(0.0, 1.4, 0.0), Shape::cuboid(2.0, 2.0, 2.0), 1.0)
                .with_velocity(Vec3::new(0.0, -0.3, 0.0));
        let mut far = moving_sphere(10.0, 0.0);
        resolver_for(PairKind::SphereSphere)(&mut crate_box, &mut far, &Physics::default());
        assert_eq!(crate_box.velocity, Vec3::new(0.0, -0.3, 0.0));
        assert_eq!(crate_box.position.y, 1.4);
    }

    #[test]
    fn test_post_collision_speeds_equal_masses() {
        let a = moving_sphere(-0.9, 0.5);
        let b = moving_sphere(0.9, -0.5);
        assert_eq!(post_collision_speeds(&a, &b), (0.5, 0.5));
    }

    #[test]
    fn test_post_collision_speeds_against_resting_body() {
        let a = moving_sphere(-0.9, 0.6);
        let b = moving_sphere(0.9, 0.0);
        // dp = 1 * (0 - 0.6) = -0.6, v2' = (0.6 + 0 + 0.6) / 2, v1' = -0.6 + v2'
        let (first, second) = post_collision_speeds(&a, &b);
        assert!((second - 0.6).abs() < 1e-6);
        assert!(first.abs() < 1e-6);
    }

    #[test]
    fn test_deflect_head_on_reverses() {
        let v = deflect(Vec3::X * 0.5, Vec3::NEG_X * 1.8);
        assert!((v - Vec3::NEG_X * 0.5).length() < 1e-5, "v = {v}");
    }

    #[test]
    fn test_deflect_keeps_speed() {
        let v = Vec3::new(0.3, -0.4, 0.1);
        let out = deflect(v, Vec3::new(1.0, 2.0, -0.5));
        assert!((out.length() - v.length()).abs() < 1e-5);
    }

    #[test]
    fn test_elastic_head_on_keeps_speeds() {
        let mut a = moving_sphere(-0.9, 0.5);
        let mut b = moving_sphere(0.9, -0.5);
        resolve_sphere_sphere(&mut a, &mut b, &Physics::default());

        assert!((a.speed() - 0.5).abs() < 1e-5);
        assert!((b.speed() - 0.5).abs() < 1e-5);
        assert!(a.velocity.x < 0.0);
        assert!(b.velocity.x > 0.0);
    }

    #[test]
    fn test_energy_loss_scales_speed() {
        let start_a = RigidBody::new(Vec3::new(-0.8, 0.3, 0.1), Shape::sphere(1.0), 1.0)
            .with_velocity(Vec3::new(0.4, -0.1, 0.05));
        let start_b = RigidBody::new(Vec3::new(0.7, -0.2, 0.0), Shape::sphere(1.0), 2.0)
            .with_velocity(Vec3::new(-0.2, 0.1, 0.0));

        let run = |energy_loss: f32| {
            let (mut a, mut b) = (start_a.clone(), start_b.clone());
            let config = Physics {
                energy_loss,
                ..Physics::default()
            };
            resolve_sphere_sphere(&mut a, &mut b, &config);
            (a.velocity, b.velocity)
        };

        let (lossless_a, lossless_b) = run(0.0);
        let (lossy_a, lossy_b) = run(0.2);
        assert!((lossy_a - lossless_a * 0.8).length() < 1e-5);
        assert!((lossy_b - lossless_b * 0.8).length() < 1e-5);
    }

    #[test]
    fn test_resting_sphere_is_seeded() {
        let mut a = moving_sphere(-0.9, 0.5);
        let mut b = moving_sphere(0.9, 0.0);
        resolve_sphere_sphere(&mut a, &mut b, &Physics::default());
        assert!(b.velocity.is_finite());
        assert!(b.velocity.x > 0.0);
    }

    #[test]
    fn test_without_momentum_unit_speeds() {
        let mut a = moving_sphere(-0.9, 0.3);
        let mut b = moving_sphere(0.9, -0.7);
        let config = Physics {
            momentum: false,
            energy_loss: 0.5,
            ..Physics::default()
        };
        resolve_sphere_sphere(&mut a, &mut b, &config);
        assert!((a.speed() - 0.5).abs() < 1e-5);
        assert!((b.speed() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_apart_spheres_untouched() {
        let mut a = moving_sphere(-2.0, 0.5);
        let mut b = moving_sphere(2.0, -0.5);
        resolve_sphere_sphere(&mut a, &mut b, &Physics::default());
        assert_eq!(a.velocity, Vec3::X * 0.5);
        assert_eq!(b.velocity, Vec3::X * -0.5);
    }

    #[test]
    fn test_static_sphere_not_moved() {
        let mut a = moving_sphere(-0.9, 0.5);
        let mut wall = RigidBody::new_static(Vec3::new(0.9, 0.0, 0.0), Shape::sphere(1.0));
        let config = Physics {
            momentum: false,
            ..Physics::default()
        };
        resolve_sphere_sphere(&mut a, &mut wall, &config);
        assert_eq!(wall.velocity, Vec3::ZERO);
        assert!(a.velocity.x < 0.0);
    }

    #[test]
    fn test_sphere_bounces_on_box() {
        let mut ball = RigidBody::new(Vec3::new(0.0, 1.2, 0.0), Shape::sphere(1.0), 1.0)
            .with_velocity(Vec3::new(0.1, -0.4, 0.0));
        let mut floor = ground();
        let config = Physics {
            energy_loss: 0.25,
            ..Physics::default()
        };

        resolve_box_contact(&mut ball, &mut floor, &config);
        assert!((ball.velocity.y - 0.3).abs() < 1e-6);
        assert_eq!(ball.velocity.x, 0.1);
        assert_eq!(ball.position.y, 1.5);
        assert_eq!(floor.position, Vec3::ZERO);
    }

    #[test]
    fn test_box_lands_on_box() {
        let mut crate_box =
            RigidBody::new(Vec3::new(0.0, 1.4, 0.0), Shape::cuboid(2.0, 2.0, 2.0), 1.0)
                .with_velocity(Vec3::new(0.0, -0.3, 0.0));
        let mut floor = ground();
        resolve_box_contact(&mut crate_box, &mut floor, &Physics::default());
        assert!((crate_box.velocity.y - 0.3).abs() < 1e-6);
        assert_eq!(crate_box.position.y, 1.5);
    }

    #[test]
    fn test_static_first_argument_is_ignored() {
        let mut floor = ground();
        let mut ball = RigidBody::new(Vec3::new(0.0, 1.2, 0.0), Shape::sphere(1.0), 1.0)
            .with_velocity(Vec3::new(0.0, -0.4, 0.0));
        resolve_box_contact(&mut floor, &mut ball, &Physics::default());
        assert_eq!(ball.velocity.y, -0.4);
        assert_eq!(ball.position.y, 1.2);
    }
}
