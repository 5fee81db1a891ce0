//! Collision detection functions.
//!
//! Pair classification, the cheap per-axis bound tests, and the narrow-phase
//! ray probe that finds which axes a box-involved contact happens on.

use glam::Vec3;

use crate::geometry::round2;
use crate::{Axis, Ray, RigidBody, ShapeKind};

/// Shape pairing of two bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PairKind {
    /// Two spheres.
    SphereSphere,
    /// Two boxes.
    BoxBox,
    /// Anything else.
    Mixed,
}

impl PairKind {
    /// Classify a pair of shape tags.
    pub fn of(a: ShapeKind, b: ShapeKind) -> Self {
        match (a, b) {
            (ShapeKind::Sphere, ShapeKind::Sphere) => PairKind::SphereSphere,
            (ShapeKind::Box, ShapeKind::Box) => PairKind::BoxBox,
            _ => PairKind::Mixed,
        }
    }
}

/// Classify a pair of bodies by shape.
pub fn classify(a: &RigidBody, b: &RigidBody) -> PairKind {
    PairKind::of(a.shape.kind(), b.shape.kind())
}

/// Whether two spheres touch or overlap.
///
/// Only meaningful for sphere pairs; other shapes use their x half-extent.
pub fn spheres_touch(a: &RigidBody, b: &RigidBody) -> bool {
    let distance = (a.position - b.position).length();
    distance <= a.shape.half_extent(Axis::X) + b.shape.half_extent(Axis::X)
}

/// Whether the two bodies overlap along one axis.
///
/// Both sides are rounded to two decimals before comparing.
pub fn axis_overlap(a: &RigidBody, b: &RigidBody, axis: Axis) -> bool {
    let i = axis.index();
    let delta = (a.position[i] - b.position[i]).abs();
    let reach = a.shape.half_extent(axis) + b.shape.half_extent(axis);
    round2(delta) - round2(reach) <= 0.0
}

/// Whether the bodies overlap along all three axes.
pub fn general_overlap(a: &RigidBody, b: &RigidBody) -> bool {
    Axis::ALL.into_iter().all(|axis| axis_overlap(a, b, axis))
}

/// Axes flagged by a narrow-phase contact.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContactAxes {
    /// Surface normal of `second` where the probe hit it.
    pub normal: Vec3,
    /// Per-axis contact flags, indexed by [`Axis::index`].
    pub axes: [bool; 3],
}

impl ContactAxes {
    /// Whether the contact involves `axis`.
    pub fn contains(&self, axis: Axis) -> bool {
        self.axes[axis.index()]
    }

    /// Iterate over the axes in contact.
    pub fn iter(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL.into_iter().filter(|axis| self.contains(*axis))
    }
}

/// Per-axis overlap flags, each set only if some other axis overlaps too.
fn bounded_axes(a: &RigidBody, b: &RigidBody) -> [bool; 3] {
    let overlaps = Axis::ALL.map(|axis| axis_overlap(a, b, axis));
    let mut flags = [false; 3];
    for i in 0..3 {
        if !overlaps[i] {
            continue;
        }
        for j in 0..3 {
            if j != i && !flags[j] {
                flags[j] = overlaps[j];
            }
        }
    }
    flags
}

/// Narrow-phase probe from `first` toward `second`.
///
/// Casts a ray from `first` along its direction of travel. A contact needs the
/// ray to hit `second` and the bodies to overlap on all axes; the contact axes
/// are those where the hit normal is non-zero and the bounds agree.
pub fn probe_contact(first: &RigidBody, second: &RigidBody) -> Option<ContactAxes> {
    let ray = Ray::new(first.position, first.velocity)?;
    let hit = second.shape.cast_ray(second.position, &ray)?;
    if !general_overlap(first, second) {
        return None;
    }

    let bounds = bounded_axes(first, second);
    let mut axes = [false; 3];
    for axis in Axis::ALL {
        let i = axis.index();
        axes[i] = hit.normal[i] != 0.0 && bounds[i];
    }

    Some(ContactAxes {
        normal: hit.normal,
        axes,
    })
}
