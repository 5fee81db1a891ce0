//! Ray casting and axis helpers.
//!
//! Minimal geometry needed by the ground probe and the narrow-phase contact
//! probe: rays, hits carrying a surface normal, and intersection against
//! spheres, axis-aligned boxes and horizontal planes.

use glam::Vec3;

/// One of the three world axes. `Y` is vertical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in `x, y, z` order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index into a `Vec3`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// A ray with an origin and a unit direction.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    /// Origin of the ray.
    pub origin: Vec3,
    /// Direction of the ray (unit length).
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    ///
    /// Returns `None` for a zero-length direction: a body at rest has nowhere
    /// to probe.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        Some(Self { origin, direction })
    }

    /// A ray pointing straight down from `origin`.
    pub fn downward(origin: Vec3) -> Self {
        Self {
            origin,
            direction: Vec3::NEG_Y,
        }
    }

    /// Returns the point at parameter t along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersects a sphere, front faces only.
    ///
    /// A ray starting inside the sphere reports no hit.
    pub fn cast_sphere(&self, center: Vec3, radius: f32) -> Option<RayHit> {
        let oc = self.origin - center;
        let c = oc.length_squared() - radius * radius;
        if c < 0.0 {
            return None;
        }

        let b = oc.dot(self.direction);
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let t = -b - discriminant.sqrt();
        if t < 0.0 {
            return None;
        }

        let normal = (self.at(t) - center).normalize_or_zero();
        Some(RayHit {
            distance: t,
            normal,
        })
    }

    /// Intersects an axis-aligned box given by center and half-extents,
    /// front faces only.
    ///
    /// The reported normal is the outward normal of the entry face.
    pub fn cast_box(&self, center: Vec3, half_extents: Vec3) -> Option<RayHit> {
        let min = center - half_extents;
        let max = center + half_extents;

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut enter_axis = 0;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];

            if dir == 0.0 {
                if origin < min[axis] || origin > max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let t1 = (min[axis] - origin) * inv;
            let t2 = (max[axis] - origin) * inv;
            let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };

            if near > t_enter {
                t_enter = near;
                enter_axis = axis;
            }
            t_exit = t_exit.min(far);
        }

        // Origin inside the box (or box behind the ray).
        if t_enter < 0.0 || t_exit < t_enter {
            return None;
        }

        let mut normal = Vec3::ZERO;
        normal[enter_axis] = -self.direction[enter_axis].signum();
        Some(RayHit {
            distance: t_enter,
            normal,
        })
    }

    /// Intersects the horizontal plane `y = height`, hit from above only.
    pub fn cast_plane(&self, height: f32) -> Option<RayHit> {
        let above = self.origin.y - height;
        if above < 0.0 || self.direction.y >= 0.0 {
            return None;
        }
        Some(RayHit {
            distance: above / -self.direction.y,
            normal: Vec3::Y,
        })
    }
}

/// Result of a ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Outward surface normal at the hit point.
    pub normal: Vec3,
}

/// Picks the nearer of two optional hits.
pub fn nearest(a: Option<RayHit>, b: Option<RayHit>) -> Option<RayHit> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.distance < a.distance { b } else { a }),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Rounds to two decimals, half towards positive infinity.
///
/// Bound tests and resolved speeds go through this so float jitter at contact
/// does not flip a comparison.
#[inline]
pub fn round2(value: f32) -> f32 {
    ((value + f32::EPSILON) * 100.0 + 0.5).floor() / 100.0
}
