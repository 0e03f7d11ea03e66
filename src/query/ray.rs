//! Rays and the slab-method ray/box test.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector, DIM};
use num::Zero;

/// A ray for ray-casting queries.
///
/// A ray is a half-infinite line starting at `origin` and extending along `dir`. The
/// direction does not need to be normalized; parametric distances are then scaled by its norm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Direction of the ray.
    pub dir: Vector<Real>,
}

impl Ray {
    /// Creates a new ray starting from `origin` and with the direction `dir`.
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Ray { origin, dir }
    }

    /// The parametric interval `[tmin, tmax]` where the line supporting this ray crosses
    /// `aabb`, computed with the slab method.
    ///
    /// Returns `None` if the ray is parallel to an axis and its origin lies outside of the
    /// box's slab on that axis, or if `aabb` is empty. The returned interval may be empty
    /// (`tmin > tmax`).
    fn slab_interval(&self, aabb: &Aabb) -> Option<(Real, Real)> {
        if aabb.is_empty() {
            return None;
        }

        let mut tmin = Real::NEG_INFINITY;
        let mut tmax = Real::INFINITY;

        for i in 0usize..DIM {
            if self.dir[i].is_zero() {
                if self.origin[i] < aabb.mins[i] || self.origin[i] > aabb.maxs[i] {
                    return None;
                }
            } else {
                let denom = 1.0 / self.dir[i];
                let t1 = (aabb.mins[i] - self.origin[i]) * denom;
                let t2 = (aabb.maxs[i] - self.origin[i]) * denom;

                tmin = tmin.max(t1.min(t2));
                tmax = tmax.min(t1.max(t2));
            }
        }

        Some((tmin, tmax))
    }

    /// Does this ray hit `aabb`?
    ///
    /// A box entirely behind the ray origin is not hit. A ray starting inside the box always
    /// hits it.
    ///
    /// ```rust
    /// use dynbvh3d::bounding_volume::Aabb;
    /// use dynbvh3d::query::Ray;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let aabb = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
    /// let ray = Ray::new(Point3::new(-5.0, 0.0, 0.0), Vector3::x());
    /// assert!(ray.intersects_aabb(&aabb));
    /// ```
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        match self.slab_interval(aabb) {
            Some((tmin, tmax)) => tmax >= 0.0 && tmin <= tmax,
            None => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Ray;
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Vector};

    fn unit_box() -> Aabb {
        Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn ray_along_x_hits_box() {
        let ray = Ray::new(Point::new(-5.0, 0.0, 0.0), Vector::new(1.0, 0.0, 0.0));
        assert!(ray.intersects_aabb(&unit_box()));
    }

    #[test]
    fn parallel_ray_outside_slab_misses() {
        let ray = Ray::new(Point::new(-5.0, 0.0, 0.0), Vector::new(0.0, 1.0, 0.0));
        assert!(!ray.intersects_aabb(&unit_box()));
    }

    #[test]
    fn box_behind_ray_is_missed() {
        let ray = Ray::new(Point::new(5.0, 0.0, 0.0), Vector::new(1.0, 0.0, 0.0));
        assert!(!ray.intersects_aabb(&unit_box()));
    }

    #[test]
    fn ray_from_inside_hits() {
        let ray = Ray::new(Point::origin(), Vector::new(0.3, -0.2, 0.9));
        assert!(ray.intersects_aabb(&unit_box()));
    }

    #[test]
    fn diagonal_ray_misses() {
        let ray = Ray::new(Point::new(-5.0, 3.0, 0.0), Vector::new(1.0, 0.1, 0.0));
        assert!(!ray.intersects_aabb(&unit_box()));
    }

    #[test]
    fn empty_box_is_never_hit() {
        let ray = Ray::new(Point::new(-5.0, -5.0, -5.0), Vector::new(1.0, 1.0, 1.0));
        assert!(!ray.intersects_aabb(&Aabb::new_invalid()));
    }
}
