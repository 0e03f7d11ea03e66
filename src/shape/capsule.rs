use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::query;
use crate::shape::Sphere;

/// A capsule: the set of points at distance at most `radius` from the segment `[a, b]`.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Capsule {
    /// The first endpoint of the capsule's principal segment.
    pub a: Point<Real>,
    /// The second endpoint of the capsule's principal segment.
    pub b: Point<Real>,
    /// The radius of the capsule.
    pub radius: Real,
}

impl Capsule {
    /// Creates a new capsule from the endpoints of its principal segment and its radius.
    #[inline]
    pub fn new(a: Point<Real>, b: Point<Real>, radius: Real) -> Self {
        Self { a, b, radius }
    }

    /// The center of this capsule.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.a, &self.b)
    }

    /// The AABB of this capsule.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        let margin = Vector::repeat(self.radius);
        Aabb::new(self.a.inf(&self.b) - margin, self.a.sup(&self.b) + margin)
    }

    /// Checks if this capsule intersects the sphere `other`. Tangent shapes do not intersect.
    #[inline]
    pub fn intersects_sphere(&self, other: &Sphere) -> bool {
        other.intersects_capsule(self)
    }

    /// Checks if this capsule intersects `other`. Tangent capsules do not intersect.
    pub fn intersects_capsule(&self, other: &Capsule) -> bool {
        let sum_radius = self.radius + other.radius;
        query::segment_segment_distance_squared(&self.a, &self.b, &other.a, &other.b)
            < sum_radius * sum_radius
    }
}
