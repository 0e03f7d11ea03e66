use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::shape::{Capsule, Sphere};

/// Enum representing the type of a shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum ShapeType {
    /// A sphere.
    Sphere,
    /// A capsule.
    Capsule,
}

/// A tagged shape used for narrow-phase checks after a BVH query.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Shape {
    /// A sphere.
    Sphere(Sphere),
    /// A capsule.
    Capsule(Capsule),
}

impl Shape {
    /// The type of this shape.
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Sphere(_) => ShapeType::Sphere,
            Shape::Capsule(_) => ShapeType::Capsule,
        }
    }

    /// The AABB of this shape.
    pub fn aabb(&self) -> Aabb {
        match self {
            Shape::Sphere(s) => s.aabb(),
            Shape::Capsule(c) => c.aabb(),
        }
    }

    /// The point representing this shape when ordering shapes along an axis.
    ///
    /// This is the center of a sphere and the middle of a capsule's principal segment.
    pub fn centroid(&self) -> Point<Real> {
        match self {
            Shape::Sphere(s) => s.center,
            Shape::Capsule(c) => c.center(),
        }
    }

    /// Checks if `self` and `other` overlap. Tangent shapes do not intersect.
    pub fn intersects(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Sphere(s1), Shape::Sphere(s2)) => {
                let sum_radius = s1.radius + s2.radius;
                na::distance_squared(&s1.center, &s2.center) < sum_radius * sum_radius
            }
            (Shape::Sphere(s), Shape::Capsule(c)) | (Shape::Capsule(c), Shape::Sphere(s)) => {
                s.intersects_capsule(c)
            }
            (Shape::Capsule(c1), Shape::Capsule(c2)) => c1.intersects_capsule(c2),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Capsule> for Shape {
    fn from(capsule: Capsule) -> Self {
        Shape::Capsule(capsule)
    }
}

#[cfg(test)]
mod test {
    use super::{Shape, ShapeType};
    use crate::math::Point;
    use crate::shape::{Capsule, Sphere};

    #[test]
    fn capsule_bounds_and_centroid() {
        let capsule = Capsule::new(Point::new(0.0, 0.0, 0.0), Point::new(4.0, -2.0, 0.0), 1.0);
        let shape = Shape::from(capsule);
        assert_eq!(shape.shape_type(), ShapeType::Capsule);
        assert_eq!(shape.aabb().mins, Point::new(-1.0, -3.0, -1.0));
        assert_eq!(shape.aabb().maxs, Point::new(5.0, 1.0, 1.0));
        assert_eq!(shape.centroid(), Point::new(2.0, -1.0, 0.0));
    }

    #[test]
    fn pairwise_intersections() {
        let sphere = Shape::from(Sphere::new(Point::new(0.0, 3.0, 0.0), 1.0));
        let capsule = Shape::from(Capsule::new(
            Point::new(-5.0, 0.0, 0.0),
            Point::new(5.0, 0.0, 0.0),
            2.5,
        ));
        let far_capsule = Shape::from(Capsule::new(
            Point::new(-5.0, 0.0, 10.0),
            Point::new(5.0, 0.0, 10.0),
            1.0,
        ));

        assert!(sphere.intersects(&capsule));
        assert!(capsule.intersects(&sphere));
        assert!(!capsule.intersects(&far_capsule));
        assert!(!sphere.intersects(&far_capsule));

        let tangent = Shape::from(Sphere::new(Point::new(0.0, 5.0, 0.0), 1.0));
        assert!(!sphere.intersects(&tangent));
        if let (Shape::Sphere(a), Shape::Sphere(b)) = (sphere, tangent) {
            assert!(a.intersects_sphere(&b));
        }
    }
}
