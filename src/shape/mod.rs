//! Shapes indexed by the ready-made BVH adaptors.

pub use self::capsule::Capsule;
pub use self::shape::{Shape, ShapeType};
pub use self::sphere::Sphere;

mod capsule;
mod shape;
mod sphere;
