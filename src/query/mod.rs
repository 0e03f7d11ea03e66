//! Ray casting and closest-point helpers consumed by the BVH and the shapes.

pub use self::closest_points::{
    closest_points_segment_segment, segment_segment_distance_squared,
};
pub use self::ray::Ray;

mod closest_points;
mod ray;
