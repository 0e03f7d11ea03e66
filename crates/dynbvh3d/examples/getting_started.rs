use dynbvh3d::math::{Point, Vector};
use dynbvh3d::partitioning::SphereBvh;
use dynbvh3d::query::Ray;
use dynbvh3d::shape::Sphere;

fn main() {
    let mut bvh = SphereBvh::default();
    let handles: Vec<_> = (0..10)
        .map(|i| {
            let center = Point::new(i as f64 * 3.0, 0.0, 0.0);
            bvh.insert_object(Sphere::new(center, 1.0)).unwrap()
        })
        .collect();

    // Simulate a few ticks where every sphere drifts upward.
    for _ in 0..5 {
        for handle in &handles {
            bvh.update_object(*handle, |s| s.center += Vector::y() * 0.5)
                .unwrap();
        }
        bvh.optimize().unwrap();
    }

    let ray = Ray::new(Point::new(-10.0, 2.5, 0.0), Vector::x());
    let hits = bvh.query_objects(|aabb| ray.intersects_aabb(aabb)).count();
    assert_eq!(hits, handles.len());

    println!(
        "{} objects, {} nodes, max depth {}, {} hit by the ray.",
        bvh.count(),
        bvh.node_count(),
        bvh.max_depth(),
        hits
    );
}
