use dynbvh3d::bounding_volume::BoundingVolume;
use dynbvh3d::math::{Point, Real, Vector};
use dynbvh3d::partitioning::{BvhConfig, ObjectHandle, ShapeBvh};
use dynbvh3d::query::Ray;
use dynbvh3d::shape::{Capsule, Shape, ShapeType, Sphere};
use rand::prelude::*;
use rand::rngs::StdRng;

fn random_shape(rng: &mut StdRng) -> Shape {
    let center = Point::new(
        rng.gen_range(-50.0..50.0),
        rng.gen_range(-50.0..50.0),
        rng.gen_range(-50.0..50.0),
    );

    if rng.gen_bool(0.5) {
        Sphere::new(center, rng.gen_range(0.5..3.0)).into()
    } else {
        let half = Vector::new(
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-3.0..3.0),
        );
        Capsule::new(center - half, center + half, rng.gen_range(0.5..2.0)).into()
    }
}

/// The shapes overlapping `probe`: BVH broad-phase followed by an exact check.
///
/// Overlapping shapes have strictly overlapping boxes, so the open box test is enough.
fn overlapping(bvh: &ShapeBvh, probe: &Shape) -> Vec<ObjectHandle> {
    let probe_aabb = probe.aabb();
    let mut result: Vec<_> = bvh
        .query_objects(|aabb| aabb.intersects(&probe_aabb))
        .copied()
        .filter(|h| bvh.object(*h).unwrap().intersects(probe))
        .collect();
    result.sort();
    result
}

#[test]
fn shape_bvh_narrow_phase_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(1);
    let shapes: Vec<_> = (0..300).map(|_| random_shape(&mut rng)).collect();
    let bvh = ShapeBvh::from_iter(shapes, BvhConfig::default()).unwrap();
    bvh.assert_well_formed();

    for _ in 0..50 {
        let probe = random_shape(&mut rng);
        let mut expected: Vec<_> = bvh
            .adaptor()
            .iter()
            .filter(|(_, shape)| shape.intersects(&probe))
            .map(|(h, _)| h)
            .collect();
        expected.sort();

        assert_eq!(overlapping(&bvh, &probe), expected);
    }
}

#[test]
fn shape_bvh_mixed_types() {
    let mut bvh = ShapeBvh::default();
    let sphere = bvh
        .insert_object(Sphere::new(Point::new(0.0, 0.0, 0.0), 1.0).into())
        .unwrap();
    let capsule = bvh
        .insert_object(
            Capsule::new(Point::new(5.0, -2.0, 0.0), Point::new(5.0, 2.0, 0.0), 0.5).into(),
        )
        .unwrap();
    bvh.assert_well_formed();

    assert_eq!(
        bvh.object(sphere).unwrap().shape_type(),
        ShapeType::Sphere
    );
    assert_eq!(
        bvh.object(capsule).unwrap().shape_type(),
        ShapeType::Capsule
    );

    // A ray along the capsule's axis, crossing the sphere first.
    let ray = Ray::new(Point::new(-10.0, 1.0, 0.0), Vector::x());
    let hits: Vec<_> = bvh
        .query_objects(|aabb| ray.intersects_aabb(aabb))
        .copied()
        .collect();
    assert_eq!(hits, vec![sphere, capsule]);

    // Stretch the capsule up so it becomes unreachable by a ray below it.
    bvh.update_object(capsule, |shape| {
        if let Shape::Capsule(c) = shape {
            c.a.y = 5.0;
            c.b.y = 9.0;
        }
    })
    .unwrap();
    bvh.optimize().unwrap();
    bvh.assert_well_formed();

    let hits: Vec<_> = bvh
        .query_objects(|aabb| ray.intersects_aabb(aabb))
        .copied()
        .collect();
    assert_eq!(hits, vec![sphere]);

    let removed = bvh.remove_object(sphere).unwrap();
    assert_eq!(removed.centroid(), Point::origin());
    assert_eq!(bvh.count(), 1);
    bvh.assert_well_formed();
}

#[test]
fn shape_bvh_static_scene_with_large_leaves() {
    let mut rng = StdRng::seed_from_u64(2);
    let shapes: Vec<_> = (0..200).map(|_| random_shape(&mut rng)).collect();
    let config = BvhConfig::default().with_leaf_capacity(8);
    let bvh = ShapeBvh::from_iter(shapes, config).unwrap();
    bvh.assert_well_formed();

    assert_eq!(bvh.count(), 200);
    assert!(bvh.leaf_count() >= 200 / 8);

    let everything = Ray::new(Point::new(0.0, 0.0, 0.0), Vector::new(1.0, 1.0, 1.0));
    let total: Real = bvh
        .query_ray(&everything)
        .into_iter()
        .map(|id| bvh.node(id).unwrap().surface_area())
        .sum();
    // The ray starts inside the root box.
    assert!(total >= bvh.root_aabb().surface_area());
}
