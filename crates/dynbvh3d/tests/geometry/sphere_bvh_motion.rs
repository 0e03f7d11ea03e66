use dynbvh3d::math::{Point, Real, Vector};
use dynbvh3d::partitioning::{BvhConfig, ObjectHandle, SphereBvh};
use dynbvh3d::query::Ray;
use dynbvh3d::shape::Sphere;
use rand::prelude::*;
use rand::rngs::StdRng;

struct Body {
    handle: ObjectHandle,
    velocity: Vector<Real>,
}

fn sphere_hits(bvh: &SphereBvh, center: &Point<Real>, radius: Real) -> Vec<ObjectHandle> {
    let mut hits: Vec<_> = bvh
        .query_objects(|aabb| aabb.intersects_sphere(center, radius))
        .copied()
        .collect();
    hits.sort();
    hits
}

fn brute_force_sphere_hits(
    bvh: &SphereBvh,
    center: &Point<Real>,
    radius: Real,
) -> Vec<ObjectHandle> {
    let mut hits: Vec<_> = bvh
        .adaptor()
        .iter()
        .filter(|(_, s)| s.aabb().intersects_sphere(center, radius))
        .map(|(h, _)| h)
        .collect();
    hits.sort();
    hits
}

#[test]
fn bouncing_spheres_stay_queryable() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut bvh = SphereBvh::default();
    let mut bodies = vec![];

    for _ in 0..120 {
        let center = Point::new(
            rng.gen_range(-30.0..30.0),
            rng.gen_range(-30.0..30.0),
            rng.gen_range(-30.0..30.0),
        );
        let handle = bvh
            .insert_object(Sphere::new(center, rng.gen_range(0.2..1.5)))
            .unwrap();
        let velocity = Vector::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        bodies.push(Body { handle, velocity });
    }

    for _ in 0..60 {
        for body in &mut bodies {
            let mut velocity = body.velocity;
            bvh.update_object(body.handle, |s| {
                s.center += velocity;
                for i in 0..3 {
                    if s.center[i].abs() > 30.0 {
                        velocity[i] = -velocity[i];
                    }
                }
            })
            .unwrap();
            body.velocity = velocity;
        }

        bvh.optimize().unwrap();
        bvh.assert_well_formed();

        let center = Point::new(
            rng.gen_range(-30.0..30.0),
            rng.gen_range(-30.0..30.0),
            rng.gen_range(-30.0..30.0),
        );
        let radius = rng.gen_range(1.0..15.0);
        assert_eq!(
            sphere_hits(&bvh, &center, radius),
            brute_force_sphere_hits(&bvh, &center, radius)
        );
    }

    assert_eq!(bvh.count(), 120);
    assert_eq!(bvh.leaf_count(), 120);
}

#[test]
fn optimize_keeps_ray_results() {
    let mut rng = StdRng::seed_from_u64(4);
    let spheres: Vec<_> = (0..100)
        .map(|_| {
            let center = Point::new(
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
            );
            Sphere::new(center, 1.0)
        })
        .collect();
    let mut bvh = SphereBvh::from_iter(spheres, BvhConfig::default().with_seed(99)).unwrap();
    let handles: Vec<_> = bvh.objects().copied().collect();

    for handle in &handles {
        let offset = Vector::new(rng.gen_range(-10.0..10.0), 0.0, 0.0);
        bvh.update_object(*handle, |s| s.center += offset).unwrap();
    }

    let ray = Ray::new(Point::new(-40.0, 0.5, 0.5), Vector::new(1.0, 0.05, 0.0));
    let ray_hits = |bvh: &SphereBvh| {
        let mut hits: Vec<_> = bvh
            .query_objects(|aabb| ray.intersects_aabb(aabb))
            .copied()
            .collect();
        hits.sort();
        hits
    };

    let before = ray_hits(&bvh);
    bvh.optimize().unwrap();
    bvh.assert_well_formed();

    // Rotations change the tree shape, never the objects found.
    assert_eq!(ray_hits(&bvh), before);
    assert_eq!(bvh.pending_refit_count(), 0);
}
