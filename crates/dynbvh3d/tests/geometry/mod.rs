mod shape_bvh;
mod sphere_bvh_motion;
