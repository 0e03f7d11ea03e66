use crate::math::{Point, Real, DEFAULT_EPSILON};

/// Parameters `(s, t)` of the closest points between the segments `[p0, p1]` and `[q0, q1]`.
///
/// The closest points are `p0 + (p1 - p0) * s` and `q0 + (q1 - q0) * t`, with `s` and `t` in
/// `[0, 1]`. Degenerate segments (reduced to a point) are supported on either side.
#[inline]
pub fn closest_points_segment_segment(
    p0: &Point<Real>,
    p1: &Point<Real>,
    q0: &Point<Real>,
    q1: &Point<Real>,
) -> (Real, Real) {
    // Inspired by Real-time collision detection by Christer Ericson.
    let d1 = p1 - p0;
    let d2 = q1 - q0;
    let r = p0 - q0;

    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let mut s;
    let mut t;

    let eps = DEFAULT_EPSILON;
    if a <= eps && e <= eps {
        s = 0.0;
        t = 0.0;
    } else if a <= eps {
        s = 0.0;
        t = na::clamp(f / e, 0.0, 1.0);
    } else {
        let c = d1.dot(&r);
        if e <= eps {
            t = 0.0;
            s = na::clamp(-c / a, 0.0, 1.0);
        } else {
            let b = d1.dot(&d2);
            let ae = a * e;
            let bb = b * b;
            let denom = ae - bb;

            // Use absolute and ulps error to test collinearity.
            if denom > eps && !ulps_eq!(ae, bb) {
                s = na::clamp((b * f - c * e) / denom, 0.0, 1.0);
            } else {
                s = 0.0;
            }

            t = (b * s + f) / e;

            if t < 0.0 {
                t = 0.0;
                s = na::clamp(-c / a, 0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = na::clamp((b - c) / a, 0.0, 1.0);
            }
        }
    }

    (s, t)
}

/// Squared distance between the segments `[p0, p1]` and `[q0, q1]`.
#[inline]
pub fn segment_segment_distance_squared(
    p0: &Point<Real>,
    p1: &Point<Real>,
    q0: &Point<Real>,
    q1: &Point<Real>,
) -> Real {
    let (s, t) = closest_points_segment_segment(p0, p1, q0, q1);
    let closest1 = p0 + (p1 - p0) * s;
    let closest2 = q0 + (q1 - q0) * t;
    na::distance_squared(&closest1, &closest2)
}
