//! Scalar interpolation helpers:
//! - lerp_f32 (straight parametric blend)
//! - bezier (cubic Bezier over (time, value) control points)
//! - hermite (cubic Hermite with explicit tangents)

use crate::data::CurveParams;

/// Bisection steps used to invert the Bezier time component. Eight halvings
/// of a segment keep the error well under one frame at 30 fps.
pub const BEZIER_BISECTION_STEPS: usize = 8;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Bezier segment between `(t0, v0)` and `(t1, v1)` evaluated at `rate` in
/// [0,1] of the segment's time span.
///
/// The curve parameter whose time component matches the target time is found
/// by bisection, then the value component is evaluated at that parameter.
pub fn bezier(t0: f32, v0: f32, t1: f32, v1: f32, rate: f32, c: &CurveParams) -> f32 {
    let target = t0 + (t1 - t0) * rate;
    let (x0, x1, x2, x3) = (t0, t0 + c.start_time, t1 + c.end_time, t1);

    let mut param = 0.5f32;
    let mut range = 0.5f32;
    for _ in 0..BEZIER_BISECTION_STEPS {
        let x = cubic_bezier(x0, x1, x2, x3, param);
        range *= 0.5;
        if x > target {
            param -= range;
        } else {
            param += range;
        }
    }
    cubic_bezier(v0, v0 + c.start_value, v1 + c.end_value, v1, param)
}

/// Cubic Hermite between `v0` and `v1` with outgoing tangent `m0` and
/// incoming tangent `m1`.
#[inline]
pub fn hermite(v0: f32, v1: f32, rate: f32, m0: f32, m1: f32) -> f32 {
    let t2 = rate * rate;
    let t3 = t2 * rate;
    (2.0 * t3 - 3.0 * t2 + 1.0) * v0
        + (-2.0 * t3 + 3.0 * t2) * v1
        + (t3 - 2.0 * t2 + rate) * m0
        + (t3 - t2) * m1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp_f32(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp_f32(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp_f32(2.0, 6.0, 0.25), 3.0);
    }

    #[test]
    fn straight_bezier_tracks_linear() {
        // Control points on the chord: the curve is the straight line.
        let c = CurveParams {
            start_time: 10.0 / 3.0,
            start_value: 10.0 / 3.0,
            end_time: -10.0 / 3.0,
            end_value: -10.0 / 3.0,
        };
        for i in 1..10 {
            let rate = i as f32 / 10.0;
            let v = bezier(0.0, 0.0, 10.0, 10.0, rate, &c);
            assert!((v - rate * 10.0).abs() < 0.1, "rate={rate} v={v}");
        }
    }

    #[test]
    fn ease_in_bezier_lags_linear_early() {
        let c = CurveParams {
            start_time: 5.0,
            start_value: 0.0,
            end_time: 0.0,
            end_value: 0.0,
        };
        let v = bezier(0.0, 0.0, 10.0, 1.0, 0.25, &c);
        assert!(v < 0.25);
        assert!(v >= 0.0);
    }

    #[test]
    fn hermite_zero_tangents_is_smoothstep() {
        assert_eq!(hermite(0.0, 1.0, 0.0, 0.0, 0.0), 0.0);
        assert_eq!(hermite(0.0, 1.0, 1.0, 0.0, 0.0), 1.0);
        assert!((hermite(0.0, 1.0, 0.5, 0.0, 0.0) - 0.5).abs() < 1e-6);
        assert!(hermite(0.0, 1.0, 0.25, 0.0, 0.0) < 0.25);
    }
}
