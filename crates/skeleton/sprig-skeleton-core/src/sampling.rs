//! Curve sampling: (keyframe set, time) -> value.
//!
//! Model:
//! - Keys are ordered by `time`, in frames.
//! - `[frame_count - 1, frame_count)` is the wrap segment: the last key
//!   (placed at `frame_count - 1`) blends into the first key (placed at
//!   `frame_count`). Times at or past `frame_count` wrap modulo the frame count.
//! - Before the first key the attribute default is held (step into the first key).
//! - Past the last key the last value is held.
//! - Only numeric pairs interpolate. Everything else steps (holds the left key).

use log::debug;

use crate::data::{CurveParams, Interpolation, Key};
use crate::interp::functions::{bezier, hermite, lerp_f32};
use crate::value::Value;

/// One resolved segment: the left/right sample positions and the left key's
/// interpolation settings.
#[derive(Debug, Clone, Copy)]
struct Segment<'a> {
    left_time: f32,
    left: &'a Value,
    right_time: f32,
    right: &'a Value,
    interpolation: Interpolation,
    curve: Option<&'a CurveParams>,
}

enum Pick<'a> {
    Hold(&'a Value),
    Pair(Segment<'a>),
}

/// Map a time into `[0, frame_count)` when it has run past the end.
#[inline]
fn wrap_time(time: f32, frame_count: f32) -> f32 {
    if frame_count <= 0.0 || time < frame_count {
        return time;
    }
    let m = time.rem_euclid(frame_count);
    if m >= frame_count {
        0.0
    } else {
        m
    }
}

fn pick<'a>(keys: &'a [Key], default: &'a Value, time: f32, frame_count: f32) -> Pick<'a> {
    let (first, last) = match (keys.first(), keys.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Pick::Hold(default),
    };

    let wrap_start = frame_count - 1.0;
    if frame_count >= 1.0 && time >= wrap_start && time < frame_count {
        return Pick::Pair(Segment {
            left_time: wrap_start,
            left: &last.value,
            right_time: frame_count,
            right: &first.value,
            interpolation: last.interpolation,
            curve: last.curve.as_ref(),
        });
    }

    if time < first.time {
        return Pick::Pair(Segment {
            left_time: 0.0,
            left: default,
            right_time: first.time,
            right: &first.value,
            interpolation: Interpolation::Step,
            curve: None,
        });
    }

    if time >= last.time {
        return Pick::Hold(&last.value);
    }

    // Linear scan; curves are short and sampled once per bone per tick.
    for pair in keys.windows(2) {
        let (l, r) = (&pair[0], &pair[1]);
        if time >= l.time && time < r.time {
            return Pick::Pair(Segment {
                left_time: l.time,
                left: &l.value,
                right_time: r.time,
                right: &r.value,
                interpolation: l.interpolation,
                curve: l.curve.as_ref(),
            });
        }
    }
    Pick::Hold(&last.value)
}

fn interpolate(seg: &Segment<'_>, time: f32) -> Value {
    let (a, b) = match (seg.left, seg.right) {
        (Value::Number(a), Value::Number(b)) => (*a, *b),
        _ => return seg.left.clone(),
    };
    let span = seg.right_time - seg.left_time;
    if span == 0.0 {
        return seg.left.clone();
    }
    let rate = (time - seg.left_time) / span;
    if rate <= 0.0 {
        return seg.left.clone();
    }
    if rate >= 1.0 {
        return seg.right.clone();
    }

    let params = seg.curve.copied().unwrap_or_default();
    let v = match seg.interpolation {
        Interpolation::Step => a,
        Interpolation::Linear => lerp_f32(a, b, rate),
        Interpolation::Bezier => bezier(seg.left_time, a, seg.right_time, b, rate, &params),
        Interpolation::Hermite => hermite(a, b, rate, params.start_value, params.end_value),
        Interpolation::Unknown => {
            debug!("unknown interpolation at frame {time}; holding left key");
            a
        }
    };
    Value::Number(v)
}

/// Sample a curve at `time` (frames) for an animation of `frame_count` frames.
///
/// `default` is the attribute's fixed default value, used before the first key
/// and for empty curves.
pub fn sample_curve(keys: &[Key], default: &Value, time: f32, frame_count: u32) -> Value {
    let frame_count = frame_count as f32;
    let time = wrap_time(time, frame_count);
    match pick(keys, default, time, frame_count) {
        Pick::Hold(v) => v.clone(),
        Pick::Pair(seg) => interpolate(&seg, time),
    }
}

/// Indices of the keys bracketing `time`: the last key at or before it and the
/// first key after it.
pub fn bracket(keys: &[Key], time: f32) -> (Option<usize>, Option<usize>) {
    let right = keys.iter().position(|k| k.time > time);
    let left = match right {
        Some(0) => None,
        Some(r) => Some(r - 1),
        None if keys.is_empty() => None,
        None => Some(keys.len() - 1),
    };
    (left, right)
}
