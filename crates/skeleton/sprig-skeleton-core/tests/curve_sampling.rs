use approx::assert_abs_diff_eq;
use sprig_skeleton_core::{
    attribute::Attribute,
    data::{CurveParams, Interpolation, Key},
    sampling::sample_curve,
    value::Value,
};

fn num(keys: &[(f32, f32)]) -> Vec<Key> {
    keys.iter().map(|&(t, v)| Key::number(t, v)).collect()
}

fn sample(keys: &[Key], attr: Attribute, t: f32, fc: u32) -> f32 {
    sample_curve(keys, &attr.default_value(), t, fc)
        .as_number()
        .expect("numeric sample")
}

#[test]
fn first_key_and_default_before_it() {
    let keys = num(&[(5.0, 2.0), (10.0, 4.0)]);
    assert_eq!(sample(&keys, Attribute::PositionX, 5.0, 30), 2.0);
    // Step from the default into the first key.
    assert_eq!(sample(&keys, Attribute::PositionX, 4.9, 30), 0.0);
    assert_eq!(sample(&keys, Attribute::ScaleX, 2.0, 30), 1.0);
    assert_abs_diff_eq!(sample(&keys, Attribute::PositionX, 7.5, 30), 3.0, epsilon = 1e-6);
}

#[test]
fn holds_last_value_past_the_last_key() {
    let keys = num(&[(0.0, 1.0), (10.0, 5.0)]);
    assert_eq!(sample(&keys, Attribute::PositionY, 10.0, 30), 5.0);
    assert_eq!(sample(&keys, Attribute::PositionY, 20.0, 30), 5.0);
}

#[test]
fn wrap_segment_blends_last_into_first() {
    let keys = num(&[(0.0, 1.0), (10.0, 5.0), (29.0, 3.0)]);
    let at_zero = sample(&keys, Attribute::Rotation, 0.0, 30);
    let at_end = sample(&keys, Attribute::Rotation, 30.0, 30);
    assert_eq!(at_zero, at_end);
    assert_abs_diff_eq!(sample(&keys, Attribute::Rotation, 29.5, 30), 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(
        sample(&keys, Attribute::Rotation, 65.0, 30),
        sample(&keys, Attribute::Rotation, 5.0, 30),
        epsilon = 1e-6
    );
}

#[test]
fn non_numeric_values_step() {
    let keys = vec![
        Key::new(0.0, Value::Bool(false), Interpolation::Linear),
        Key::new(10.0, Value::Bool(true), Interpolation::Linear),
    ];
    let default = Attribute::Hide.default_value();
    assert_eq!(sample_curve(&keys, &default, 9.9, 30), Value::Bool(false));
    assert_eq!(sample_curve(&keys, &default, 10.0, 30), Value::Bool(true));
}

#[test]
fn unknown_interpolation_holds_left_value() {
    let keys = vec![
        Key::new(0.0, Value::Number(1.0), Interpolation::Unknown),
        Key::number(10.0, 5.0),
    ];
    assert_eq!(sample(&keys, Attribute::Alpha, 5.0, 30), 1.0);
}

#[test]
fn step_interpolation_holds_until_next_key() {
    let keys = vec![
        Key::new(0.0, Value::Number(1.0), Interpolation::Step),
        Key::number(10.0, 5.0),
    ];
    assert_eq!(sample(&keys, Attribute::Alpha, 9.99, 30), 1.0);
    assert_eq!(sample(&keys, Attribute::Alpha, 10.0, 30), 5.0);
}

#[test]
fn hermite_with_flat_tangents_is_smoothstep() {
    let keys = vec![
        Key::new(0.0, Value::Number(0.0), Interpolation::Hermite)
            .with_curve(CurveParams::default()),
        Key::number(8.0, 10.0),
    ];
    assert_abs_diff_eq!(sample(&keys, Attribute::PositionX, 4.0, 30), 5.0, epsilon = 1e-5);
    assert_abs_diff_eq!(sample(&keys, Attribute::PositionX, 2.0, 30), 1.5625, epsilon = 1e-5);
}

#[test]
fn bezier_with_endpoint_controls_follows_the_chord() {
    // Both control points sit on the endpoints, so time and value share the
    // same polynomial and the curve is the straight chord.
    let keys = vec![
        Key::new(0.0, Value::Number(0.0), Interpolation::Bezier).with_curve(CurveParams::default()),
        Key::number(10.0, 10.0),
    ];
    for t in [1.0f32, 2.5, 5.0, 7.5, 9.0] {
        assert_abs_diff_eq!(sample(&keys, Attribute::PositionX, t, 30), t, epsilon = 0.1);
    }
}

#[test]
fn empty_curve_yields_default() {
    let v = sample_curve(&[], &Attribute::ScaleY.default_value(), 3.0, 30);
    assert_eq!(v, Value::Number(1.0));
}
