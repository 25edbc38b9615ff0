#![allow(dead_code)]

use cgmath::{Matrix4, Vector3};

pub const EPSILON: f32 = 1e-5;

pub fn assert_close(actual: f32, expected: f32, what: &str) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}

pub fn assert_vec3_close(actual: Vector3<f32>, expected: Vector3<f32>, what: &str) {
    for (axis, (a, e)) in [
        (actual.x, expected.x),
        (actual.y, expected.y),
        (actual.z, expected.z),
    ]
    .into_iter()
    .enumerate()
    {
        assert!(
            (a - e).abs() < EPSILON,
            "{} (axis {}): expected {:?}, got {:?}",
            what,
            axis,
            expected,
            actual
        );
    }
}

pub fn assert_mat4_close(actual: Matrix4<f32>, expected: Matrix4<f32>, what: &str) {
    let actual: [[f32; 4]; 4] = actual.into();
    let expected: [[f32; 4]; 4] = expected.into();
    for col in 0..4 {
        for row in 0..4 {
            assert!(
                (actual[col][row] - expected[col][row]).abs() < EPSILON,
                "{} (col {}, row {}): expected {}, got {}",
                what,
                col,
                row,
                expected[col][row],
                actual[col][row]
            );
        }
    }
}

/// Compare two angles on the circle, so values straddling the wrap point
/// still count as equal.
pub fn assert_angle_close(actual: f32, expected: f32, what: &str) {
    const TAU: f32 = std::f32::consts::TAU;
    let mut difference = (actual - expected).rem_euclid(TAU);
    if difference > TAU / 2.0 {
        difference = TAU - difference;
    }
    // Accumulated steps magnify float error a little past the pointwise
    // epsilon.
    assert!(
        difference < 1e-3,
        "{}: expected angle {}, got {}",
        what,
        expected,
        actual
    );
}
