mod common;

use cgmath::{Matrix3, Matrix4, Rad, SquareMatrix, Transform as _, Vector3};

use common::{assert_mat4_close, assert_vec3_close};
use parallax_ngin::transform::Transform;

#[test]
fn should_default_to_identity() {
    let transform = Transform::new();
    assert_mat4_close(
        transform.model_matrix(),
        Matrix4::identity(),
        "default model matrix",
    );
    assert_vec3_close(transform.position(), Vector3::new(0.0, 0.0, 0.0), "position");
    assert_vec3_close(transform.scale(), Vector3::new(1.0, 1.0, 1.0), "scale");
}

#[test]
fn should_round_trip_components() {
    let mut transform = Transform::new();
    transform.set_position(Vector3::new(1.0, -2.0, 3.0));
    transform.set_rotation(Matrix3::from_angle_y(Rad(0.5)));
    transform.set_scale(Vector3::new(2.0, 3.0, 4.0));

    assert_vec3_close(transform.position(), Vector3::new(1.0, -2.0, 3.0), "position");
    assert_vec3_close(transform.scale(), Vector3::new(2.0, 3.0, 4.0), "scale");

    let rotation = transform.rotation();
    let expected = Matrix3::from_angle_y(Rad(0.5));
    assert_mat4_close(
        Matrix4::from(rotation),
        Matrix4::from(expected),
        "rotation block",
    );
}

#[test]
fn should_leave_other_components_untouched_on_set() {
    let mut transform = Transform::new();
    transform.set_position(Vector3::new(5.0, 6.0, 7.0));
    transform.set_scale(Vector3::new(2.0, 2.0, 2.0));
    transform.set_rotation(Matrix3::from_angle_z(Rad(1.0)));

    transform.set_position(Vector3::new(-1.0, 0.0, 1.0));
    assert_vec3_close(transform.scale(), Vector3::new(2.0, 2.0, 2.0), "scale");
    let expected = Matrix3::from_angle_z(Rad(1.0));
    assert_mat4_close(
        Matrix4::from(transform.rotation()),
        Matrix4::from(expected),
        "rotation after set_position",
    );
}

#[test]
fn should_compose_scale_then_rotation_then_translation() {
    let mut transform = Transform::new();
    transform.set_position(Vector3::new(10.0, 0.0, 0.0));
    transform.set_rotation(Matrix3::from_angle_z(Rad(std::f32::consts::FRAC_PI_2)));
    transform.set_scale(Vector3::new(2.0, 1.0, 1.0));

    // (1, 0, 0) scales to (2, 0, 0), rotates to (0, 2, 0), then translates.
    let moved = transform
        .model_matrix()
        .transform_point(cgmath::Point3::new(1.0, 0.0, 0.0));
    assert_vec3_close(
        Vector3::new(moved.x, moved.y, moved.z),
        Vector3::new(10.0, 2.0, 0.0),
        "composed point",
    );
}
