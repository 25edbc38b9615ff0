mod common;

use cgmath::Vector3;

use common::{assert_angle_close, assert_vec3_close};
use parallax_ngin::scene::{Cube, Entity, EntityKind, Scene, SceneConfig, Side};
use parallax_ngin::transform::Transform;

#[test]
fn should_place_the_eyes_at_interpupillary_distance() {
    let scene = Scene::new(SceneConfig::default());
    let rig = scene.rig();

    assert_vec3_close(
        rig.camera(Side::Left).position(),
        Vector3::new(-0.03, 0.0, 10.0),
        "left eye",
    );
    assert_vec3_close(
        rig.camera(Side::Right).position(),
        Vector3::new(0.03, 0.0, 10.0),
        "right eye",
    );
    assert_vec3_close(rig.midpoint(), Vector3::new(0.0, 0.0, 10.0), "midpoint");
}

#[test]
fn should_respect_a_custom_rig_placement() {
    let scene = Scene::new(SceneConfig {
        ipd: 0.08,
        rig_position: Vector3::new(1.0, 2.0, 3.0),
    });
    let rig = scene.rig();

    assert_vec3_close(
        rig.camera(Side::Left).position(),
        Vector3::new(0.96, 2.0, 3.0),
        "left eye",
    );
    assert_vec3_close(
        rig.camera(Side::Right).position(),
        Vector3::new(1.04, 2.0, 3.0),
        "right eye",
    );
    assert_vec3_close(rig.midpoint(), Vector3::new(1.0, 2.0, 3.0), "midpoint");
}

#[test]
fn should_render_left_before_right() {
    assert_eq!(Side::BOTH, [Side::Left, Side::Right]);
}

#[test]
fn should_keep_spawn_order_within_a_kind() {
    let mut scene = Scene::new(SceneConfig::default());
    for x in 0..3 {
        let mut transform = Transform::new();
        transform.set_position(Vector3::new(x as f32, 0.0, 0.0));
        scene.spawn(EntityKind::Cube, Entity::Fixed(transform));
    }

    let cubes = &scene.entities()[&EntityKind::Cube];
    for (index, entity) in cubes.iter().enumerate() {
        assert_vec3_close(
            entity.transform().position(),
            Vector3::new(index as f32, 0.0, 0.0),
            "entity order",
        );
    }
}

#[test]
fn should_not_move_fixed_entities() {
    let mut scene = Scene::new(SceneConfig::default());
    let mut transform = Transform::new();
    transform.set_position(Vector3::new(5.0, 5.0, 5.0));
    scene.spawn(EntityKind::Cube, Entity::Fixed(transform));

    for _ in 0..100 {
        scene.update(1.0 / 60.0);
    }

    assert_vec3_close(
        scene.entities()[&EntityKind::Cube][0].transform().position(),
        Vector3::new(5.0, 5.0, 5.0),
        "fixed entity position",
    );
}

#[test]
fn should_orbit_the_cube_on_the_unit_circle() {
    let mut cube = Cube::new(Vector3::new(9.0, 9.0, 9.0), Vector3::new(0.0, 0.0, 0.0));
    let mut scene = Scene::new(SceneConfig::default());
    scene.spawn(EntityKind::Cube, Entity::Cube(cube.clone()));

    let dt = 1.0 / 60.0;
    let steps = 90;
    for _ in 0..steps {
        scene.update(dt);
    }

    // Orbit phase advances at twice real time.
    let t = 2.0 * steps as f32 * dt;
    assert_vec3_close(
        scene.entities()[&EntityKind::Cube][0].transform().position(),
        Vector3::new(t.cos(), t.sin(), 0.0),
        "orbit position",
    );

    // Same trajectory when stepped directly through the entity wrapper.
    let mut entity = Entity::Cube(cube.clone());
    for _ in 0..steps {
        entity.update(dt, Vector3::new(0.0, 0.0, 10.0));
    }
    assert_vec3_close(
        entity.transform().position(),
        Vector3::new(t.cos(), t.sin(), 0.0),
        "orbit position via entity",
    );

    cube = match entity {
        Entity::Cube(cube) => cube,
        Entity::Fixed(_) => unreachable!(),
    };
    assert_angle_close(cube.orbit_phase(), t, "orbit phase");
}

#[test]
fn should_wrap_spin_angles_over_a_long_run() {
    const TAU: f32 = std::f32::consts::TAU;

    let mut entity = Entity::Cube(Cube::new(
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, 0.0),
    ));

    // Ten simulated seconds at 60 steps per second is exactly one full turn
    // of the spin, landing on the wrap point.
    let dt = 1.0 / 60.0;
    let steps = 600;
    for _ in 0..steps {
        entity.update(dt, Vector3::new(0.0, 0.0, 10.0));
    }

    // Ten seconds of orbit at double speed lands at phase 20.
    let t = 2.0 * steps as f32 * dt;
    let position = entity.transform().position();
    let expected_position = Vector3::new(t.cos(), t.sin(), 0.0);
    for (axis, expectation) in [
        (position.x, expected_position.x),
        (position.y, expected_position.y),
        (position.z, expected_position.z),
    ] {
        // The phase accumulates over 600 float additions, so the tolerance
        // is looser than the pointwise epsilon.
        assert!(
            (axis - expectation).abs() < 1e-3,
            "orbit position after {} steps: expected {:?}, got {:?}",
            steps,
            expected_position,
            position
        );
    }

    let cube = match entity {
        Entity::Cube(cube) => cube,
        Entity::Fixed(_) => unreachable!(),
    };
    let expected = (Cube::OMEGA * steps as f32 * dt).rem_euclid(TAU);
    assert_angle_close(cube.eulers().y, expected, "spin about y");
    assert_angle_close(cube.eulers().z, expected, "spin about z");
    assert_angle_close(cube.eulers().x, 0.0, "no spin about x");

    // The wrapped angles stay inside [0, 2pi).
    assert!(cube.eulers().y >= 0.0 && cube.eulers().y < TAU);
    assert!(cube.eulers().z >= 0.0 && cube.eulers().z < TAU);
}

#[test]
fn should_hand_the_rig_midpoint_to_entity_updates() {
    // The midpoint is derived from the eye positions, not stored twice.
    let scene = Scene::new(SceneConfig {
        ipd: 0.06,
        rig_position: Vector3::new(0.0, 1.5, 10.0),
    });
    let rig = scene.rig();
    let derived = (rig.camera(Side::Left).position() + rig.camera(Side::Right).position()) / 2.0;
    assert_vec3_close(rig.midpoint(), derived, "midpoint derivation");
}
