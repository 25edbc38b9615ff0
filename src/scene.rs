//! World state: the entity registry and the stereo camera rig.
//!
//! The [`Scene`] owns every renderable entity, grouped by [`EntityKind`]
//! (insertion order within a kind is draw order), and the two cameras of the
//! stereo rig. `update` advances the simulation in a single synchronous pass;
//! the exclusive borrow it takes rules out entity insertion or removal while
//! the pass is running.

use std::collections::BTreeMap;

use cgmath::{Matrix3, Rad, Vector3};

use crate::transform::Transform;

/// Identifies which eye a camera or render sub-pass belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Fixed render order: left eye first.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

/// Entity type tag, keying the per-kind mesh and material registered with
/// the graphics engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Cube,
}

/// A renderable object. Variants dispatch their own per-frame animation;
/// `Fixed` entities never move.
#[derive(Clone, Debug)]
pub enum Entity {
    Fixed(Transform),
    Cube(Cube),
}

impl Entity {
    pub fn transform(&self) -> &Transform {
        match self {
            Entity::Fixed(transform) => transform,
            Entity::Cube(cube) => &cube.transform,
        }
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        match self {
            Entity::Fixed(transform) => transform,
            Entity::Cube(cube) => &mut cube.transform,
        }
    }

    /// Advance the entity by `dt` seconds. `viewer` is the midpoint of the
    /// stereo rig, for behaviors that react to the viewer's position.
    pub fn update(&mut self, dt: f32, viewer: Vector3<f32>) {
        match self {
            Entity::Fixed(_) => {}
            Entity::Cube(cube) => cube.update(dt, viewer),
        }
    }
}

/// The beloved default cube: spins about Y and Z while orbiting the origin.
#[derive(Clone, Debug)]
pub struct Cube {
    pub(crate) transform: Transform,
    eulers: Vector3<f32>,
    t: f32,
}

impl Cube {
    /// Angular rate of the spin, one full turn every ten seconds.
    pub const OMEGA: f32 = std::f32::consts::TAU / 10.0;

    pub fn new(position: Vector3<f32>, eulers: Vector3<f32>) -> Self {
        let mut transform = Transform::new();
        transform.set_position(position);
        transform.set_rotation(euler_matrix(eulers));
        transform.set_scale(Vector3::new(1.0, 1.0, 1.0));
        Self {
            transform,
            eulers,
            t: 0.0,
        }
    }

    /// Current Euler angles, each wrapped into `[0, 2π)`.
    pub fn eulers(&self) -> Vector3<f32> {
        self.eulers
    }

    /// Accumulated orbit phase.
    pub fn orbit_phase(&self) -> f32 {
        self.t
    }

    fn update(&mut self, dt: f32, _viewer: Vector3<f32>) {
        const TAU: f32 = std::f32::consts::TAU;
        self.eulers.y = (self.eulers.y + Self::OMEGA * dt).rem_euclid(TAU);
        self.eulers.z = (self.eulers.z + Self::OMEGA * dt).rem_euclid(TAU);
        self.transform.set_rotation(euler_matrix(self.eulers));

        self.t += dt * 2.0;
        self.transform
            .set_position(Vector3::new(self.t.cos(), self.t.sin(), 0.0));
    }
}

/// Extrinsic x-y-z rotation about the fixed world axes.
fn euler_matrix(eulers: Vector3<f32>) -> Matrix3<f32> {
    Matrix3::from_angle_z(Rad(eulers.z))
        * Matrix3::from_angle_y(Rad(eulers.y))
        * Matrix3::from_angle_x(Rad(eulers.x))
}

/// The stereo camera pair, placed symmetrically about the interpupillary
/// distance on the rig's X axis, and the cached midpoint between the eyes.
#[derive(Clone, Debug)]
pub struct StereoRig {
    left: crate::camera::Camera,
    right: crate::camera::Camera,
    midpoint: Vector3<f32>,
}

impl StereoRig {
    pub fn new(ipd: f32, position: Vector3<f32>) -> Self {
        let mut left = crate::camera::Camera::new();
        let mut right = crate::camera::Camera::new();
        left.set_position(position + Vector3::new(-ipd / 2.0, 0.0, 0.0));
        right.set_position(position + Vector3::new(ipd / 2.0, 0.0, 0.0));
        let midpoint = (left.position() + right.position()) / 2.0;
        Self {
            left,
            right,
            midpoint,
        }
    }

    pub fn camera(&self, side: Side) -> &crate::camera::Camera {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn camera_mut(&mut self, side: Side) -> &mut crate::camera::Camera {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// The viewer position handed to entity updates.
    pub fn midpoint(&self) -> Vector3<f32> {
        self.midpoint
    }
}

/// Scene construction parameters.
#[derive(Clone, Copy, Debug)]
pub struct SceneConfig {
    /// Interpupillary distance in meters.
    pub ipd: f32,
    /// World position of the rig midpoint.
    pub rig_position: Vector3<f32>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ipd: 0.06,
            rig_position: Vector3::new(0.0, 0.0, 10.0),
        }
    }
}

/// Manages all objects and coordinates their interactions.
#[derive(Clone, Debug)]
pub struct Scene {
    entities: BTreeMap<EntityKind, Vec<Entity>>,
    rig: StereoRig,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            entities: BTreeMap::new(),
            rig: StereoRig::new(config.ipd, config.rig_position),
        }
    }

    /// Register an entity at the end of its kind's draw order.
    pub fn spawn(&mut self, kind: EntityKind, entity: Entity) {
        self.entities.entry(kind).or_default().push(entity);
    }

    pub fn entities(&self) -> &BTreeMap<EntityKind, Vec<Entity>> {
        &self.entities
    }

    pub fn rig(&self) -> &StereoRig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut StereoRig {
        &mut self.rig
    }

    /// Advance every entity by `dt` seconds, in registration order.
    pub fn update(&mut self, dt: f32) {
        let viewer = self.rig.midpoint();
        for entities in self.entities.values_mut() {
            for entity in entities.iter_mut() {
                entity.update(dt, viewer);
            }
        }
    }
}
