//! Demo: one spinning cube, viewed side by side.

use cgmath::Vector3;

use parallax_ngin::{
    app,
    engine::{AssetBundle, MeshSource},
    scene::{Cube, Entity, EntityKind, Scene, SceneConfig},
};

const CHECKER_SIZE: u32 = 256;
const CHECKER_CELL: u32 = 32;

fn checkerboard() -> image::RgbaImage {
    image::RgbaImage::from_fn(CHECKER_SIZE, CHECKER_SIZE, |x, y| {
        if ((x / CHECKER_CELL) + (y / CHECKER_CELL)) % 2 == 0 {
            image::Rgba([230, 230, 230, 255])
        } else {
            image::Rgba([40, 40, 120, 255])
        }
    })
}

fn main() -> anyhow::Result<()> {
    let mut scene = Scene::new(SceneConfig::default());
    scene.spawn(
        EntityKind::Cube,
        Entity::Cube(Cube::new(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
        )),
    );

    let assets = AssetBundle {
        meshes: vec![(
            EntityKind::Cube,
            MeshSource::ObjText(include_str!("../assets/models/cube.obj").to_string()),
        )],
        materials: vec![(EntityKind::Cube, checkerboard())],
    };

    app::run(scene, assets)
}
