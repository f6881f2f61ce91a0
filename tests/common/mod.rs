#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use hero_scene::camera::OrbitCamera;
use hero_scene::core::Viewport;
use hero_scene::frame::FrameInfo;
use hero_scene::{NodeTag, Rasterizer, Result, SceneError, SceneGraph, SceneOptions};

/// What the rasterizer saw when a frame was drawn
#[derive(Debug, Clone)]
pub struct DrawRecord {
    pub frame: FrameInfo,
    pub mesh: Vec3,
    pub wireframe: Vec3,
    pub particles: Vec3,
    pub rings: Vec3,
    pub camera_theta: f32,
}

#[derive(Debug, Default)]
pub struct RasterLog {
    pub uploads: usize,
    pub uploaded_geometries: usize,
    pub draws: Vec<DrawRecord>,
    pub resizes: Vec<Viewport>,
    pub releases: usize,
}

/// Rasterizer that records calls instead of touching a GPU
#[derive(Clone, Default)]
pub struct RecordingRasterizer {
    pub log: Rc<RefCell<RasterLog>>,
    pub fail_upload: bool,
}

impl RecordingRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_upload: true,
            ..Self::default()
        }
    }
}

impl Rasterizer for RecordingRasterizer {
    fn upload(&mut self, scene: &SceneGraph) -> Result<()> {
        let mut log = self.log.borrow_mut();
        log.uploads += 1;
        if self.fail_upload {
            return Err(SceneError::Allocation {
                what: "geometry buffer",
                reason: "device lost".to_string(),
            });
        }
        log.uploaded_geometries = scene.geometries().count();
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        self.log.borrow_mut().resizes.push(viewport);
    }

    fn draw(&mut self, scene: &SceneGraph, camera: &OrbitCamera, frame: &FrameInfo) -> Result<()> {
        let rotation = |tag| scene.rotation(tag).unwrap_or(Vec3::NAN);
        self.log.borrow_mut().draws.push(DrawRecord {
            frame: *frame,
            mesh: rotation(NodeTag::MainMesh),
            wireframe: rotation(NodeTag::WireframeOverlay),
            particles: rotation(NodeTag::Particles),
            rings: rotation(NodeTag::Rings),
            camera_theta: camera.theta(),
        });
        Ok(())
    }

    fn release(&mut self) {
        self.log.borrow_mut().releases += 1;
    }
}

pub fn seeded_options(seed: u64) -> SceneOptions {
    SceneOptions {
        particle_seed: Some(seed),
        ..SceneOptions::default()
    }
}

pub fn viewport() -> Viewport {
    Viewport::new(1280, 720, 1.0)
}
