//! Mounted hero background: scene, camera, clock and render loop behind one handle

use crate::animation::AnimationDriver;
use crate::camera::OrbitCamera;
use crate::config::SceneOptions;
use crate::core::{CancelHandle, Clock, FrameTask, PointerEvent, Viewport};
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::renderer::Rasterizer;
use crate::scene::{build_hero_scene, SceneGraph};

/// One live instance of the background scene
///
/// Created by [`HeroBackground::mount`], which builds every geometry and uploads it once.
/// Each call to [`frame`](HeroBackground::frame) animates every node and draws the
/// result before returning. [`dispose`](HeroBackground::dispose) stops the loop and
/// releases GPU buffers; dropping the handle disposes too.
pub struct HeroBackground<R: Rasterizer> {
    viewport: Viewport,
    scene: SceneGraph,
    camera: OrbitCamera,
    driver: AnimationDriver,
    task: FrameTask,
    clock: Clock,
    last_frame: Option<FrameInfo>,
    rasterizer: R,
    released: bool,
}

impl<R: Rasterizer> HeroBackground<R> {
    /// Build the scene and upload it through `rasterizer`
    ///
    /// Any allocation failure is returned as-is after releasing whatever was uploaded;
    /// there is no retry.
    pub fn mount(viewport: Viewport, mut rasterizer: R, options: SceneOptions) -> Result<Self> {
        viewport.validate()?;

        let mut scene = build_hero_scene(&options);
        let mut driver = AnimationDriver::new();
        driver.apply(&mut scene, 0.0);

        if let Err(e) = rasterizer.upload(&scene) {
            log::error!("Scene upload failed: {}", e);
            rasterizer.release();
            return Err(e);
        }

        let camera = OrbitCamera::with_lens(scene.lens(), options.orbit);
        let (width, height) = viewport.framebuffer_size();
        log::info!(
            "Hero background mounted at {}x{} (framebuffer {}x{})",
            viewport.width,
            viewport.height,
            width,
            height
        );

        Ok(Self {
            viewport,
            scene,
            camera,
            driver,
            task: FrameTask::new(),
            clock: Clock::new(),
            last_frame: None,
            rasterizer,
            released: false,
        })
    }

    /// Run one frame at the clock's current time
    ///
    /// Returns `None` without touching the scene once the loop is cancelled.
    pub fn frame(&mut self) -> Result<Option<FrameInfo>> {
        let (time, delta) = self.clock.tick();
        self.run_frame(time, delta)
    }

    /// Run one frame at an explicit elapsed time
    pub fn frame_at(&mut self, time: f32) -> Result<Option<FrameInfo>> {
        let delta = self
            .last_frame
            .map_or(0.0, |last| (time - last.time).max(0.0));
        self.run_frame(time, delta)
    }

    fn run_frame(&mut self, time: f32, delta: f32) -> Result<Option<FrameInfo>> {
        let info = FrameInfo::new(self.task.runs(), time, delta);
        let Self {
            task,
            scene,
            camera,
            driver,
            rasterizer,
            ..
        } = self;

        let drawn = task
            .fire(time, |t| {
                driver.apply(scene, t);
                camera.update(delta);
                rasterizer.draw(scene, camera, &info)
            })
            .transpose()?;

        Ok(drawn.map(|()| {
            self.last_frame = Some(info);
            info
        }))
    }

    /// Follow a new viewport; empty viewports are ignored and the last size is kept
    pub fn resize(&mut self, viewport: Viewport) {
        if self.released {
            return;
        }
        if viewport.is_empty() {
            log::debug!("Ignoring empty viewport {}x{}", viewport.width, viewport.height);
            return;
        }
        self.viewport = viewport;
        self.rasterizer.resize(viewport);
    }

    /// Feed a pointer event to the orbit camera; coordinates are logical pixels
    pub fn pointer(&mut self, event: PointerEvent) {
        if self.released {
            return;
        }
        match event {
            PointerEvent::Pressed { x, y } => self.camera.begin_drag(x, y),
            PointerEvent::Moved { x, y } => {
                self.camera.drag_to(x, y, self.viewport.height as f32)
            }
            PointerEvent::Released => self.camera.end_drag(),
        }
    }

    /// Cancel the loop and release GPU buffers; safe to call any number of times
    pub fn dispose(&mut self) {
        self.task.cancel();
        if !self.released {
            self.released = true;
            self.rasterizer.release();
            log::info!("Hero background disposed after {} frames", self.task.runs());
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.released
    }

    /// Handle that stops the loop from elsewhere, e.g. another thread
    pub fn cancel_handle(&self) -> CancelHandle {
        self.task.handle()
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Frames actually run so far
    pub fn frames(&self) -> u64 {
        self.task.runs()
    }
}

impl<R: Rasterizer> Drop for HeroBackground<R> {
    fn drop(&mut self) {
        self.dispose();
    }
}
