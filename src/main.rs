use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window as WinitWindow, WindowId},
};

use hero_scene::background::HeroBackground;
use hero_scene::cli::Cli;
use hero_scene::config::AppConfig;
use hero_scene::core::{FpsCounter, GpuContext, PointerTracker};
use hero_scene::renderer::WgpuRasterizer;
use hero_scene::window::Window;

// === Application ===

struct App {
    config: AppConfig,
    no_ui: bool,
    window: Option<Window>,
    background: Option<HeroBackground<WgpuRasterizer>>,
    pointer: PointerTracker,
    fps: FpsCounter,
}

impl App {
    fn new(config: AppConfig, no_ui: bool) -> Self {
        let fps = FpsCounter::new(config.fps_log_interval);
        Self {
            config,
            no_ui,
            window: None,
            background: None,
            pointer: PointerTracker::new(),
            fps,
        }
    }

    fn mount(&self, window: &Window) -> hero_scene::Result<HeroBackground<WgpuRasterizer>> {
        let viewport = window.viewport();
        let (gpu, surface) = pollster::block_on(GpuContext::with_window(window.inner().clone()))?;
        let rasterizer =
            WgpuRasterizer::new(gpu, surface, viewport, self.config.scene.clear_color)?;
        HeroBackground::mount(viewport, rasterizer, self.config.scene.clone())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(background) = &mut self.background {
            background.dispose();
        }
        self.background = None;
        event_loop.exit();
    }

    fn redraw(&mut self) {
        let Some(background) = &mut self.background else {
            return;
        };
        match background.frame() {
            Ok(Some(frame)) => {
                if let Some(fps) = self.fps.frame(frame.delta) {
                    if !self.no_ui {
                        log::info!("FPS: {:.1}", fps);
                    }
                }
            }
            Ok(None) => {}
            Err(e) => log::error!("Frame failed: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WinitWindow::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(w) => Window::new(Arc::new(w)),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match self.mount(&window) {
            Ok(background) => self.background = Some(background),
            Err(e) => {
                log::error!("Failed to mount hero scene: {}", e);
                event_loop.exit();
                return;
            }
        }
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(pointer), Some(window), Some(background)) = (
            self.pointer.process_event(&event),
            &self.window,
            &mut self.background,
        ) {
            background.pointer(pointer.to_logical(window.scale_factor()));
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.shutdown(event_loop),
            WindowEvent::Resized(_) => {
                if let (Some(window), Some(background)) = (&self.window, &mut self.background) {
                    background.resize(window.viewport());
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.resolve().context("failed to load configuration")?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, cli.no_ui);

    log::info!("Hero scene - drag to orbit, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
