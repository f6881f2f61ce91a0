use std::sync::Arc;

use wgpu::{Adapter, Device, DeviceDescriptor, Instance, Queue, Surface};
use winit::window::Window;

use crate::error::{Result, SceneError};

/// Shared GPU context for the scene renderer
///
/// Device and queue are behind `Arc` so they can be cloned cheaply into helpers.
#[derive(Clone)]
pub struct GpuContext {
    adapter: Arc<Adapter>,
    device: Arc<Device>,
    queue: Arc<Queue>,
}

impl GpuContext {
    /// Create a window surface and a context whose adapter can present to it
    pub async fn with_window(window: Arc<Window>) -> Result<(Self, Surface<'static>)> {
        let instance = Self::instance();
        let surface = instance
            .create_surface(window)
            .map_err(|e| SceneError::ContextUnavailable(format!("surface creation failed: {}", e)))?;

        let adapter = Self::request_adapter(&instance, Some(&surface)).await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        let info = adapter.get_info();
        log::info!("Using adapter: {} ({:?})", info.name, info.backend);

        Ok((
            Self {
                adapter: Arc::new(adapter),
                device: Arc::new(device),
                queue: Arc::new(queue),
            },
            surface,
        ))
    }

    /// Get reference to the adapter
    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Get reference to the device
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Get reference to the queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    fn instance() -> Instance {
        Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        })
    }

    async fn request_adapter(instance: &Instance, surface: Option<&Surface<'_>>) -> Result<Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: surface,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| SceneError::ContextUnavailable(format!("no suitable adapter: {:?}", e)))
    }

    async fn request_device(adapter: &Adapter) -> Result<(Device, Queue)> {
        let limits = wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits());

        adapter
            .request_device(&DeviceDescriptor {
                label: Some("Hero Scene Device"),
                required_features: wgpu::Features::empty(),
                required_limits: limits,
                memory_hints: wgpu::MemoryHints::Performance,
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| SceneError::ContextUnavailable(format!("device request failed: {:?}", e)))
    }
}
