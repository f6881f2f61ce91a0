use crate::error::{Result, SceneError};

pub const MIN_PIXEL_RATIO: f64 = 1.0;
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Region the scene is mounted into: logical size plus the display's pixel density
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in logical pixels
    pub width: u32,
    /// Height in logical pixels
    pub height: u32,
    pub pixel_density: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, pixel_density: f64) -> Self {
        Self {
            width,
            height,
            pixel_density,
        }
    }

    /// Build from a window's physical size and scale factor
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self {
            width: (width as f64 / scale).round() as u32,
            height: (height as f64 / scale).round() as u32,
            pixel_density: scale,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Device pixel ratio clamped to `[1, 2]`
    pub fn pixel_ratio(&self) -> f64 {
        if self.pixel_density.is_finite() {
            self.pixel_density.clamp(MIN_PIXEL_RATIO, MAX_PIXEL_RATIO)
        } else {
            MIN_PIXEL_RATIO
        }
    }

    /// Framebuffer size in physical pixels, never below 1x1
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        let scale = |v: u32| ((v as f64 * ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
