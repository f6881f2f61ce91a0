use std::path::Path;

use serde::Deserialize;

use crate::camera::OrbitSettings;
use crate::error::{Result, SceneError};

/// Everything configurable about one mounted scene
///
/// Geometry, animation rates and materials are fixed; only the host-facing knobs live here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
    /// Fixed seed for particles and stars; `None` draws from the thread RNG
    pub particle_seed: Option<u64>,
    pub stars: bool,
    /// Linear rgba clear colour
    pub clear_color: [f64; 4],
    pub orbit: OrbitSettings,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            particle_seed: None,
            stars: true,
            // #0A0A0A in linear space
            clear_color: [0.003, 0.003, 0.003, 1.0],
            orbit: OrbitSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Hero Scene".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub scene: SceneOptions,
    /// Seconds between FPS log lines
    pub fps_log_interval: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            scene: SceneOptions::default(),
            fps_log_interval: 1.0,
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: AppConfig =
            serde_json::from_str(text).map_err(|e| SceneError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SceneError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(SceneError::InvalidViewport {
                width: self.window.width,
                height: self.window.height,
            });
        }
        if !(self.fps_log_interval > 0.0) {
            return Err(SceneError::Config(format!(
                "fps_log_interval must be positive, got {}",
                self.fps_log_interval
            )));
        }
        if self.scene.clear_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(SceneError::Config("clear_color channels must be in [0, 1]".into()));
        }
        Ok(())
    }
}
