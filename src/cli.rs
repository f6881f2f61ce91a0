// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;
use crate::error::Result;

#[derive(Parser, Debug, Clone)]
#[command(name = "hero-scene")]
#[command(about = "Animated 3D hero background", long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Window width in logical pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height in logical pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Fixed seed for particles and stars
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable the star backdrop
    #[arg(long = "no-stars", default_value = "false")]
    pub no_stars: bool,

    /// Disable FPS console output
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

impl Cli {
    /// Load the config file if one was given, then apply flag overrides
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if let Some(seed) = self.seed {
            config.scene.particle_seed = Some(seed);
        }
        if self.no_stars {
            config.scene.stars = false;
        }
    }
}
