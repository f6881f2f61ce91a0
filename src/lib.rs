pub mod animation;
pub mod background;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod math;
pub mod particles;
pub mod renderer;
pub mod scene;
pub mod types;
pub mod window;

pub use animation::{pose_at, AnimationDriver};
pub use background::HeroBackground;
pub use camera::OrbitCamera;
pub use config::{AppConfig, SceneOptions};
pub use error::{Result, SceneError};
pub use renderer::{Rasterizer, WgpuRasterizer};
pub use scene::{build_hero_scene, NodeTag, SceneGraph};
