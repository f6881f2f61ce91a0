//! Rasterization of a [`SceneGraph`]
//!
//! The [`Rasterizer`] trait is the seam between the scene lifecycle and the GPU. Turning
//! the graph into an ordered list of draws is plain data work and lives here so it can
//! run without a device.

mod wgpu_rasterizer;

use glam::{Mat4, Vec3};

use crate::camera::OrbitCamera;
use crate::core::Viewport;
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::scene::{GeometryId, Light, NodeKind, NodeTag, PointStyle, SceneGraph};
use crate::types::{LightsUniform, ModelUniform};

pub use wgpu_rasterizer::WgpuRasterizer;

/// Draws one mounted scene into a framebuffer
pub trait Rasterizer {
    /// Allocate GPU buffers for every geometry in the scene
    fn upload(&mut self, scene: &SceneGraph) -> Result<()>;

    /// Match the framebuffer to a new viewport; geometry is untouched
    fn resize(&mut self, viewport: Viewport);

    /// Render one frame from the current node transforms
    fn draw(&mut self, scene: &SceneGraph, camera: &OrbitCamera, frame: &FrameInfo) -> Result<()>;

    /// Destroy every buffer; later calls do nothing
    fn release(&mut self);
}

/// Render passes in the order they are recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pass {
    Opaque,
    Translucent,
    Lines,
    Points,
}

#[derive(Debug, Clone, Copy)]
pub struct DrawItem {
    pub tag: NodeTag,
    pub pass: Pass,
    pub geometry: GeometryId,
    pub uniform: ModelUniform,
}

/// Flatten the graph into draws sorted by pass, tree order kept within a pass
pub fn draw_list(scene: &SceneGraph) -> Vec<DrawItem> {
    let mut items = Vec::new();
    scene.visit(|node, world| {
        if let Some((pass, geometry, uniform)) = model_uniform(&node.kind, world) {
            items.push(DrawItem {
                tag: node.tag,
                pass,
                geometry,
                uniform,
            });
        }
    });
    items.sort_by_key(|item| item.pass);
    items
}

fn model_uniform(kind: &NodeKind, world: Mat4) -> Option<(Pass, GeometryId, ModelUniform)> {
    match kind {
        NodeKind::Mesh { geometry, material } => {
            let [r, g, b] = material.color;
            let [er, eg, eb] = material.emissive;
            Some((
                Pass::Opaque,
                *geometry,
                ModelUniform::new(
                    world,
                    [r, g, b, 1.0],
                    [er, eg, eb, material.emissive_intensity],
                    [material.metalness, material.roughness, 0.0, 0.0],
                ),
            ))
        }
        NodeKind::Translucent { geometry, material } | NodeKind::Wireframe { geometry, material } => {
            let pass = match kind {
                NodeKind::Wireframe { .. } => Pass::Lines,
                _ => Pass::Translucent,
            };
            let [r, g, b] = material.color;
            Some((
                pass,
                *geometry,
                ModelUniform::new(world, [r, g, b, material.opacity], [0.0; 4], [0.0; 4]),
            ))
        }
        NodeKind::Points { geometry, material } => {
            let [r, g, b] = material.color;
            let (mode, phase) = match material.style {
                PointStyle::Attenuated => (0.0, 0.0),
                PointStyle::Twinkle { phase } => (1.0, phase),
            };
            Some((
                Pass::Points,
                *geometry,
                ModelUniform::new(world, [r, g, b, material.opacity], [0.0; 4], [0.0, 0.0, mode, phase]),
            ))
        }
        NodeKind::Group(_) | NodeKind::Light(_) | NodeKind::Camera(_) => None,
    }
}

/// Pack the scene's lights into the fixed light block
///
/// Extra lights beyond one ambient, two points and one spot are ignored.
pub fn lights_uniform(lights: &[Light]) -> LightsUniform {
    let mut uniform = LightsUniform::default();
    let mut points = 0;

    for light in lights {
        match *light {
            Light::Ambient { color, intensity } => {
                uniform.ambient = [color[0], color[1], color[2], intensity];
            }
            Light::Point {
                position,
                color,
                intensity,
            } if points < 2 => {
                uniform.point_positions[points] = position.extend(intensity).to_array();
                uniform.point_colors[points] = [color[0], color[1], color[2], 0.0];
                points += 1;
            }
            Light::Point { .. } => {
                log::debug!("Ignoring point light beyond the second");
            }
            Light::Spot {
                position,
                target,
                angle,
                penumbra,
                color,
                intensity,
            } => {
                let direction = (target - position).try_normalize().unwrap_or(Vec3::NEG_Y);
                uniform.spot_position = position.extend(intensity).to_array();
                uniform.spot_direction = direction.extend(angle.cos()).to_array();
                uniform.spot_color = [color[0], color[1], color[2], penumbra];
            }
        }
    }
    uniform
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneOptions;
    use crate::scene::build_hero_scene;

    fn scene() -> SceneGraph {
        build_hero_scene(&SceneOptions {
            particle_seed: Some(3),
            ..SceneOptions::default()
        })
    }

    #[test]
    fn test_draw_order_by_pass() {
        let items = draw_list(&scene());
        let passes: Vec<Pass> = items.iter().map(|i| i.pass).collect();
        let mut sorted = passes.clone();
        sorted.sort();
        assert_eq!(passes, sorted);
        assert_eq!(items.first().map(|i| i.tag), Some(NodeTag::MainMesh));
    }

    #[test]
    fn test_every_renderable_node_drawn_once() {
        let items = draw_list(&scene());
        let tags: Vec<NodeTag> = items.iter().map(|i| i.tag).collect();
        assert_eq!(
            tags,
            vec![
                NodeTag::MainMesh,
                NodeTag::InnerGlow,
                NodeTag::OuterRing,
                NodeTag::MiddleRing,
                NodeTag::InnerRing,
                NodeTag::WireframeOverlay,
                NodeTag::Particles,
                NodeTag::Stars,
            ]
        );
    }

    #[test]
    fn test_wireframe_draws_core_geometry_scaled() {
        let items = draw_list(&scene());
        let mesh = items.iter().find(|i| i.tag == NodeTag::MainMesh).unwrap();
        let wire = items.iter().find(|i| i.tag == NodeTag::WireframeOverlay).unwrap();
        assert_eq!(mesh.geometry, wire.geometry);
        assert!((wire.uniform.model[0][0] - 1.02).abs() < 1e-6);
        assert!((wire.uniform.color[3] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_star_phase_reaches_uniform() {
        let mut graph = scene();
        crate::animation::AnimationDriver::new().apply(&mut graph, 4.0);
        let items = draw_list(&graph);
        let stars = items.iter().find(|i| i.tag == NodeTag::Stars).unwrap();
        assert_eq!(stars.uniform.params[2], 1.0);
        assert!((stars.uniform.params[3] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_lights_packed() {
        let uniform = lights_uniform(&scene().lights());
        assert!((uniform.ambient[3] - 0.3).abs() < 1e-6);
        assert_eq!(uniform.point_positions[0], [10.0, 10.0, 10.0, 1.0]);
        assert_eq!(uniform.point_positions[1], [-10.0, -10.0, -10.0, 0.5]);
        assert_eq!(&uniform.spot_direction[..3], &[0.0, -1.0, 0.0]);
        assert!((uniform.spot_direction[3] - (std::f32::consts::PI / 6.0).cos()).abs() < 1e-6);
        assert_eq!(uniform.spot_color[3], 1.0);
    }
}
