use std::f32::consts::PI;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{
    BasicMaterial, Geometry, Lens, Light, NodeKind, NodeTag, PointStyle, PointsMaterial,
    SceneGraph, SceneNode, StandardMaterial, Transform,
};
use crate::config::SceneOptions;
use crate::geometry::{torus, uv_sphere, NoiseDisplacedGeometryBuilder};
use crate::math::{grey, hex_to_linear};
use crate::particles::{ParticleFieldBuilder, StarFieldBuilder};

pub const BRAND_RED: u32 = 0xE10600;
pub const WHITE: u32 = 0xFFFFFF;

pub const WIREFRAME_SCALE: f32 = 1.02;
pub const GLOW_RADIUS: f32 = 1.5;

const TORUS_RADIAL_SEGMENTS: u32 = 16;
const TORUS_TUBULAR_SEGMENTS: u32 = 100;

/// One orbit ring: radius, tube, static tilt, colour, opacity
struct RingSpec {
    tag: NodeTag,
    radius: f32,
    tube: f32,
    tilt: (f32, f32, f32),
    color: u32,
    opacity: f32,
}

const RINGS: [RingSpec; 3] = [
    RingSpec {
        tag: NodeTag::OuterRing,
        radius: 3.5,
        tube: 0.02,
        tilt: (PI / 2.0, 0.0, 0.0),
        color: BRAND_RED,
        opacity: 0.4,
    },
    RingSpec {
        tag: NodeTag::MiddleRing,
        radius: 3.0,
        tube: 0.015,
        tilt: (PI / 3.0, PI / 4.0, 0.0),
        color: WHITE,
        opacity: 0.2,
    },
    RingSpec {
        tag: NodeTag::InnerRing,
        radius: 2.5,
        tube: 0.01,
        tilt: (PI / 6.0, PI / 2.0, 0.0),
        color: BRAND_RED,
        opacity: 0.3,
    },
];

/// Assemble the hero background: core mesh, overlay, glow, particles, rings, lights, camera
///
/// Geometry and particle buffers are generated here exactly once.
pub fn build_hero_scene(options: &SceneOptions) -> SceneGraph {
    let mut graph = SceneGraph::new();
    let red = hex_to_linear(BRAND_RED);
    let white = hex_to_linear(WHITE);

    let core = graph.add_geometry(Geometry::Mesh(NoiseDisplacedGeometryBuilder::new().build()));

    graph.add_node(SceneNode::new(
        NodeTag::MainMesh,
        NodeKind::Mesh {
            geometry: core,
            material: StandardMaterial {
                color: red,
                metalness: 0.8,
                roughness: 0.2,
                emissive: red,
                emissive_intensity: 0.2,
            },
        },
    ));

    graph.add_node(
        SceneNode::new(
            NodeTag::WireframeOverlay,
            NodeKind::Wireframe {
                geometry: core,
                material: BasicMaterial {
                    color: white,
                    opacity: 0.3,
                },
            },
        )
        .with_transform(Transform::scaled(WIREFRAME_SCALE)),
    );

    let glow = graph.add_geometry(Geometry::Mesh(uv_sphere(GLOW_RADIUS, 32, 32)));
    graph.add_node(SceneNode::new(
        NodeTag::InnerGlow,
        NodeKind::Translucent {
            geometry: glow,
            material: BasicMaterial {
                color: red,
                opacity: 0.1,
            },
        },
    ));

    let particles = match options.particle_seed {
        Some(seed) => ParticleFieldBuilder::default().build_seeded(seed),
        None => ParticleFieldBuilder::default().build(&mut rand::thread_rng()),
    };
    let particles = graph.add_geometry(Geometry::Points(particles));
    graph.add_node(SceneNode::new(
        NodeTag::Particles,
        NodeKind::Points {
            geometry: particles,
            material: PointsMaterial {
                color: red,
                opacity: 0.6,
                style: PointStyle::Attenuated,
            },
        },
    ));

    let rings = RINGS
        .iter()
        .map(|ring| {
            let geometry = graph.add_geometry(Geometry::Mesh(torus(
                ring.radius,
                ring.tube,
                TORUS_RADIAL_SEGMENTS,
                TORUS_TUBULAR_SEGMENTS,
            )));
            let (x, y, z) = ring.tilt;
            SceneNode::new(
                ring.tag,
                NodeKind::Translucent {
                    geometry,
                    material: BasicMaterial {
                        color: hex_to_linear(ring.color),
                        opacity: ring.opacity,
                    },
                },
            )
            .with_transform(Transform::rotated(x, y, z))
        })
        .collect();
    graph.add_node(SceneNode::new(NodeTag::Rings, NodeKind::Group(rings)));

    if options.stars {
        let stars = match options.particle_seed {
            Some(seed) => StarFieldBuilder::default().build(&mut StdRng::seed_from_u64(seed ^ 0x5EED)),
            None => StarFieldBuilder::default().build(&mut rand::thread_rng()),
        };
        let stars = graph.add_geometry(Geometry::Points(stars));
        graph.add_node(SceneNode::new(
            NodeTag::Stars,
            NodeKind::Points {
                geometry: stars,
                material: PointsMaterial {
                    color: grey(0.9),
                    opacity: 1.0,
                    style: PointStyle::Twinkle { phase: 0.0 },
                },
            },
        ));
    }

    add_lights(&mut graph, red, white);

    graph.add_node(SceneNode::new(NodeTag::Camera, NodeKind::Camera(Lens::default())));

    log::debug!(
        "Hero scene assembled: {} top-level nodes, {} geometries",
        graph.nodes().len(),
        graph.geometries().count()
    );
    graph
}

fn add_lights(graph: &mut SceneGraph, red: [f32; 3], white: [f32; 3]) {
    let lights = [
        (
            NodeTag::AmbientLight,
            Light::Ambient {
                color: white,
                intensity: 0.3,
            },
        ),
        (
            NodeTag::KeyLight,
            Light::Point {
                position: Vec3::new(10.0, 10.0, 10.0),
                color: red,
                intensity: 1.0,
            },
        ),
        (
            NodeTag::FillLight,
            Light::Point {
                position: Vec3::new(-10.0, -10.0, -10.0),
                color: white,
                intensity: 0.5,
            },
        ),
        (
            NodeTag::SpotLight,
            Light::Spot {
                position: Vec3::new(0.0, 10.0, 0.0),
                target: Vec3::ZERO,
                angle: PI / 6.0,
                penumbra: 1.0,
                color: red,
                intensity: 0.8,
            },
        ),
    ];

    for (tag, light) in lights {
        graph.add_node(SceneNode::new(tag, NodeKind::Light(light)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> SceneOptions {
        SceneOptions {
            particle_seed: Some(11),
            ..SceneOptions::default()
        }
    }

    #[test]
    fn test_wireframe_shares_core_geometry() {
        let graph = build_hero_scene(&options());
        let mesh = graph.node(NodeTag::MainMesh).unwrap().geometry();
        let wire = graph.node(NodeTag::WireframeOverlay).unwrap().geometry();
        assert!(mesh.is_some());
        assert_eq!(mesh, wire);
    }

    #[test]
    fn test_ring_group_holds_three_rings() {
        let graph = build_hero_scene(&options());
        match &graph.node(NodeTag::Rings).unwrap().kind {
            NodeKind::Group(children) => {
                let tags: Vec<_> = children.iter().map(|c| c.tag).collect();
                assert_eq!(
                    tags,
                    vec![NodeTag::OuterRing, NodeTag::MiddleRing, NodeTag::InnerRing]
                );
            }
            other => panic!("rings should be a group, got {:?}", other),
        }
    }

    #[test]
    fn test_lights_are_one_ambient_two_point_one_spot() {
        let graph = build_hero_scene(&options());
        let lights = graph.lights();
        assert_eq!(lights.len(), 4);
        assert_eq!(
            lights.iter().filter(|l| matches!(l, Light::Point { .. })).count(),
            2
        );
        assert!(matches!(lights[0], Light::Ambient { .. }));
        assert!(matches!(lights[3], Light::Spot { .. }));
    }

    #[test]
    fn test_stars_optional() {
        let with = build_hero_scene(&options());
        let without = build_hero_scene(&SceneOptions {
            stars: false,
            ..options()
        });
        assert!(with.node(NodeTag::Stars).is_some());
        assert!(without.node(NodeTag::Stars).is_none());
        assert_eq!(with.geometries().count(), without.geometries().count() + 1);
    }
}
