//! Scene graph for the hero background
//!
//! A plain tree of tagged nodes. Geometry lives in an arena owned by the graph and
//! nodes refer to it by [`GeometryId`], which is how the wireframe overlay shares the
//! main mesh's geometry without a second copy.

pub mod hero;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::geometry::MeshData;
use crate::particles::PointCloud;

pub use hero::build_hero_scene;

/// Names of the nodes the animation and renderer address directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    MainMesh,
    WireframeOverlay,
    InnerGlow,
    Particles,
    Stars,
    Rings,
    OuterRing,
    MiddleRing,
    InnerRing,
    AmbientLight,
    KeyLight,
    FillLight,
    SpotLight,
    Camera,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(usize);

impl GeometryId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Mesh(MeshData),
    Points(PointCloud),
}

impl Geometry {
    pub fn as_mesh(&self) -> Option<&MeshData> {
        match self {
            Geometry::Mesh(mesh) => Some(mesh),
            Geometry::Points(_) => None,
        }
    }

    pub fn as_points(&self) -> Option<&PointCloud> {
        match self {
            Geometry::Points(cloud) => Some(cloud),
            Geometry::Mesh(_) => None,
        }
    }
}

/// Local transform: Euler rotation (XYZ order) and uniform scale, no translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation: Vec3,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn rotated(x: f32, y: f32, z: f32) -> Self {
        Self {
            rotation: Vec3::new(x, y, z),
            ..Self::default()
        }
    }

    pub fn scaled(scale: f32) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rotation, Vec3::ZERO)
    }
}

/// Lit, metallic surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMaterial {
    pub color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
}

/// Unlit flat colour, optionally translucent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicMaterial {
    pub color: [f32; 3],
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointStyle {
    /// World-space size shrinking with distance
    Attenuated,
    /// Screen-space size pulsing with `phase`, soft round falloff
    Twinkle { phase: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsMaterial {
    pub color: [f32; 3],
    pub opacity: f32,
    pub style: PointStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: [f32; 3],
        intensity: f32,
    },
    Point {
        position: Vec3,
        color: [f32; 3],
        intensity: f32,
    },
    Spot {
        position: Vec3,
        target: Vec3,
        angle: f32,
        penumbra: f32,
        color: [f32; 3],
        intensity: f32,
    },
}

/// Projection parameters of the scene camera; its position belongs to the orbit rig
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov_y_degrees: 50.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Mesh {
        geometry: GeometryId,
        material: StandardMaterial,
    },
    Translucent {
        geometry: GeometryId,
        material: BasicMaterial,
    },
    Wireframe {
        geometry: GeometryId,
        material: BasicMaterial,
    },
    Points {
        geometry: GeometryId,
        material: PointsMaterial,
    },
    Group(Vec<SceneNode>),
    Light(Light),
    Camera(Lens),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub tag: NodeTag,
    pub transform: Transform,
    pub kind: NodeKind,
}

impl SceneNode {
    pub fn new(tag: NodeTag, kind: NodeKind) -> Self {
        Self {
            tag,
            transform: Transform::default(),
            kind,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn geometry(&self) -> Option<GeometryId> {
        match &self.kind {
            NodeKind::Mesh { geometry, .. }
            | NodeKind::Translucent { geometry, .. }
            | NodeKind::Wireframe { geometry, .. }
            | NodeKind::Points { geometry, .. } => Some(*geometry),
            _ => None,
        }
    }

    fn find(&self, tag: NodeTag) -> Option<&SceneNode> {
        if self.tag == tag {
            return Some(self);
        }
        match &self.kind {
            NodeKind::Group(children) => children.iter().find_map(|c| c.find(tag)),
            _ => None,
        }
    }

    fn find_mut(&mut self, tag: NodeTag) -> Option<&mut SceneNode> {
        if self.tag == tag {
            return Some(self);
        }
        match &mut self.kind {
            NodeKind::Group(children) => children.iter_mut().find_map(|c| c.find_mut(tag)),
            _ => None,
        }
    }

    fn visit<F: FnMut(&SceneNode, Mat4)>(&self, parent: Mat4, f: &mut F) {
        let world = parent * self.transform.matrix();
        f(self, world);
        if let NodeKind::Group(children) = &self.kind {
            for child in children {
                child.visit(world, f);
            }
        }
    }
}

/// Owns every node and every geometry buffer of one mounted scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneGraph {
    geometries: Vec<Geometry>,
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() - 1)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id.0)
    }

    pub fn geometries(&self) -> impl Iterator<Item = (GeometryId, &Geometry)> {
        self.geometries
            .iter()
            .enumerate()
            .map(|(i, g)| (GeometryId(i), g))
    }

    pub fn add_node(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn node(&self, tag: NodeTag) -> Option<&SceneNode> {
        self.nodes.iter().find_map(|n| n.find(tag))
    }

    pub fn rotation(&self, tag: NodeTag) -> Option<Vec3> {
        self.node(tag).map(|n| n.transform.rotation)
    }

    /// Write the x/y rotation of a node; z keeps its static value
    ///
    /// Only the animation driver calls this.
    pub(crate) fn set_rotation(&mut self, tag: NodeTag, x: f32, y: f32) -> bool {
        match self.nodes.iter_mut().find_map(|n| n.find_mut(tag)) {
            Some(node) => {
                node.transform.rotation.x = x;
                node.transform.rotation.y = y;
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_twinkle_phase(&mut self, tag: NodeTag, phase: f32) -> bool {
        match self.nodes.iter_mut().find_map(|n| n.find_mut(tag)) {
            Some(SceneNode {
                kind: NodeKind::Points { material, .. },
                ..
            }) => match &mut material.style {
                PointStyle::Twinkle { phase: p } => {
                    *p = phase;
                    true
                }
                PointStyle::Attenuated => false,
            },
            _ => false,
        }
    }

    pub fn lights(&self) -> Vec<Light> {
        let mut lights = Vec::new();
        self.visit(|node, _| {
            if let NodeKind::Light(light) = &node.kind {
                lights.push(*light);
            }
        });
        lights
    }

    pub fn lens(&self) -> Lens {
        match self.node(NodeTag::Camera).map(|n| &n.kind) {
            Some(NodeKind::Camera(lens)) => *lens,
            _ => Lens::default(),
        }
    }

    /// Depth-first walk handing every node its world matrix
    pub fn visit<F: FnMut(&SceneNode, Mat4)>(&self, mut f: F) {
        for node in &self.nodes {
            node.visit(Mat4::IDENTITY, &mut f);
        }
    }

    /// World matrix of a tagged node, parents included
    pub fn world_matrix(&self, tag: NodeTag) -> Option<Mat4> {
        let mut found = None;
        self.visit(|node, world| {
            if node.tag == tag && found.is_none() {
                found = Some(world);
            }
        });
        found
    }
}
