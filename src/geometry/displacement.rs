use glam::Vec3;

use super::icosphere::icosphere;
use super::mesh::MeshData;

pub const BASE_RADIUS: f32 = 2.0;
pub const SUBDIVISIONS: u32 = 2;
pub const NOISE_AMPLITUDE: f32 = 0.15;
pub const NOISE_FREQUENCY: f32 = 2.0;

/// Radial scale factor applied to a vertex: `1 + A·sin(fx)·cos(fy)·sin(fz)`
pub fn noise_scale(p: Vec3) -> f32 {
    let noise = (p.x * NOISE_FREQUENCY).sin()
        * (p.y * NOISE_FREQUENCY).cos()
        * (p.z * NOISE_FREQUENCY).sin()
        * NOISE_AMPLITUDE;
    1.0 + noise
}

/// Move a single vertex along its ray from the origin by `noise_scale`
pub fn displace(p: Vec3) -> Vec3 {
    p * noise_scale(p)
}

/// Builds the organic-looking core mesh of the hero scene
///
/// Deterministic: every call returns the same positions, indices and normals.
/// Normals are recomputed once, after displacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoiseDisplacedGeometryBuilder;

impl NoiseDisplacedGeometryBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Undisplaced level-2 icosphere of radius 2
    pub fn base(&self) -> MeshData {
        icosphere(BASE_RADIUS, SUBDIVISIONS)
    }

    pub fn build(&self) -> MeshData {
        let mut mesh = self.base();
        for p in mesh.positions.iter_mut() {
            *p = displace(*p);
        }
        mesh.compute_vertex_normals();

        log::debug!(
            "Displaced geometry built: {} vertices, {} triangles, radius {:.3}..{:.3}",
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.min_radius(),
            mesh.max_radius()
        );
        mesh
    }
}
