use std::collections::HashSet;

use glam::Vec3;

use crate::types::Vertex;

/// Indexed triangle mesh kept on the CPU until upload
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create a mesh with normals left at zero; call `compute_vertex_normals` afterwards
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let normals = vec![Vec3::ZERO; positions.len()];
        Self {
            positions,
            normals,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    /// Smooth normals: area-weighted sum of incident face normals, normalized
    pub fn compute_vertex_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.positions.len()];

        for [a, b, c] in self.triangles() {
            let (pa, pb, pc) = (
                self.positions[a as usize],
                self.positions[b as usize],
                self.positions[c as usize],
            );
            // Unnormalized cross product carries twice the face area
            let face = (pb - pa).cross(pc - pa);
            accum[a as usize] += face;
            accum[b as usize] += face;
            accum[c as usize] += face;
        }

        self.normals = accum
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
            .collect();
    }

    /// Unique undirected edges, in first-seen order
    pub fn edges(&self) -> Vec<[u32; 2]> {
        let mut seen = HashSet::with_capacity(self.indices.len());
        let mut edges = Vec::with_capacity(self.indices.len() / 2);

        for [a, b, c] in self.triangles() {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                let key = (u.min(v), u.max(v));
                if seen.insert(key) {
                    edges.push([key.0, key.1]);
                }
            }
        }

        edges
    }

    /// Interleaved vertices for the GPU vertex buffer
    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(p, n)| Vertex::new(*p, *n))
            .collect()
    }

    pub fn max_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| p.length())
            .fold(0.0, f32::max)
    }

    pub fn min_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| p.length())
            .fold(f32::INFINITY, f32::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_quad() -> MeshData {
        // Two triangles in the XY plane sharing the diagonal 0-2
        MeshData::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_counts() {
        let mesh = single_quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_planar_normals_point_up_z() {
        let mut mesh = single_quad();
        mesh.compute_vertex_normals();

        for n in &mesh.normals {
            assert!((n.z - 1.0).abs() < 1e-6);
            assert!((n.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_shared_edge_counted_once() {
        let mesh = single_quad();
        let edges = mesh.edges();

        assert_eq!(edges.len(), 5);
        assert_eq!(edges.iter().filter(|e| **e == [0, 2]).count(), 1);
    }

    #[test]
    fn test_vertices_interleave() {
        let mut mesh = single_quad();
        mesh.compute_vertex_normals();
        let vertices = mesh.vertices();

        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[2].position, [1.0, 1.0, 0.0]);
        assert_eq!(vertices[2].normal, [0.0, 0.0, 1.0]);
    }
}
