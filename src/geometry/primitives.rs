use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::mesh::MeshData;

/// Torus in the XY plane centred on the origin, with analytic normals
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let mut positions = Vec::new();
    let mut normals = Vec::new();

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;

            let ring = radius + tube * v.cos();
            let position = Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin());
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);

            positions.push(position);
            normals.push((position - center).normalize_or_zero());
        }
    }

    let stride = tubular_segments + 1;
    let mut indices = Vec::new();
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;

            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshData {
        positions,
        normals,
        indices,
    }
}

/// Latitude/longitude sphere; degenerate triangles at the poles are skipped
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut positions = Vec::new();
    let mut normals = Vec::new();

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;

            let position = Vec3::new(
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            );
            positions.push(position);
            normals.push(position.normalize_or_zero());
        }
    }

    let stride = width_segments + 1;
    let mut indices = Vec::new();
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * stride + ix + 1;
            let b = iy * stride + ix;
            let c = (iy + 1) * stride + ix;
            let d = (iy + 1) * stride + ix + 1;

            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshData {
        positions,
        normals,
        indices,
    }
}
