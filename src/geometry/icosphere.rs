use std::collections::HashMap;

use glam::Vec3;

use super::mesh::MeshData;

const ICOSAHEDRON_FACES: [[u32; 3]; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

/// Regular icosahedron projected onto a sphere, each face split into four per level
///
/// Level 0 is the plain icosahedron (12 vertices, 20 faces). Every level splits each
/// triangle at its edge midpoints and pushes the new vertices out to the circumradius,
/// so level n has `20 * 4^n` faces and `10 * 4^n + 2` shared vertices.
pub fn icosphere(radius: f32, subdivisions: u32) -> MeshData {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let mut positions: Vec<Vec3> = [
        (-1.0, phi, 0.0),
        (1.0, phi, 0.0),
        (-1.0, -phi, 0.0),
        (1.0, -phi, 0.0),
        (0.0, -1.0, phi),
        (0.0, 1.0, phi),
        (0.0, -1.0, -phi),
        (0.0, 1.0, -phi),
        (phi, 0.0, -1.0),
        (phi, 0.0, 1.0),
        (-phi, 0.0, -1.0),
        (-phi, 0.0, 1.0),
    ]
    .iter()
    .map(|&(x, y, z)| Vec3::new(x, y, z).normalize() * radius)
    .collect();

    let mut faces: Vec<[u32; 3]> = ICOSAHEDRON_FACES.to_vec();

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut next = Vec::with_capacity(faces.len() * 4);

        for [a, b, c] in faces {
            let ab = midpoint(&mut positions, &mut midpoints, a, b, radius);
            let bc = midpoint(&mut positions, &mut midpoints, b, c, radius);
            let ca = midpoint(&mut positions, &mut midpoints, c, a, radius);

            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }

        faces = next;
    }

    let indices = faces.into_iter().flatten().collect();
    let mut mesh = MeshData::new(positions, indices);
    mesh.compute_vertex_normals();
    mesh
}

fn midpoint(
    positions: &mut Vec<Vec3>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
    radius: f32,
) -> u32 {
    let key = (a.min(b), a.max(b));
    if let Some(&index) = cache.get(&key) {
        return index;
    }

    let mid = (positions[a as usize] + positions[b as usize]) * 0.5;
    let index = positions.len() as u32;
    positions.push(mid.normalize() * radius);
    cache.insert(key, index);
    index
}
