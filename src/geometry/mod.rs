pub mod displacement;
pub mod icosphere;
pub mod mesh;
pub mod primitives;

pub use displacement::{displace, noise_scale, NoiseDisplacedGeometryBuilder};
pub use icosphere::icosphere;
pub use mesh::MeshData;
pub use primitives::{torus, uv_sphere};
