use glam::{Mat4, Vec3};

/// Mesh vertex for GPU vertex buffers
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// One point sprite: centre in local space plus its size
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub size: f32,
}

impl PointInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32];

    pub fn new(position: Vec3, size: f32) -> Self {
        Self {
            position: position.to_array(),
            size,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub time: f32,
    pub viewport: [f32; 2],
    pub _pad: [f32; 2],
}

impl CameraUniform {
    pub fn new(view: Mat4, projection: Mat4, position: Vec3, viewport: [f32; 2]) -> Self {
        Self {
            view_proj: (projection * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            position: position.to_array(),
            time: 0.0,
            viewport,
            _pad: [0.0; 2],
        }
    }
}

/// Light block: one ambient, two point lights, one spot light
///
/// Every entry packs rgb + a scalar in a vec4 to keep WGSL alignment trivial.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    /// rgb, intensity
    pub ambient: [f32; 4],
    /// xyz, intensity
    pub point_positions: [[f32; 4]; 2],
    /// rgb, unused
    pub point_colors: [[f32; 4]; 2],
    /// xyz, intensity
    pub spot_position: [f32; 4],
    /// normalized direction, cos(cone angle)
    pub spot_direction: [f32; 4],
    /// rgb, penumbra
    pub spot_color: [f32; 4],
}

/// Per-draw model transform and material parameters
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    /// rgb, opacity
    pub color: [f32; 4],
    /// rgb, intensity
    pub emissive: [f32; 4],
    /// metalness, roughness, size attenuation mode, twinkle phase
    pub params: [f32; 4],
}

impl ModelUniform {
    pub fn new(model: Mat4, color: [f32; 4], emissive: [f32; 4], params: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
            emissive,
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes_are_16_byte_multiples() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 160);
        assert_eq!(std::mem::size_of::<LightsUniform>(), 128);
        assert_eq!(std::mem::size_of::<ModelUniform>(), 112);
        assert_eq!(std::mem::size_of::<CameraUniform>() % 16, 0);
    }

    #[test]
    fn test_vertex_strides() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(std::mem::size_of::<PointInstance>(), 16);
        assert_eq!(Vertex::layout().array_stride, 24);
        assert_eq!(PointInstance::layout().step_mode, wgpu::VertexStepMode::Instance);
    }
}
