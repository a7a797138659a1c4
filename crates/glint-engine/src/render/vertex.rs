use bytemuck::{Pod, Zeroable};

use super::shader::IoKind;

/// Interleaved vertex buffer layout.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexLayout {
    pub stride: wgpu::BufferAddress,
    pub attributes: &'static [wgpu::VertexAttribute],
}

impl VertexLayout {
    pub const fn new(stride: wgpu::BufferAddress, attributes: &'static [wgpu::VertexAttribute]) -> Self {
        Self { stride, attributes }
    }

    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: self.attributes,
        }
    }

    pub fn attribute(&self, location: u32) -> Option<&wgpu::VertexAttribute> {
        self.attributes.iter().find(|a| a.shader_location == location)
    }

    /// Checks that locations are unique and every attribute fits in the stride.
    pub fn validate(&self) -> Result<(), String> {
        for (i, a) in self.attributes.iter().enumerate() {
            if self.attributes[..i].iter().any(|b| b.shader_location == a.shader_location) {
                return Err(format!("duplicate vertex attribute location {}", a.shader_location));
            }
            let end = a.offset + a.format.size();
            if end > self.stride {
                return Err(format!(
                    "vertex attribute at location {} ends at byte {end}, past stride {}",
                    a.shader_location, self.stride
                ));
            }
        }
        Ok(())
    }
}

/// Scalar class a vertex format feeds into the shader.
///
/// Normalized and floating-point formats arrive as floats; the plain integer
/// formats keep their signedness.
pub(crate) fn format_kind(format: wgpu::VertexFormat) -> IoKind {
    use wgpu::VertexFormat as F;
    match format {
        F::Uint8 | F::Uint8x2 | F::Uint8x4 => IoKind::Uint,
        F::Uint16 | F::Uint16x2 | F::Uint16x4 => IoKind::Uint,
        F::Uint32 | F::Uint32x2 | F::Uint32x3 | F::Uint32x4 => IoKind::Uint,

        F::Sint8 | F::Sint8x2 | F::Sint8x4 => IoKind::Sint,
        F::Sint16 | F::Sint16x2 | F::Sint16x4 => IoKind::Sint,
        F::Sint32 | F::Sint32x2 | F::Sint32x3 | F::Sint32x4 => IoKind::Sint,

        F::Unorm8 | F::Unorm8x2 | F::Unorm8x4 | F::Unorm8x4Bgra => IoKind::Float,
        F::Snorm8 | F::Snorm8x2 | F::Snorm8x4 => IoKind::Float,
        F::Unorm16 | F::Unorm16x2 | F::Unorm16x4 => IoKind::Float,
        F::Snorm16 | F::Snorm16x2 | F::Snorm16x4 => IoKind::Float,
        F::Unorm10_10_10_2 => IoKind::Float,
        F::Float16 | F::Float16x2 | F::Float16x4 => IoKind::Float,
        F::Float32 | F::Float32x2 | F::Float32x3 | F::Float32x4 => IoKind::Float,
        F::Float64 | F::Float64x2 | F::Float64x3 | F::Float64x4 => IoKind::Float,
    }
}

/// A `Pod` vertex type with a fixed interleaved layout.
pub trait Vertex: Pod {
    const ATTRIBUTES: &'static [wgpu::VertexAttribute];

    fn layout() -> VertexLayout {
        VertexLayout::new(std::mem::size_of::<Self>() as wgpu::BufferAddress, Self::ATTRIBUTES)
    }
}

/// Position only: `@location(0) vec3<f32>`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PositionVertex {
    pub position: [f32; 3],
}

impl PositionVertex {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }
}

impl Vertex for PositionVertex {
    const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
        0 => Float32x3 // position
    ];
}

/// Position + color: `@location(0) vec3<f32>`, `@location(1) vec3<f32>`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl ColorVertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

impl Vertex for ColorVertex {
    const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // color
    ];
}
