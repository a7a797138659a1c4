use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::paint::Color;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ColorBlock {
    color: [f32; 4],
}

/// A single RGBA uniform at `@group(0) @binding(0)`, visible to the fragment stage.
///
/// WGSL side:
/// ```wgsl
/// @group(0) @binding(0) var<uniform> u_color: vec4<f32>;
/// ```
pub struct ColorUniform {
    buffer: wgpu::Buffer,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl ColorUniform {
    pub fn new(device: &wgpu::Device, label: &str, initial: Color) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} ubo")),
            contents: bytemuck::bytes_of(&ColorBlock { color: initial.to_array() }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} bgl")),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<ColorBlock>() as u64),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} bind group")),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self { buffer, layout, bind_group }
    }

    /// Writes a new color; visible to draws submitted after this call.
    pub fn write(&self, queue: &wgpu::Queue, color: Color) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&ColorBlock { color: color.to_array() }));
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>, group: u32) {
        pass.set_bind_group(group, &self.bind_group, &[]);
    }
}
