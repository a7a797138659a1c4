use std::ops::Range;

use anyhow::{ensure, Result};
use wgpu::util::DeviceExt;

use super::vertex::{Vertex, VertexLayout};

/// Draw command a mesh issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    /// Nothing to draw.
    Empty,
    /// Non-indexed draw over a vertex range.
    Arrays { vertices: Range<u32> },
    /// Indexed draw over an index range.
    Indexed { indices: Range<u32> },
}

impl DrawCall {
    pub fn for_counts(vertex_count: u32, index_count: Option<u32>) -> Self {
        match index_count {
            Some(0) => Self::Empty,
            Some(n) => Self::Indexed { indices: 0..n },
            None if vertex_count == 0 => Self::Empty,
            None => Self::Arrays { vertices: 0..vertex_count },
        }
    }
}

/// Checks that every index addresses an existing vertex.
pub fn check_indices(indices: &[u32], vertex_count: usize) -> Result<()> {
    if let Some((pos, &bad)) = indices
        .iter()
        .enumerate()
        .find(|&(_, &i)| i as usize >= vertex_count)
    {
        anyhow::bail!("index {bad} at position {pos} is out of range for {vertex_count} vertices");
    }
    Ok(())
}

/// Static geometry uploaded once: a vertex buffer and, optionally, an index buffer.
pub struct Mesh {
    layout: VertexLayout,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    index_buffer: Option<(wgpu::Buffer, u32)>,
}

impl Mesh {
    /// Uploads `vertices` for non-indexed drawing.
    pub fn new<V: Vertex>(device: &wgpu::Device, label: &str, vertices: &[V]) -> Self {
        Self {
            layout: V::layout(),
            vertex_buffer: vertex_buffer(device, label, vertices),
            vertex_count: vertices.len() as u32,
            index_buffer: None,
        }
    }

    /// Uploads `vertices` and `indices` for indexed drawing.
    pub fn indexed<V: Vertex>(
        device: &wgpu::Device,
        label: &str,
        vertices: &[V],
        indices: &[u32],
    ) -> Result<Self> {
        ensure!(indices.len() % 3 == 0, "index count {} is not a multiple of 3", indices.len());
        check_indices(indices, vertices.len())?;

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} ibo")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Ok(Self {
            layout: V::layout(),
            vertex_buffer: vertex_buffer(device, label, vertices),
            vertex_count: vertices.len() as u32,
            index_buffer: Some((index_buffer, indices.len() as u32)),
        })
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn draw_call(&self) -> DrawCall {
        DrawCall::for_counts(self.vertex_count, self.index_buffer.as_ref().map(|(_, n)| *n))
    }

    /// Binds the buffers and records the draw into `pass`.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        match self.draw_call() {
            DrawCall::Empty => {}
            DrawCall::Arrays { vertices } => {
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.draw(vertices, 0..1);
            }
            DrawCall::Indexed { indices } => {
                let Some((ibo, _)) = self.index_buffer.as_ref() else { return };
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(indices, 0, 0..1);
            }
        }
    }
}

fn vertex_buffer<V: Vertex>(device: &wgpu::Device, label: &str, vertices: &[V]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label} vbo")),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_draw_covers_all_vertices() {
        assert_eq!(DrawCall::for_counts(3, None), DrawCall::Arrays { vertices: 0..3 });
    }

    #[test]
    fn indexed_draw_uses_index_count() {
        assert_eq!(DrawCall::for_counts(4, Some(6)), DrawCall::Indexed { indices: 0..6 });
    }

    #[test]
    fn empty_geometry_draws_nothing() {
        assert_eq!(DrawCall::for_counts(0, None), DrawCall::Empty);
        assert_eq!(DrawCall::for_counts(4, Some(0)), DrawCall::Empty);
    }

    #[test]
    fn indices_within_range_pass() {
        assert!(check_indices(&[0, 1, 3, 1, 2, 3], 4).is_ok());
        assert!(check_indices(&[], 0).is_ok());
    }

    #[test]
    fn out_of_range_index_fails() {
        let err = check_indices(&[0, 1, 4], 4).unwrap_err();
        assert!(err.to_string().contains("index 4 at position 2"));
    }
}
