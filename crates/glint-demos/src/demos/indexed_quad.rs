use anyhow::Result;
use glint_engine::render::{Mesh, PositionVertex, Program, ProgramDesc, RenderCtx, ShaderSource, Vertex};

use super::{DemoOptions, Scene};

const VERTEX_SHADER: &str = include_str!("../../shaders/position.wgsl");
const FRAGMENT_SHADER: &str = include_str!("../../shaders/orange.wgsl");

pub(crate) const QUAD_VERTICES: [PositionVertex; 4] = [
    PositionVertex::new(0.5, 0.5, 0.0),   // top right
    PositionVertex::new(0.5, -0.5, 0.0),  // bottom right
    PositionVertex::new(-0.5, -0.5, 0.0), // bottom left
    PositionVertex::new(-0.5, 0.5, 0.0),  // top left
];

/// Two triangles sharing the top-right/bottom-left diagonal.
pub(crate) const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

pub(crate) fn program_desc(wireframe: bool) -> ProgramDesc<'static> {
    ProgramDesc::new(
        "quad program",
        ShaderSource::vertex("position vs", VERTEX_SHADER),
        ShaderSource::fragment("orange fs", FRAGMENT_SHADER),
    )
    .wireframe(wireframe)
}

pub struct IndexedQuad {
    program: Program,
    mesh: Mesh,
}

impl Scene for IndexedQuad {
    const NAME: &'static str = "indexed-quad";

    fn build(ctx: &RenderCtx<'_>, options: &DemoOptions) -> Result<Self> {
        let program = Program::link(ctx, &program_desc(options.wireframe), &PositionVertex::layout(), &[])?;
        let mesh = Mesh::indexed(ctx.device, "quad", &QUAD_VERTICES, &QUAD_INDICES)?;
        Ok(Self { program, mesh })
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.program.bind(pass);
        self.mesh.draw(pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_engine::render::mesh::{check_indices, DrawCall};
    use glint_engine::render::program::check_link;
    use glint_engine::render::shader::check_source;

    #[test]
    fn indices_address_the_four_corners() {
        check_indices(&QUAD_INDICES, QUAD_VERTICES.len()).unwrap();
        for corner in 0..4u32 {
            assert!(QUAD_INDICES.contains(&corner));
        }
    }

    #[test]
    fn quad_draws_six_indices() {
        assert_eq!(
            DrawCall::for_counts(QUAD_VERTICES.len() as u32, Some(QUAD_INDICES.len() as u32)),
            DrawCall::Indexed { indices: 0..6 }
        );
    }

    #[test]
    fn shared_diagonal_appears_in_both_triangles() {
        let (a, b) = QUAD_INDICES.split_at(3);
        assert!(a.contains(&1) && a.contains(&3));
        assert!(b.contains(&1) && b.contains(&3));
    }

    #[test]
    fn program_links() {
        let desc = program_desc(false);
        let (_, vs) = check_source(&desc.vertex).unwrap();
        let (_, fs) = check_source(&desc.fragment).unwrap();
        check_link(desc.label, &vs, &fs, &PositionVertex::layout(), 0, desc.polygon_mode, false).unwrap();
    }
}
