use anyhow::Result;
use glint_engine::render::{ColorVertex, Mesh, Program, ProgramDesc, RenderCtx, ShaderSource, Vertex};

use super::{DemoOptions, Scene};

const SHADER: &str = include_str!("../../shaders/color.wgsl");

/// Red, green and blue corners; the fragment stage interpolates between them.
pub(crate) const TRIANGLE: [ColorVertex; 3] = [
    ColorVertex::new([-0.9, -0.5, 0.0], [1.0, 0.0, 0.0]),  // left
    ColorVertex::new([0.0, -0.5, 0.0], [0.0, 1.0, 0.0]),   // right
    ColorVertex::new([-0.45, 0.5, 0.0], [0.0, 0.0, 1.0]),  // top
];

pub(crate) fn program_desc(wireframe: bool) -> ProgramDesc<'static> {
    ProgramDesc::new(
        "colored triangle",
        ShaderSource::vertex("color vs", SHADER),
        ShaderSource::fragment("color fs", SHADER),
    )
    .wireframe(wireframe)
}

pub struct ColoredTriangle {
    program: Program,
    mesh: Mesh,
}

impl Scene for ColoredTriangle {
    const NAME: &'static str = "colored-triangle";

    fn build(ctx: &RenderCtx<'_>, options: &DemoOptions) -> Result<Self> {
        let program = Program::link(ctx, &program_desc(options.wireframe), &ColorVertex::layout(), &[])?;
        let mesh = Mesh::new(ctx.device, "colored triangle", &TRIANGLE);
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
    use glint_engine::render::program::check_link;
    use glint_engine::render::shader::check_source;

    #[test]
    fn shader_links_against_color_vertices() {
        let desc = program_desc(false);
        let (_, vs) = check_source(&desc.vertex).unwrap();
        let (_, fs) = check_source(&desc.fragment).unwrap();
        check_link(desc.label, &vs, &fs, &ColorVertex::layout(), 0, desc.polygon_mode, false).unwrap();
    }

    #[test]
    fn corners_are_pure_primaries() {
        let colors: Vec<[f32; 3]> = TRIANGLE.iter().map(|v| v.color).collect();
        assert_eq!(colors, vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn triangle_sits_in_left_half() {
        assert!(TRIANGLE.iter().all(|v| v.position[0] <= 0.0));
    }
}
