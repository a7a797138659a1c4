use anyhow::Result;
use glint_engine::render::{
    CompiledShader, Mesh, PositionVertex, Program, ProgramDesc, RenderCtx, ShaderSource, Vertex,
};

use super::{DemoOptions, Scene};

const VERTEX_SHADER: &str = include_str!("../../shaders/position.wgsl");
const ORANGE_SHADER: &str = include_str!("../../shaders/orange.wgsl");
const YELLOW_SHADER: &str = include_str!("../../shaders/yellow.wgsl");

pub(crate) const FIRST: [PositionVertex; 3] = [
    PositionVertex::new(-0.9, -0.5, 0.0),
    PositionVertex::new(0.0, -0.5, 0.0),
    PositionVertex::new(-0.45, 0.5, 0.0),
];

pub(crate) const SECOND: [PositionVertex; 3] = [
    PositionVertex::new(0.0, -0.5, 0.0),
    PositionVertex::new(0.9, -0.5, 0.0),
    PositionVertex::new(0.45, 0.5, 0.0),
];

/// One vertex stage shared by both programs; they differ only in fill color.
pub(crate) fn program_descs(wireframe: bool) -> [ProgramDesc<'static>; 2] {
    let vs = ShaderSource::vertex("position vs", VERTEX_SHADER);
    [
        ProgramDesc::new("orange program", vs, ShaderSource::fragment("orange fs", ORANGE_SHADER))
            .wireframe(wireframe),
        ProgramDesc::new("yellow program", vs, ShaderSource::fragment("yellow fs", YELLOW_SHADER))
            .wireframe(wireframe),
    ]
}

pub struct TwoTriangles {
    orange: Program,
    yellow: Program,
    first: Mesh,
    second: Mesh,
}

impl Scene for TwoTriangles {
    const NAME: &'static str = "two-triangles";

    fn build(ctx: &RenderCtx<'_>, options: &DemoOptions) -> Result<Self> {
        let layout = PositionVertex::layout();
        let [orange, yellow] = program_descs(options.wireframe);

        // Compiled once and attached to both programs; released after linking.
        let vs = CompiledShader::compile(ctx.device, &orange.vertex)?;
        let orange_fs = CompiledShader::compile(ctx.device, &orange.fragment)?;
        let yellow_fs = CompiledShader::compile(ctx.device, &yellow.fragment)?;

        Ok(Self {
            orange: Program::link_stages(ctx, orange.label, &vs, &orange_fs, orange.polygon_mode, &layout, &[])?,
            yellow: Program::link_stages(ctx, yellow.label, &vs, &yellow_fs, yellow.polygon_mode, &layout, &[])?,
            first: Mesh::new(ctx.device, "first triangle", &FIRST),
            second: Mesh::new(ctx.device, "second triangle", &SECOND),
        })
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.orange.bind(pass);
        self.first.draw(pass);

        self.yellow.bind(pass);
        self.second.draw(pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_engine::render::program::check_link;
    use glint_engine::render::shader::check_source;

    #[test]
    fn both_programs_link() {
        for desc in program_descs(false) {
            let (_, vs) = check_source(&desc.vertex).unwrap();
            let (_, fs) = check_source(&desc.fragment).unwrap();
            check_link(desc.label, &vs, &fs, &PositionVertex::layout(), 0, desc.polygon_mode, false)
                .unwrap_or_else(|e| panic!("{e}"));
        }
    }

    #[test]
    fn wireframe_programs_need_line_mode_support() {
        let [orange, _] = program_descs(true);
        let (_, vs) = check_source(&orange.vertex).unwrap();
        let (_, fs) = check_source(&orange.fragment).unwrap();
        assert!(check_link(orange.label, &vs, &fs, &PositionVertex::layout(), 0, orange.polygon_mode, false).is_err());
    }

    #[test]
    fn programs_share_the_vertex_stage() {
        let [orange, yellow] = program_descs(false);
        assert_eq!(orange.vertex.label, yellow.vertex.label);
        assert!(std::ptr::eq(orange.vertex.code, yellow.vertex.code));
        assert_ne!(orange.fragment.label, yellow.fragment.label);
    }

    #[test]
    fn triangles_share_one_vertex() {
        assert_eq!(FIRST[1], SECOND[0]);
    }
}
