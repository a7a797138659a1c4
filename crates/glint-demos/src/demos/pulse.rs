use anyhow::Result;
use glint_engine::paint::Color;
use glint_engine::render::{
    ColorUniform, Mesh, PositionVertex, Program, ProgramDesc, RenderCtx, ShaderSource, Vertex,
};
use glint_engine::time::FrameTime;

use super::{DemoOptions, Scene};

const VERTEX_SHADER: &str = include_str!("../../shaders/position.wgsl");
const FRAGMENT_SHADER: &str = include_str!("../../shaders/uniform_color.wgsl");

pub(crate) const TRIANGLE: [PositionVertex; 3] = [
    PositionVertex::new(-0.5, -0.5, 0.0),
    PositionVertex::new(0.5, -0.5, 0.0),
    PositionVertex::new(0.0, 0.5, 0.0),
];

/// Green channel at `seconds`: a sine wave remapped to `[0, 1]`.
pub(crate) fn pulse_green(seconds: f64) -> f32 {
    (seconds.sin() / 2.0 + 0.5) as f32
}

pub(crate) fn pulse_color(seconds: f64) -> Color {
    Color::rgb(0.0, pulse_green(seconds), 0.0)
}

pub(crate) fn program_desc(wireframe: bool) -> ProgramDesc<'static> {
    ProgramDesc::new(
        "pulse program",
        ShaderSource::vertex("position vs", VERTEX_SHADER),
        ShaderSource::fragment("uniform color fs", FRAGMENT_SHADER),
    )
    .wireframe(wireframe)
}

/// A triangle whose fill color is updated from the clock every frame.
pub struct Pulse {
    program: Program,
    uniform: ColorUniform,
    mesh: Mesh,
}

impl Scene for Pulse {
    const NAME: &'static str = "pulse";

    fn build(ctx: &RenderCtx<'_>, options: &DemoOptions) -> Result<Self> {
        let uniform = ColorUniform::new(ctx.device, "pulse color", pulse_color(0.0));
        let program = Program::link(
            ctx,
            &program_desc(options.wireframe),
            &PositionVertex::layout(),
            &[uniform.layout()],
        )?;
        let mesh = Mesh::new(ctx.device, "pulse triangle", &TRIANGLE);
        Ok(Self { program, uniform, mesh })
    }

    fn update(&mut self, ctx: &RenderCtx<'_>, time: &FrameTime) {
        self.uniform.write(ctx.queue, pulse_color(time.elapsed));
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.program.bind(pass);
        self.uniform.bind(pass, 0);
        self.mesh.draw(pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_engine::render::program::check_link;
    use glint_engine::render::shader::check_source;
    use std::f64::consts::PI;

    #[test]
    fn green_starts_at_half() {
        assert!((pulse_green(0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn green_peaks_and_bottoms_out() {
        assert!((pulse_green(PI / 2.0) - 1.0).abs() < 1e-6);
        assert!(pulse_green(3.0 * PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn green_stays_in_unit_range() {
        for step in 0..1000 {
            let g = pulse_green(step as f64 * 0.037);
            assert!((0.0..=1.0).contains(&g), "green {g} out of range");
        }
    }

    #[test]
    fn pulse_color_is_opaque_green_only() {
        let c = pulse_color(1.0);
        assert_eq!((c.r, c.b, c.a), (0.0, 0.0, 1.0));
    }

    #[test]
    fn program_links_without_vertex_color() {
        let desc = program_desc(false);
        let (_, vs) = check_source(&desc.vertex).unwrap();
        let (_, fs) = check_source(&desc.fragment).unwrap();
        assert!(fs.inputs.is_empty());
        check_link(desc.label, &vs, &fs, &PositionVertex::layout(), 1, desc.polygon_mode, false).unwrap();
    }

    #[test]
    fn program_needs_the_uniform_layout() {
        let desc = program_desc(false);
        let (_, vs) = check_source(&desc.vertex).unwrap();
        let (_, fs) = check_source(&desc.fragment).unwrap();
        let err = check_link(desc.label, &vs, &fs, &PositionVertex::layout(), 0, desc.polygon_mode, false)
            .unwrap_err();
        assert!(err.to_string().contains("@group(0) @binding(0)"));
    }
}
