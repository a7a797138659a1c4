use super::shader::{CompiledShader, IoKind, ShaderSource, ShaderStage, StageInterface};
use super::vertex::{format_kind, VertexLayout};
use super::{RenderCtx, ShaderError};

/// Inputs for [`Program::link`].
///
/// Vertex inputs are read from the vertex entry point's `@location` arguments
/// and matched against the mesh layout at link time.
#[derive(Debug, Copy, Clone)]
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub vertex: ShaderSource<'a>,
    pub fragment: ShaderSource<'a>,
    pub polygon_mode: wgpu::PolygonMode,
}

impl<'a> ProgramDesc<'a> {
    pub fn new(label: &'a str, vertex: ShaderSource<'a>, fragment: ShaderSource<'a>) -> Self {
        Self {
            label,
            vertex,
            fragment,
            polygon_mode: wgpu::PolygonMode::Fill,
        }
    }

    /// Draws polygon edges only.
    pub fn wireframe(mut self, enabled: bool) -> Self {
        self.polygon_mode = if enabled { wgpu::PolygonMode::Line } else { wgpu::PolygonMode::Fill };
        self
    }
}

/// Verifies that a vertex layout and two stages form a valid program.
///
/// - `vertex` and `fragment` come from entry points of those stages
/// - every vertex input is supplied by `layout` with a matching scalar kind
/// - every fragment input is written by the vertex stage with the same type
/// - the fragment stage writes a float color to `@location(0)`
/// - every resource either stage uses lives in one of the first `bind_groups` groups
/// - line polygon mode requires `wireframe_supported`
pub fn check_link(
    label: &str,
    vertex: &StageInterface,
    fragment: &StageInterface,
    layout: &VertexLayout,
    bind_groups: usize,
    polygon_mode: wgpu::PolygonMode,
    wireframe_supported: bool,
) -> Result<(), ShaderError> {
    let fail = |reason: String| ShaderError::link(label, reason);

    if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
        return Err(fail(format!(
            "expected vertex + fragment stages, got {} + {}",
            vertex.stage, fragment.stage
        )));
    }

    layout.validate().map_err(fail)?;

    for input in &vertex.inputs {
        let attr = layout
            .attribute(input.location)
            .ok_or_else(|| fail(format!("vertex input {input} has no vertex attribute")))?;
        let kind = format_kind(attr.format);
        if kind != input.kind {
            return Err(fail(format!(
                "vertex input {input} is fed {:?} ({kind:?})",
                attr.format
            )));
        }
    }

    for input in &fragment.inputs {
        match vertex.output(input.location) {
            None => return Err(fail(format!("fragment input {input} is not written by the vertex stage"))),
            Some(out) if out != input => {
                return Err(fail(format!("fragment input {input} does not match vertex output {out}")));
            }
            Some(_) => {}
        }
    }

    // Surface formats are all float-sampled.
    match fragment.output(0) {
        None => return Err(fail("fragment stage does not write @location(0)".to_string())),
        Some(out) if out.kind != IoKind::Float => {
            return Err(fail(format!("fragment output {out} cannot be written to the color target")));
        }
        Some(_) => {}
    }

    for resource in vertex.resources.iter().chain(&fragment.resources) {
        if resource.group as usize >= bind_groups {
            return Err(fail(format!(
                "{resource} is used but only {bind_groups} bind group layout(s) were given"
            )));
        }
    }

    if polygon_mode != wgpu::PolygonMode::Fill && !wireframe_supported {
        return Err(fail(format!("{polygon_mode:?} polygon mode is not supported by this device")));
    }

    Ok(())
}

/// A linked vertex + fragment program: one render pipeline.
pub struct Program {
    pipeline: wgpu::RenderPipeline,
}

impl Program {
    /// Compiles both stages of `desc` and links them. Stage modules are
    /// released once the pipeline exists.
    ///
    /// `bind_group_layouts` are bound in order starting at group 0.
    pub fn link(
        ctx: &RenderCtx<'_>,
        desc: &ProgramDesc<'_>,
        layout: &VertexLayout,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
    ) -> Result<Self, ShaderError> {
        let vs = CompiledShader::compile(ctx.device, &desc.vertex)?;
        let fs = CompiledShader::compile(ctx.device, &desc.fragment)?;
        Self::link_stages(ctx, desc.label, &vs, &fs, desc.polygon_mode, layout, bind_group_layouts)
    }

    /// Links already compiled stages, so one stage can serve several programs.
    ///
    /// Anything the interface check misses but the device rejects is returned
    /// as [`ShaderError::Link`] as well.
    pub fn link_stages(
        ctx: &RenderCtx<'_>,
        label: &str,
        vs: &CompiledShader,
        fs: &CompiledShader,
        polygon_mode: wgpu::PolygonMode,
        layout: &VertexLayout,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
    ) -> Result<Self, ShaderError> {
        check_link(
            label,
            vs.interface(),
            fs.interface(),
            layout,
            bind_group_layouts.len(),
            polygon_mode,
            ctx.supports_wireframe(),
        )?;

        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts,
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs.module,
                entry_point: Some(vs.entry_point.as_str()),
                compilation_options: Default::default(),
                buffers: &[layout.buffer_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs.module,
                entry_point: Some(fs.entry_point.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(ShaderError::link(label, err.to_string()));
        }

        log::info!("linked program `{label}` ({polygon_mode:?})");
        Ok(Self { pipeline })
    }

    /// Makes this program current for subsequent draws in `pass`.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader::check_source;
    use crate::render::vertex::{ColorVertex, PositionVertex, Vertex};

    const COLOR_VS: &str = r#"
struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_main(@location(0) pos: vec3<f32>, @location(1) color: vec3<f32>) -> VsOut {
    var out: VsOut;
    out.clip = vec4<f32>(pos, 1.0);
    out.color = color;
    return out;
}
"#;

    const COLOR_FS: &str = r#"
@fragment
fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(color, 1.0);
}
"#;

    const VEC4_FS: &str = r#"
@fragment
fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color;
}
"#;

    const SOLID_FS: &str = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.5, 0.2, 1.0);
}
"#;

    const INT_VS: &str = r#"
@vertex
fn vs_main(@location(0) pos: vec3<i32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(vec3<f32>(pos), 1.0);
}
"#;

    fn iface(src: ShaderSource<'_>) -> StageInterface {
        check_source(&src).unwrap().1
    }

    #[test]
    fn color_program_links_against_color_vertex() {
        let vs = iface(ShaderSource::vertex("vs", COLOR_VS));
        let fs = iface(ShaderSource::fragment("fs", COLOR_FS));
        let layout = ColorVertex::layout();
        assert!(check_link("tri", &vs, &fs, &layout, 0, wgpu::PolygonMode::Fill, false).is_ok());
    }

    #[test]
    fn missing_vertex_attribute_fails_link() {
        let vs = iface(ShaderSource::vertex("vs", COLOR_VS));
        let fs = iface(ShaderSource::fragment("fs", COLOR_FS));
        // Position-only data cannot feed @location(1).
        let err = check_link("tri", &vs, &fs, &PositionVertex::layout(), 0, wgpu::PolygonMode::Fill, false)
            .unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
        assert!(err.to_string().contains("@location(1)"));
    }

    #[test]
    fn attribute_kind_mismatch_fails_link() {
        let vs = iface(ShaderSource::vertex("vs", INT_VS));
        let fs = iface(ShaderSource::fragment("fs", SOLID_FS));
        let err = check_link("ints", &vs, &fs, &PositionVertex::layout(), 0, wgpu::PolygonMode::Fill, false)
            .unwrap_err();
        assert!(err.to_string().contains("Float32x3"));
    }

    #[test]
    fn fragment_input_type_must_match_vertex_output() {
        let vs = iface(ShaderSource::vertex("vs", COLOR_VS));
        let fs = iface(ShaderSource::fragment("fs", VEC4_FS));
        let err = check_link("tri", &vs, &fs, &ColorVertex::layout(), 0, wgpu::PolygonMode::Fill, false)
            .unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn unwritten_fragment_input_fails_link() {
        let vs = iface(ShaderSource::vertex("vs", INT_VS));
        let fs = iface(ShaderSource::fragment("fs", COLOR_FS));
        static ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Sint32x3];
        let layout = VertexLayout::new(12, &ATTRS);
        let err = check_link("tri", &vs, &fs, &layout, 0, wgpu::PolygonMode::Fill, false).unwrap_err();
        assert!(err.to_string().contains("not written by the vertex stage"));
    }

    #[test]
    fn extra_vertex_attributes_are_allowed() {
        let vs = iface(ShaderSource::vertex("vs", INT_VS));
        let fs = iface(ShaderSource::fragment("fs", SOLID_FS));
        static ATTRS: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Sint32x3, 1 => Float32x3];
        let layout = VertexLayout::new(24, &ATTRS);
        assert!(check_link("tri", &vs, &fs, &layout, 0, wgpu::PolygonMode::Fill, false).is_ok());
    }

    #[test]
    fn wireframe_requires_device_support() {
        let vs = iface(ShaderSource::vertex("vs", COLOR_VS));
        let fs = iface(ShaderSource::fragment("fs", COLOR_FS));
        let layout = ColorVertex::layout();

        let err = check_link("tri", &vs, &fs, &layout, 0, wgpu::PolygonMode::Line, false).unwrap_err();
        assert!(err.to_string().contains("Line polygon mode"));
        assert!(check_link("tri", &vs, &fs, &layout, 0, wgpu::PolygonMode::Line, true).is_ok());
    }

    const UNIFORM_FS: &str = r#"
@group(0) @binding(0) var<uniform> u_color: vec4<f32>;

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return u_color;
}
"#;

    const UINT_VS: &str = r#"
@vertex
fn vs_main(@location(0) id: u32) -> @builtin(position) vec4<f32> {
    return vec4<f32>(f32(id), 0.0, 0.0, 1.0);
}
"#;

    #[test]
    fn uniform_needs_a_bind_group_layout() {
        let vs = iface(ShaderSource::vertex("vs", INT_VS));
        let fs = iface(ShaderSource::fragment("fs", UNIFORM_FS));
        static ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Sint32x3];
        let layout = VertexLayout::new(12, &ATTRS);

        let err = check_link("pulse", &vs, &fs, &layout, 0, wgpu::PolygonMode::Fill, false).unwrap_err();
        assert!(err.to_string().contains("@group(0) @binding(0)"));
        assert!(check_link("pulse", &vs, &fs, &layout, 1, wgpu::PolygonMode::Fill, false).is_ok());
    }

    #[test]
    fn fragment_must_write_a_float_color() {
        let vs = iface(ShaderSource::vertex("vs", INT_VS));
        let int_fs = r#"
@fragment
fn fs_main() -> @location(0) vec4<i32> {
    return vec4<i32>(1);
}
"#;
        let fs = iface(ShaderSource::fragment("fs", int_fs));
        static ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Sint32x3];
        let layout = VertexLayout::new(12, &ATTRS);

        let err = check_link("ints", &vs, &fs, &layout, 0, wgpu::PolygonMode::Fill, false).unwrap_err();
        assert!(err.to_string().contains("color target"));
    }

    #[test]
    fn stages_must_be_vertex_then_fragment() {
        let fs = iface(ShaderSource::fragment("fs", SOLID_FS));
        let err = check_link("swapped", &fs, &fs, &PositionVertex::layout(), 0, wgpu::PolygonMode::Fill, false)
            .unwrap_err();
        assert!(err.to_string().contains("expected vertex + fragment stages"));
    }

    #[test]
    fn single_byte_integer_attribute_feeds_u32_input() {
        let vs = iface(ShaderSource::vertex("vs", UINT_VS));
        let fs = iface(ShaderSource::fragment("fs", SOLID_FS));

        static UINT8: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Uint8];
        let layout = VertexLayout::new(4, &UINT8);
        assert!(check_link("ids", &vs, &fs, &layout, 0, wgpu::PolygonMode::Fill, false).is_ok());

        static UNORM8: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Unorm8];
        let layout = VertexLayout::new(4, &UNORM8);
        let err = check_link("ids", &vs, &fs, &layout, 0, wgpu::PolygonMode::Fill, false).unwrap_err();
        assert!(err.to_string().contains("Unorm8"));
    }

    #[test]
    fn wireframe_builder_toggles_mode() {
        let desc = ProgramDesc::new(
            "tri",
            ShaderSource::vertex("vs", COLOR_VS),
            ShaderSource::fragment("fs", COLOR_FS),
        );
        assert_eq!(desc.polygon_mode, wgpu::PolygonMode::Fill);
        assert_eq!(desc.wireframe(true).polygon_mode, wgpu::PolygonMode::Line);
        assert_eq!(desc.wireframe(false).polygon_mode, wgpu::PolygonMode::Fill);
    }
}
