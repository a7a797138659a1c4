//! WGSL shader stages.
//!
//! Sources are parsed and validated with naga before a wgpu module is created,
//! so compile failures surface as [`ShaderError::Compile`] with the compiler's
//! diagnostics instead of a device-level validation error. The entry point's
//! `@location` inputs and outputs and the `@group/@binding` resources it
//! touches are recorded for program linking.

use std::fmt;

use super::ShaderError;

/// Pipeline stage a shader source targets.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }

    fn naga(self) -> naga::ShaderStage {
        match self {
            Self::Vertex => naga::ShaderStage::Vertex,
            Self::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WGSL source for one stage.
#[derive(Debug, Copy, Clone)]
pub struct ShaderSource<'a> {
    pub label: &'a str,
    pub stage: ShaderStage,
    pub code: &'a str,
    pub entry_point: &'a str,
}

impl<'a> ShaderSource<'a> {
    /// Vertex stage with entry point `vs_main`.
    pub const fn vertex(label: &'a str, code: &'a str) -> Self {
        Self { label, stage: ShaderStage::Vertex, code, entry_point: "vs_main" }
    }

    /// Fragment stage with entry point `fs_main`.
    pub const fn fragment(label: &'a str, code: &'a str) -> Self {
        Self { label, stage: ShaderStage::Fragment, code, entry_point: "fs_main" }
    }

    pub const fn with_entry_point(mut self, entry_point: &'a str) -> Self {
        self.entry_point = entry_point;
        self
    }
}

/// Scalar class of a `@location` value.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IoKind {
    Float,
    Sint,
    Uint,
    Bool,
}

impl From<naga::ScalarKind> for IoKind {
    fn from(kind: naga::ScalarKind) -> Self {
        match kind {
            naga::ScalarKind::Float | naga::ScalarKind::AbstractFloat => Self::Float,
            naga::ScalarKind::Sint | naga::ScalarKind::AbstractInt => Self::Sint,
            naga::ScalarKind::Uint => Self::Uint,
            naga::ScalarKind::Bool => Self::Bool,
        }
    }
}

/// One user-defined `@location` slot of an entry point.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IoSlot {
    pub location: u32,
    pub kind: IoKind,
    pub components: u8,
}

impl fmt::Display for IoSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@location({}) {:?}x{}", self.location, self.kind, self.components)
    }
}

/// A `@group(g) @binding(b)` resource an entry point uses.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct ResourceSlot {
    pub group: u32,
    pub binding: u32,
}

impl fmt::Display for ResourceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@group({}) @binding({})", self.group, self.binding)
    }
}

/// What an entry point exchanges with the rest of the pipeline.
///
/// Slots are sorted by location, resources by group then binding. Builtins are
/// skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct StageInterface {
    pub stage: ShaderStage,
    pub inputs: Vec<IoSlot>,
    pub outputs: Vec<IoSlot>,
    pub resources: Vec<ResourceSlot>,
}

impl StageInterface {
    pub fn input(&self, location: u32) -> Option<&IoSlot> {
        self.inputs.iter().find(|s| s.location == location)
    }

    pub fn output(&self, location: u32) -> Option<&IoSlot> {
        self.outputs.iter().find(|s| s.location == location)
    }

    fn reflect(
        stage: ShaderStage,
        module: &naga::Module,
        ep: &naga::EntryPoint,
        usage: &naga::valid::FunctionInfo,
    ) -> Result<Self, String> {
        let mut inputs = Vec::new();
        for arg in &ep.function.arguments {
            collect_slots(module, arg.ty, arg.binding.as_ref(), &mut inputs)?;
        }

        let mut outputs = Vec::new();
        if let Some(result) = &ep.function.result {
            collect_slots(module, result.ty, result.binding.as_ref(), &mut outputs)?;
        }

        let mut resources: Vec<ResourceSlot> = module
            .global_variables
            .iter()
            .filter(|(handle, _)| !usage[*handle].is_empty())
            .filter_map(|(_, var)| var.binding.as_ref())
            .map(|b| ResourceSlot { group: b.group, binding: b.binding })
            .collect();

        inputs.sort_by_key(|s| s.location);
        outputs.sort_by_key(|s| s.location);
        resources.sort();
        Ok(Self { stage, inputs, outputs, resources })
    }
}

fn collect_slots(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<IoSlot>,
) -> Result<(), String> {
    match binding {
        Some(naga::Binding::BuiltIn(_)) => Ok(()),
        Some(naga::Binding::Location { location, .. }) => {
            out.push(io_slot(module, ty, *location)?);
            Ok(())
        }
        // Unbound values are structs whose members carry the bindings.
        None => match &module.types[ty].inner {
            naga::TypeInner::Struct { members, .. } => {
                for member in members {
                    collect_slots(module, member.ty, member.binding.as_ref(), out)?;
                }
                Ok(())
            }
            other => Err(format!("entry point value without binding: {other:?}")),
        },
    }
}

fn io_slot(module: &naga::Module, ty: naga::Handle<naga::Type>, location: u32) -> Result<IoSlot, String> {
    let (scalar, components) = match &module.types[ty].inner {
        naga::TypeInner::Scalar(scalar) => (*scalar, 1),
        naga::TypeInner::Vector { size, scalar } => (*scalar, *size as u8),
        other => return Err(format!("unsupported type at @location({location}): {other:?}")),
    };
    Ok(IoSlot { location, kind: scalar.kind.into(), components })
}

/// naga validation capabilities for the shader features enabled on a device.
pub fn shader_capabilities(features: wgpu::Features) -> naga::valid::Capabilities {
    use naga::valid::Capabilities as Caps;

    let mut caps = Caps::default();
    caps.set(Caps::IMMEDIATES, features.contains(wgpu::Features::IMMEDIATES));
    caps.set(Caps::FLOAT64, features.contains(wgpu::Features::SHADER_F64));
    caps.set(Caps::SHADER_FLOAT16, features.contains(wgpu::Features::SHADER_F16));
    caps.set(Caps::PRIMITIVE_INDEX, features.contains(wgpu::Features::SHADER_PRIMITIVE_INDEX));
    caps
}

/// Parses and validates `source` for a device without optional shader
/// features, returning the naga module and the entry point's interface.
pub fn check_source(source: &ShaderSource<'_>) -> Result<(naga::Module, StageInterface), ShaderError> {
    check_source_for(source, wgpu::Features::empty())
}

/// Like [`check_source`], validating against the shader features in `features`.
pub fn check_source_for(
    source: &ShaderSource<'_>,
    features: wgpu::Features,
) -> Result<(naga::Module, StageInterface), ShaderError> {
    let fail = |log: String| ShaderError::compile(source.stage, source.label, log);

    let module = naga::front::wgsl::parse_str(source.code)
        .map_err(|e| fail(e.emit_to_string(source.code)))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        shader_capabilities(features),
    );
    let info = validator
        .validate(&module)
        .map_err(|e| fail(e.emit_to_string(source.code)))?;

    let stage = source.stage.naga();
    let index = module
        .entry_points
        .iter()
        .position(|ep| ep.name == source.entry_point && ep.stage == stage)
        .ok_or_else(|| fail(format!("no {} entry point named `{}`", source.stage, source.entry_point)))?;

    let interface = StageInterface::reflect(
        source.stage,
        &module,
        &module.entry_points[index],
        info.get_entry_point(index),
    )
    .map_err(fail)?;

    Ok((module, interface))
}

/// Formats compiler messages as `line:column: message`, one per line.
///
/// Returns the error log (if any message is an error) and the warnings.
fn split_messages(info: &wgpu::CompilationInfo) -> (Option<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for msg in &info.messages {
        let text = match &msg.location {
            Some(loc) => format!("{}:{}: {}", loc.line_number, loc.line_position, msg.message),
            None => msg.message.clone(),
        };
        match msg.message_type {
            wgpu::CompilationMessageType::Error => errors.push(text),
            wgpu::CompilationMessageType::Warning => warnings.push(text),
            wgpu::CompilationMessageType::Info => log::debug!("{text}"),
        }
    }

    let errors = (!errors.is_empty()).then(|| errors.join("\n"));
    (errors, warnings)
}

/// A validated stage ready to be linked into a program.
#[derive(Debug)]
pub struct CompiledShader {
    pub(crate) entry_point: String,
    pub(crate) interface: StageInterface,
    pub(crate) module: wgpu::ShaderModule,
}

impl CompiledShader {
    /// Validates `source` against the device's shader features, creates the
    /// module, and checks the backend's compilation messages.
    ///
    /// Warnings are logged; any error becomes [`ShaderError::Compile`].
    pub fn compile(device: &wgpu::Device, source: &ShaderSource<'_>) -> Result<Self, ShaderError> {
        let (_, interface) = check_source_for(source, device.features())?;
        let fail = |log: String| ShaderError::compile(source.stage, source.label, log);

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(source.label),
            source: wgpu::ShaderSource::Wgsl(source.code.into()),
        });
        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(fail(err.to_string()));
        }

        let (errors, warnings) = split_messages(&pollster::block_on(module.get_compilation_info()));
        for warning in &warnings {
            log::warn!("{} shader `{}`: {warning}", source.stage, source.label);
        }
        if let Some(log) = errors {
            return Err(fail(log));
        }

        log::debug!(
            "compiled {} shader `{}` ({} inputs, {} outputs, {} resources)",
            source.stage,
            source.label,
            interface.inputs.len(),
            interface.outputs.len(),
            interface.resources.len()
        );

        Ok(Self {
            entry_point: source.entry_point.to_string(),
            interface,
            module,
        })
    }

    pub fn interface(&self) -> &StageInterface {
        &self.interface
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn reflects_vertex_inputs_and_outputs() {
        let (_, iface) = check_source(&ShaderSource::vertex("vs", COLOR_VS)).unwrap();

        assert_eq!(iface.inputs.len(), 2);
        assert_eq!(iface.input(0), Some(&IoSlot { location: 0, kind: IoKind::Float, components: 3 }));
        assert_eq!(iface.input(1), Some(&IoSlot { location: 1, kind: IoKind::Float, components: 3 }));

        // The builtin position is not a user slot.
        assert_eq!(iface.outputs, vec![IoSlot { location: 0, kind: IoKind::Float, components: 3 }]);
    }

    #[test]
    fn reflects_fragment_target() {
        let (_, iface) = check_source(&ShaderSource::fragment("fs", COLOR_FS)).unwrap();
        assert_eq!(iface.inputs.len(), 1);
        assert_eq!(iface.output(0).map(|s| s.components), Some(4));
    }

    #[test]
    fn syntax_error_is_compile_error() {
        let broken = "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0) }";
        let err = check_source(&ShaderSource::vertex("broken", broken)).unwrap_err();
        match err {
            ShaderError::Compile { stage, label, log } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert_eq!(label, "broken");
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn type_error_is_compile_error() {
        let bad = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    let x: f32 = 1u;
    return vec4<f32>(x);
}
"#;
        let err = check_source(&ShaderSource::fragment("bad", bad)).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Fragment, .. }));
    }

    #[test]
    fn missing_entry_point_is_compile_error() {
        let src = ShaderSource::vertex("vs", COLOR_VS).with_entry_point("main");
        let err = check_source(&src).unwrap_err();
        assert!(err.to_string().contains("no vertex entry point named `main`"));
    }

    #[test]
    fn entry_point_stage_must_match() {
        // `fs_main` exists but is a fragment entry point.
        let src = ShaderSource::vertex("fs-as-vs", COLOR_FS).with_entry_point("fs_main");
        assert!(check_source(&src).is_err());
    }

    #[test]
    fn reflects_used_resources_only() {
        let src = r#"
@group(0) @binding(0) var<uniform> u_color: vec4<f32>;
@group(1) @binding(2) var<uniform> u_unused: vec4<f32>;

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return u_color;
}
"#;
        let (_, iface) = check_source(&ShaderSource::fragment("fs", src)).unwrap();
        assert_eq!(iface.stage, ShaderStage::Fragment);
        assert_eq!(iface.resources, vec![ResourceSlot { group: 0, binding: 0 }]);
    }

    #[test]
    fn optional_shader_features_follow_the_device() {
        let src = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    var x: f64 = f64(1.0);
    return vec4<f32>(f32(x));
}
"#;
        let source = ShaderSource::fragment("f64", src);

        let err = check_source(&source).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { .. }));
        assert!(check_source_for(&source, wgpu::Features::SHADER_F64).is_ok());
    }

    #[test]
    fn capabilities_track_features() {
        use naga::valid::Capabilities as Caps;

        let none = shader_capabilities(wgpu::Features::empty());
        assert!(!none.contains(Caps::FLOAT64));
        assert!(none.contains(Caps::default()));

        let f64_caps = shader_capabilities(wgpu::Features::SHADER_F64);
        assert!(f64_caps.contains(Caps::FLOAT64));
        assert!(!f64_caps.contains(Caps::SHADER_FLOAT16));
    }

    fn message(
        message_type: wgpu::CompilationMessageType,
        text: &str,
        line: Option<u32>,
    ) -> wgpu::CompilationMessage {
        wgpu::CompilationMessage {
            message: text.to_string(),
            message_type,
            location: line.map(|line_number| wgpu::SourceLocation {
                line_number,
                line_position: 5,
                offset: 0,
                length: 1,
            }),
        }
    }

    #[test]
    fn warnings_do_not_fail_compilation() {
        use wgpu::CompilationMessageType as T;

        let info = wgpu::CompilationInfo {
            messages: vec![message(T::Warning, "unused variable `x`", Some(3)), message(T::Info, "note", None)],
        };
        let (errors, warnings) = split_messages(&info);
        assert_eq!(errors, None);
        assert_eq!(warnings, vec!["3:5: unused variable `x`".to_string()]);
    }

    #[test]
    fn errors_are_joined_into_one_log() {
        use wgpu::CompilationMessageType as T;

        let info = wgpu::CompilationInfo {
            messages: vec![
                message(T::Error, "expected `;`", Some(2)),
                message(T::Warning, "shadowed", None),
                message(T::Error, "unknown type", None),
            ],
        };
        let (errors, warnings) = split_messages(&info);
        assert_eq!(errors.as_deref(), Some("2:5: expected `;`\nunknown type"));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn stage_names() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}
