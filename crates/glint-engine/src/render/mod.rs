//! GPU rendering subsystem.
//!
//! Building blocks for putting fixed geometry on screen:
//! - `shader`: WGSL stages, validated and reflected before module creation
//! - `program`: vertex + fragment stages linked into a render pipeline
//! - `vertex` / `mesh`: interleaved vertex layouts and static GPU buffers
//! - `uniform`: a per-frame color uniform
//!
//! Geometry is authored directly in normalized device coordinates.

mod ctx;
mod error;
pub mod mesh;
pub mod program;
pub mod shader;
pub mod uniform;
pub mod vertex;

pub use ctx::{RenderCtx, RenderTarget};
pub use error::ShaderError;
pub use mesh::{DrawCall, Mesh};
pub use program::{Program, ProgramDesc};
pub use shader::{CompiledShader, ShaderSource, ShaderStage};
pub use uniform::ColorUniform;
pub use vertex::{ColorVertex, PositionVertex, Vertex, VertexLayout};
