//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single Window, and wires them to the GPU layer.

mod keymap;
mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
