//! Core engine-facing contracts.
//!
//! The stable interface between the runtime (platform loop) and the programs
//! built on it, plus the per-frame context handed to them.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
