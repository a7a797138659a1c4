//! Glint engine crate.
//!
//! Owns the platform + GPU runtime pieces used by the demo programs:
//! a single window, its surface, keyboard input, frame timing, and the
//! shader / program / mesh primitives needed to put geometry on screen.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod paint;
pub mod render;
