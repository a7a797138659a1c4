//! Tutorial programs.
//!
//! Every demo follows the same loop: check the close keys, clear the screen,
//! bind program and geometry, draw, present. GPU resources are created on the
//! first frame and released when the loop ends.

mod colored_triangle;
mod indexed_quad;
mod pulse;
mod two_triangles;

pub use colored_triangle::ColoredTriangle;
pub use indexed_quad::IndexedQuad;
pub use pulse::Pulse;
pub use two_triangles::TwoTriangles;

use anyhow::Result;
use glint_engine::core::{App, AppControl, FrameCtx};
use glint_engine::input::{InputFrame, InputState, Key};
use glint_engine::paint::Color;
use glint_engine::render::RenderCtx;
use glint_engine::time::FrameTime;

/// Background every demo clears to.
pub const CLEAR_COLOR: Color = Color::rgb(0.2, 0.3, 0.3);

/// Pressing any of these closes the window.
pub const CLOSE_KEYS: [Key; 2] = [Key::Space, Key::Escape];

/// Settings shared by all demos.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct DemoOptions {
    pub wireframe: bool,
}

impl DemoOptions {
    /// Falls back to filled polygons when the device cannot draw lines.
    pub fn for_device(self, wireframe_supported: bool) -> Self {
        if self.wireframe && !wireframe_supported {
            log::warn!("wireframe requested but POLYGON_MODE_LINE is unavailable; drawing filled");
            return Self { wireframe: false };
        }
        self
    }
}

/// GPU-side content of one demo.
pub trait Scene: Sized {
    const NAME: &'static str;

    /// Compiles programs and uploads geometry.
    fn build(ctx: &RenderCtx<'_>, options: &DemoOptions) -> Result<Self>;

    /// Per-frame state update, before drawing.
    fn update(&mut self, ctx: &RenderCtx<'_>, time: &FrameTime) {
        let _ = (ctx, time);
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>);
}

/// Outcome of the input/setup half of a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Step {
    /// A close key is down or was tapped this frame.
    Close,
    /// Setup failed; the error has been logged.
    Abort,
    Draw,
}

fn close_requested(input: &InputState, frame: &InputFrame) -> bool {
    input.any_down(&CLOSE_KEYS) || CLOSE_KEYS.iter().any(|k| frame.pressed(*k))
}

/// Drives a [`Scene`] from the runtime loop.
pub struct DemoApp<S: Scene> {
    options: DemoOptions,
    scene: Option<S>,
    frames: u64,
}

impl<S: Scene> DemoApp<S> {
    pub fn new(options: DemoOptions) -> Self {
        Self { options, scene: None, frames: 0 }
    }

    /// Checks the close keys, then builds the scene on first use.
    fn prepare<B>(&mut self, input: &InputState, frame: &InputFrame, build: B) -> Step
    where
        B: FnOnce(&DemoOptions) -> Result<S>,
    {
        if close_requested(input, frame) {
            log::info!("close key pressed");
            return Step::Close;
        }

        if self.scene.is_none() {
            match build(&self.options) {
                Ok(scene) => {
                    log::info!("{} ready", S::NAME);
                    self.scene = Some(scene);
                }
                Err(err) => {
                    log::error!("{} setup failed: {err:#}", S::NAME);
                    return Step::Abort;
                }
            }
        }

        Step::Draw
    }
}

impl<S: Scene> App for DemoApp<S> {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.scene.is_none() {
            self.options = self
                .options
                .for_device(ctx.gpu.supports(wgpu::Features::POLYGON_MODE_LINE));
        }

        let rctx = ctx.render_ctx();
        match self.prepare(ctx.input, ctx.input_frame, |options| S::build(&rctx, options)) {
            Step::Close => {
                ctx.runtime.exit();
                return AppControl::Continue;
            }
            Step::Abort => return AppControl::Exit,
            Step::Draw => {}
        }

        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Exit;
        };

        scene.update(&ctx.render_ctx(), &ctx.time);
        self.frames += 1;

        ctx.render(CLEAR_COLOR, |_, target| {
            let mut pass = target.pass(S::NAME);
            scene.draw(&mut pass);
        })
    }

    fn on_exit(&mut self) {
        if self.scene.take().is_some() {
            log::info!("{} released after {} frames", S::NAME, self.frames);
        }
    }
}
