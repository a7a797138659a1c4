use clap::{Parser, ValueEnum};

use glint_engine::device::GpuInit;
use glint_engine::logging::LoggingConfig;
use glint_engine::window::RuntimeConfig;

use crate::demos::DemoOptions;

/// Which tutorial program to run.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum DemoKind {
    /// One triangle with per-vertex color.
    ColoredTriangle,
    /// Two triangles, each drawn with its own program.
    TwoTriangles,
    /// One quad drawn from an index buffer.
    IndexedQuad,
    /// A triangle colored from a per-frame uniform.
    Pulse,
}

/// Opens a window and renders a fixed piece of geometry until Space or Escape is pressed.
#[derive(Debug, Parser)]
#[command(name = "glint", version)]
pub struct Cli {
    /// Program to run.
    #[arg(value_enum, default_value_t = DemoKind::ColoredTriangle)]
    pub demo: DemoKind,

    /// Draw polygon outlines instead of filled triangles.
    #[arg(long)]
    pub wireframe: bool,

    /// Window title.
    #[arg(long)]
    pub title: Option<String>,

    /// Window width in logical pixels.
    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    /// Window height in logical pixels.
    #[arg(long, default_value_t = 600.0)]
    pub height: f64,

    /// Log filter in `env_logger` syntax; overrides RUST_LOG.
    #[arg(long = "log", value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn logging_config(&self) -> LoggingConfig {
        match &self.log_filter {
            Some(filter) => LoggingConfig::with_filter(filter.clone()),
            None => LoggingConfig::default(),
        }
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        let config = RuntimeConfig::default().with_size(self.width, self.height);
        match &self.title {
            Some(title) => config.with_title(title.clone()),
            None => config,
        }
    }

    pub fn gpu_init(&self) -> GpuInit {
        GpuInit {
            // Tutorial colors are written to the swapchain as authored.
            prefer_srgb: false,
            optional_features: if self.wireframe {
                wgpu::Features::POLYGON_MODE_LINE
            } else {
                wgpu::Features::empty()
            },
            ..GpuInit::default()
        }
    }

    pub fn demo_options(&self) -> DemoOptions {
        DemoOptions { wireframe: self.wireframe }
    }
}
