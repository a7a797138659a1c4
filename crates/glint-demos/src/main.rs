mod cli;
mod demos;

use anyhow::Result;
use clap::Parser;

use glint_engine::logging::init_logging;
use glint_engine::window::Runtime;

use cli::{Cli, DemoKind};
use demos::{ColoredTriangle, DemoApp, IndexedQuad, Pulse, TwoTriangles};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logging_config());

    log::info!("running {:?} (wireframe: {})", cli.demo, cli.wireframe);

    let config = cli.runtime_config();
    let gpu_init = cli.gpu_init();
    let options = cli.demo_options();

    match cli.demo {
        DemoKind::ColoredTriangle => Runtime::run(config, gpu_init, DemoApp::<ColoredTriangle>::new(options)),
        DemoKind::TwoTriangles => Runtime::run(config, gpu_init, DemoApp::<TwoTriangles>::new(options)),
        DemoKind::IndexedQuad => Runtime::run(config, gpu_init, DemoApp::<IndexedQuad>::new(options)),
        DemoKind::Pulse => Runtime::run(config, gpu_init, DemoApp::<Pulse>::new(options)),
    }
}
