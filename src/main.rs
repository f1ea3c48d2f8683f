use anyhow::ensure;
use clap::Parser;
use log::info;

use phong_tracer::scene::Scene;

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.log_level);

    let mut scene = Scene::load(&args.scene)?;

    if let Some(width) = args.width {
        ensure!(width > 0, "--width must be positive");
        scene.width = width;
    }

    if let Some(height) = args.height {
        ensure!(height > 0, "--height must be positive");
        scene.height = height;
    }

    let canvas = scene.render();
    canvas.save(&args.output)?;

    info!("Wrote {}x{} image to {:?}.", canvas.width, canvas.height, args.output);
    Ok(())
}
