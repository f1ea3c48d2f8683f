use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use phong_tracer::consts::OUT_FILE;

/// Renders a JSON scene with Phong shading and hard shadows.
#[derive(Parser, Debug)]
#[clap(name = "phong-tracer", version, about)]
pub struct Args {
    /// Scene description (JSON)
    #[clap(parse(from_os_str))]
    pub scene: PathBuf,

    /// Output image; `.ppm` writes plain PPM, anything else goes by extension
    #[clap(short, long, parse(from_os_str), default_value = OUT_FILE)]
    pub output: PathBuf,

    /// Overrides the scene's image width
    #[clap(long)]
    pub width: Option<usize>,

    /// Overrides the scene's image height
    #[clap(long)]
    pub height: Option<usize>,

    /// One of off, error, warn, info, debug or trace
    #[clap(long, default_value = "info")]
    pub log_level: LevelFilter,
}

#[test]
fn parse_defaults() {
    let args = Args::try_parse_from(&["phong-tracer", "scene.json"]).unwrap();

    assert_eq!(args.scene, PathBuf::from("scene.json"));
    assert_eq!(args.output, PathBuf::from(OUT_FILE));
    assert_eq!(args.width, None);
    assert_eq!(args.log_level, LevelFilter::Info);
}

#[test]
fn parse_overrides() {
    let args = Args::try_parse_from(&[
        "phong-tracer", "scene.json",
        "-o", "out.png", "--width", "64", "--height", "48", "--log-level", "debug",
    ]).unwrap();

    assert_eq!(args.output, PathBuf::from("out.png"));
    assert_eq!((args.width, args.height), (Some(64), Some(48)));
    assert_eq!(args.log_level, LevelFilter::Debug);
}

#[test]
fn scene_is_required() {
    assert!(Args::try_parse_from(&["phong-tracer"]).is_err());
}
