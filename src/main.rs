//! Anchor Layout CLI
//!
//! Usage:
//!   anchor-layout [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>  Settings file with [layout] and [svg] tables (TOML format)
//!       --svg            Print SVG instead of the geometry report
//!   -d, --debug          Draw anchor lines in SVG output
//!   -v, --verbose        Log engine activity (repeat for more detail)
//!   -h, --help           Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use anchor_layout::{render_svg, run_with_config, RunConfig, Settings};

#[derive(Parser)]
#[command(name = "anchor-layout")]
#[command(about = "Anchor-based widget layout, driven by scene scripts")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Settings file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print SVG instead of the geometry report
    #[arg(long)]
    svg: bool,

    /// Debug mode: draw anchor lines in SVG output
    #[arg(short, long)]
    debug: bool,

    /// Log engine activity; -v for debug, -vv for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match &cli.config {
        Some(path) => match Settings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading settings '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let config = RunConfig::new()
        .with_settings(settings)
        .with_debug(cli.debug);
    let scene = match run_with_config(&source, &config) {
        Ok(scene) => scene,
        Err(e) => {
            eprint!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    };

    if cli.svg {
        let mut svg = config.svg.clone();
        if config.debug {
            svg = svg.with_anchors(true);
        }
        println!("{}", render_svg(&scene, &svg));
    } else {
        print!("{}", scene.report());
    }
}

/// `-v` overrides `RUST_LOG`; without either only warnings are shown
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("anchor_layout=debug"),
        _ => EnvFilter::new("anchor_layout=trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
