use anyhow::{Context, Result};
use clap::Parser;
use flappy_coach::assets::Assets;
use flappy_coach::config::{Config, ScrollPolicy};
use flappy_coach::{app, audio, logging};
use std::path::PathBuf;

/// Flappy Bird in the terminal, with a coach
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with game tuning
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for pipe gaps
    #[arg(long)]
    seed: Option<u64>,

    /// Target frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// How motion relates to frame time
    #[arg(long, value_enum)]
    scroll: Option<ScrollPolicy>,

    /// Disable sound
    #[arg(short, long)]
    mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Write log records to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(fps) = args.fps {
        config.screen.fps = fps;
    }
    if let Some(scroll) = args.scroll {
        config.physics.scroll = scroll;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, args.log_file.as_deref()).context("failed to open log file")?;

    let config = load_config(&args)?;
    log::debug!("{config:?}");
    let assets = Assets::build(&config).context("failed to build sprites")?;
    let mut audio = audio::open_default(args.mute);

    app::run(config, assets, &mut *audio)
}
