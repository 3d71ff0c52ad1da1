//! monosynth - play the synth engine through the default output device
//!
//! Run with: cargo run -- play c4 e4 g4

mod app;
mod cli;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use monosynth::EngineConfig;

use cli::{Cli, Commands};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .wrap_err_with(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Play(args) => app::play(config, args),
        Commands::Drone(args) => app::drone(config, args),
        Commands::GenerateConfig(args) => {
            EngineConfig::write_default(&args.out)
                .wrap_err_with(|| format!("failed to write {}", args.out.display()))?;
            println!("Generated default config at {}", args.out.display());
            Ok(())
        }
    }
}
