use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gifdoc_core::{Config, FfmpegProducer};

/// Convert media/videos into GIFs and reference them from README.md
#[derive(Parser)]
#[command(name = "gifdoc", version)]
struct Cli {}

fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let t_total = Instant::now();
    eprintln!("Starting Video to GIF automation...");

    let root = std::env::current_dir().context("Failed to resolve working directory")?;
    let config = Config::with_root(root);
    let producer = FfmpegProducer::new(config.encoder.clone());

    let summary = gifdoc_core::process(&config, &producer, &|stage, current, total, message| {
        eprintln!("[{}] {}/{} {}", stage, current + 1, total, message);
    })?;

    eprintln!(
        "Done! {} videos, {} converted, {} already present, {} failed, {} references added ({:.2}s)",
        summary.videos_found,
        summary.converted,
        summary.already_present,
        summary.failed,
        summary.references_added,
        t_total.elapsed().as_secs_f64()
    );

    Ok(())
}
