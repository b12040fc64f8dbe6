//! Main application entry point
//!
//! Loads a dataset, builds a dashboard template over it, renders every view
//! and replays a recorded selection script, printing one JSON line per
//! render pass.

use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use xf_data::CsvLoader;
use xf_render::FigureRenderer;

mod config;
mod script;

use config::AppConfig;
use script::{load_script, replay, PassOutput};

#[derive(Parser)]
#[command(name = "crossfilter", about = "Linked brushing across dashboard views")]
struct Args {
    /// Application configuration (JSON)
    config: PathBuf,

    /// Replace the configured selection script
    #[arg(long, value_name = "PATH")]
    events: Option<PathBuf>,

    /// Pretty-print the figures
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    let mut config = AppConfig::from_path(&args.config)?;
    if args.events.is_some() {
        config.events = args.events;
    }

    let (template, dataset_config) = config.resolve()?;
    let dataset = Arc::new(CsvLoader::new(dataset_config).load_path(&config.data)?);
    info!("Loaded {:?}", dataset);

    let mut engine = template.build_engine(dataset)?;
    let renderer = FigureRenderer::new();

    let mut outputs = vec![PassOutput::from(engine.render_all(&renderer))];
    if let Some(path) = &config.events {
        let steps = load_script(path)?;
        info!("Replaying {} selection steps", steps.len());
        outputs.extend(replay(&mut engine, &renderer, &steps));
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for output in &outputs {
        if args.pretty {
            serde_json::to_writer_pretty(&mut out, output)?;
        } else {
            serde_json::to_writer(&mut out, output)?;
        }
        writeln!(out)?;
    }

    Ok(())
}
