mod capture;

use std::{path::PathBuf, sync::Arc, time::Duration};

use chrono::Utc;
use clap::Parser;
use tmlake_metrics::render;
use tmlake_relabel::{DeviceProfile, LookupReuse, RelabelEngine, ScrapeSession};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::capture::Capture;

#[derive(Parser)]
#[command(
    name = "tmlake-replay",
    about = "Replay a captured tmlake scrape through the relabel engine"
)]
struct Cli {
    /// Captured scrape in JSON.
    capture: PathBuf,

    /// Device profile overriding the built-in appliance tables.
    #[arg(long)]
    profile: Option<PathBuf>,

    #[arg(long, default_value = "10")]
    timeout_secs: u64,

    /// Walk each name table once per scrape instead of once per instance.
    #[arg(long, default_value_t = false)]
    reuse_lookups: bool,

    #[arg(long, default_value_t = false)]
    timestamps: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::from_default_env().add_directive("tmlake=info".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = match cli.profile.as_deref() {
        Some(path) => DeviceProfile::from_file(path)?,
        None => DeviceProfile::from_env()?.unwrap_or_default(),
    };
    let capture = Capture::from_file(&cli.capture)?;

    let lookup_reuse = if cli.reuse_lookups {
        LookupReuse::PerScrape
    } else {
        LookupReuse::PerInstance
    };
    let session = ScrapeSession::new(
        capture.target.clone(),
        capture.walk_params.clone(),
        Duration::from_secs(cli.timeout_secs),
    )
    .with_lookup_reuse(lookup_reuse);
    let engine = RelabelEngine::new(profile, Arc::new(capture.scraper()));

    let instances = capture.instances(&session);
    let total = instances.len();
    let samples = engine.process_all(&session, instances).await;
    info!(
        target_addr = %session.target(),
        instances = total,
        samples = samples.len(),
        "replayed capture"
    );

    print!("{}", render(&samples, cli.timestamps.then(Utc::now)));
    Ok(())
}
