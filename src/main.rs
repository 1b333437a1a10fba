//! `lagna-server`: HTTP front end for the chart engine.
//!
//! ```bash
//! SWISSEPH_SRC=/opt/swisseph/src cargo run --release --features swisseph -- --port 8000
//! ```
//!
//! A plain `cargo run` builds without `swisseph` and exits with an error,
//! as no ephemeris backend is linked.
//!
//! Configuration is read from `--config` / `LAGNA_CONFIG` (TOML), then
//! `HOST`, `PORT` and `LAGNA_UTC_OFFSET`, then the flags below.
//! `RUST_LOG` overrides the configured log filter.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lagna_core::http::{create_router, AppState};
use lagna_core::{DashaMode, Ephemeris, ServiceConfig};

#[derive(Debug, Parser)]
#[command(name = "lagna-server", version, about = "Parashari natal chart engine over HTTP")]
struct Args {
    /// TOML configuration file
    #[arg(long, env = "LAGNA_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    /// Offset of birth times from UT, in hours
    #[arg(long, allow_hyphen_values = true)]
    utc_offset: Option<f64>,

    /// stub | vimshottari
    #[arg(long)]
    dasha_mode: Option<DashaMode>,

    /// Directory with Swiss Ephemeris data files
    #[arg(long)]
    ephemeris_path: Option<PathBuf>,

    #[arg(long)]
    oracle_timeout_ms: Option<u64>,
}

impl Args {
    fn apply(self, config: &mut ServiceConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(offset) = self.utc_offset {
            config.utc_offset_hours = offset;
        }
        if let Some(mode) = self.dasha_mode {
            config.dasha_mode = mode;
        }
        if let Some(path) = self.ephemeris_path {
            config.ephemeris.path = Some(path);
        }
        if let Some(timeout) = self.oracle_timeout_ms {
            config.oracle_timeout_ms = timeout;
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();
}

#[cfg(feature = "swisseph")]
fn open_ephemeris(config: &ServiceConfig) -> anyhow::Result<Arc<dyn Ephemeris>> {
    let eph = lagna_core::SwissEph::new(&config.ephemeris).context("initialising the Swiss Ephemeris")?;
    Ok(Arc::new(eph))
}

#[cfg(not(feature = "swisseph"))]
fn open_ephemeris(_config: &ServiceConfig) -> anyhow::Result<Arc<dyn Ephemeris>> {
    anyhow::bail!(
        "lagna-server was built without an ephemeris backend; rebuild with `--features swisseph` \
         and SWISSEPH_SRC or SWISSEPH_LIB_DIR set"
    )
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = ServiceConfig::load(args.config.as_deref()).context("loading configuration")?;
    args.apply(&mut config);
    config.validate()?;

    init_tracing(&config.log_filter);

    let ephemeris = open_ephemeris(&config)?;
    info!(
        ephemeris = ephemeris.name(),
        ephemeris_version = ephemeris.version().unwrap_or("unknown"),
        house_system = ephemeris.house_system().name(),
        utc_offset_hours = config.utc_offset_hours,
        dasha_mode = config.dasha_mode.method(),
        "chart engine ready"
    );

    let addr = config.bind_address();
    let state = AppState::new(ephemeris, config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
