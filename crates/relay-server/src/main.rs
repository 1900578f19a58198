//! Input Relay server — entry point.
//!
//! Binds the TCP listener, accepts agent connections, and replays the
//! forwarded input events onto this machine until Ctrl+C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config() + CLI overrides
//!  └─ network::bind()             -- classified bind errors
//!  └─ network::run_server()       -- one session task per agent
//!       └─ ReplayInputUseCase     -- shared, behind a Tokio mutex
//!            └─ InputInjector     -- OS event synthesis
//! ```
//!
//! All sessions share one use case so injection into the OS stays serialized
//! no matter how many agents are connected.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use relay_core::ScreenGeometry;
use relay_server::application::replay_input::ReplayInputUseCase;
use relay_server::infrastructure::{
    config::{load_config, ServerConfig},
    injection::mock::RecordingInjector,
    network,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Input Relay server.
///
/// Listens for capture agents and replays their forwarded keyboard and
/// mouse events on this machine.
#[derive(Debug, Parser)]
#[command(
    name = "relay-server",
    about = "Receives forwarded input events and replays them locally",
    version
)]
struct Cli {
    /// TCP port to listen on.
    ///
    /// Falls back to the `[network] port` config value when omitted.
    #[arg(env = "INPUT_RELAY_PORT")]
    port: Option<u16>,

    /// IP address to bind the listener to, overriding the config file.
    #[arg(long, env = "INPUT_RELAY_BIND")]
    bind: Option<String>,

    /// Local screen width in pixels, overriding the config file.
    #[arg(long)]
    screen_width: Option<u32>,

    /// Local screen height in pixels, overriding the config file.
    #[arg(long)]
    screen_height: Option<u32>,
}

impl Cli {
    /// Folds CLI overrides into the on-disk config.
    fn apply_to(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(bind) = self.bind {
            config.network.bind_address = bind;
        }
        if let Some(port) = self.port {
            config.network.port = port;
        }
        if let Some(width) = self.screen_width {
            config.screen.width = width;
        }
        if let Some(height) = self.screen_height {
            config.screen.height = height;
        }
        config
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.apply_to(load_config()?);

    // Initialise structured logging.  RUST_LOG wins over the config value.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    info!("Input Relay server starting");

    let addr: SocketAddr = format!("{}:{}", config.network.bind_address, config.network.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid bind address: '{}:{}'",
                config.network.bind_address, config.network.port
            )
        })?;

    // ── Replay pipeline ───────────────────────────────────────────────────────
    // In production: replace RecordingInjector with an OS-synthesis
    // implementation selected by compile target.
    let injector = Arc::new(RecordingInjector::new());
    let screen = ScreenGeometry::new(config.screen.width, config.screen.height);
    info!("replaying onto a {}x{} screen", screen.width, screen.height);
    let use_case = Arc::new(Mutex::new(ReplayInputUseCase::new(injector, screen)));

    // ── Listener ──────────────────────────────────────────────────────────────
    let listener = match network::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("{e}");
            return Err(e.into());
        }
    };
    info!("listening on {addr}; press Ctrl+C to stop");

    // ── Serve until shutdown ──────────────────────────────────────────────────
    tokio::select! {
        result = network::run_server(listener, Arc::clone(&use_case)) => {
            result.context("listener failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    let replayed = use_case.lock().await.replayed_events();
    info!("Input Relay server stopped ({replayed} event(s) replayed)");
    Ok(())
}
