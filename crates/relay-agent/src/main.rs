//! Input Relay capture agent — entry point.
//!
//! Connects to the relay server, starts the local input source, and pumps
//! captured events through the forward-input use case until the connection
//! drops or the user presses Ctrl+C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config() + CLI overrides
//!  └─ network::connect()          -- one TCP connection, 5s timeout
//!  └─ InputSource::start()        -- OS capture on its own thread
//!  └─ bridge thread               -- std::mpsc -> tokio::mpsc
//!  └─ forward loop
//!       ├─ CapturedEvent -> ForwardInputUseCase -> framed TCP write
//!       └─ Ctrl+C / send failure -> shutdown
//! ```
//!
//! # Why the bridge thread?
//!
//! OS input hooks deliver events on a dedicated thread through a blocking
//! `std::sync::mpsc` channel.  A small bridge thread forwards them into a
//! `tokio::sync::mpsc` channel so the async forward loop can `select!` on
//! events and Ctrl+C together without blocking the runtime.

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use relay_agent::application::forward_input::ForwardInputUseCase;
use relay_agent::infrastructure::{
    capture::{mock::MockInputSource, CapturedEvent, InputSource},
    config::{load_config, AgentConfig},
    network,
    screen_info::{ConfiguredScreenProbe, ScreenProbe},
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Input Relay capture agent.
///
/// Captures local keyboard and mouse events and forwards them to a relay
/// server, which replays them on its own machine.
#[derive(Debug, Parser)]
#[command(
    name = "relay-agent",
    about = "Forwards local keyboard/mouse input to an Input Relay server",
    version
)]
struct Cli {
    /// Hostname or IP address of the relay server.
    ///
    /// Falls back to the `[relay] host` config value when omitted.
    #[arg(env = "INPUT_RELAY_HOST")]
    host: Option<String>,

    /// TCP port of the relay server.
    ///
    /// Falls back to the `[relay] port` config value when omitted.
    #[arg(long, env = "INPUT_RELAY_PORT")]
    port: Option<u16>,

    /// Local screen width in pixels, overriding the config file.
    #[arg(long)]
    screen_width: Option<u32>,

    /// Local screen height in pixels, overriding the config file.
    #[arg(long)]
    screen_height: Option<u32>,
}

impl Cli {
    /// Folds CLI overrides into the on-disk config.
    fn apply_to(self, mut config: AgentConfig) -> AgentConfig {
        if let Some(host) = self.host {
            config.relay.host = host;
        }
        if let Some(port) = self.port {
            config.relay.port = port;
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
                .unwrap_or_else(|_| EnvFilter::new(config.agent.log_level.clone())),
        )
        .init();

    info!("Input Relay agent starting");

    // ── Screen geometry ───────────────────────────────────────────────────────
    let probe = ConfiguredScreenProbe::new(config.screen.width, config.screen.height);
    let screen = probe.probe()?;
    info!("capturing on a {}x{} screen", screen.width, screen.height);

    // ── Relay connection ──────────────────────────────────────────────────────
    // Connect failures are terminal: the classified error goes to the log
    // and the process exits non-zero.
    let transport = match network::connect(&config.relay.host, config.relay.port).await {
        Ok(t) => t,
        Err(e) => {
            error!("{e}");
            return Err(e.into());
        }
    };
    let mut use_case = ForwardInputUseCase::new(Box::new(transport), screen);

    // ── Input source ──────────────────────────────────────────────────────────
    // In production: replace MockInputSource with an OS-hook implementation
    // selected by compile target.
    let source = MockInputSource::new();
    let capture_rx = source.start()?;

    // Bridge the blocking capture channel into the async world.
    let (tx, mut rx) = tokio::sync::mpsc::channel::<CapturedEvent>(256);
    let bridge = std::thread::spawn(move || {
        while let Ok(event) = capture_rx.recv() {
            if tx.blocking_send(event).is_err() {
                break;
            }
        }
    });

    // ── Forward loop ──────────────────────────────────────────────────────────
    info!(
        "forwarding input to {}:{}; press Ctrl+C to stop",
        config.relay.host, config.relay.port
    );

    loop {
        tokio::select! {
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(event) => {
                        if let Err(e) = use_case.handle_event(event).await {
                            error!("forwarding stopped: {e}");
                            break;
                        }
                    }
                    None => {
                        info!("capture channel closed");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                use_case.close();
                break;
            }
        }
    }

    // ── Shutdown ──────────────────────────────────────────────────────────────
    source.stop();
    if bridge.join().is_err() {
        warn!("capture bridge thread panicked during shutdown");
    }
    if use_case.dropped_events() > 0 {
        info!("{} event(s) dropped after link closed", use_case.dropped_events());
    }

    info!("Input Relay agent stopped");
    Ok(())
}
