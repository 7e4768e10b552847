//! # omlink replay driver
//!
//! Loads an engine configuration, then replays a recorded event script
//! (see [`omlink_core::replay`]) through the engine. Requests the scheduler
//! sends are written to stdout, one per line; model updates are logged.
//!
//! Reads the script from stdin when no path is given.

use clap::Parser;
use omlink_common::prelude::{ConfigLoader, HeaterStatus, LogLevel, PrinterStatus, ToolStatus};
use omlink_core::Engine;
use omlink_core::alert::Alert;
use omlink_core::config::SyncConfig;
use omlink_core::link::{ModelObserver, PrinterLink};
use omlink_core::replay;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// omlink: object-model sync engine replay
#[derive(Parser, Debug)]
#[command(name = "omlink")]
#[command(version)]
#[command(about = "Replay an object-model event script through the sync engine")]
struct Args {
    /// Path to the engine configuration TOML.
    #[arg(short, long, default_value = "config/omlink.toml")]
    config: PathBuf,

    /// Event script to replay (stdin when omitted).
    script: Option<PathBuf>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    // Level from the config file when it parses; full errors come from run().
    let level = SyncConfig::load(&args.config)
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, level);

    info!("omlink v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = SyncConfig::load_validated(&args.config)?;
    info!(
        "Config OK: service={}, log_level={}",
        config.shared.service_name,
        config.shared.log_level.as_directive()
    );

    let mut engine = Engine::new(&config);
    let mut link = StdoutLink::new(io::stdout());
    let mut observer = LogObserver;

    let stats = match &args.script {
        Some(path) => {
            info!("Replaying {}", path.display());
            let file = File::open(path)?;
            replay::run(BufReader::new(file), &mut engine, &mut link, &mut observer)?
        }
        None => {
            info!("Replaying from stdin");
            replay::run(io::stdin().lock(), &mut engine, &mut link, &mut observer)?
        }
    };
    link.flush()?;

    info!(
        events = stats.events,
        messages = stats.messages,
        requests = stats.requests_sent,
        now_ms = stats.now,
        "replay complete"
    );
    Ok(())
}

/// Writes each request line to the wrapped writer.
struct StdoutLink<W: Write> {
    out: W,
    failed: bool,
}

impl<W: Write> StdoutLink<W> {
    fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> PrinterLink for StdoutLink<W> {
    fn send(&mut self, line: &str) {
        if let Err(e) = self.out.write_all(line.as_bytes()) {
            // Report once; the replay itself keeps going.
            if !self.failed {
                warn!("request output failed: {e}");
                self.failed = true;
            }
        }
    }
}

/// Logs the updates a display would render.
struct LogObserver;

impl ModelObserver for LogObserver {
    fn on_status(&mut self, status: PrinterStatus) {
        info!(?status, "status");
    }

    fn on_heater_current(&mut self, heater: u8, temp: f32) {
        debug!(heater, temp, "heater temperature");
    }

    fn on_heater_status(&mut self, heater: u8, status: HeaterStatus) {
        debug!(heater, ?status, "heater status");
    }

    fn on_tool_status(&mut self, tool: usize, status: ToolStatus) {
        debug!(tool, ?status, "tool status");
    }

    fn on_current_tool(&mut self, tool: Option<usize>) {
        info!(?tool, "current tool");
    }

    fn on_machine_name(&mut self, name: &str) {
        info!(name, "machine name");
    }

    fn on_firmware(&mut self, name: &str, version: &str) {
        info!(name, version, "firmware");
    }

    fn on_display_message(&mut self, message: &str) {
        info!(message, "display message");
    }

    fn on_alert(&mut self, alert: &Alert) {
        info!(
            mode = alert.mode,
            seq = alert.seq,
            title = alert.title.as_str(),
            text = alert.text.as_str(),
            "alert shown"
        );
    }

    fn on_alert_cleared(&mut self) {
        info!("alert cleared");
    }

    fn on_response(&mut self, text: &str) {
        info!(text, "response");
    }

    fn on_restart(&mut self) {
        warn!("remote restarted, model reset");
    }

    fn on_layout_changed(&mut self) {
        debug!("display layout changed");
    }
}

/// Setup tracing subscriber based on CLI arguments and the configured level.
///
/// Logs go to stderr; stdout carries the request lines.
fn setup_tracing(args: &Args, level: LogLevel) {
    let directive = if args.verbose {
        LogLevel::Debug.as_directive()
    } else {
        level.as_directive()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}
