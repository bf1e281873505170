//! Reverie CLI - terminal AI-awakening screensaver

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;

use reverie::{Overrides, OutputSink, RunConfig, Runner, Theme};

#[derive(Parser)]
#[command(name = "reverie")]
#[command(about = "Terminal screensaver that plays back a fictional AI boot and awakening")]
#[command(version)]
struct Cli {
    /// Visual theme (unknown names fall back to the default palette)
    #[arg(long)]
    theme: Option<String>,

    /// Speed multiplier; higher is faster. Invalid values fall back to 1.0
    #[arg(long)]
    speed: Option<f64>,

    /// Pause for a keypress between phases
    #[arg(long)]
    interactive: bool,

    /// Keep emitting random beats after the scripted phases, until Ctrl-C
    #[arg(long)]
    monitoring: bool,

    /// Append every rendered line, styling stripped, to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// JSON file of overrides; CLI flags win over file values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible narrative
    #[arg(long)]
    seed: Option<u64>,

    /// Cap the monitoring loop at this many seconds
    #[arg(long)]
    duration: Option<u64>,

    /// List available themes and exit
    #[arg(long)]
    list_themes: bool,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        let mut cfg = RunConfig::default();

        if let Some(path) = &self.config {
            match Overrides::load(path) {
                Ok(overrides) => cfg.apply_overrides(&overrides),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "config file ignored");
                }
            }
        }

        // Flags win over file values
        if let Some(theme) = self.theme {
            cfg.theme = theme;
        }
        if let Some(speed) = self.speed {
            cfg.speed = RunConfig::clamp_speed(speed);
        }
        if self.interactive {
            cfg.interactive = true;
        }
        if self.monitoring {
            cfg.monitoring = true;
        }
        if let Some(log_file) = self.log_file {
            cfg.log_file = Some(log_file);
        }
        if let Some(seed) = self.seed {
            cfg.seed = Some(seed);
        }
        if let Some(duration) = self.duration {
            cfg.duration = Some(duration);
        }
        cfg
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list_themes {
        for name in Theme::available() {
            println!("{name}");
        }
        return Ok(());
    }

    let cfg = cli.into_config();
    let sink = OutputSink::stdout(cfg.log_file.as_deref());

    // Ctrl-C flips the stop flag; the sequencer notices at the next
    // beat boundary and plays the farewell before exiting.
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\n{}", "interrupt received - shutting down".yellow());
                stop.store(true, Ordering::Relaxed);
            }
        });
    }

    // The show is deliberately synchronous: in-order writes are what
    // make the typing effects work.
    let result = tokio::task::spawn_blocking(move || {
        let mut runner = Runner::new(cfg, sink, stop);
        runner.run();
    })
    .await;

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
    }
    Ok(())
}
