//! Vitrine CLI - serve the site, preview effects.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use vitrine_cli::{
    logging, preview, server, Config, Format, MailRelay, PreviewOptions, RecordingRelay, Site,
    SmtpRelay,
};
use vitrine_core::Size;
use vitrine_effects::EffectKind;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Portfolio site server and canvas effect previewer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve static files and the contact endpoint
    Serve {
        /// Config file (default: ./vitrine.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Port to serve on
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory to serve
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Accept contact submissions without sending mail
        #[arg(long)]
        dry_run: bool,
    },

    /// Run an effect headless and print what it draws
    Preview {
        /// Effect name, e.g. matrix-rain
        effect: EffectKind,

        /// Canvas width in pixels
        #[arg(long, default_value = "800")]
        width: u32,

        /// Canvas height in pixels
        #[arg(long, default_value = "600")]
        height: u32,

        /// Frames to run
        #[arg(short, long, default_value = "60")]
        frames: u32,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// List available effects
    Effects,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            port,
            dir,
            dry_run,
        } => {
            let config = Config::load(config.as_deref()).context("loading configuration")?;
            logging::init(&config.logging.level);
            serve(config, port, dir, dry_run)
        }
        Commands::Preview {
            effect,
            width,
            height,
            frames,
            seed,
            format,
        } => {
            logging::init("warn");
            let options = PreviewOptions {
                size: Size::from_pixels(width, height),
                frames,
                seed,
                ..PreviewOptions::default()
            };
            let report = preview::run_kind(effect, &options)
                .with_context(|| format!("previewing {effect}"))?;
            println!("{}", report.render(format)?);
            Ok(())
        }
        Commands::Effects => {
            for kind in EffectKind::ALL {
                println!("{:<18} {}", kind.name(), kind.description());
            }
            Ok(())
        }
    }
}

fn serve(config: Config, port: Option<u16>, dir: Option<PathBuf>, dry_run: bool) -> anyhow::Result<()> {
    let port = port.unwrap_or(config.server.port);
    let dir = dir.unwrap_or(config.server.dir);
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "static directory does not exist");
    }

    let relay: Box<dyn MailRelay> = if dry_run {
        info!("dry run: contact messages are accepted but not sent");
        Box::new(RecordingRelay::new())
    } else {
        match SmtpRelay::from_config(&config.contact) {
            Ok(relay) => {
                info!(
                    host = %config.contact.smtp_host,
                    recipient = %config.contact.recipient,
                    "smtp relay ready"
                );
                Box::new(relay)
            }
            Err(err) => {
                warn!(%err, "contact relay disabled; submissions will fail");
                Box::new(RecordingRelay::failing())
            }
        }
    };

    let site = Site::new(dir, config.server.max_body_bytes, relay);
    server::run(&site, port)
}
