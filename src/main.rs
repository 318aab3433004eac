//! Servus daemon binary.
//!
//! Boots the workspace kernel through its four stages and unwinds it when
//! the HTTP service finishes or a termination signal arrives.

use clap::Parser;
use config::ConfigLoader;
use servus::{Workspace, WorkspaceOptions};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "servus",
    about = "Servus - embedded home automation controller",
    version,
    author
)]
struct Cli {
    /// Settings file
    #[arg(short, long, default_value = config::defaults::SETTINGS_PATH)]
    config: PathBuf,

    /// Validate the settings file and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if cli.check {
        match ConfigLoader::new(&cli.config).load() {
            Ok(settings) => {
                println!(
                    "{}: {} relays, {} sensors",
                    cli.config.display(),
                    settings.gpio.relays.len(),
                    settings.gpio.therma.len()
                );
                return Ok(());
            }
            Err(err) => {
                error!(path = %cli.config.display(), error = %err, "Settings file rejected");
                std::process::exit(1);
            }
        }
    }

    let options = WorkspaceOptions {
        settings_path: cli.config,
        ..WorkspaceOptions::default()
    };

    let mut workspace = Workspace::new(options);

    workspace.kernel_init().await?;
    workspace.kernel_exec().await?;
    workspace.kernel_wait().await?;
    workspace.kernel_done().await?;

    info!("Servus finished");

    Ok(())
}
