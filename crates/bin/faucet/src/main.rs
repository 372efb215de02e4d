use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use faucet_core::{FaucetConfig, SettingsStore, SledStore};
use std::path::PathBuf;
use tracing::info;

mod app;
mod confetti;
mod executor;
mod theme;
mod widgets;

use app::FaucetApp;

#[derive(Parser)]
#[command(name = "faucet")]
#[command(about = "send test ether from a development node")]
struct Cli {
    /// config file (default: <config dir>/eth-faucet/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// settings database directory, overrides the config file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// verbosity level, ignored when RUST_LOG is set
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("faucet={0},faucet_core={0}", level).into()),
        )
        .init();

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = FaucetConfig::load(&config_path)?;

    let data_dir = match cli.data_dir.or_else(|| config.data_dir.clone()) {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    let store = SledStore::open(data_dir.join("settings"))
        .with_context(|| format!("failed to open settings in {}", data_dir.display()))?;
    let settings = SettingsStore::new(store);
    let rpc = settings.load()?;

    info!("starting eth faucet, node {}", rpc);

    let runtime = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 760.0])
            .with_title("ETH Faucet"),
        ..Default::default()
    };

    eframe::run_native(
        "eth-faucet",
        options,
        Box::new(move |cc| {
            theme::apply(&cc.egui_ctx);
            Ok(Box::new(FaucetApp::new(cc, runtime, &config, settings, rpc)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}

fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("could not find config directory")?;
    Ok(dir.join("eth-faucet").join("config.toml"))
}

fn default_data_dir() -> Result<PathBuf> {
    let dir = dirs::data_dir().context("could not find data directory")?;
    Ok(dir.join("eth-faucet"))
}
