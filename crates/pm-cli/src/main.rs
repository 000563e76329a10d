//! `pm` - project dashboard from the terminal
//!
//! Every subcommand opens the store, performs one operation through the same
//! repositories a UI session would use, and exits.

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pm_core::config::AppConfig;

mod cli;
mod commands;
mod render;

use cli::Cli;
use commands::App;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let app = App::open(config, cli.json)?;
    app.run(cli.command)
}

/// Logs go to stderr so command output on stdout stays clean
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,pm_store=debug,pm_services=debug".into());
    let json = std::env::var("PM_LOG_JSON")
        .map(|v| matches!(v.trim(), "1" | "true"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
