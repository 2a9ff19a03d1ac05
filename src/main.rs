use std::path::Path;

use clap::Parser;
use daylist::cli::commands::Cli;
use daylist::cli::handlers;
use daylist::io::{config_io, paths};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();
    let data_dir = paths::resolve_data_dir(cli.data_dir.as_deref().map(Path::new));

    let config = match config_io::read_config(&data_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config.log.level);

    if let Err(e) = handlers::dispatch(cli, &data_dir, &config) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// RUST_LOG wins; otherwise the configured level. Logs go to stderr so
/// stdout stays clean for --json.
fn init_tracing(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
