use std::path::Path;

use clap::Parser;
use honeylab::adapter::inbound::cli::command::Cli;
use honeylab::adapter::inbound::cli::output::{self, OutputConfig};
use honeylab::adapter::inbound::cli;
use honeylab::error::Result;
use honeylab::infrastructure::config::settings::Config;
use tracing::{error, info};

const DEFAULT_CONFIG: &str = "config.toml";

/// Load the config file, falling back to defaults only when the implicit
/// `config.toml` is absent.
fn load_config(path: &Path) -> Result<Config> {
    if path == Path::new(DEFAULT_CONFIG) && !path.exists() {
        return Ok(Config::default());
    }
    Config::load(path)
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();
    output::configure(OutputConfig::new(args.json, args.quiet), args.color);

    let config = match load_config(&args.config) {
        Ok(c) => c,
        Err(e) => {
            output::error(&format!("Failed to load config: {e}"));
            std::process::exit(1);
        }
    };

    config.init_logging();
    info!(config = %args.config.display(), "honeylab starting");

    if let Err(e) = cli::execute(args.command, config).await {
        error!(error = %e, "Command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
