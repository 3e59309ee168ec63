//! Command-line interface.
//!
//! [`command`] holds the `clap` definitions; each subcommand has its own
//! handler module and prints through [`output`].

pub mod classify;
pub mod collect;
pub mod command;
pub mod migrate;
pub mod output;
pub mod recover;
pub mod stats;

use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::Runtime;

use command::Commands;

/// Dispatch a parsed command against a loaded configuration.
///
/// # Errors
///
/// Returns whatever the command handler returns.
pub async fn execute(command: Commands, config: Config) -> Result<()> {
    let runtime = Runtime::new(config)?;
    match command {
        Commands::Collect(args) => collect::execute(&runtime, &args).await,
        Commands::Recover => recover::execute(&runtime).await,
        Commands::Stats(args) => stats::execute(&runtime, &args).await,
        Commands::Classify(args) => classify::execute(&runtime, &args).await,
        Commands::Migrate => migrate::execute(&runtime).await,
    }
}
