pub mod app;
pub mod commands;
pub mod context;
pub mod env;
pub mod handle;
pub mod output;
pub mod run;
pub mod snapshot;

use anyhow::Result;

use crate::config::AppConfig;
use app::CliArgs;
use commands::Commands;

pub use handle::{cmd_handle, HandleArgs};
pub use run::{cmd_run, RunArgs};
pub use snapshot::{cmd_snapshot, SnapshotArgs};

/// Routes a parsed command line to its handler.
pub async fn dispatch(cli: CliArgs, config: &AppConfig) -> Result<()> {
    let format = cli.output;
    match cli.command {
        Commands::Run(args) => cmd_run(args, config, format).await,
        Commands::Handle(args) => cmd_handle(args, config, format).await,
        Commands::Snapshot(args) => cmd_snapshot(args, config, format).await,
    }
}
