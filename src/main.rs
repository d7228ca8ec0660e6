use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use screenpilot_cli::cli::{app::CliArgs, dispatch, env};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliArgs::parse();

    env::init_logging(&cli.log_level, cli.debug)?;
    info!("Starting ScreenPilot v{}", env!("CARGO_PKG_VERSION"));

    let loaded = env::load_config(cli.config.as_ref()).await?;

    match dispatch(cli, &loaded.config).await {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
