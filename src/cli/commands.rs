use clap::Subcommand;

use super::handle::HandleArgs;
use super::run::RunArgs;
use super::snapshot::SnapshotArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Run the agent loop toward a goal on a simulated device
    Run(RunArgs),

    /// Decode, validate and execute one raw model output
    Handle(HandleArgs),

    /// Print the compacted snapshot of a screen fixture
    Snapshot(SnapshotArgs),
}
