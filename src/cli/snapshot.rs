use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use agent_core::PromptBuilder;
use perceiver_structural::StructuralPerceiver;

use super::context::DeviceContext;
use super::output::{emit_structured, OutputFormat};
use crate::config::AppConfig;

#[derive(Args, Clone, Debug)]
pub struct SnapshotArgs {
    /// Screen fixture describing the simulated device
    #[arg(long, value_name = "FILE")]
    pub screen: PathBuf,

    /// Print the reduced context the model sees instead of the snapshot
    #[arg(long)]
    pub prompt_context: bool,
}

pub async fn cmd_snapshot(args: SnapshotArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let context = DeviceContext::load(&args.screen, config).await?;
    let snapshot = context
        .perceiver
        .capture_snapshot()
        .context("Simulated device has no active screen")?;

    if args.prompt_context {
        println!(
            "{}",
            PromptBuilder::new(config.prompt.clone()).compact_context(Some(&snapshot))
        );
        return Ok(());
    }

    if !emit_structured(&snapshot, format)? {
        println!(
            "{} elements in {}",
            snapshot.elements.len(),
            snapshot.foreground_app.as_deref().unwrap_or("unknown app")
        );
        for element in &snapshot.elements {
            let label = element
                .text
                .as_deref()
                .or(element.accessible_label.as_deref())
                .or(element.identifier.as_deref())
                .unwrap_or("-");
            let mut flags = Vec::new();
            if element.clickable {
                flags.push("clickable");
            }
            if element.editable {
                flags.push("editable");
            }
            if !element.enabled {
                flags.push("disabled");
            }
            println!("  {:<4} {label} [{}]", element.id, flags.join(","));
        }
    }
    Ok(())
}
