use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;

use agent_core::{LoopResult, ScriptedModelClient};
use perceiver_structural::ScreenSource;

use super::context::DeviceContext;
use super::output::{emit_structured, OutputFormat};
use crate::config::AppConfig;

#[derive(Args, Clone, Debug)]
pub struct HandleArgs {
    /// Screen fixture describing the simulated device
    #[arg(long, value_name = "FILE")]
    pub screen: PathBuf,

    /// Raw model output text
    #[arg(long, conflicts_with = "input")]
    pub raw: Option<String>,

    /// File holding the raw model output
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Treat sensitive actions as already confirmed
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HandleReport {
    outcome: LoopResult,
    final_app: Option<String>,
    final_screen: String,
}

pub async fn cmd_handle(args: HandleArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let raw = match (&args.raw, &args.input) {
        (Some(raw), _) => raw.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read model output {}", path.display()))?,
        (None, None) => bail!("Provide the model output with --raw or --input"),
    };

    let context = DeviceContext::load(&args.screen, config).await?;
    // No model call happens on this path.
    let service = context.service(Arc::new(ScriptedModelClient::new(Vec::<String>::new())), config);
    let outcome = service.handle_model_output(&raw, args.confirm).await?;

    let report = HandleReport {
        outcome,
        final_app: context.device.foreground_app(),
        final_screen: context.device.current_screen(),
    };
    if !emit_structured(&report, format)? {
        print_human(&report);
    }
    Ok(())
}

fn print_human(report: &HandleReport) {
    println!("Outcome: {}", report.outcome.kind());
    match &report.outcome {
        LoopResult::DecodeFailed { reason, .. } => println!("  {reason}"),
        LoopResult::ValidationFailed { issues } => {
            for issue in issues {
                println!("  {issue}");
            }
        }
        LoopResult::ConfirmationRequired { prompt, actions } => {
            println!("  {prompt} ({} pending actions)", actions.len())
        }
        LoopResult::ClarificationRequired { question } => println!("  {question}"),
        LoopResult::ActionsExecuted { results, .. } => {
            for result in results {
                let mark = if result.success { "ok" } else { "fail" };
                println!("  [{mark}] {} - {}", result.action.kind(), result.message);
            }
        }
        LoopResult::Done { result } => println!("  {result}"),
        LoopResult::ModelError { message } => println!("  {message}"),
    }
    println!(
        "  screen: {} ({})",
        report.final_screen,
        report.final_app.as_deref().unwrap_or("unknown app")
    );
}
