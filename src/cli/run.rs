use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

use agent_core::{HttpModelClient, MockModelClient, ModelClient, PlannerStepTrace, RunResult};
use perceiver_structural::ScreenSource;
use screenpilot_core_types::RunId;

use super::context::{load_script, DeviceContext};
use super::output::{emit_structured, OutputFormat};
use crate::config::AppConfig;

#[derive(Args, Clone, Debug)]
#[command(group(clap::ArgGroup::new("model").args(["script", "mock", "endpoint"])))]
pub struct RunArgs {
    /// Natural-language goal
    pub goal: String,

    /// Screen fixture describing the simulated device
    #[arg(long, value_name = "FILE")]
    pub screen: PathBuf,

    /// Replay model outputs from a YAML/JSON list of strings
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Use the built-in offline planner
    #[arg(long)]
    pub mock: bool,

    /// Completion endpoint, overriding `model.endpoint` from config
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Treat sensitive actions as already confirmed
    #[arg(long)]
    pub confirm: bool,

    /// Override the step budget
    #[arg(long)]
    pub max_steps: Option<u32>,

    /// Override the pause between steps in milliseconds
    #[arg(long)]
    pub step_delay_ms: Option<u64>,

    /// Include prompts and raw model outputs in the report
    #[arg(long)]
    pub trace: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunReport {
    run_id: RunId,
    goal: String,
    result: RunResult,
    final_app: Option<String>,
    final_screen: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    steps: Vec<PlannerStepTrace>,
}

pub async fn cmd_run(args: RunArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let mut config = config.clone();
    if let Some(max_steps) = args.max_steps {
        config.runner = config.runner.max_steps(max_steps);
    }
    if let Some(delay) = args.step_delay_ms {
        config.runner = config.runner.step_delay_ms(delay);
    }

    let model = build_model(&args, &config).await?;
    let context = DeviceContext::load(&args.screen, &config).await?;

    let steps = Arc::new(Mutex::new(Vec::new()));
    let sink = steps.clone();
    let service = context.service_with(model, &config, |runner| {
        runner.with_observer(Arc::new(move |trace: &PlannerStepTrace| {
            sink.lock().push(trace.clone());
        }))
    });

    let handle = service
        .spawn(args.goal.clone(), args.confirm)
        .context("Failed to start agent run")?;
    let run_id = handle.run_id().clone();
    info!(%run_id, goal = %args.goal, "Agent run started");
    let result = handle.wait().await;

    let steps = std::mem::take(&mut *steps.lock());
    let report = RunReport {
        run_id,
        goal: args.goal,
        result,
        final_app: context.device.foreground_app(),
        final_screen: context.device.current_screen(),
        steps: if args.trace { steps } else { Vec::new() },
    };

    if !emit_structured(&report, format)? {
        print_human(&report);
    }
    Ok(())
}

async fn build_model(args: &RunArgs, config: &AppConfig) -> Result<Arc<dyn ModelClient>> {
    if let Some(path) = &args.script {
        return Ok(Arc::new(load_script(path).await?));
    }
    if args.mock {
        return Ok(Arc::new(MockModelClient::new()));
    }
    let mut model_config = config.model.clone();
    if let Some(endpoint) = &args.endpoint {
        model_config.endpoint = endpoint.clone();
    }
    let client = HttpModelClient::new(model_config).context("Failed to configure model client")?;
    info!(url = %client.completion_url(), "Using HTTP model client");
    Ok(Arc::new(client))
}

fn print_human(report: &RunReport) {
    println!("Run {}", report.run_id);
    println!("  goal:   {}", report.goal);
    match &report.result {
        RunResult::Completed { result } => println!("  result: completed - {result}"),
        RunResult::NeedsClarification { question } => {
            println!("  result: needs clarification - {question}")
        }
        RunResult::NeedsConfirmation { prompt } => {
            println!("  result: needs confirmation - {prompt}")
        }
        RunResult::MaxStepsReached { max_steps } => {
            println!("  result: stopped after {max_steps} steps")
        }
        RunResult::Failed { reason, last_error } => {
            println!("  result: failed - {reason}");
            if let Some(last_error) = last_error {
                println!("  last error: {last_error}");
            }
        }
    }
    println!(
        "  screen: {} ({})",
        report.final_screen,
        report.final_app.as_deref().unwrap_or("unknown app")
    );
    for step in &report.steps {
        println!("  step {}: {}", step.step, step.raw_model_output.trim());
    }
}
