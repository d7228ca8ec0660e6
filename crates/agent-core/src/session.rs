//! Run admission: at most one run in flight per service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use screenpilot_core_types::RunId;

use crate::agent_loop::{AgentRunner, LoopResult, RunResult};
use crate::errors::AgentError;

pub const RUN_ABORTED: &str = "Run aborted unexpectedly.";

/// Proof that the holder owns the single run slot.
///
/// Dropping it frees the slot, including during a panic unwind.
#[derive(Debug)]
pub struct RunPermit {
    flag: Arc<AtomicBool>,
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// A run executing on its own task.
#[derive(Debug)]
pub struct RunHandle {
    run_id: RunId,
    handle: JoinHandle<RunResult>,
}

impl RunHandle {
    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Waits for the run; a panicked task becomes `Failed`.
    pub async fn wait(self) -> RunResult {
        match self.handle.await {
            Ok(result) => result,
            Err(err) => {
                error!(run_id = %self.run_id, error = %err, "Agent run task aborted");
                RunResult::failed(RUN_ABORTED, Some(err.to_string()))
            }
        }
    }
}

/// Caller-facing entry point wrapping an [`AgentRunner`].
#[derive(Clone)]
pub struct AgentService {
    runner: Arc<AgentRunner>,
    in_flight: Arc<AtomicBool>,
}

impl AgentService {
    pub fn new(runner: AgentRunner) -> Self {
        Self {
            runner: Arc::new(runner),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn runner(&self) -> &AgentRunner {
        &self.runner
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claims the run slot or fails with [`AgentError::RunInProgress`].
    pub fn try_begin(&self) -> Result<RunPermit, AgentError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AgentError::RunInProgress)?;
        Ok(RunPermit {
            flag: Arc::clone(&self.in_flight),
        })
    }

    /// Starts a run on a tokio task without blocking the caller.
    pub fn spawn(&self, goal: impl Into<String>, user_confirmed: bool) -> Result<RunHandle, AgentError> {
        let goal = goal.into();
        if goal.trim().is_empty() {
            return Err(AgentError::invalid_request("goal cannot be blank"));
        }
        let permit = self.try_begin()?;
        let run_id = RunId::new();
        info!(%run_id, "Agent run admitted");

        let runner = Arc::clone(&self.runner);
        let task_run_id = run_id.clone();
        let handle = tokio::spawn(async move {
            let _permit = permit;
            runner.run_with_id(&task_run_id, &goal, user_confirmed).await
        });
        Ok(RunHandle { run_id, handle })
    }

    /// Runs to completion; rejected while another run is in flight.
    pub async fn run(&self, goal: impl Into<String>, user_confirmed: bool) -> Result<RunResult, AgentError> {
        Ok(self.spawn(goal, user_confirmed)?.wait().await)
    }

    /// Handles one raw model output outside the run loop.
    ///
    /// Shares the run slot, since it may execute actions.
    pub async fn handle_model_output(&self, raw: &str, user_confirmed: bool) -> Result<LoopResult, AgentError> {
        let _permit = self.try_begin()?;
        Ok(self.runner.handle_model_output(raw, user_confirmed).await)
    }
}
