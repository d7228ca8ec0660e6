use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use action_primitives::{ActionPrimitives, ExecutionResult};
use agent_core::agent_loop::runner::{
    DONE_REJECTED, MODEL_GENERATION_FAILED, NO_SCREEN_CONTEXT, REPEATED_PLANNER_ERRORS,
};
use agent_core::{
    AgentError, AgentRunner, MockModelClient, ModelClient, PlannerStepTrace, RunResult,
    RunnerConfig, ScriptedModelClient,
};
use perceiver_structural::StructuralPerceiver;
use screenpilot_core_types::{Action, Bounds, Element, Selector, Snapshot};

const LAUNCHER: &str = "com.example.launcher";
const INSTAGRAM: &str = "com.instagram.android";

fn element(id: &str, text: &str) -> Element {
    Element {
        id: id.to_string(),
        text: Some(text.to_string()),
        accessible_label: None,
        identifier: None,
        class_name: Some("android.widget.TextView".to_string()),
        clickable: true,
        editable: false,
        enabled: true,
        focusable: true,
        bounds: Bounds::new(0, 0, 100, 40),
    }
}

/// In-memory phone: a launcher that can open Instagram, whose home screen
/// links to an inbox.
struct Phone {
    screen: Mutex<Option<(&'static str, Vec<Element>)>>,
    launchable: bool,
    executed: Mutex<Vec<Action>>,
}

impl Phone {
    fn on_launcher() -> Arc<Self> {
        Arc::new(Self {
            screen: Mutex::new(Some((LAUNCHER, vec![element("n1", "Clock")]))),
            launchable: true,
            executed: Mutex::new(Vec::new()),
        })
    }

    fn without_instagram() -> Arc<Self> {
        Arc::new(Self {
            launchable: false,
            ..Arc::try_unwrap(Self::on_launcher()).ok().expect("fresh phone")
        })
    }

    fn blank() -> Arc<Self> {
        Arc::new(Self {
            screen: Mutex::new(None),
            launchable: true,
            executed: Mutex::new(Vec::new()),
        })
    }

    fn executed(&self) -> Vec<Action> {
        self.executed.lock().unwrap().clone()
    }
}

impl StructuralPerceiver for Phone {
    fn capture_snapshot(&self) -> Option<Snapshot> {
        let screen = self.screen.lock().unwrap();
        screen
            .as_ref()
            .map(|(app, elements)| Snapshot::new(Some(app.to_string()), elements.clone()))
    }
}

#[async_trait]
impl ActionPrimitives for Phone {
    async fn execute(&self, action: &Action) -> ExecutionResult {
        self.executed.lock().unwrap().push(action.clone());
        let mut screen = self.screen.lock().unwrap();
        match action {
            Action::OpenApp { name } if name.eq_ignore_ascii_case("instagram") && self.launchable => {
                *screen = Some((INSTAGRAM, vec![element("n1", "Home"), element("n2", "Messages")]));
                ExecutionResult::success(action, format!("Opened app '{name}' ({INSTAGRAM})."))
            }
            Action::OpenApp { name } => {
                ExecutionResult::failure(action, format!("Could not resolve app '{name}'."))
            }
            Action::Click { selector } if selector.text_signal() == Some("Messages") => {
                *screen = Some((INSTAGRAM, vec![element("n1", "Inbox"), element("n2", "alex_chat")]));
                ExecutionResult::success(action, "Clicked node.")
            }
            Action::Click { .. } => ExecutionResult::failure(action, "No matching node for selector."),
            Action::Wait { ms } => ExecutionResult::success(action, format!("Waited {ms}ms.")),
            _ => ExecutionResult::success(action, "ok"),
        }
    }
}

fn runner(model: Arc<dyn ModelClient>, phone: &Arc<Phone>) -> AgentRunner {
    AgentRunner::new(model, phone.clone(), phone.clone()).with_config(RunnerConfig::minimal())
}

struct FailingModel;

#[async_trait]
impl ModelClient for FailingModel {
    async fn generate(&self, _prompt: &str) -> Result<String, AgentError> {
        Err(AgentError::model("inference backend offline"))
    }
}

#[tokio::test]
async fn scripted_wait_then_done_completes() {
    let phone = Phone::on_launcher();
    let model = Arc::new(ScriptedModelClient::new([
        r#"{"status":"in_progress","actions":[{"type":"wait","ms":100}]}"#,
        r#"{"status":"done","result":"Nothing left to do."}"#,
    ]));
    let result = runner(model.clone(), &phone).run("wait a moment", false).await;

    assert_eq!(
        result,
        RunResult::Completed {
            result: "Nothing left to do.".into()
        }
    );
    assert_eq!(model.calls(), 2);
    assert_eq!(phone.executed(), vec![Action::wait(100)]);
}

#[tokio::test]
async fn bootstrap_opens_goal_app_without_model_call() {
    let phone = Phone::on_launcher();
    let model = Arc::new(ScriptedModelClient::new([
        r#"{"status":"in_progress","actions":[{"type":"click","selector":{"textContains":"Messages"}}]}"#,
        r#"{"status":"done","result":"Inbox open."}"#,
    ]));
    let prompts = Arc::new(Mutex::new(Vec::<PlannerStepTrace>::new()));
    let sink = prompts.clone();
    let runner = runner(model.clone(), &phone)
        .with_observer(Arc::new(move |trace: &PlannerStepTrace| sink.lock().unwrap().push(trace.clone())));

    let result = runner.run("Open Instagram and go to messages", false).await;

    assert_eq!(result, RunResult::Completed { result: "Inbox open.".into() });
    assert_eq!(phone.executed()[0], Action::open_app("Instagram"));
    assert_eq!(model.calls(), 2);

    let prompts = prompts.lock().unwrap();
    assert_eq!(prompts.iter().map(|trace| trace.step).collect::<Vec<_>>(), vec![2, 3]);
    assert!(prompts[0].prompt.contains("step 1: bootstrap open_app(Instagram)"));
    assert!(!prompts[0].prompt.contains("step 1: success="));
    assert!(prompts[0].prompt.contains(INSTAGRAM));
}

#[tokio::test]
async fn failed_bootstrap_then_premature_done_is_rejected() {
    let phone = Phone::without_instagram();
    let model = Arc::new(ScriptedModelClient::new([r#"{"status":"done","result":"Opened it."}"#]));
    let config = RunnerConfig::minimal().max_steps(3);
    let result = runner(model.clone(), &phone)
        .with_config(config)
        .run("Open Instagram and go to messages", false)
        .await;

    assert_eq!(result, RunResult::MaxStepsReached { max_steps: 3 });
    assert_eq!(phone.executed(), vec![Action::open_app("Instagram")]);
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn repeated_unearned_done_runs_to_step_limit() {
    let phone = Phone::on_launcher();
    let model = Arc::new(ScriptedModelClient::new([r#"{"status":"done","result":"Sent."}"#]));
    let config = RunnerConfig::minimal()
        .max_steps(10)
        .max_consecutive_planner_errors(2);
    let prompts = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = prompts.clone();
    let result = runner(model.clone(), &phone)
        .with_config(config)
        .with_observer(Arc::new(move |trace: &PlannerStepTrace| {
            sink.lock().unwrap().push(trace.prompt.clone())
        }))
        .run("send a message to alex", false)
        .await;

    assert_eq!(result, RunResult::MaxStepsReached { max_steps: 10 });
    assert_eq!(model.calls(), 10);
    let prompts = prompts.lock().unwrap();
    assert!(prompts[9].contains(&format!("step 9: {DONE_REJECTED}")));
}

#[tokio::test]
async fn done_rejection_counts_toward_later_planner_errors() {
    let phone = Phone::on_launcher();
    let model = Arc::new(ScriptedModelClient::new([
        r#"{"status":"done","result":"Sent."}"#,
        "no json here",
    ]));
    let config = RunnerConfig::minimal()
        .max_steps(10)
        .max_consecutive_planner_errors(1);
    let result = runner(model.clone(), &phone)
        .with_config(config)
        .run("send a message to alex", false)
        .await;

    assert_eq!(
        result,
        RunResult::failed(
            REPEATED_PLANNER_ERRORS,
            Some("decode_failed: No JSON object found in model output.".into())
        )
    );
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn undecodable_output_fails_after_budget() {
    let phone = Phone::on_launcher();
    let model = Arc::new(ScriptedModelClient::new(["I am not sure what to do."]));
    let result = runner(model.clone(), &phone).run("scroll the feed", false).await;

    assert_eq!(
        result,
        RunResult::failed(
            REPEATED_PLANNER_ERRORS,
            Some("decode_failed: No JSON object found in model output.".into())
        )
    );
    assert_eq!(model.calls(), RunnerConfig::default().max_consecutive_planner_errors as usize + 1);
}

#[tokio::test]
async fn validation_errors_are_fed_back_into_next_prompt() {
    let phone = Phone::on_launcher();
    let model = Arc::new(ScriptedModelClient::new([
        r#"{"status":"in_progress","actions":[{"type":"wait","ms":9000}]}"#,
        r#"{"status":"done","result":"Recovered."}"#,
    ]));
    let seen = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = seen.clone();
    let result = runner(model, &phone)
        .with_observer(Arc::new(move |trace: &PlannerStepTrace| {
            sink.lock().unwrap().push(trace.prompt.clone())
        }))
        .run("wait for the page", false)
        .await;

    assert_eq!(result, RunResult::Completed { result: "Recovered.".into() });
    let seen = seen.lock().unwrap();
    assert!(seen[1].contains("validation_failed: actions[0].ms:Wait ms must be in range 0..3000."));
    assert!(phone.executed().is_empty());
}

#[tokio::test]
async fn missing_snapshot_fails_immediately() {
    let phone = Phone::blank();
    let model = Arc::new(ScriptedModelClient::new([r#"{"status":"done","result":"x"}"#]));
    let result = runner(model.clone(), &phone).run("open settings", false).await;

    assert_eq!(result, RunResult::failed(NO_SCREEN_CONTEXT, None));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn model_failure_ends_run() {
    let phone = Phone::on_launcher();
    let result = runner(Arc::new(FailingModel), &phone).run("scroll down", false).await;

    match result {
        RunResult::Failed { reason, last_error } => {
            assert_eq!(reason, MODEL_GENERATION_FAILED);
            assert!(last_error.unwrap_or_default().contains("inference backend offline"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn clarification_and_confirmation_end_run() {
    let phone = Phone::on_launcher();
    let model = Arc::new(ScriptedModelClient::new([
        r#"{"status":"needs_clarification","question":"Which contact?"}"#,
    ]));
    let result = runner(model, &phone).run("send hi", false).await;
    assert_eq!(
        result,
        RunResult::NeedsClarification {
            question: "Which contact?".into()
        }
    );

    let confirm = r#"{"status":"in_progress","needsUserConfirmation":true,"confirmationPrompt":"Send 'hi' to Alex?","actions":[{"type":"type_text","text":"hi"}]}"#;
    let model = Arc::new(ScriptedModelClient::new([confirm]));
    let result = runner(model, &phone).run("send hi", false).await;
    assert_eq!(
        result,
        RunResult::NeedsConfirmation {
            prompt: "Send 'hi' to Alex?".into()
        }
    );
    assert!(phone.executed().is_empty());
}

#[tokio::test]
async fn mock_model_reaches_instagram_inbox() {
    let phone = Phone::on_launcher();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let result = runner(Arc::new(MockModelClient::new()), &phone)
        .with_observer(Arc::new(move |_: &PlannerStepTrace| {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .run("check instagram dms", false)
        .await;

    assert_eq!(
        result,
        RunResult::Completed {
            result: "Reached Instagram context in mock mode.".into()
        }
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        phone.executed(),
        vec![
            Action::open_app("Instagram"),
            Action::click(Selector::text("Messages")),
            Action::wait(600),
        ]
    );
}
