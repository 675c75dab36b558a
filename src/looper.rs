use anyhow::Result;
use tokio::sync::mpsc::Sender;

use crate::{
    prompt::system_directive,
    services::ChatHandler,
    tools::{Capability, ToolContext},
    types::{LooperToInterfaceMessage, Step, Transcript, TurnResponse},
};

/// Per-query cap on interpreter iterations.
#[derive(Debug, Clone, Copy)]
pub struct StepBudget {
    used: usize,
    max: usize,
}

impl StepBudget {
    pub fn new(max: usize) -> Self {
        StepBudget { used: 0, max }
    }

    pub fn tick(&mut self) {
        self.used = (self.used + 1).min(self.max);
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn exhausted(&self) -> bool {
        self.used >= self.max
    }
}

/// How a single user query ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The model produced an `output` step.
    Completed,
    /// The model produced a step the interpreter does not know.
    Stopped,
    MalformedReply,
    UnknownCapability(String),
    ModelFailed,
    BudgetExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryReport {
    pub outcome: QueryOutcome,
    pub steps_used: usize,
}

pub struct Looper {
    handler: Box<dyn ChatHandler>,
    transcript: Transcript,
    tools: ToolContext,
    sender: Sender<LooperToInterfaceMessage>,
    max_steps: usize,
}

impl Looper {
    pub fn new(
        handler: Box<dyn ChatHandler>,
        tools: ToolContext,
        sender: Sender<LooperToInterfaceMessage>,
        max_steps: usize,
        transcript_limit: usize,
    ) -> Self {
        Looper {
            handler,
            transcript: Transcript::new(system_directive(), transcript_limit),
            tools,
            sender,
            max_steps,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    async fn emit(&self, message: LooperToInterfaceMessage) -> Result<()> {
        self.sender.send(message).await?;
        Ok(())
    }

    /// Run one user query to completion: append it to the transcript, then
    /// step the model until it answers, fails, or runs out of budget.
    pub async fn send(&mut self, query: &str) -> Result<QueryReport> {
        self.transcript.push_user(query);

        let mut budget = StepBudget::new(self.max_steps);
        let outcome = self.run_steps(&mut budget).await?;

        tracing::info!(?outcome, steps = budget.used(), "query finished");
        if outcome == QueryOutcome::BudgetExhausted {
            self.emit(LooperToInterfaceMessage::Warning(
                "Maximum steps reached. Please try a simpler request or break it into smaller tasks."
                    .to_string(),
            ))
            .await?;
        }
        self.emit(LooperToInterfaceMessage::TurnComplete).await?;

        Ok(QueryReport { outcome, steps_used: budget.used() })
    }

    async fn run_steps(&mut self, budget: &mut StepBudget) -> Result<QueryOutcome> {
        while !budget.exhausted() {
            self.emit(LooperToInterfaceMessage::Thinking).await?;

            let reply = match self.handler.complete(&self.transcript).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::warn!(error = %e, "model call failed");
                    self.emit(LooperToInterfaceMessage::Error(format!("Unexpected error: {e}"))).await?;
                    return Ok(QueryOutcome::ModelFailed);
                }
            };

            let turn = match TurnResponse::parse(&reply) {
                Ok(turn) => turn,
                Err(e) => {
                    tracing::warn!(error = %e, reply = %reply, "reply is not a step object");
                    self.emit(LooperToInterfaceMessage::Error(format!("JSON parsing error: {e}"))).await?;
                    return Ok(QueryOutcome::MalformedReply);
                }
            };

            tracing::debug!(step = ?turn.step, used = budget.used(), "step received");
            self.transcript.push_assistant(reply);

            match turn.step {
                Step::Plan => {
                    self.emit(LooperToInterfaceMessage::Plan(turn.content)).await?;
                    budget.tick();
                }
                Step::Action => {
                    let name = turn.function.unwrap_or_default();
                    self.emit(LooperToInterfaceMessage::ToolCall(name.clone())).await?;

                    // Unknown tools end the query without telling the model.
                    let capability = match Capability::parse(&name, turn.input.as_deref().unwrap_or("")) {
                        Ok(capability) => capability,
                        Err(e) => {
                            tracing::warn!(capability = %name, "unknown capability requested");
                            self.emit(LooperToInterfaceMessage::Error(e.to_string())).await?;
                            return Ok(QueryOutcome::UnknownCapability(name));
                        }
                    };

                    let output = capability.run(&mut self.tools).await;
                    self.transcript.push_observation(&output);
                    budget.tick();
                }
                Step::Observe => {
                    self.emit(LooperToInterfaceMessage::Observe(turn.content)).await?;
                    budget.tick();
                }
                Step::Output => {
                    self.emit(LooperToInterfaceMessage::Output(turn.content)).await?;
                    return Ok(QueryOutcome::Completed);
                }
                Step::Other => {
                    self.emit(LooperToInterfaceMessage::Other(turn.content)).await?;
                    return Ok(QueryOutcome::Stopped);
                }
            }
        }

        Ok(QueryOutcome::BudgetExhausted)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tokio::sync::mpsc::{self, Receiver};

    use super::*;
    use crate::{error::ModelError, types::Role, workspace::Workspace};

    type Reply = Box<dyn FnMut(&Transcript) -> String + Send>;

    /// Plays back canned replies and records what the model was shown.
    struct ScriptedHandler {
        replies: VecDeque<Reply>,
        seen: Arc<Mutex<Vec<Transcript>>>,
    }

    #[async_trait]
    impl ChatHandler for ScriptedHandler {
        async fn complete(&mut self, transcript: &Transcript) -> Result<String, ModelError> {
            self.seen.lock().unwrap().push(transcript.clone());
            match self.replies.pop_front() {
                Some(mut reply) => Ok(reply(transcript)),
                None => Err(ModelError::EmptyReply),
            }
        }
    }

    fn fixed(reply: Value) -> Reply {
        Box::new(move |_| reply.to_string())
    }

    fn raw(reply: &'static str) -> Reply {
        Box::new(move |_| reply.to_string())
    }

    struct Harness {
        looper: Looper,
        events: Receiver<LooperToInterfaceMessage>,
        seen: Arc<Mutex<Vec<Transcript>>>,
        dir: TempDir,
    }

    impl Harness {
        fn new(replies: Vec<Reply>) -> Self {
            Self::with_max_steps(replies, 20)
        }

        fn with_max_steps(replies: Vec<Reply>, max_steps: usize) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let seen = Arc::new(Mutex::new(Vec::new()));
            let handler = ScriptedHandler { replies: replies.into(), seen: seen.clone() };
            let (tx, events) = mpsc::channel(1000);
            let tools = ToolContext::new(Workspace::new(dir.path()), "http://127.0.0.1:9");
            let looper = Looper::new(Box::new(handler), tools, tx, max_steps, 200);
            Harness { looper, events, seen, dir }
        }

        /// Interface messages so far, spinner ticks left out.
        fn drain(&mut self) -> Vec<LooperToInterfaceMessage> {
            let mut out = Vec::new();
            while let Ok(message) = self.events.try_recv() {
                if message != LooperToInterfaceMessage::Thinking {
                    out.push(message);
                }
            }
            out
        }

        fn model_calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[tokio::test]
    async fn list_files_walks_plan_action_observe_output() {
        let mut harness = Harness::new(vec![
            fixed(json!({ "step": "plan", "content": "List the current directory." })),
            fixed(json!({ "step": "action", "function": "list_directory", "input": "." })),
            Box::new(|transcript: &Transcript| {
                let observed: Value = serde_json::from_str(&transcript.last().unwrap().content).unwrap();
                json!({ "step": "observe", "content": observed["output"] }).to_string()
            }) as Reply,
            fixed(json!({ "step": "output", "content": "Two entries." })),
        ]);
        std::fs::write(harness.dir.path().join("alpha.txt"), "a").unwrap();
        std::fs::create_dir(harness.dir.path().join("beta")).unwrap();

        let report = harness.looper.send("list files in .").await.unwrap();
        assert_eq!(report, QueryReport { outcome: QueryOutcome::Completed, steps_used: 3 });

        let events = harness.drain();
        assert_eq!(events.len(), 5, "{events:?}");
        assert_eq!(events[0], LooperToInterfaceMessage::Plan("List the current directory.".into()));
        assert_eq!(events[1], LooperToInterfaceMessage::ToolCall("list_directory".into()));
        match &events[2] {
            LooperToInterfaceMessage::Observe(content) => {
                assert!(content.contains("📄 alpha.txt"), "{content}");
                assert!(content.contains("📁 beta/"), "{content}");
            }
            other => panic!("expected observe, got {other:?}"),
        }
        assert_eq!(events[3], LooperToInterfaceMessage::Output("Two entries.".into()));
        assert_eq!(events[4], LooperToInterfaceMessage::TurnComplete);
    }

    #[tokio::test]
    async fn model_sees_raw_replies_and_observations() {
        let action = r#"{"step": "action", "function": "get_current_directory", "input": ""}"#;
        let mut harness = Harness::new(vec![raw(action), fixed(json!({ "step": "output", "content": "ok" }))]);

        harness.looper.send("where am I?").await.unwrap();

        let seen = harness.seen.lock().unwrap();
        let second: Vec<_> = seen[1].iter().collect();
        assert_eq!(second.len(), 4);
        assert_eq!(second[0].role, Role::System);
        assert_eq!(second[1].content, "where am I?");
        assert_eq!(second[2].role, Role::Assistant);
        assert_eq!(second[2].content, action);
        assert_eq!(second[3].role, Role::User);

        let observed: Value = serde_json::from_str(&second[3].content).unwrap();
        assert_eq!(observed["step"], "observe");
        assert!(observed["output"].as_str().unwrap().starts_with("📍 Current directory: "));
    }

    #[tokio::test]
    async fn unknown_capability_ends_the_query_silently_for_the_model() {
        let mut harness = Harness::new(vec![
            fixed(json!({ "step": "plan", "content": "launch" })),
            fixed(json!({ "step": "action", "function": "launch_rockets", "input": "now" })),
            fixed(json!({ "step": "output", "content": "never reached" })),
        ]);

        let report = harness.looper.send("go").await.unwrap();
        assert_eq!(
            report,
            QueryReport { outcome: QueryOutcome::UnknownCapability("launch_rockets".into()), steps_used: 1 }
        );
        assert_eq!(harness.model_calls(), 2);

        let last = harness.looper.transcript().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert!(last.content.contains("launch_rockets"));

        let events = harness.drain();
        assert!(events.contains(&LooperToInterfaceMessage::Error("Tool 'launch_rockets' not available".into())));
    }

    #[tokio::test]
    async fn missing_function_name_is_unknown() {
        let mut harness = Harness::new(vec![fixed(json!({ "step": "action", "input": "x" }))]);

        let report = harness.looper.send("go").await.unwrap();
        assert_eq!(report.outcome, QueryOutcome::UnknownCapability(String::new()));
        assert_eq!(report.steps_used, 0);
    }

    #[tokio::test]
    async fn failing_capability_is_observed_and_costs_one_step() {
        let mut harness = Harness::new(vec![
            fixed(json!({ "step": "action", "function": "read_file", "input": "missing.txt" })),
            Box::new(|transcript: &Transcript| {
                let observed: Value = serde_json::from_str(&transcript.last().unwrap().content).unwrap();
                assert!(observed["output"].as_str().unwrap().starts_with("❌ Error reading file:"));
                json!({ "step": "output", "content": "file is missing" }).to_string()
            }) as Reply,
        ]);

        let report = harness.looper.send("read missing.txt").await.unwrap();
        assert_eq!(report, QueryReport { outcome: QueryOutcome::Completed, steps_used: 1 });
    }

    #[tokio::test]
    async fn budget_caps_iterations() {
        let replies = (0..25)
            .map(|i| fixed(json!({ "step": "plan", "content": format!("thinking {i}") })))
            .collect();
        let mut harness = Harness::new(replies);

        let report = harness.looper.send("loop forever").await.unwrap();
        assert_eq!(report, QueryReport { outcome: QueryOutcome::BudgetExhausted, steps_used: 20 });
        assert_eq!(harness.model_calls(), 20);

        let events = harness.drain();
        assert!(matches!(events[events.len() - 2], LooperToInterfaceMessage::Warning(_)));
        assert_eq!(events.last(), Some(&LooperToInterfaceMessage::TurnComplete));
    }

    #[tokio::test]
    async fn budget_resets_per_query() {
        let mut replies: Vec<Reply> = Vec::new();
        for _ in 0..2 {
            replies.push(fixed(json!({ "step": "plan", "content": "p" })));
            replies.push(fixed(json!({ "step": "plan", "content": "p" })));
            replies.push(fixed(json!({ "step": "output", "content": "done" })));
        }
        let mut harness = Harness::with_max_steps(replies, 2);

        let first = harness.looper.send("one").await.unwrap();
        assert_eq!(first, QueryReport { outcome: QueryOutcome::BudgetExhausted, steps_used: 2 });

        // The leftover output reply answers the second query straight away.
        let second = harness.looper.send("two").await.unwrap();
        assert_eq!(second, QueryReport { outcome: QueryOutcome::Completed, steps_used: 0 });
    }

    #[tokio::test]
    async fn malformed_reply_aborts_without_touching_transcript() {
        let mut harness = Harness::new(vec![
            raw(r#"{"step": "plan""#),
            fixed(json!({ "step": "output", "content": "never reached" })),
        ]);

        let report = harness.looper.send("hello").await.unwrap();
        assert_eq!(report, QueryReport { outcome: QueryOutcome::MalformedReply, steps_used: 0 });
        assert_eq!(harness.model_calls(), 1);
        assert_eq!(harness.looper.transcript().len(), 2);

        let events = harness.drain();
        match &events[0] {
            LooperToInterfaceMessage::Error(message) => assert!(message.starts_with("JSON parsing error"), "{message}"),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn action_with_null_content_still_runs() {
        let mut harness = Harness::new(vec![
            raw(r#"{"step": "action", "content": null, "function": "create_file", "input": "made.txt|hi"}"#),
            raw(r#"{"step": "output", "content": {"created": ["made.txt"]}}"#),
        ]);

        let report = harness.looper.send("make a file").await.unwrap();
        assert_eq!(report, QueryReport { outcome: QueryOutcome::Completed, steps_used: 1 });
        assert_eq!(std::fs::read_to_string(harness.dir.path().join("made.txt")).unwrap(), "hi");

        let events = harness.drain();
        assert_eq!(events[0], LooperToInterfaceMessage::ToolCall("create_file".into()));
        assert_eq!(events[1], LooperToInterfaceMessage::Output(r#"{"created":["made.txt"]}"#.into()));
    }

    #[tokio::test]
    async fn array_reply_is_rejected_before_any_tool_runs() {
        let mut harness = Harness::new(vec![raw(r#"["action", "", "delete_file", "keep.txt"]"#)]);
        std::fs::write(harness.dir.path().join("keep.txt"), "precious").unwrap();

        let report = harness.looper.send("tidy up").await.unwrap();
        assert_eq!(report, QueryReport { outcome: QueryOutcome::MalformedReply, steps_used: 0 });
        assert!(harness.dir.path().join("keep.txt").exists());
        assert_eq!(harness.looper.transcript().len(), 2);
    }

    #[tokio::test]
    async fn unrecognised_step_stops_the_query() {
        let mut harness = Harness::new(vec![
            fixed(json!({ "step": "chat", "content": "Hi there!" })),
            fixed(json!({ "step": "output", "content": "never reached" })),
        ]);

        let report = harness.looper.send("hi").await.unwrap();
        assert_eq!(report, QueryReport { outcome: QueryOutcome::Stopped, steps_used: 0 });
        assert_eq!(harness.drain()[0], LooperToInterfaceMessage::Other("Hi there!".into()));
    }

    #[tokio::test]
    async fn model_failure_returns_to_prompt() {
        let mut harness = Harness::new(Vec::new());

        let report = harness.looper.send("hi").await.unwrap();
        assert_eq!(report.outcome, QueryOutcome::ModelFailed);

        let events = harness.drain();
        assert_eq!(
            events,
            vec![
                LooperToInterfaceMessage::Error("Unexpected error: model returned an empty reply".into()),
                LooperToInterfaceMessage::TurnComplete,
            ]
        );
    }

    #[tokio::test]
    async fn transcript_carries_across_queries() {
        let mut harness = Harness::new(vec![
            raw(r#"{"step": "output", "content": "first"}"#),
            raw(r#"{"step": "output", "content": "second"}"#),
        ]);

        harness.looper.send("one").await.unwrap();
        harness.looper.send("two").await.unwrap();

        let seen = harness.seen.lock().unwrap();
        let contents: Vec<&str> = seen[1].iter().skip(1).map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["one", r#"{"step": "output", "content": "first"}"#, "two"]);
    }

    #[test]
    fn budget_never_exceeds_its_max() {
        let mut budget = StepBudget::new(3);
        for _ in 0..10 {
            budget.tick();
        }
        assert_eq!(budget.used(), 3);
        assert!(budget.exhausted());
    }
}
