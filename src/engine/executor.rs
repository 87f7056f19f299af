//! Workflow Executor - Runs step sequences against a model
//!
//! This is the main engine that:
//! 1. Resolves step actions against the catalog before any model call
//! 2. Executes steps strictly in position order
//! 3. Pipes each step's primary text into the next step
//! 4. Stops at the first failed step and reports an all-or-nothing result

use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, instrument};

use super::error::ExecutorError;
use super::prompt::PromptComposer;
use super::result::{RunResult, StepResult};
use super::step_executor::StepExecutor;
use crate::bridge::{Credential, ModelCaller};
use crate::workflow::{resolve_steps, StepDefinition, StepRequest};

/// Default bound on a single model call
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(120);

/// The workflow executor.
///
/// Holds no per-run state; one instance can serve concurrent runs.
pub struct Executor<M> {
    caller: M,
    composer: PromptComposer,
    call_timeout: Duration,
}

impl<M: ModelCaller> Executor<M> {
    pub fn new(caller: M) -> Result<Self, ExecutorError> {
        Ok(Self {
            caller,
            composer: PromptComposer::new()?,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        })
    }

    /// Set the bound applied to every model call
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Resolve and run caller-supplied steps.
    ///
    /// Unknown actions fail before the model is called. A run stopped by an
    /// invalid credential is returned inside [`ExecutorError::AuthFailure`].
    pub async fn run_workflow(
        &self,
        steps: &[StepRequest],
        input_text: &str,
        credential: &Credential,
    ) -> Result<RunResult, ExecutorError> {
        let steps = resolve_steps(steps)?;
        let run = self.execute(&steps, input_text, credential).await?;

        if run.is_auth_failure() {
            return Err(ExecutorError::AuthFailure { run: Box::new(run) });
        }
        Ok(run)
    }

    /// Run resolved steps in position order
    #[instrument(skip_all, fields(run_id = tracing::field::Empty, steps = steps.len()))]
    pub async fn execute(
        &self,
        steps: &[StepDefinition],
        input_text: &str,
        credential: &Credential,
    ) -> Result<RunResult, ExecutorError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());
        let created_at = Utc::now();

        let mut ordered = steps.to_vec();
        ordered.sort_by_key(|s| s.position);

        info!("Starting run with {} steps", ordered.len());

        let step_executor = StepExecutor::new(&self.caller, &self.composer, self.call_timeout);
        let mut results: Vec<StepResult> = Vec::with_capacity(ordered.len());
        let mut current_input = input_text.to_string();

        for step in &ordered {
            let result = step_executor.run(step, &current_input, credential).await?;

            match result.primary_text() {
                Some(text) if result.is_success() => {
                    current_input = text;
                    results.push(result);
                }
                _ => {
                    results.push(result);
                    let run =
                        RunResult::failed(run_id, created_at, input_text.to_string(), results);
                    error!(
                        reason = run.failure_reason.as_deref().unwrap_or_default(),
                        "Run failed"
                    );
                    return Ok(run);
                }
            }
        }

        info!("Run completed");
        Ok(RunResult::completed(
            run_id,
            created_at,
            input_text.to_string(),
            results,
        ))
    }
}
