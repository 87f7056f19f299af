//! Step executor
//!
//! Runs one step end-to-end: compose, call the model, extract, validate.
//! A failed first attempt gets exactly one repair attempt; an invalid
//! credential is never retried.
//!
//! ```text
//! NotStarted -> Attempting(1) -> Succeeded
//!                             -> Failed            (invalid credential)
//!                             -> Repairing -> Attempting(2) -> Succeeded | Failed
//! ```

use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};

use super::error::{ExecutorError, FailureCategory};
use super::extract::extract;
use super::prompt::PromptComposer;
use super::result::StepResult;
use super::validate::{validate, ShapedOutput};
use crate::bridge::{Credential, ModelCaller};
use crate::workflow::{ActionSpec, StepDefinition};

/// Outcome of one model round trip
struct Attempt {
    raw_text: String,
    outcome: Result<ShapedOutput, FailureCategory>,
}

pub struct StepExecutor<'a> {
    caller: &'a dyn ModelCaller,
    composer: &'a PromptComposer,
    call_timeout: Duration,
}

impl<'a> StepExecutor<'a> {
    pub fn new(
        caller: &'a dyn ModelCaller,
        composer: &'a PromptComposer,
        call_timeout: Duration,
    ) -> Self {
        Self {
            caller,
            composer,
            call_timeout,
        }
    }

    /// Execute a step against `input_text`.
    ///
    /// Every model or parsing failure ends up in the returned [`StepResult`];
    /// the only error is a template that fails to render.
    #[instrument(skip_all, fields(position = step.position, action = %step.action))]
    pub async fn run(
        &self,
        step: &StepDefinition,
        input_text: &str,
        credential: &Credential,
    ) -> Result<StepResult, ExecutorError> {
        let spec = step.action.spec();

        let first = self.attempt(spec, input_text, None, credential).await?;
        let failure = match first.outcome {
            Ok(output) => {
                info!(attempts = 1, "Step succeeded");
                return Ok(StepResult::succeeded(step, 1, first.raw_text, output));
            }
            Err(FailureCategory::AuthFailure) => {
                error!("Model provider rejected the credential");
                return Ok(StepResult::failed(
                    step,
                    1,
                    first.raw_text,
                    FailureCategory::AuthFailure,
                ));
            }
            Err(failure) => failure,
        };

        warn!(failure = %failure, "Attempt 1 failed, sending repair prompt");
        let second = self
            .attempt(spec, input_text, Some(&failure), credential)
            .await?;
        match second.outcome {
            Ok(output) => {
                info!(attempts = 2, "Step succeeded after repair");
                Ok(StepResult::succeeded(step, 2, second.raw_text, output))
            }
            Err(terminal) => {
                error!(failure = %terminal, "Step failed after repair");
                Ok(StepResult::failed(step, 2, second.raw_text, terminal))
            }
        }
    }

    async fn attempt(
        &self,
        spec: &ActionSpec,
        input_text: &str,
        previous_failure: Option<&FailureCategory>,
        credential: &Credential,
    ) -> Result<Attempt, ExecutorError> {
        let prompt = self.composer.compose(spec, input_text, previous_failure)?;

        let raw_text = match tokio::time::timeout(
            self.call_timeout,
            self.caller.invoke(&prompt, credential),
        )
        .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                return Ok(Attempt {
                    raw_text: String::new(),
                    outcome: Err(e.into()),
                })
            }
            Err(_) => {
                warn!(timeout = ?self.call_timeout, "Model call exceeded timeout");
                return Ok(Attempt {
                    raw_text: String::new(),
                    outcome: Err(FailureCategory::Timeout),
                });
            }
        };
        debug!(raw_text = %raw_text, "Model responded");

        let outcome = extract(&raw_text)
            .map_err(FailureCategory::from)
            .and_then(|payload| validate(&payload, spec.shape).map_err(FailureCategory::from));

        Ok(Attempt { raw_text, outcome })
    }
}
