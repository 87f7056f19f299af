//! Execution result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::FailureCategory;
use super::validate::ShapedOutput;
use crate::workflow::{ActionType, StepDefinition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Failed,
}

/// Result of a step execution
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub position: u32,
    pub action: ActionType,
    pub attempt_count: u32,
    /// Model text of the last attempt (empty if the call itself failed)
    pub raw_text: String,
    pub parsed_output: Option<ShapedOutput>,
    pub status: StepStatus,
    /// Terminal failure category, present iff the step failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureCategory>,
}

impl StepResult {
    pub(crate) fn succeeded(
        step: &StepDefinition,
        attempt_count: u32,
        raw_text: String,
        output: ShapedOutput,
    ) -> Self {
        Self {
            position: step.position,
            action: step.action,
            attempt_count,
            raw_text,
            parsed_output: Some(output),
            status: StepStatus::Succeeded,
            failure: None,
        }
    }

    pub(crate) fn failed(
        step: &StepDefinition,
        attempt_count: u32,
        raw_text: String,
        failure: FailureCategory,
    ) -> Self {
        Self {
            position: step.position,
            action: step.action,
            attempt_count,
            raw_text,
            parsed_output: None,
            status: StepStatus::Failed,
            failure: Some(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Succeeded
    }

    /// Text this step hands to the next one
    pub fn primary_text(&self) -> Option<String> {
        self.parsed_output.as_ref().map(ShapedOutput::primary_text)
    }
}

/// Result of a workflow run
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub run_id: String,
    pub created_at: DateTime<Utc>,
    pub input_text: String,
    pub steps: Vec<StepResult>,
    pub overall_status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl RunResult {
    pub(crate) fn completed(
        run_id: String,
        created_at: DateTime<Utc>,
        input_text: String,
        steps: Vec<StepResult>,
    ) -> Self {
        Self {
            run_id,
            created_at,
            input_text,
            steps,
            overall_status: RunStatus::Completed,
            failure_reason: None,
        }
    }

    /// Build a failed run; the last step is the one that failed
    pub(crate) fn failed(
        run_id: String,
        created_at: DateTime<Utc>,
        input_text: String,
        steps: Vec<StepResult>,
    ) -> Self {
        let failure_reason = steps.last().map(failure_sentence);
        Self {
            run_id,
            created_at,
            input_text,
            steps,
            overall_status: RunStatus::Failed,
            failure_reason,
        }
    }

    pub fn is_success(&self) -> bool {
        self.overall_status == RunStatus::Completed
    }

    /// The step that stopped the run, if any
    pub fn failed_step(&self) -> Option<&StepResult> {
        self.steps.iter().find(|s| !s.is_success())
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.failed_step().and_then(|s| s.failure.as_ref()),
            Some(FailureCategory::AuthFailure)
        )
    }

    /// Primary text of the last step of a completed run
    pub fn final_text(&self) -> Option<String> {
        if !self.is_success() {
            return None;
        }
        self.steps.last().and_then(StepResult::primary_text)
    }
}

/// User-facing sentence for a failed step; never carries provider or parser
/// detail.
fn failure_sentence(step: &StepResult) -> String {
    let ordinal = step.position + 1;
    match step.failure {
        Some(FailureCategory::AuthFailure) => "Invalid credential".to_string(),
        Some(FailureCategory::UpstreamUnavailable) | Some(FailureCategory::Timeout) => {
            format!("Model provider unavailable for step {}", ordinal)
        }
        _ => format!(
            "Could not produce a valid result for step {} after repair",
            ordinal
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::ExtractionError;

    fn failed_step(position: u32, failure: FailureCategory) -> StepResult {
        StepResult::failed(
            &StepDefinition::new(position, ActionType::Summarize),
            2,
            String::new(),
            failure,
        )
    }

    #[test]
    fn test_failed_run_reason() {
        let run = RunResult::failed(
            "run".to_string(),
            Utc::now(),
            "text".to_string(),
            vec![failed_step(
                2,
                FailureCategory::Extraction {
                    error: ExtractionError::MalformedPayload,
                },
            )],
        );
        assert!(!run.is_success());
        assert_eq!(
            run.failure_reason.as_deref(),
            Some("Could not produce a valid result for step 3 after repair")
        );
        assert!(!run.is_auth_failure());
        assert!(run.final_text().is_none());
    }

    #[test]
    fn test_provider_failure_reason() {
        for failure in [
            FailureCategory::Timeout,
            FailureCategory::UpstreamUnavailable,
        ] {
            let run = RunResult::failed(
                "run".to_string(),
                Utc::now(),
                "text".to_string(),
                vec![failed_step(1, failure)],
            );
            assert_eq!(
                run.failure_reason.as_deref(),
                Some("Model provider unavailable for step 2")
            );
        }
    }

    #[test]
    fn test_auth_failure_reason() {
        let run = RunResult::failed(
            "run".to_string(),
            Utc::now(),
            "text".to_string(),
            vec![failed_step(0, FailureCategory::AuthFailure)],
        );
        assert_eq!(run.failure_reason.as_deref(), Some("Invalid credential"));
        assert!(run.is_auth_failure());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&RunStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(
            serde_json::to_string(&StepStatus::Failed).unwrap(),
            "\"failed\""
        );
    }
}
