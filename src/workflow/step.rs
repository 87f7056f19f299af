//! Workflow and step definitions

use serde::{Deserialize, Serialize};

use super::action::{ActionType, UnknownAction};

/// One resolved position in a workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub position: u32,
    pub action: ActionType,
}

impl StepDefinition {
    pub fn new(position: u32, action: ActionType) -> Self {
        Self { position, action }
    }
}

/// An unresolved step as supplied by a caller or a workflow file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRequest {
    pub action: String,
}

impl StepRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
        }
    }
}

impl From<&str> for StepRequest {
    fn from(action: &str) -> Self {
        Self::new(action)
    }
}

/// Resolve every request against the catalog, assigning positions in order.
///
/// Fails on the first unregistered identifier.
pub fn resolve_steps(requests: &[StepRequest]) -> Result<Vec<StepDefinition>, UnknownAction> {
    requests
        .iter()
        .enumerate()
        .map(|(index, request)| {
            let action = ActionType::parse(&request.action)?;
            Ok(StepDefinition::new(index as u32, action))
        })
        .collect()
}

/// A named workflow as stored in a YAML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowFile {
    /// Workflow name (required)
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Ordered steps
    pub steps: Vec<StepRequest>,
}

impl WorkflowFile {
    pub fn resolve(&self) -> Result<Vec<StepDefinition>, UnknownAction> {
        resolve_steps(&self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_assigns_positions() {
        let requests = vec![
            StepRequest::new("clean"),
            StepRequest::new("summarize"),
            StepRequest::new("tone"),
        ];
        let steps = resolve_steps(&requests).unwrap();
        assert_eq!(
            steps,
            vec![
                StepDefinition::new(0, ActionType::Clean),
                StepDefinition::new(1, ActionType::Summarize),
                StepDefinition::new(2, ActionType::Tone),
            ]
        );
    }

    #[test]
    fn test_resolve_rejects_unknown() {
        let requests = vec![StepRequest::new("clean"), StepRequest::new("paraphrase")];
        let err = resolve_steps(&requests).unwrap_err();
        assert_eq!(err.0, "paraphrase");
    }

    #[test]
    fn test_parse_workflow_yaml() {
        let workflow: WorkflowFile = serde_yaml::from_str(
            r#"
name: digest
description: Clean then summarize
steps:
  - action: clean
  - action: summarize
"#,
        )
        .unwrap();

        assert_eq!(workflow.name, "digest");
        assert_eq!(workflow.description.as_deref(), Some("Clean then summarize"));
        assert_eq!(workflow.resolve().unwrap().len(), 2);
    }
}
