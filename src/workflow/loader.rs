//! Workflow file loader
//!
//! Load workflow YAML files from disk and apply the definition-time checks
//! callers run before handing steps to the engine.

use std::path::Path;

use super::action::UnknownAction;
use super::step::{StepDefinition, WorkflowFile};

const MAX_NAME_CHARS: usize = 200;
const MAX_DESCRIPTION_CHARS: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error in {file}: {error}")]
    Yaml {
        file: String,
        error: serde_yaml::Error,
    },

    #[error(transparent)]
    UnknownAction(#[from] UnknownAction),

    #[error("Workflow name cannot be empty")]
    EmptyName,

    #[error("Workflow {field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Workflow has no steps")]
    NoSteps,

    #[error("Consecutive duplicate actions are not allowed: step {first} and step {second} are both '{action}'")]
    ConsecutiveDuplicate {
        first: usize,
        second: usize,
        action: String,
    },
}

/// A workflow file that passed every definition-time check
#[derive(Debug, Clone)]
pub struct LoadedWorkflow {
    pub name: String,
    pub description: Option<String>,
    pub steps: Vec<StepDefinition>,
}

pub struct WorkflowLoader;

impl WorkflowLoader {
    /// Read and validate a workflow file
    pub fn load_file(path: &Path) -> Result<LoadedWorkflow, LoadError> {
        let content = std::fs::read_to_string(path)?;
        let file: WorkflowFile = serde_yaml::from_str(&content).map_err(|e| LoadError::Yaml {
            file: path.display().to_string(),
            error: e,
        })?;
        Self::check(file)
    }

    /// Validate an already-parsed workflow file
    pub fn check(file: WorkflowFile) -> Result<LoadedWorkflow, LoadError> {
        let name = file.name.trim().to_string();
        if name.is_empty() {
            return Err(LoadError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(LoadError::TooLong {
                field: "name",
                max: MAX_NAME_CHARS,
            });
        }

        let description = file
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        if let Some(d) = &description {
            if d.chars().count() > MAX_DESCRIPTION_CHARS {
                return Err(LoadError::TooLong {
                    field: "description",
                    max: MAX_DESCRIPTION_CHARS,
                });
            }
        }

        if file.steps.is_empty() {
            return Err(LoadError::NoSteps);
        }

        let steps = file.resolve()?;
        check_consecutive_duplicates(&steps)?;

        Ok(LoadedWorkflow {
            name,
            description,
            steps,
        })
    }
}

/// Reject two adjacent steps that run the same action
pub fn check_consecutive_duplicates(steps: &[StepDefinition]) -> Result<(), LoadError> {
    for (index, pair) in steps.windows(2).enumerate() {
        if pair[0].action == pair[1].action {
            return Err(LoadError::ConsecutiveDuplicate {
                first: index + 1,
                second: index + 2,
                action: pair[0].action.to_string(),
            });
        }
    }
    Ok(())
}
