//! Executor error types and per-attempt failure categories

use std::fmt;

use serde::Serialize;

use super::result::RunResult;
use crate::bridge::ModelError;
use crate::workflow::UnknownAction;

/// Errors that can escape a workflow run
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error(transparent)]
    UnknownAction(#[from] UnknownAction),

    /// The provider rejected the credential. Carries the failed run so it
    /// can still be recorded.
    #[error("Invalid credential")]
    AuthFailure { run: Box<RunResult> },

    #[error("Template error: {0}")]
    Template(String),
}

/// Why the text returned by the model could not be turned into a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionError {
    #[error("the response was empty")]
    Empty,

    #[error("the response did not contain a JSON object")]
    NoDelimitedPayload,

    #[error("the JSON object in the response was malformed")]
    MalformedPayload,
}

/// A single way a payload deviates from its output shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeViolation {
    Missing {
        field: String,
    },
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    Blank {
        field: String,
    },
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeViolation::Missing { field } => write!(f, "missing required field \"{}\"", field),
            ShapeViolation::WrongType {
                field,
                expected,
                found,
            } => write!(f, "field \"{}\" must be {}, got {}", field, expected, found),
            ShapeViolation::Blank { field } => write!(f, "field \"{}\" is empty", field),
        }
    }
}

/// Every violation found while validating one payload
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("output does not match shape '{shape}': {}", join_violations(.violations))]
pub struct ShapeError {
    pub shape: &'static str,
    pub violations: Vec<ShapeViolation>,
}

fn join_violations(violations: &[ShapeViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Why one attempt of a step did not produce a validated result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureCategory {
    Extraction { error: ExtractionError },
    ShapeMismatch { violations: Vec<ShapeViolation> },
    UpstreamUnavailable,
    Timeout,
    AuthFailure,
}

impl FailureCategory {
    /// The model answered but its text was unusable
    pub fn is_output_defect(&self) -> bool {
        matches!(
            self,
            FailureCategory::Extraction { .. } | FailureCategory::ShapeMismatch { .. }
        )
    }

    /// Sentence fragment describing an output defect for a repair prompt
    pub fn repair_reason(&self) -> Option<String> {
        match self {
            FailureCategory::Extraction { error } => Some(error.to_string()),
            FailureCategory::ShapeMismatch { violations } => {
                let lines: Vec<String> = violations.iter().map(|v| format!("- {}", v)).collect();
                Some(format!(
                    "the JSON object did not match the required structure:\n{}",
                    lines.join("\n")
                ))
            }
            _ => None,
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCategory::Extraction { error } => match error {
                ExtractionError::Empty => f.write_str("empty response"),
                ExtractionError::NoDelimitedPayload => f.write_str("no JSON payload"),
                ExtractionError::MalformedPayload => f.write_str("malformed JSON payload"),
            },
            FailureCategory::ShapeMismatch { violations } => {
                write!(f, "shape mismatch ({} violations)", violations.len())
            }
            FailureCategory::UpstreamUnavailable => f.write_str("model provider unavailable"),
            FailureCategory::Timeout => f.write_str("model call timed out"),
            FailureCategory::AuthFailure => f.write_str("invalid credential"),
        }
    }
}

impl From<ExtractionError> for FailureCategory {
    fn from(error: ExtractionError) -> Self {
        FailureCategory::Extraction { error }
    }
}

impl From<ShapeError> for FailureCategory {
    fn from(error: ShapeError) -> Self {
        FailureCategory::ShapeMismatch {
            violations: error.violations,
        }
    }
}

impl From<ModelError> for FailureCategory {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::AuthFailure => FailureCategory::AuthFailure,
            ModelError::UpstreamUnavailable(_) => FailureCategory::UpstreamUnavailable,
            ModelError::Timeout => FailureCategory::Timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_error_lists_every_violation() {
        let err = ShapeError {
            shape: "text-plus-explanation",
            violations: vec![
                ShapeViolation::Missing {
                    field: "tone".to_string(),
                },
                ShapeViolation::WrongType {
                    field: "explanation".to_string(),
                    expected: "string",
                    found: "number",
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "output does not match shape 'text-plus-explanation': missing required field \"tone\"; \
field \"explanation\" must be string, got number"
        );
    }

    #[test]
    fn test_repair_reason_only_for_output_defects() {
        let empty = FailureCategory::from(ExtractionError::Empty);
        assert!(empty.is_output_defect());
        assert_eq!(empty.repair_reason().unwrap(), "the response was empty");

        assert!(FailureCategory::Timeout.repair_reason().is_none());
        assert!(FailureCategory::UpstreamUnavailable.repair_reason().is_none());
        assert!(!FailureCategory::AuthFailure.is_output_defect());
    }

    #[test]
    fn test_model_error_conversion() {
        assert_eq!(
            FailureCategory::from(ModelError::UpstreamUnavailable("HTTP 502".into())),
            FailureCategory::UpstreamUnavailable
        );
        assert_eq!(FailureCategory::from(ModelError::Timeout), FailureCategory::Timeout);
        assert_eq!(
            FailureCategory::from(ModelError::AuthFailure),
            FailureCategory::AuthFailure
        );
    }
}
