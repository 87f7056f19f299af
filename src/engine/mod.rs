//! Step execution engine
//!
//! This module contains:
//! - `executor` - The workflow executor
//! - `step_executor` - Single-step execution with one repair attempt
//! - `prompt` - Prompt composition
//! - `extract` - Payload extraction from model text
//! - `validate` - Shape validation
//! - `error` - Executor errors and failure categories
//! - `result` - Step and run result types

pub mod error;
pub mod executor;
pub mod extract;
pub mod prompt;
pub mod result;
pub mod step_executor;
pub mod validate;

pub use error::{ExecutorError, ExtractionError, FailureCategory, ShapeError, ShapeViolation};
pub use executor::{Executor, DEFAULT_CALL_TIMEOUT};
pub use extract::{extract, Payload};
pub use prompt::PromptComposer;
pub use result::{RunResult, RunStatus, StepResult, StepStatus};
pub use step_executor::StepExecutor;
pub use validate::{validate, FieldValue, ShapedOutput};
