//! Workflow types and definitions
//!
//! This module contains everything needed before a run starts:
//! - `action` - ActionType, the action catalog and output shapes
//! - `step` - StepDefinition, StepRequest and workflow files
//! - `loader` - Load and check workflow files
//! - `input` - Input text sanitising
//! - `runner_config` - Model and store configuration

pub mod action;
pub mod input;
pub mod loader;
pub mod runner_config;
pub mod step;

pub use action::{
    ActionCatalog, ActionSpec, ActionType, FieldKind, FieldSpec, OutputShape, PrimaryText,
    UnknownAction,
};
pub use input::{sanitize_input, InputError, DEFAULT_MAX_INPUT_CHARS};
pub use loader::{check_consecutive_duplicates, LoadError, LoadedWorkflow, WorkflowLoader};
pub use runner_config::{ModelConfig, RunnerConfig, StoreConfig};
pub use step::{resolve_steps, StepDefinition, StepRequest, WorkflowFile};
