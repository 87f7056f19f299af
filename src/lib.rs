//! # Text Actions
//!
//! A workflow engine that chains text-transformation steps through a
//! chat-completion model and returns a validated, structured result for
//! every step.
//!
//! ## Features
//!
//! - **Fixed action catalog** - Clean, summarize, key points, simplify, analogy, classify, tone
//! - **Structured outputs** - Every model response is extracted and checked against a typed shape
//! - **One repair attempt** - A malformed response is retried once with a targeted notice
//! - **Chaining** - Each step's primary text becomes the next step's input
//! - **Run history** - Finished runs can be kept in memory or in a JSON-lines file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use text_actions::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bridge = ChatBridge::from_config(&ModelConfig::default())?;
//!     let executor = Executor::new(bridge)?;
//!     let credential = Credential::new(std::env::var("GROQ_API_KEY")?);
//!
//!     let steps = vec![StepRequest::new("clean"), StepRequest::new("summarize")];
//!     let run = executor
//!         .run_workflow(&steps, "  <p>Some long article...</p>  ", &credential)
//!         .await?;
//!
//!     println!("Run {} finished: {:?}", run.run_id, run.final_text());
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod engine;
pub mod store;
pub mod workflow;

// Re-export main types
pub use bridge::{ChatBridge, Credential, ModelCaller, ModelError};
pub use engine::{
    Executor, ExecutorError, ExtractionError, FailureCategory, RunResult, RunStatus, ShapeError,
    ShapedOutput, StepResult, StepStatus,
};
pub use store::{JsonlRunStore, MemoryRunStore, RunRecord, RunStore, StepRecord, StoreError};
pub use workflow::{
    ActionCatalog, ActionSpec, ActionType, LoadError, ModelConfig, OutputShape, RunnerConfig,
    StepDefinition, StepRequest, UnknownAction, WorkflowLoader,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bridge::{ChatBridge, Credential, ModelCaller, ModelError};
    pub use crate::engine::{Executor, ExecutorError, RunResult, RunStatus, StepResult};
    pub use crate::store::{open_store, RunRecord, RunStore};
    pub use crate::workflow::{
        sanitize_input, ActionCatalog, ActionType, LoadError, ModelConfig, RunnerConfig,
        StepDefinition, StepRequest, WorkflowLoader,
    };
}
