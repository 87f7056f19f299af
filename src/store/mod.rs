//! Run history storage
//!
//! The engine hands back a finished [`RunResult`]; callers convert it into a
//! [`RunRecord`] and keep it in a [`RunStore`]:
//! - `memory` - In-process store, lost on exit
//! - `jsonl` - One JSON record per line in a local file

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{RunResult, RunStatus};
use crate::workflow::{ActionType, StoreConfig};

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlRunStore;
pub use memory::MemoryRunStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted form of one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub position: u32,
    pub action: ActionType,
    pub attempt_count: u32,
    #[serde(default)]
    pub output_text: Option<String>,
}

/// Persisted form of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: String,
    #[serde(default)]
    pub workflow_name: Option<String>,
    pub input_text: String,
    pub created_at: DateTime<Utc>,
    pub status: RunStatus,
    #[serde(default)]
    pub failure_reason: Option<String>,
    pub steps: Vec<StepRecord>,
}

impl RunRecord {
    pub fn from_run(run: &RunResult, workflow_name: Option<&str>) -> Self {
        Self {
            id: run.run_id.clone(),
            workflow_name: workflow_name.map(str::to_string),
            input_text: run.input_text.clone(),
            created_at: run.created_at,
            status: run.overall_status,
            failure_reason: run.failure_reason.clone(),
            steps: run
                .steps
                .iter()
                .map(|step| StepRecord {
                    position: step.position,
                    action: step.action,
                    attempt_count: step.attempt_count,
                    output_text: step.primary_text(),
                })
                .collect(),
        }
    }
}

#[async_trait]
pub trait RunStore: Send + Sync {
    async fn save(&self, record: &RunRecord) -> Result<(), StoreError>;

    /// Most recent records first
    async fn recent(&self, limit: usize) -> Result<Vec<RunRecord>, StoreError>;
}

/// Build the store selected by configuration
pub fn open_store(config: &StoreConfig) -> Box<dyn RunStore> {
    match config {
        StoreConfig::Memory => Box::new(MemoryRunStore::new()),
        StoreConfig::Jsonl { path } => Box::new(JsonlRunStore::new(path)),
    }
}

/// Newest first, stable for equal timestamps
pub(crate) fn newest_first(mut records: Vec<RunRecord>, limit: usize) -> Vec<RunRecord> {
    records.reverse();
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records.truncate(limit);
    records
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::TimeZone;

    pub fn record(id: &str, minute: u32) -> RunRecord {
        RunRecord {
            id: id.to_string(),
            workflow_name: Some("digest".to_string()),
            input_text: "text".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 12, minute, 0).unwrap(),
            status: RunStatus::Completed,
            failure_reason: None,
            steps: vec![StepRecord {
                position: 0,
                action: ActionType::Summarize,
                attempt_count: 1,
                output_text: Some("summary".to_string()),
            }],
        }
    }
}
