//! Runner configuration
//!
//! Configuration for the model provider and the run store, loaded from
//! runner.yaml:
//!
//! ```yaml
//! model:
//!   base_url: https://api.groq.com/openai/v1
//!   model: llama-3.3-70b-versatile
//!   timeout_secs: 120
//!
//! store:
//!   type: jsonl
//!   path: .text-actions/runs.jsonl
//!
//! max_input_chars: 20000
//! ```
//!
//! Credentials are never part of this file.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::input::DEFAULT_MAX_INPUT_CHARS;
use super::loader::LoadError;

/// Where finished run records are kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    #[default]
    Memory,
    Jsonl {
        #[serde(default = "default_jsonl_path")]
        path: String,
    },
}

fn default_jsonl_path() -> String {
    ".text-actions/runs.jsonl".to_string()
}

/// Model provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound on a single model call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub temperature: Option<f32>,

    /// Ask the provider for a JSON object response
    #[serde(default = "default_json_mode")]
    pub json_mode: bool,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_json_mode() -> bool {
    true
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: None,
            json_mode: default_json_mode(),
            headers: HashMap::new(),
        }
    }
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

fn default_max_input_chars() -> usize {
    DEFAULT_MAX_INPUT_CHARS
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            store: StoreConfig::default(),
            max_input_chars: default_max_input_chars(),
        }
    }
}

impl RunnerConfig {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| LoadError::Yaml {
            file: path.display().to_string(),
            error: e,
        })
    }
}
