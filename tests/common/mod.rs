#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use text_actions::{Credential, ModelCaller, ModelError};

pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

pub fn write_workflow(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).expect("Failed to write workflow file");
    path
}

pub fn workflow_yaml(name: &str, actions: &[&str]) -> String {
    let steps = actions
        .iter()
        .map(|a| format!("  - action: {}", a))
        .collect::<Vec<_>>()
        .join("\n");
    format!("name: {}\nsteps:\n{}\n", name, steps)
}

pub fn credential() -> Credential {
    Credential::new("test-key")
}

/// Model double that replays scripted responses in order
#[derive(Clone, Default)]
pub struct ScriptedModel {
    responses: Arc<Mutex<VecDeque<Result<String, ModelError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl ScriptedModel {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = Result<S, ModelError>>,
        S: Into<String>,
    {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(|r| r.map(Into::into)).collect(),
            )),
            ..Default::default()
        }
    }

    pub fn ok<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        Self::new(responses.into_iter().map(Ok::<S, ModelError>))
    }

    /// Sleep before every response
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelCaller for ScriptedModel {
    async fn invoke(&self, prompt: &str, _credential: &Credential) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::UpstreamUnavailable("script exhausted".into())))
    }
}
