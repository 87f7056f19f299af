mod common;

use common::*;
use std::fs;
use text_actions::prelude::*;
use text_actions::workflow::StoreConfig;

#[test]
fn test_load_workflow_file() {
    let dir = create_test_dir();
    let path = write_workflow(
        dir.path(),
        "digest.yaml",
        &workflow_yaml("digest", &["clean", "summarize", "keypoints"]),
    );

    let workflow = WorkflowLoader::load_file(&path).unwrap();

    assert_eq!(workflow.name, "digest");
    let actions: Vec<_> = workflow.steps.iter().map(|s| s.action).collect();
    assert_eq!(
        actions,
        vec![ActionType::Clean, ActionType::Summarize, ActionType::KeyPoints]
    );
    let positions: Vec<_> = workflow.steps.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[test]
fn test_load_accepts_legacy_aliases() {
    let dir = create_test_dir();
    let path = write_workflow(
        dir.path(),
        "legacy.yaml",
        &workflow_yaml("legacy", &["Examples", "sentiment"]),
    );

    let workflow = WorkflowLoader::load_file(&path).unwrap();
    assert_eq!(workflow.steps[0].action, ActionType::Analogy);
    assert_eq!(workflow.steps[1].action, ActionType::Tone);
}

#[test]
fn test_load_rejects_unknown_action() {
    let dir = create_test_dir();
    let path = write_workflow(
        dir.path(),
        "bad.yaml",
        &workflow_yaml("bad", &["clean", "translate"]),
    );

    let err = WorkflowLoader::load_file(&path).unwrap_err();
    assert!(matches!(err, LoadError::UnknownAction(_)));
    assert_eq!(err.to_string(), "Unknown action: translate");
}

#[test]
fn test_load_rejects_consecutive_duplicates() {
    let dir = create_test_dir();
    let path = write_workflow(
        dir.path(),
        "dup.yaml",
        &workflow_yaml("dup", &["clean", "summarize", "summarize"]),
    );

    let err = WorkflowLoader::load_file(&path).unwrap_err();
    assert!(matches!(
        err,
        LoadError::ConsecutiveDuplicate {
            first: 2,
            second: 3,
            ..
        }
    ));
}

#[test]
fn test_load_allows_repeated_non_adjacent_actions() {
    let dir = create_test_dir();
    let path = write_workflow(
        dir.path(),
        "repeat.yaml",
        &workflow_yaml("repeat", &["summarize", "simplify", "summarize"]),
    );

    assert_eq!(WorkflowLoader::load_file(&path).unwrap().steps.len(), 3);
}

#[test]
fn test_load_invalid_yaml() {
    let dir = create_test_dir();
    let path = write_workflow(dir.path(), "broken.yaml", "name: [unclosed\n");

    let err = WorkflowLoader::load_file(&path).unwrap_err();
    assert!(matches!(err, LoadError::Yaml { .. }));
}

#[test]
fn test_load_missing_file() {
    let dir = create_test_dir();
    let err = WorkflowLoader::load_file(&dir.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn test_load_runner_config_with_jsonl_store() {
    let dir = create_test_dir();
    let path = dir.path().join("runner.yaml");
    fs::write(
        &path,
        r#"
model:
  model: llama-3.1-8b-instant
  timeout_secs: 30
store:
  type: jsonl
  path: history/runs.jsonl
max_input_chars: 5000
"#,
    )
    .unwrap();

    let config = RunnerConfig::load(&path).unwrap();

    assert_eq!(config.model.model, "llama-3.1-8b-instant");
    assert_eq!(config.model.base_url, "https://api.groq.com/openai/v1");
    assert_eq!(config.model.timeout_secs, 30);
    assert!(config.model.json_mode);
    assert_eq!(
        config.store,
        StoreConfig::Jsonl {
            path: "history/runs.jsonl".to_string()
        }
    );
    assert_eq!(config.max_input_chars, 5000);
}

#[test]
fn test_sanitized_input_respects_config_limit() {
    let config = RunnerConfig {
        max_input_chars: 10,
        ..Default::default()
    };

    assert_eq!(
        sanitize_input("  hello\u{0007}  ", config.max_input_chars).unwrap(),
        "hello"
    );
    assert!(sanitize_input("this is far too long", config.max_input_chars).is_err());
}
