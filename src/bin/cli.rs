use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use text_actions::prelude::*;
use text_actions::workflow::StoreConfig;
use tracing_subscriber::EnvFilter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

const API_KEY_ENV: &str = "GROQ_API_KEY";

#[derive(Parser)]
#[command(name = "text-actions")]
#[command(about = "Run text-transformation workflows against a language model", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a workflow file over some input text
    Run {
        /// Path to the workflow YAML file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Input text
        #[arg(short, long, conflicts_with = "input_file", required_unless_present = "input_file")]
        input: Option<String>,

        /// Read the input text from a file
        #[arg(long, value_name = "PATH")]
        input_file: Option<PathBuf>,

        /// Path to runner.yaml config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Provider API key (default: $GROQ_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Validate a workflow file without calling the model
    Validate {
        /// Path to the workflow YAML file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List the available actions
    Actions,

    /// Show recent runs from the configured store
    ///
    /// Runs are only kept between invocations with `store.type: jsonl` in
    /// runner.yaml; the default memory store is empty in a new process.
    Runs {
        /// Path to runner.yaml config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of runs to show
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
}

#[cfg(feature = "otel")]
fn init_otel_tracing(verbose: bool) {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::runtime::Tokio;
    use opentelemetry_sdk::trace::TracerProvider;

    let filter = if verbose {
        "text_actions=debug"
    } else {
        "text_actions=info"
    };

    let otlp_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4317".to_string());

    let exporter = match opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&otlp_endpoint)
        .build()
    {
        Ok(exporter) => exporter,
        Err(e) => {
            eprintln!("Failed to create OTLP exporter: {}", e);
            init_tracing(verbose);
            return;
        }
    };

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, Tokio)
        .build();

    let tracer = provider.tracer("text-actions");
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(otel_layer)
        .init();

    opentelemetry::global::set_tracer_provider(provider);
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "text_actions=debug"
    } else {
        "text_actions=info"
    };

    // stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    #[cfg(feature = "otel")]
    init_otel_tracing(cli.verbose);

    #[cfg(not(feature = "otel"))]
    init_tracing(cli.verbose);

    let result = run(cli).await;

    #[cfg(feature = "otel")]
    opentelemetry::global::shutdown_tracer_provider();

    match result {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Commands::Run {
            file,
            input,
            input_file,
            config,
            api_key,
        } => run_workflow(file, input, input_file, config, api_key).await,
        Commands::Validate { file } => validate(&file),
        Commands::Actions => {
            list_actions();
            Ok(true)
        }
        Commands::Runs { config, limit } => list_runs(config, limit).await,
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RunnerConfig> {
    match path {
        Some(path) => RunnerConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(RunnerConfig::default()),
    }
}

fn resolve_credential(api_key: Option<String>) -> anyhow::Result<Credential> {
    let secret = match api_key {
        Some(key) => key,
        None => std::env::var(API_KEY_ENV).unwrap_or_default(),
    };
    if secret.trim().is_empty() {
        anyhow::bail!("No API key provided. Pass --api-key or set {}", API_KEY_ENV);
    }
    Ok(Credential::new(secret.trim()))
}

async fn run_workflow(
    file: PathBuf,
    input: Option<String>,
    input_file: Option<PathBuf>,
    config: Option<PathBuf>,
    api_key: Option<String>,
) -> anyhow::Result<bool> {
    let config = load_config(config.as_deref())?;
    let workflow = WorkflowLoader::load_file(&file)?;

    let raw_input = match (input, input_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?,
        (None, None) => anyhow::bail!("Provide --input or --input-file"),
    };
    let input_text = sanitize_input(&raw_input, config.max_input_chars)?;
    let credential = resolve_credential(api_key)?;

    let bridge = ChatBridge::from_config(&config.model)?;
    let executor = Executor::new(bridge)?.with_call_timeout(config.model.timeout());
    let store = open_store(&config.store);

    tracing::info!(workflow = %workflow.name, steps = workflow.steps.len(), "Running workflow");
    let run = executor
        .execute(&workflow.steps, &input_text, &credential)
        .await?;

    store
        .save(&RunRecord::from_run(&run, Some(&workflow.name)))
        .await
        .context("Failed to save run record")?;

    println!("{}", serde_json::to_string_pretty(&run)?);

    if run.is_auth_failure() {
        anyhow::bail!("Invalid credential");
    }
    Ok(run.overall_status == RunStatus::Completed)
}

fn validate(file: &Path) -> anyhow::Result<bool> {
    if !file.exists() {
        anyhow::bail!("Path not found: {}", file.display());
    }

    let workflow = WorkflowLoader::load_file(file)?;
    let actions: Vec<&str> = workflow.steps.iter().map(|s| s.action.as_str()).collect();
    println!(
        "✓ {} is valid ({} steps: {})",
        file.display(),
        actions.len(),
        actions.join(" -> ")
    );
    Ok(true)
}

fn list_actions() {
    println!("Available actions:\n");
    for spec in ActionCatalog::all() {
        let fields: Vec<String> = spec
            .shape
            .fields
            .iter()
            .map(|f| format!("{}: {}", f.name, f.kind.type_name()))
            .collect();
        println!("  {:<10} {{{}}}", spec.action.as_str(), fields.join(", "));
    }
}

async fn list_runs(config: Option<PathBuf>, limit: usize) -> anyhow::Result<bool> {
    let config = load_config(config.as_deref())?;
    if config.store == StoreConfig::Memory {
        eprintln!(
            "Note: the memory store does not persist runs; set `store.type: jsonl` in runner.yaml"
        );
    }
    let store = open_store(&config.store);
    let records = store.recent(limit).await?;

    if records.is_empty() {
        println!("No runs recorded");
        return Ok(true);
    }

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(true)
}
