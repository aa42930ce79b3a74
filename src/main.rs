//! Task executor agent - Main Entry Point

use babyagi_task_executor::agent::{dispatch, InputSchema, TaskExecutor};
use babyagi_task_executor::config::{ConfigError, Deployment};
use babyagi_task_executor::error::ExecutorError;
use babyagi_task_executor::llm::provider::LlmProvider;
use babyagi_task_executor::llm::providers;
use babyagi_task_executor::observability::init_default_logging;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn};

/// BabyAGI task executor agent
#[derive(Parser)]
#[command(name = "task-executor")]
#[command(about = "Execute a BabyAGI task against a completion backend")]
#[command(version)]
struct Cli {
    /// Deployment file path (TOML, or JSON with a .json extension)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Node URL; overrides backend.url
    #[arg(long, env = "NODE_URL")]
    node_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one invocation and print the run report as JSON
    Run {
        /// Task to execute
        #[arg(long, required_unless_present = "input", conflicts_with = "input")]
        task: Option<String>,

        /// Objective the task serves
        #[arg(long, required_unless_present = "input", conflicts_with = "input")]
        objective: Option<String>,

        /// Operation to invoke
        #[arg(long, default_value = "execute_task", conflicts_with = "input")]
        tool_name: String,

        /// JSON file holding a full {tool_name, tool_input_data} payload
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Validate the deployment file
    Config {
        /// Print the resolved deployment
        #[arg(long)]
        show: bool,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Executor(#[from] ExecutorError),
    #[error("Failed to read input file {path}: {source}")]
    InputFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Input file {path} is not valid JSON: {source}")]
    InputJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    fn report_json(&self) -> String {
        let report = match self {
            CliError::Executor(e) => e.to_report(),
            other => ExecutorError::invalid_input(other.to_string()).to_report(),
        };
        serde_json::to_string(&report).unwrap_or_else(|_| report.message.clone())
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    info!("Starting task executor v{}", env!("CARGO_PKG_VERSION"));

    let deployment = match load_deployment(cli.config.as_deref()) {
        Ok(deployment) => deployment,
        Err(e) => {
            error!("Failed to load deployment: {}", e);
            eprintln!("{}", CliError::from(e).report_json());
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run {
            task,
            objective,
            tool_name,
            input,
        } => {
            run_command(
                deployment,
                cli.node_url,
                task,
                objective,
                tool_name,
                input,
            )
            .await
        }
        Commands::Config { show } => handle_config_command(&deployment, cli.node_url, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        eprintln!("{}", e.report_json());
        process::exit(1);
    }
}

fn load_deployment(config_path: Option<&Path>) -> Result<Deployment, ExecutorError> {
    if let Some(path) = config_path {
        info!("Loading deployment from: {}", path.display());
        return Ok(Deployment::load_from_file(path)?);
    }

    let default_paths = [
        "agent.toml",
        "config/agent.toml",
        "deployment.toml",
        "configs/deployment.json",
    ];

    for path_str in default_paths {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading deployment from: {}", path.display());
            return Ok(Deployment::load_from_file(path)?);
        }
    }

    Err(ConfigError::InvalidConfig(
        "No deployment file found. Provide one with -c/--config or create agent.toml".to_string(),
    )
    .into())
}

/// Build the provider selected by `backend.kind`
fn create_provider(
    deployment: &Deployment,
    node_url: Option<String>,
) -> Result<Arc<dyn LlmProvider>, ExecutorError> {
    let provider = providers::create_provider(&deployment.backend, node_url)
        .map_err(|e| ConfigError::InvalidConfig(format!("backend: {e}")))?;

    info!(provider = provider.name(), "Completion backend ready");
    Ok(provider)
}

async fn run_command(
    deployment: Deployment,
    node_url: Option<String>,
    task: Option<String>,
    objective: Option<String>,
    tool_name: String,
    input_path: Option<PathBuf>,
) -> Result<(), CliError> {
    let input = match input_path {
        Some(path) => read_input_file(&path)?,
        None => InputSchema {
            tool_name,
            tool_input_data: serde_json::json!({
                "task": task.unwrap_or_default(),
                "objective": objective.unwrap_or_default(),
            }),
        },
    };

    let provider = create_provider(&deployment, node_url)?;
    let executor = TaskExecutor::new(deployment.config, provider);

    let cancel = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal handler available: never cancel.
            std::future::pending::<()>().await;
        }
        warn!("Received interrupt, cancelling task");
    };

    let report = dispatch::run_input_until(&executor, &input, cancel).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_input_file(path: &Path) -> Result<InputSchema, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::InputFile {
        path: path.to_path_buf(),
        source,
    })?;
    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| CliError::InputJson {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(InputSchema::from_value(value)?)
}

fn handle_config_command(
    deployment: &Deployment,
    node_url: Option<String>,
    show: bool,
) -> Result<(), CliError> {
    create_provider(deployment, node_url)?;
    info!(agent = %deployment.agent.name, "Deployment is valid");

    if show {
        println!("{}", serde_json::to_string_pretty(deployment)?);
    }

    Ok(())
}
