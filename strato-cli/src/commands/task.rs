//! Task command handlers
//!
//! Submitting, polling, watching, and canceling remote GPU tasks.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Subcommand, ValueEnum};
use colored::*;
use strato_agent::{LifecycleAgent, TaskHandle, TaskSnapshot};
use strato_client::FunctionClient;
use strato_core::domain::phase::TaskPhase;
use strato_core::domain::result::TaskOutput;
use strato_core::domain::task::{GpuSpecification, ResultStrategy, TaskSpec};

use crate::config::Config;

/// Task subcommands
#[derive(Subcommand)]
pub enum TaskCommands {
    /// Submit a new task
    Submit {
        /// Task name shown in the provider console
        #[arg(long)]
        name: String,

        /// Container image reference
        #[arg(long)]
        image: String,

        /// GPU type (e.g., L40S)
        #[arg(long)]
        gpu: String,

        /// Instance type (e.g., gl40s_1.br25_2xlarge)
        #[arg(long)]
        instance_type: String,

        /// Backend/cluster group (e.g., GFN)
        #[arg(long)]
        backend: String,

        /// Maximum runtime, ISO-8601 (e.g., PT1H)
        #[arg(long, default_value = "PT1H")]
        max_runtime: String,

        /// Result handling mode
        #[arg(long, value_enum, default_value = "upload")]
        mode: ResultMode,

        /// Destination for uploaded results (required with --mode upload)
        #[arg(long)]
        results_location: Option<String>,

        /// Environment variables as KEY=VALUE
        #[arg(long = "env")]
        env: Vec<String>,

        /// Container entry arguments
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },
    /// Poll a task once
    Status {
        /// Encoded task handle from `task submit`
        handle: String,

        /// Last snapshot string from a previous poll
        #[arg(long)]
        last: Option<String>,
    },
    /// Poll a task until it reaches a terminal phase
    Watch {
        /// Encoded task handle from `task submit`
        handle: String,

        /// Seconds between polls
        #[arg(long, default_value_t = 10)]
        interval: u64,
    },
    /// Cancel a task
    Cancel {
        /// Encoded task handle from `task submit`
        handle: String,

        /// Last snapshot string from a previous poll
        #[arg(long)]
        last: Option<String>,
    },
}

/// Result handling mode flag
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResultMode {
    Inline,
    Upload,
}

/// Handle task commands
pub async fn handle_task_command(command: TaskCommands, config: &Config) -> Result<()> {
    let agent = LifecycleAgent::new(FunctionClient::new(&config.base_url));

    match command {
        TaskCommands::Submit {
            name,
            image,
            gpu,
            instance_type,
            backend,
            max_runtime,
            mode,
            results_location,
            env,
            args,
        } => {
            let mut spec = TaskSpec::new(name, image, GpuSpecification::new(gpu, instance_type, backend))
                .with_args(args)
                .with_max_runtime(max_runtime);

            spec = match mode {
                ResultMode::Inline => spec.with_inline_results(),
                ResultMode::Upload => match results_location {
                    Some(destination) => spec.with_upload_results(destination),
                    None => bail!("--results-location is required with --mode upload"),
                },
            };

            for pair in env {
                let (key, value) = pair
                    .split_once('=')
                    .with_context(|| format!("invalid --env value {:?}, expected KEY=VALUE", pair))?;
                spec = spec.with_env(key, value);
            }

            submit_task(&agent, &spec, config).await
        }
        TaskCommands::Status { handle, last } => poll_task(&agent, &handle, last, config).await,
        TaskCommands::Watch { handle, interval } => {
            watch_task(&agent, &handle, interval, config).await
        }
        TaskCommands::Cancel { handle, last } => cancel_task(&agent, &handle, last, config).await,
    }
}

/// Submit a task and print its handle
async fn submit_task(
    agent: &LifecycleAgent<FunctionClient>,
    spec: &TaskSpec,
    config: &Config,
) -> Result<()> {
    let handle = agent.create(spec, &config.credentials).await?;

    println!("{}", "Task submitted.".green().bold());
    println!("  Remote ID: {}", handle.task_id.cyan());
    println!();
    println!("Keep this handle to poll or cancel the task:");
    println!("  {}", handle.encode().bold());

    Ok(())
}

/// Poll a task once and print the snapshot
async fn poll_task(
    agent: &LifecycleAgent<FunctionClient>,
    raw_handle: &str,
    last: Option<String>,
    config: &Config,
) -> Result<()> {
    let handle = TaskHandle::decode(raw_handle)?;
    let last = last.as_deref().map(TaskSnapshot::decode).transpose()?;

    let snapshot = agent
        .get(&handle, last.as_ref(), &config.credentials)
        .await?;
    print_snapshot(&handle, &snapshot);

    if !snapshot.is_terminal() {
        println!();
        println!("Pass this snapshot back on the next poll:");
        println!("  {}", snapshot.encode().dimmed());
    }

    Ok(())
}

/// Poll a task on a fixed cadence until it is terminal
async fn watch_task(
    agent: &LifecycleAgent<FunctionClient>,
    raw_handle: &str,
    interval: u64,
    config: &Config,
) -> Result<()> {
    let handle = TaskHandle::decode(raw_handle)?;
    let mut last: Option<TaskSnapshot> = None;

    loop {
        match agent.get(&handle, last.as_ref(), &config.credentials).await {
            Ok(snapshot) => {
                print_snapshot(&handle, &snapshot);
                if snapshot.is_terminal() {
                    return Ok(());
                }
                last = Some(snapshot);
            }
            Err(e) if e.is_retryable() => {
                println!("{}", format!("⚠ {} (will retry)", e).yellow());
            }
            Err(e) => return Err(e.into()),
        }

        tokio::time::sleep(Duration::from_secs(interval)).await;
    }
}

/// Cancel a task
async fn cancel_task(
    agent: &LifecycleAgent<FunctionClient>,
    raw_handle: &str,
    last: Option<String>,
    config: &Config,
) -> Result<()> {
    let handle = TaskHandle::decode(raw_handle)?;
    let last = last.as_deref().map(TaskSnapshot::decode).transpose()?;

    let snapshot = agent
        .delete(&handle, last.as_ref(), &config.credentials)
        .await?;

    println!("{}", "Task canceled.".yellow().bold());
    print_snapshot(&handle, &snapshot);

    Ok(())
}

/// Print one snapshot
fn print_snapshot(handle: &TaskHandle, snapshot: &TaskSnapshot) {
    println!(
        "  {} Task {}  {}",
        "▸".cyan(),
        handle.task_id.dimmed(),
        colorize_phase(snapshot.phase)
    );

    if let Some(pct) = snapshot.percent_complete {
        println!("    Progress: {:.0}%", pct);
    }

    if let Some(message) = &snapshot.message {
        println!("    {}", message.dimmed());
    }

    if let Some(console) = &snapshot.console_url {
        println!("    Console:  {}", console.dimmed());
    }

    if let Some(result) = &snapshot.result {
        match &result.output {
            TaskOutput::Inline(payload) => {
                println!("    Output:   {}", payload);
            }
            TaskOutput::Uploaded { uri } => {
                println!("    Results:  {}", uri.cyan());
            }
        }
        if let Some(code) = result.exit_code {
            println!("    Exit:     {}", code);
        }
        if let Some(secs) = result.duration_seconds {
            println!("    Runtime:  {}s", secs);
        }
    }
}

/// Colorize a task phase for display
fn colorize_phase(phase: TaskPhase) -> colored::ColoredString {
    let phase_str = format!("{:?}", phase);
    match phase {
        TaskPhase::Queued => phase_str.yellow(),
        TaskPhase::Running => phase_str.cyan(),
        TaskPhase::Succeeded => phase_str.green(),
        TaskPhase::Failed => phase_str.red(),
        TaskPhase::Aborted => phase_str.dimmed(),
    }
}
