//! preview - watch a preview deployment job on the control plane.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use preview_core::domain::ProjectId;
use preview_core::impls::{ClientConfig, GraphQlControlPlane};
use preview_core::ports::ControlPlane;
use preview_core::{JobId, JobOutcome, PollerBuilder, RetryPolicy};

#[derive(Debug, Parser)]
#[command(name = "preview", version, about, long_about = None)]
struct Cli {
    /// Control plane GraphQL endpoint.
    #[arg(long, env = "PREVIEW_CONTROL_PLANE_URL")]
    endpoint: String,

    /// Personal access token for the control plane.
    #[arg(long, env = "PREVIEW_CONTROL_PLANE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Poll a job until it succeeds or fails.
    Poll(PollArgs),
    /// Show a project record.
    Project {
        /// Project ID.
        project_id: String,
    },
}

#[derive(Debug, clap::Args)]
struct PollArgs {
    /// Job ID to watch.
    job_id: String,

    /// Delay between polls.
    #[arg(long, default_value_t = 2000)]
    poll_interval_ms: u64,

    /// Give up after this many polls (default: poll until terminal).
    #[arg(long)]
    max_polls: Option<u32>,

    /// Attempts per query before giving up.
    #[arg(long, default_value_t = 5)]
    retry_limit: u32,

    /// Delay between query attempts.
    #[arg(long, default_value_t = 2000)]
    retry_delay_ms: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let control_plane = GraphQlControlPlane::new(ClientConfig {
        endpoint: cli.endpoint,
        token: cli.token,
    })
    .context("Failed to create control plane client")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match cli.command {
            Commands::Poll(args) => poll(Arc::new(control_plane), args).await,
            Commands::Project { project_id } => project(&control_plane, project_id).await,
        }
    })
}

async fn poll(control_plane: Arc<dyn ControlPlane>, args: PollArgs) -> Result<()> {
    let poller = PollerBuilder::new(control_plane)
        .retry_policy(RetryPolicy {
            limit: args.retry_limit,
            delay: Duration::from_millis(args.retry_delay_ms),
        })
        .poll_interval(Duration::from_millis(args.poll_interval_ms))
        .max_attempts(args.max_polls)
        .build()?;

    let job_id = JobId::new(args.job_id);
    tracing::info!("Polling the preview app deployment status...");

    let outcome = poller
        .poll_until_terminal(&job_id)
        .await
        .with_context(|| format!("Failed to poll job {job_id}"))?;

    match outcome {
        JobOutcome::Success => {
            println!("{outcome}");
            Ok(())
        }
        JobOutcome::Failed => {
            bail!("Preview app has been created, but applying metadata and migrations failed")
        }
    }
}

async fn project(control_plane: &GraphQlControlPlane, project_id: String) -> Result<()> {
    let project_id = ProjectId::new(project_id);
    let project = control_plane
        .project(&project_id)
        .await
        .context("Failed to query project")?
        .with_context(|| format!("Project {project_id} not found"))?;

    println!("{}", serde_json::to_string_pretty(&project)?);
    Ok(())
}
