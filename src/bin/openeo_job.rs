use clap::Parser;
use graas_openeo::core::ExecutionMode;
use graas_openeo::utils::logger;
use graas_openeo::{JobPoller, OpenEoClient};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "openeo-job")]
#[command(about = "Submit a process graph to the openEO adapter and wait for the job to end")]
struct Args {
    /// Base URL of the openEO adapter
    #[arg(short, long, default_value = "http://localhost:5000")]
    server: String,

    /// Path to the process graph JSON document
    #[arg(short, long)]
    graph: String,

    /// Run in the persistent database (PUT /jobs) instead of the ephemeral one
    #[arg(long)]
    persistent: bool,

    /// Terminate the job right after it was accepted
    #[arg(long)]
    delete: bool,

    /// Poll interval in milliseconds
    #[arg(long, default_value_t = 200)]
    interval_ms: u64,

    /// Give up after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let content = tokio::fs::read_to_string(&args.graph).await?;
    let document: serde_json::Value = serde_json::from_str(&content)?;

    let client = OpenEoClient::new(&args.server)?;
    let mut poller =
        JobPoller::new(client).with_poll_interval(Duration::from_millis(args.interval_ms));
    if let Some(seconds) = args.timeout {
        poller = poller.with_timeout(Duration::from_secs(seconds));
    }

    let mode = if args.persistent {
        ExecutionMode::Persistent
    } else {
        ExecutionMode::Ephemeral
    };

    tracing::info!("📨 Submitting {} ({:?})", args.graph, mode);
    let mut accepted = poller.client().submit(&document, mode).await?;
    println!("{}", serde_json::to_string_pretty(&accepted.body)?);

    if args.delete && accepted.http_status == 200 {
        if let Some(job_id) = accepted.job_id().map(str::to_string) {
            accepted = poller.client().delete(&job_id).await?;
            println!("{}", serde_json::to_string_pretty(&accepted.body)?);
        }
    }

    let finished = poller.wait_for(&accepted).await?;
    println!("{}", serde_json::to_string_pretty(&finished.body)?);

    if finished.http_status != 200 {
        anyhow::bail!(
            "job ended with status {} (HTTP {})",
            finished
                .status()
                .map(|s| s.to_string())
                .unwrap_or_default(),
            finished.http_status
        );
    }
    Ok(())
}
