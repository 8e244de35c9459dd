use batch_tester::prelude::*;
use clap::{Parser, Subcommand};
use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Expand and run parameter sweeps against an exported node graph
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the exported graph JSON file
    graph_path: String,

    /// Optional TOML file overriding node types, slots and polling interval
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the generated job list as JSON without running anything
    Plan,
    /// Drive every job against the in-memory graph, logging each submission
    Run {
        /// Simulated duration of each run, in milliseconds
        #[arg(long, default_value_t = 0)]
        run_ms: u64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("batch_tester=info,warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BatchConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => BatchConfig::default(),
    };

    let graph_json = fs::read_to_string(&cli.graph_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read graph file '{}': {}",
            &cli.graph_path, e
        ))
    });
    let definition = UiGraph::from_json(&graph_json)
        .and_then(|raw| raw.into_graph())
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load graph: {}", e)));
    let graph = Arc::new(InMemoryGraph::new(definition));

    match cli.command {
        Command::Plan => run_plan(graph.as_ref(), &config),
        Command::Run { run_ms } => run_batch(graph, config, Duration::from_millis(run_ms)).await,
    }
}

fn run_plan(graph: &InMemoryGraph, config: &BatchConfig) {
    let snapshot = discover(graph, config);
    let entries = expand(&snapshot)
        .unwrap_or_else(|e| exit_with_error(&format!("Expansion failed: {}", e)));
    let jobs = generate(&entries);

    eprintln!(
        "{} configuration node(s), {} variant(s)",
        snapshot.len(),
        entries.len()
    );
    eprint!("{}", JobFormatter::format_batch(&jobs));

    let json = job_list_json(&jobs)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize jobs: {}", e)));
    println!("{}", json);
}

async fn run_batch(graph: Arc<InMemoryGraph>, config: BatchConfig, run_time: Duration) {
    let total_start = Instant::now();

    let submitter = Arc::new(FnSubmitter::new(move |job: Job| async move {
        tokio::time::sleep(run_time).await;
        tracing::info!(job = %job.id, "Run finished");
        Ok::<(), SubmitError>(())
    }));

    let controller = BatchController::new(graph, submitter, config);
    controller.refresh();

    let report = controller
        .run_batch()
        .await
        .unwrap_or_else(|e| exit_with_error(&format!("Batch failed: {}", e)));

    println!("\n--- Batch Summary ---");
    println!("Configuration nodes:  {}", report.sources);
    println!("Jobs generated:       {}", report.jobs_generated);
    println!("Jobs submitted:       {}", report.jobs_submitted);
    println!("Sink metadata:        {}", report.sink_recorded);
    println!("Total Execution:      {:?}", total_start.elapsed());
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
