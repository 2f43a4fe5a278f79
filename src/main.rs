//! Flowgen - turn a plain-English sentence into a structured workflow and
//! watch it run.
//!
//! The binary is thin plumbing: it hands raw text to the generator, renders
//! the resulting document, and streams executor progress to the terminal.
//! All simulation logic lives in the library.

use std::collections::HashSet;
use std::io::{self, Read, Write};

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate as generate_completions, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flowgen::{
    generate, ExecutionRecord, ExecutorConfig, RunStatus, StepStatus, Workflow, WorkflowExecutor,
};

/// Turn a plain-English sentence into a structured workflow and watch it run
#[derive(Parser)]
#[command(name = "flowgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a workflow document from a sentence
    Generate {
        /// The request, in plain English
        text: Vec<String>,

        /// Print the document as JSON instead of the step listing
        #[arg(long)]
        json: bool,
    },

    /// Generate a workflow and simulate running it
    Run {
        /// The request, in plain English (ignored with --stdin)
        text: Vec<String>,

        /// Read a previously generated workflow document (JSON) from stdin
        #[arg(long)]
        stdin: bool,

        /// Seed the simulated outcomes for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Skip the simulated per-step latency
        #[arg(long)]
        fast: bool,

        /// Probability in [0, 1] that a step fails (default 0.05)
        #[arg(long)]
        fail_rate: Option<f64>,

        /// Print the final execution record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("flowgen=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flowgen=warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Generate { text, json } => cmd_generate(&text.join(" "), json),
        Commands::Run { text, stdin, seed, fast, fail_rate, json } => {
            cmd_run(&text.join(" "), stdin, seed, fast, fail_rate, json).await
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate_completions(shell, &mut cmd, "flowgen", &mut io::stdout());
            Ok(())
        }
    }
}

fn cmd_generate(text: &str, json: bool) -> Result<()> {
    let generation = generate(text);

    if generation.clarification_needed {
        if json {
            println!("{}", serde_json::to_string_pretty(&generation)?);
        } else if let Some(question) = &generation.clarification_question {
            println!("{question}");
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&generation.workflow)?);
    } else {
        print_workflow(&generation.workflow);
    }
    Ok(())
}

async fn cmd_run(
    text: &str,
    stdin: bool,
    seed: Option<u64>,
    fast: bool,
    fail_rate: Option<f64>,
    json: bool,
) -> Result<()> {
    let workflow = if stdin {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Workflow::from_json(&buf)?
    } else {
        let generation = generate(text);
        if generation.clarification_needed {
            if let Some(question) = &generation.clarification_question {
                println!("{question}");
            }
            return Ok(());
        }
        generation.workflow
    };

    if !json {
        print_workflow(&workflow);
        println!();
    }

    let mut config = ExecutorConfig::default();
    config.seed = seed;
    if fast {
        config.min_latency_ms = 0;
        config.max_latency_ms = 0;
    }
    if let Some(rate) = fail_rate {
        config.success_rate = (1.0 - rate).clamp(0.0, 1.0);
    }

    let executor = WorkflowExecutor::with_config(config);
    let record = if json {
        executor.execute(&workflow).await
    } else {
        let mut announced: HashSet<(String, StepStatus)> = HashSet::new();
        executor
            .execute_with_progress(&workflow, |snapshot| {
                print_progress(&workflow, &snapshot, &mut announced);
            })
            .await
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!();
        let completed = record.count(StepStatus::Completed);
        match record.status {
            RunStatus::Completed => {
                println!("✓ Workflow completed ({completed}/{} steps)", record.logs.len());
            }
            _ => println!("✗ Workflow failed ({completed}/{} steps)", record.logs.len()),
        }
    }

    if record.status == RunStatus::Failed {
        std::process::exit(1);
    }
    Ok(())
}

/// Print per-step transitions as snapshots arrive, each at most once.
fn print_progress(
    workflow: &Workflow,
    snapshot: &ExecutionRecord,
    announced: &mut HashSet<(String, StepStatus)>,
) {
    let total = snapshot.logs.len();
    for (i, log) in snapshot.logs.iter().enumerate() {
        if log.status == StepStatus::Pending {
            continue;
        }
        if !announced.insert((log.step_id.clone(), log.status)) {
            continue;
        }
        let title = workflow.step(&log.step_id).map_or(log.step_id.as_str(), |s| s.title.as_str());
        match log.status {
            StepStatus::Running => {
                println!("→ [{}/{total}] {title}...", i + 1);
                let _ = io::stdout().flush();
            }
            StepStatus::Completed => {
                println!("  ✓ {}", log.output.as_deref().unwrap_or("done"));
            }
            StepStatus::Failed => {
                println!("  ✗ {}", log.error.as_deref().unwrap_or("failed"));
            }
            StepStatus::Pending => {}
        }
    }
}

/// Render a workflow document as a step listing.
fn print_workflow(workflow: &Workflow) {
    println!("Workflow {} [{}]", workflow.id, workflow.domain);
    println!("Trigger: {}", workflow.trigger.description);
    println!("Steps:");
    for (i, step) in workflow.steps.iter().enumerate() {
        println!("  {}. [{}] {}", i + 1, step.kind.label(), step.title);
        println!("     {}", step.description);
        if !step.dependencies.is_empty() {
            println!("     after: {}", step.dependencies.join(", "));
        }
    }
}
