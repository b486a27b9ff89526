//! lcs — route a request through the LCS agents and synthesize a report.

mod store;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use lcs_agents::{run_agents, synthesize, AgentProgress, AgentStatus};
use lcs_core::{config, route, LcsConfig, MemoryRecord, TraceRecord};
use lcs_llm::Gateway;
use std::path::Path;
use store::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lcs", about = "LCS — multi-agent analysis and kernel synthesis", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize LCS config in .lcs/config.json
    Init,
    /// Route a message through the LCS agents and synthesize a response
    Run {
        /// User message to process
        text: String,
        /// Output the full trace JSON instead of the human-readable summary
        #[arg(long)]
        json: bool,
    },
    /// Print the last run trace as JSON
    Trace,
    /// Read and write LCS memory records
    Memory {
        #[command(subcommand)]
        command: MemoryCommands,
    },
}

#[derive(Subcommand)]
enum MemoryCommands {
    /// Add a memory record
    Add {
        /// Record type (e.g. fact, preference, note)
        r#type: String,
        /// Lookup key
        key: String,
        /// Value (remaining args joined by space)
        #[arg(required = true)]
        value: Vec<String>,
    },
    /// Retrieve memory records by key
    Get {
        /// Lookup key
        key: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let base = std::env::current_dir().context("cannot resolve current directory")?;

    match cli.command {
        Commands::Init => {
            let msg = config::init_config(&base)?;
            println!("{msg}");
        }
        Commands::Run { text, json } => {
            cmd_run(&base, &text, json).await?;
        }
        Commands::Trace => {
            let store = Store::new(&base);
            match store.last_trace()? {
                Some(trace) => println!("{}", serde_json::to_string_pretty(&trace)?),
                None => {
                    eprintln!("No traces found. Run `lcs run` first.");
                    std::process::exit(1);
                }
            }
        }
        Commands::Memory { command } => {
            let store = Store::new(&base);
            match command {
                MemoryCommands::Add { r#type, key, value } => {
                    let record = MemoryRecord::new(r#type, key, value.join(" "));
                    store.append_memory(&record)?;
                    println!("Stored: [{}] {} = {}", record.kind, record.key, record.value);
                }
                MemoryCommands::Get { key } => {
                    let records = store.get_memory(&key)?;
                    if records.is_empty() {
                        println!("No records found for key \"{key}\".");
                    } else {
                        for r in records {
                            println!("[{}] ({}) {} = {}", r.ts.to_rfc3339(), r.kind, r.key, r.value);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

async fn cmd_run(base: &Path, text: &str, json: bool) -> anyhow::Result<()> {
    let config = LcsConfig::load(base)?;
    let gateway = Gateway::from_config(&config);
    let store = Store::new(base);

    // 1. Route
    let pkt = route(text);
    if !json {
        eprintln!(
            "Routed: intent={} domain={} risk={}",
            pkt.intent, pkt.domain, pkt.risk
        );
        if !config.any_provider_available() {
            eprintln!(
                "No API key — running in heuristic mode. Set ANTHROPIC_API_KEY for LLM agents."
            );
        }
    }

    // 2. Run agents
    let on_progress = move |p: AgentProgress| {
        if !json {
            match p.status {
                AgentStatus::Running => eprintln!("  {} ...", p.agent),
                AgentStatus::Done => eprintln!("  {} done", p.agent),
                AgentStatus::Error => eprintln!("  {} error", p.agent),
            }
        }
    };
    let results = run_agents(&pkt, &config, &gateway, &store, Some(&on_progress)).await?;
    if !json {
        eprintln!("{} agents complete", results.len());
    }

    // 3. Synthesize
    let out = synthesize(&pkt, &results, &config, &gateway).await;
    if !json {
        eprintln!("Synthesis complete ({})", out.source);
    }

    // 4. Persist trace
    let trace = TraceRecord {
        pkt,
        results,
        out,
        ts: Utc::now(),
    };
    store.append_trace(&trace)?;

    // 5. Output
    if json {
        println!("{}", serde_json::to_string_pretty(&trace)?);
    } else {
        println!("\n{}", trace.out.summary);
    }

    Ok(())
}
