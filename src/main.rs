mod config;
mod fetch;
mod parser;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use config::PipelineConfig;
use parser::TrafficRecord;

#[derive(Parser)]
#[command(name = "rodovias_sp", about = "SP highway traffic monitor (CCI ARTESP)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch (or read) one snapshot and print the traffic report
    Report {
        /// Parse a saved HTML snapshot instead of fetching the live page
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Show a single highway (e.g. "SP 055")
        #[arg(long)]
        highway: Option<String>,
        /// Emit the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Refresh and reprint the report periodically
    Watch {
        /// Seconds between refreshes
        #[arg(short, long, default_value = "300")]
        interval: u64,
        /// Show a single highway (e.g. "SP 055")
        #[arg(long)]
        highway: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let cfg = PipelineConfig::default();

    match cli.command {
        Commands::Report { file, highway, json } => {
            let html = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read snapshot {}", path.display()))?,
                None => fetch::fetch_page(fetch::CCI_URL).await?,
            };
            let report = filtered(&cfg, parser::parse_report(&cfg, &html), highway.as_deref());
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Watch { interval, highway } => {
            loop {
                match fetch::fetch_page(fetch::CCI_URL).await {
                    Ok(html) => {
                        let report =
                            filtered(&cfg, parser::parse_report(&cfg, &html), highway.as_deref());
                        println!(
                            "\n=== Rodovias SP — {} ===",
                            chrono::Local::now().format("%H:%M:%S")
                        );
                        print_report(&report);
                    }
                    Err(e) => warn!("Refresh failed: {:#}", e),
                }
                tokio::time::sleep(Duration::from_secs(interval)).await;
            }
        }
    }

    Ok(())
}

fn filtered(
    cfg: &PipelineConfig,
    report: Vec<TrafficRecord>,
    highway: Option<&str>,
) -> Vec<TrafficRecord> {
    match highway {
        Some(code) => {
            let code = code.trim().to_uppercase();
            if !cfg.highway_codes().contains(&code.as_str()) {
                warn!("Highway {} is not in the monitored set", code);
            }
            report.into_iter().filter(|r| r.highway == code).collect()
        }
        None => report,
    }
}

fn print_report(report: &[TrafficRecord]) {
    if report.is_empty() {
        println!("Nenhum alerta encontrado.");
        return;
    }

    println!(
        "{:<2} | {:<8} | {:<14} | {:<20} | {:<24} | {:<5}",
        "", "Rodovia", "Condição", "Sentido", "Localização (KM)", "Atual"
    );
    println!("{}", "-".repeat(88));

    for r in report {
        println!(
            "{:<2} | {:<8} | {:<14} | {:<20} | {:<24} | {:<5}",
            r.icon,
            r.highway,
            r.status.label(),
            truncate(&r.direction, 20),
            truncate(&r.segment, 24),
            r.updated_at,
        );
    }

    let problems = report.iter().filter(|r| r.status.is_problem()).count();
    println!(
        "\n{} trechos monitorados | {} com problemas",
        report.len(),
        problems
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

// ── Tests ──
