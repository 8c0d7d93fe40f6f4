use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::sync::broadcast;

use lexcompass::analysis::AnalysisResult;
use lexcompass::backend::{Notice, NoticeLevel};
use lexcompass::client::{AnalysisReport, LexClient};
use lexcompass::config::{load_or_default, validation::validate_config, ConfigError};
use lexcompass::observability::logging;

#[derive(Parser)]
#[command(name = "lexcompass-cli")]
#[command(about = "Analyze contracts against the LexCompass service", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the primary service URL
    #[arg(long)]
    primary: Option<String>,

    /// Override the secondary service URL
    #[arg(long)]
    secondary: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the backends and show which one is active
    Status,
    /// Analyze a text document
    Analyze {
        file: PathBuf,

        /// Save the analysis as JSON
        #[arg(long)]
        export: Option<PathBuf>,

        /// Also ask for a rewrite of the n-th risky clause (1-based)
        #[arg(long)]
        coach: Option<usize>,
    },
    /// Ask for a safer rewrite of a clause
    Coach { clause: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(primary) = cli.primary {
        config.endpoints.primary = primary;
    }
    if let Some(secondary) = cli.secondary {
        config.endpoints.secondary = secondary;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);

    let client = LexClient::from_config(&config)?;
    let mut notices = client.subscribe_notices();

    eprintln!("{}...", client.status().label());
    client.initialize().await;
    drain(&mut notices);

    match cli.command {
        Commands::Status => {
            println!("Status: {}", client.status().label());
            match client.active_endpoint() {
                Some(endpoint) => println!("Active: {}", endpoint),
                None => println!("Active: none"),
            }
        }
        Commands::Analyze { file, export, coach } => {
            if !client.can_submit() {
                return Err("Backend services are unavailable".into());
            }
            let document = std::fs::read(&file)?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document.txt".to_string());

            let result = client.analyze(document, &name).await;
            drain(&mut notices);
            let result = result?;
            print_analysis(&result);

            let mut report = AnalysisReport::new(name, &result);

            if let Some(n) = coach {
                let item = n
                    .checked_sub(1)
                    .and_then(|i| result.risk_radar.get(i))
                    .ok_or_else(|| format!("No risky clause number {}", n))?;
                let coaching = client.coach(&item.clause).await;
                drain(&mut notices);
                let coaching = coaching?;
                println!();
                println!("Suggested rewrite: {}", coaching.suggestion);
                println!("Why: {}", coaching.explanation);
                report = report.with_coaching(&coaching);
            }

            if let Some(path) = export {
                let path = if path.is_dir() {
                    path.join(AnalysisReport::default_file_name())
                } else {
                    path
                };
                report.write_to(&path)?;
                eprintln!("Exported analysis to {}", path.display());
            }
        }
        Commands::Coach { clause } => {
            if !client.can_submit() {
                return Err("Backend services are unavailable".into());
            }
            let coaching = client.coach(&clause).await;
            drain(&mut notices);
            let coaching = coaching?;
            println!("Suggested rewrite: {}", coaching.suggestion);
            println!("Why: {}", coaching.explanation);
        }
    }

    Ok(())
}

fn print_analysis(result: &AnalysisResult) {
    println!("Key points:");
    if result.decision_map.is_empty() {
        println!("  No key points found.");
    }
    for point in &result.decision_map {
        println!("  - {}", point);
    }

    println!();
    println!("Risky clauses:");
    if result.risk_radar.is_empty() {
        println!("  None flagged.");
    }
    for (i, item) in result.risk_radar.iter().enumerate() {
        println!(
            "  {}. [{}/10 {}] {}",
            i + 1,
            item.score(),
            item.tier().as_str(),
            item.clause
        );
        println!("     {}", item.risk);
    }
}

fn drain(notices: &mut broadcast::Receiver<Notice>) {
    while let Ok(notice) = notices.try_recv() {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warn",
            NoticeLevel::Error => "error",
        };
        eprintln!("[{}] {}", tag, notice.message);
    }
}
