//! TrustLend CLI - Main entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use trustlend_cli::commands;
use trustlend_policy::DecisionPolicy;

#[derive(Parser)]
#[command(name = "trustlend")]
#[command(about = "TrustLend - credit decisions for thin-file applicants", long_about = None)]
struct Cli {
    /// Policy file (JSON); defaults apply when omitted
    #[arg(short, long)]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one case file through the decision pipeline
    Decide {
        /// Case file (JSON): applicant, request, facts, optional history and peers
        case: PathBuf,
        /// Record the decision on this audit ledger
        #[arg(long)]
        ledger: Option<PathBuf>,
    },

    /// Verify an audit ledger's hash chain
    Audit {
        /// Ledger file (JSONL)
        ledger: PathBuf,
    },

    /// Disparate-impact report over the trailing window
    Fairness {
        /// Ledger file (JSONL) to read decisions from
        ledger: PathBuf,
        /// Reporting window in days
        #[arg(long, default_value = "30")]
        window_days: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let policy = match &cli.policy {
        Some(path) => DecisionPolicy::from_file(path)?,
        None => DecisionPolicy::default(),
    };

    match cli.command {
        Commands::Decide { case, ledger } => {
            commands::decide(policy, &case, ledger.as_deref())?;
        }

        Commands::Audit { ledger } => {
            commands::audit(&ledger)?;
        }

        Commands::Fairness {
            ledger,
            window_days,
        } => {
            commands::fairness(policy, &ledger, window_days).await?;
        }
    }

    Ok(())
}
