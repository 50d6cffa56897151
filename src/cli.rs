use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tradesim")]
#[command(version = "0.1.0")]
#[command(about = "Trading simulation engine with a train-or-load policy lifecycle", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ensure a trained policy artifact exists
    Train {
        /// Override the configured artifact path
        #[arg(long)]
        model_path: Option<String>,
    },
    /// Backtest a ticker with the resolved policy
    Simulate {
        /// Ticker symbol
        #[arg(default_value = "TSLA")]
        ticker: String,
        /// Override the configured artifact path
        #[arg(long)]
        model_path: Option<String>,
    },
}
