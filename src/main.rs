use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tradesim::cli::{Cli, Commands};
use tradesim::config::AppConfig;
use tradesim::data::{PriceSeriesProvider, YahooFinanceSource};
use tradesim::error::Result;
use tradesim::policy::{BandTrainer, FsPolicyStore, PolicyLifecycleManager};
use tradesim::sim::SimulationRunner;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref().map(Path::new))?;

    let provider = Arc::new(PriceSeriesProvider::new(Arc::new(
        YahooFinanceSource::new()?,
    )));
    let manager = PolicyLifecycleManager::new(
        provider.clone(),
        Arc::new(BandTrainer::default()),
        Arc::new(FsPolicyStore),
        config.training.clone(),
    );

    match cli.command {
        Commands::Train { model_path } => {
            let path = resolve_model_path(model_path, &config);
            manager.resolve(&path).await?;
            info!("Policy ready at {:?}", path);
        }
        Commands::Simulate { ticker, model_path } => {
            let path = resolve_model_path(model_path, &config);
            let policy = manager.resolve(&path).await?;

            let runner = SimulationRunner::new(provider, config.simulation.clone());
            let result = runner.run(&ticker, policy.as_ref()).await?;

            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn resolve_model_path(override_path: Option<String>, config: &AppConfig) -> PathBuf {
    override_path
        .map(PathBuf::from)
        .unwrap_or_else(|| config.training.model_path.clone())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
