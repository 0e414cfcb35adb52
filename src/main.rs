use anyhow::Context;
use gridsim::{Config, CsvPriceSource, GridEngine, PriceSource, Replayer, SnapshotStore};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        eprintln!("Replay failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let mut engine = GridEngine::new(config.grid.clone()).context("building grid engine")?;

    let source: Arc<dyn PriceSource> = Arc::new(CsvPriceSource::new(config.prices_path.clone()));
    let replayer = Replayer::new(source, config.tick_error_policy);
    let summary = replayer
        .run(&mut engine)
        .await
        .with_context(|| format!("replaying {}", config.prices_path.display()))?;

    tracing::info!(
        "Final balances: {} {} / {} {} ({} open buys, {} open sells)",
        engine.base_balance(),
        engine.base_asset(),
        engine.quote_balance(),
        engine.quote_asset(),
        engine.pending_buys().len(),
        engine.pending_sells().len()
    );

    if let Some(path) = &config.snapshot_path {
        let snapshot = engine.snapshot();
        SnapshotStore::save(path, &snapshot).await?;
        let fingerprint = snapshot.fingerprint()?;
        tracing::info!("Snapshot fingerprint {}", fingerprint);
    }

    println!(
        "{} ticks processed, {} skipped, {} trades",
        summary.ticks_processed, summary.ticks_skipped, summary.trades_executed
    );
    Ok(())
}
