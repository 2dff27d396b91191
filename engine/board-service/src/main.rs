//! Draft Board
//!
//! Loads the configured default year and logs a summary of the board.

use anyhow::{Context, Result};
use tracing::{info, warn};

use board_service::{initialize_from_config, BoardConfig, BoardFetcher, BoardSession, LoadOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    let config = BoardConfig::from_env().context("Failed to load configuration")?;
    initialize_from_config(&config.logging)?;

    info!("Starting Draft Board v{}", env!("CARGO_PKG_VERSION"));

    let fetcher = BoardFetcher::from_config(&config).context("Failed to create board fetcher")?;
    let mut session = BoardSession::new(config.years.default, config.consensus.clone());

    match session.select_year(&fetcher, config.years.default).await {
        LoadOutcome::Applied { year, prospects } => info!("Loaded {} board with {} prospects", year, prospects),
        LoadOutcome::Failed { year, reason } => {
            warn!("No board available for {}: {}", year, reason);
            return Ok(());
        }
        LoadOutcome::Stale { .. } => return Ok(()),
    }

    let contributors = session.columns().in_category(ranking_engine::ColumnCategory::Contributors).count();
    let list = session.display_list();
    let ranked = list.iter().filter(|item| item.rank.is_some()).count();
    info!("{} prospects ranked, {} unranked, {} contributors", ranked, list.len() - ranked, contributors);

    for item in list.iter().take(10) {
        let rank = item.rank.map(|r| r.to_string()).unwrap_or_else(|| "N/A".to_string());
        info!("{:>4}  {}", rank, item.prospect.name);
    }

    Ok(())
}
