use std::sync::Arc;

use dollar_core::types::{BalancesUpdate, BalancesUpdateStream, Freshness, Snapshot};
use dollar_evm::u256_to_decimal;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::WatcherConfig;

/// Subscribes to balances updates and logs every one of them.
pub fn start_report_task(
    mut updates: BalancesUpdateStream,
    config: Arc<WatcherConfig>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(update) = updates.next().await {
            report(&update, &config);
        }

        debug!("Balances update stream closed");
    })
}

pub fn report(update: &BalancesUpdate, config: &WatcherConfig) {
    match &update.snapshot {
        Some(snapshot) => {
            for line in format_snapshot(snapshot, update.freshness, config) {
                info!("{}", line);
            }
        }
        None if update.freshness == Freshness::Failed => {
            warn!("Balances unavailable, the last refresh failed")
        }
        None => info!("Balances not fetched yet"),
    }
}

pub fn format_snapshot(
    snapshot: &Snapshot,
    freshness: Freshness,
    config: &WatcherConfig,
) -> Vec<String> {
    let state = match freshness {
        Freshness::Fresh => "fresh",
        Freshness::Unknown => "stale",
        Freshness::Failed => "stale, last refresh failed",
    };

    let mut lines = vec![format!(
        "Balances of {} at {} ({})",
        snapshot.address, snapshot.fetched_at_millis, state
    )];

    lines.extend(snapshot.balances.iter().map(|(asset, amount)| {
        format!(
            "  {:<16}{}",
            asset.to_string(),
            u256_to_decimal(amount, config.decimals(asset))
        )
    }));

    lines
}
