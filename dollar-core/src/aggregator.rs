use alloy_primitives::{Address, U256};
use anyhow::Error;
use futures::{future::try_join_all, stream, StreamExt, TryStreamExt};
use tracing::debug;

use crate::api::ContractHandle;
use crate::types::{AssetId, ContractSet, QueryKind, Snapshot};

/// Per-id balance queries of one tagged asset kept in flight at once.
pub const MAX_CONCURRENT_TAG_QUERIES: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to query {asset} balance: {source:#}")]
    Transport {
        asset: AssetId,
        #[source]
        source: Error,
    },
}

impl FetchError {
    pub fn asset(&self) -> AssetId {
        match self {
            FetchError::Transport { asset, .. } => *asset,
        }
    }
}

/// Queries every tracked asset of `address` concurrently and joins the
/// results into one snapshot.
///
/// Fails as a whole on the first failing query. Queries still pending at that
/// point are dropped rather than awaited, nothing is cancelled remotely.
pub async fn fetch_snapshot(
    address: Address,
    contracts: &ContractSet,
) -> Result<Snapshot, FetchError> {
    debug!(
        "Fetching balances of {} with contracts generation {}",
        address,
        contracts.generation()
    );

    let amounts = try_join_all(
        AssetId::ALL
            .into_iter()
            .map(|asset| query_asset(asset, contracts.handle(asset).as_ref(), address)),
    )
    .await?;

    // try_join_all keeps input order, whatever order the queries finished in
    let balances = AssetId::ALL.into_iter().zip(amounts).collect();

    Ok(Snapshot::new(address, balances))
}

async fn query_asset(
    asset: AssetId,
    handle: &dyn ContractHandle,
    owner: Address,
) -> Result<U256, FetchError> {
    let amount = match asset.query_kind() {
        QueryKind::Fungible => handle.balance_of(owner).await,
        QueryKind::Tagged => tagged_balance(handle, owner).await,
    };

    amount.map_err(|source| FetchError::Transport { asset, source })
}

async fn tagged_balance(handle: &dyn ContractHandle, owner: Address) -> Result<U256, Error> {
    let tags = handle.holder_tags(owner).await?;

    stream::iter(tags)
        .map(|tag| handle.balance_of_tag(owner, tag))
        .buffer_unordered(MAX_CONCURRENT_TAG_QUERIES)
        .try_fold(U256::ZERO, |total, amount| async move {
            Ok(total.saturating_add(amount))
        })
        .await
}
