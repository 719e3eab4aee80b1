use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, RwLock,
};

use alloy_primitives::Address;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::aggregator::{fetch_snapshot, FetchError};
use crate::types::{
    BalancesUpdate, BalancesUpdateSink, BalancesUpdateStream, ContractSet, Freshness,
    IdentityKey, Snapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new snapshot replaced the current one.
    Committed,
    /// Address or contracts are unavailable, nothing was queried.
    Skipped,
    /// The inputs changed or a newer refresh settled before the result could
    /// be committed.
    Discarded,
}

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Holds the latest balances snapshot of the active wallet and republishes it
/// to subscribers.
///
/// Every change of the wallet address or of the contract set generation spawns
/// one background refresh, so the store must be used within a tokio runtime.
pub struct BalancesStore {
    inner: Arc<StoreInner>,
    refresh_tasks: Mutex<Vec<JoinHandle<()>>>,
}

/// Cheap handle that re-fetches the balances of the store it was taken from.
#[derive(Clone)]
pub struct Refresher {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: RwLock<StoreState>,
    update_sinks: Mutex<Vec<BalancesUpdateSink>>,
    last_refresh_id: AtomicU64,
}

#[derive(Default)]
struct StoreState {
    address: Option<Address>,
    contracts: Option<Arc<ContractSet>>,
    key: Option<IdentityKey>,
    snapshot: Option<Arc<Snapshot>>,
    freshness: Freshness,
    settled_refresh_id: u64, // newest refresh that committed or failed
}

impl StoreState {
    fn update(&self) -> BalancesUpdate {
        BalancesUpdate {
            snapshot: self.snapshot.clone(),
            freshness: self.freshness,
        }
    }
}

impl Drop for BalancesStore {
    fn drop(&mut self) {
        for task in self.refresh_tasks.lock().unwrap().drain(..) {
            task.abort();
        }

        for sink in self.inner.update_sinks.lock().unwrap().drain(..) {
            sink.close_channel();
        }
    }
}

impl Default for BalancesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BalancesStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(StoreState::default()),
                update_sinks: Mutex::new(Vec::new()),
                last_refresh_id: AtomicU64::new(0),
            }),
            refresh_tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.inner.state.read().unwrap().snapshot.clone()
    }

    pub fn freshness(&self) -> Freshness {
        self.inner.state.read().unwrap().freshness
    }

    pub fn address(&self) -> Option<Address> {
        self.inner.state.read().unwrap().address
    }

    pub fn refresher(&self) -> Refresher {
        Refresher {
            inner: self.inner.clone(),
        }
    }

    /// The current snapshot paired with the handle to refresh it.
    pub fn balances(&self) -> (Option<Arc<Snapshot>>, Refresher) {
        (self.current(), self.refresher())
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        self.inner.refresh().await
    }

    pub fn set_address(&self, address: Option<Address>) {
        self.update_dependencies(|state| state.address = address);
    }

    pub fn set_contracts(&self, contracts: Option<Arc<ContractSet>>) {
        self.update_dependencies(|state| state.contracts = contracts);
    }

    /// Stream of balances updates, starting with the current state. The stream
    /// ends when the store is dropped.
    pub fn update_stream(&self) -> BalancesUpdateStream {
        let (update_sink, update_stream) = futures::channel::mpsc::unbounded();

        let state = self.inner.state.read().unwrap();
        let _ = update_sink.unbounded_send(state.update());
        self.inner.update_sinks.lock().unwrap().push(update_sink);

        update_stream.boxed()
    }

    fn update_dependencies(&self, apply: impl FnOnce(&mut StoreState)) {
        let trigger = {
            let mut state = self.inner.state.write().unwrap();
            apply(&mut state);

            let key = IdentityKey::from_dependencies(state.address, state.contracts.as_deref());
            if key == state.key {
                return;
            }
            state.key = key;

            if state.freshness != Freshness::Unknown {
                state.freshness = Freshness::Unknown;
                self.inner.publish(state.update());
            }

            key.zip(state.contracts.clone())
        };

        let Some((key, contracts)) = trigger else {
            debug!("Balances dependencies unavailable, waiting for address and contracts");
            return;
        };

        debug!(
            "Balances dependencies changed to {} with contracts generation {}",
            key.address, key.generation
        );

        let inner = self.inner.clone();
        let task = tokio::spawn(async move {
            // failures are logged and published by the refresh itself
            let _ = inner.refresh_for(key, contracts).await;
        });

        let mut refresh_tasks = self.refresh_tasks.lock().unwrap();
        refresh_tasks.retain(|task| !task.is_finished());
        refresh_tasks.push(task);
    }
}

impl Refresher {
    pub async fn refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        self.inner.refresh().await
    }

    /// Returns true if both handles refresh the same store.
    pub fn same_store(&self, other: &Refresher) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl StoreInner {
    /// Refreshes with the dependencies current at call time.
    async fn refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        let (address, contracts) = {
            let state = self.state.read().unwrap();
            match (state.address, state.contracts.clone()) {
                (Some(address), Some(contracts)) => (address, contracts),
                _ => {
                    debug!("Skipping balances refresh, dependencies unavailable");
                    return Ok(RefreshOutcome::Skipped);
                }
            }
        };

        let key = IdentityKey {
            address,
            generation: contracts.generation(),
        };

        self.fetch_and_commit(key, contracts).await
    }

    /// Refreshes for the dependencies that changed to `key`, unless they
    /// changed again before the refresh started.
    async fn refresh_for(
        &self,
        key: IdentityKey,
        contracts: Arc<ContractSet>,
    ) -> Result<RefreshOutcome, RefreshError> {
        if self.state.read().unwrap().key != Some(key) {
            debug!(
                "Dropping balances refresh for {} (generation {}), dependencies changed",
                key.address, key.generation
            );
            return Ok(RefreshOutcome::Discarded);
        }

        self.fetch_and_commit(key, contracts).await
    }

    async fn fetch_and_commit(
        &self,
        key: IdentityKey,
        contracts: Arc<ContractSet>,
    ) -> Result<RefreshOutcome, RefreshError> {
        let address = key.address;
        let refresh_id = self.last_refresh_id.fetch_add(1, Ordering::AcqRel) + 1;

        let result = fetch_snapshot(address, &contracts).await;

        let mut state = self.state.write().unwrap();

        let superseded = state.key != Some(key) || refresh_id < state.settled_refresh_id;

        match result {
            Ok(_) if superseded => {
                debug!(
                    "Discarding superseded balances refresh #{} for {}",
                    refresh_id, address
                );
                Ok(RefreshOutcome::Discarded)
            }
            Ok(snapshot) => {
                info!("Balances of {} updated by refresh #{}", address, refresh_id);

                state.snapshot = Some(Arc::new(snapshot));
                state.freshness = Freshness::Fresh;
                state.settled_refresh_id = refresh_id;
                self.publish(state.update());

                Ok(RefreshOutcome::Committed)
            }
            Err(e) => {
                warn!("Failed to refresh balances of {}: {}", address, e);

                if !superseded {
                    state.settled_refresh_id = refresh_id;
                    if state.freshness != Freshness::Failed {
                        state.freshness = Freshness::Failed;
                        self.publish(state.update());
                    }
                }

                Err(e.into())
            }
        }
    }

    fn publish(&self, update: BalancesUpdate) {
        let mut sinks = self.update_sinks.lock().unwrap();
        sinks.retain(|sink| {
            if sink.unbounded_send(update.clone()).is_err() {
                sink.close_channel();
                false
            } else {
                true
            }
        });
    }
}
