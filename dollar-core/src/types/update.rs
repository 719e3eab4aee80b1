use std::pin::Pin;
use std::sync::Arc;

use futures::{channel::mpsc::UnboundedSender, Stream};

use super::Snapshot;

/// How the current snapshot relates to the current wallet and contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Freshness {
    /// The snapshot was fetched for the current address and contracts.
    Fresh,
    /// No fetch for the current inputs has finished yet, or the inputs are unavailable.
    #[default]
    Unknown,
    /// The latest fetch for the current inputs failed, the snapshot is older.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancesUpdate {
    pub snapshot: Option<Arc<Snapshot>>,
    pub freshness: Freshness,
}

pub type BalancesUpdateSink = UnboundedSender<BalancesUpdate>;
pub type BalancesUpdateStream = Pin<Box<dyn Stream<Item = BalancesUpdate> + Send>>;
