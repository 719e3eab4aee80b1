use std::sync::Arc;

use alloy_primitives::Address;

use super::AssetId;
use crate::api::ContractHandle;

/// A resolved set of contract handles, one for every tracked asset.
///
/// `generation` identifies the resolution that produced the set. Resolving the
/// same addresses again yields a new generation, which the store treats as a
/// dependency change.
#[derive(Clone)]
pub struct ContractSet {
    generation: u64,
    handles: [Arc<dyn ContractHandle>; AssetId::COUNT],
}

impl ContractSet {
    /// `handles` must be listed in `AssetId::ALL` order.
    pub fn new(generation: u64, handles: [Arc<dyn ContractHandle>; AssetId::COUNT]) -> Self {
        Self {
            generation,
            handles,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn handle(&self, asset: AssetId) -> &Arc<dyn ContractHandle> {
        &self.handles[asset.index()]
    }
}

impl std::fmt::Debug for ContractSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractSet")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Inputs a snapshot is fetched for. A change of either part invalidates the
/// current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub address: Address,
    pub generation: u64,
}

impl IdentityKey {
    pub fn from_dependencies(
        address: Option<Address>,
        contracts: Option<&ContractSet>,
    ) -> Option<Self> {
        Some(Self {
            address: address?,
            generation: contracts?.generation(),
        })
    }
}
