use std::time::SystemTime;

use alloy_primitives::{Address, U256};

use super::AssetId;

/// One raw on-chain amount per tracked asset.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Balances {
    amounts: [U256; AssetId::COUNT],
}

impl Balances {
    /// Builds the balances from amounts listed in `AssetId::ALL` order.
    pub fn from_amounts(amounts: [U256; AssetId::COUNT]) -> Self {
        Self { amounts }
    }

    pub fn get(&self, asset: AssetId) -> U256 {
        self.amounts[asset.index()]
    }

    pub fn set(&mut self, asset: AssetId, amount: U256) {
        self.amounts[asset.index()] = amount;
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetId, U256)> + '_ {
        AssetId::ALL.into_iter().zip(self.amounts.iter().copied())
    }
}

impl FromIterator<(AssetId, U256)> for Balances {
    fn from_iter<T: IntoIterator<Item = (AssetId, U256)>>(iter: T) -> Self {
        let mut balances = Balances::default();
        for (asset, amount) in iter {
            balances.set(asset, amount);
        }
        balances
    }
}

/// Balances of a single address captured by one aggregated fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub address: Address,
    pub fetched_at_millis: u64,
    pub balances: Balances,
}

impl Snapshot {
    pub fn new(address: Address, balances: Balances) -> Self {
        let fetched_at_millis = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        Self {
            address,
            fetched_at_millis,
            balances,
        }
    }

    pub fn amount(&self, asset: AssetId) -> U256 {
        self.balances.get(asset)
    }
}
