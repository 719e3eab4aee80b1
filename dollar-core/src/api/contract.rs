use alloy_primitives::{Address, U256};
use anyhow::Error;
use async_trait::async_trait;

/// Queryable binding of one token contract.
#[async_trait]
pub trait ContractHandle: Send + Sync {
    /// Fungible balance of `owner`.
    async fn balance_of(&self, owner: Address) -> Result<U256, Error>;

    /// Ids of the tagged sub-units held by `owner`.
    async fn holder_tags(&self, _owner: Address) -> Result<Vec<U256>, Error> {
        Err(Error::msg("Contract does not track tagged balances"))
    }

    /// Balance of `owner` for a single tagged sub-unit.
    async fn balance_of_tag(&self, _owner: Address, _tag: U256) -> Result<U256, Error> {
        Err(Error::msg("Contract does not track tagged balances"))
    }
}
