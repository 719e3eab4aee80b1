use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use alloy_primitives::Address;
use anyhow::Error;
use dollar_core::{
    api::ContractHandle,
    types::{AssetId, ContractSet, QueryKind},
};
use tracing::debug;

use crate::config::EvmConfig;
use crate::contracts::{Erc1155Contract, Erc20Contract};
use crate::rpc::RpcClient;

/// Resolves the contract handles of every tracked asset.
///
/// Each call to [`ContractRegistry::resolve`] produces a new generation, even
/// when the addresses did not change.
pub struct ContractRegistry {
    config: EvmConfig,
    rpc: Arc<RpcClient>,
    generation: AtomicU64,
}

impl ContractRegistry {
    pub fn new(config: EvmConfig) -> Result<Self, Error> {
        let rpc = RpcClient::new(
            &config.rpc_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;

        Ok(Self {
            config,
            rpc: Arc::new(rpc),
            generation: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &EvmConfig {
        &self.config
    }

    /// Address backing `asset` on the configured chain.
    pub fn address(&self, asset: AssetId) -> Result<Address, Error> {
        if let Some(address) = self.config.managed.address(asset) {
            return Ok(address);
        }

        let named = self
            .config
            .named
            .get(&self.config.chain)
            .ok_or(Error::msg(format!(
                "No named contracts configured for {:?}",
                self.config.chain
            )))?;

        Ok(named.usdc)
    }

    pub async fn resolve(&self) -> Result<ContractSet, Error> {
        if self.config.verify_chain_id {
            let chain_id = self.rpc.chain_id().await?;
            if chain_id != self.config.chain.chain_id() {
                return Err(Error::msg(format!(
                    "Node at {} is on chain {}, expected {:?} ({})",
                    self.rpc.url(),
                    chain_id,
                    self.config.chain,
                    self.config.chain.chain_id()
                )));
            }
        }

        let mut addresses = [Address::ZERO; AssetId::COUNT];
        for asset in AssetId::ALL {
            addresses[asset.index()] = self.address(asset)?;
        }

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        debug!(
            "Resolved contracts generation {} on {:?}",
            generation, self.config.chain
        );

        let handles = std::array::from_fn(|i| {
            let address = addresses[i];
            let handle: Arc<dyn ContractHandle> = match AssetId::ALL[i].query_kind() {
                QueryKind::Fungible => Arc::new(Erc20Contract::new(self.rpc.clone(), address)),
                QueryKind::Tagged => Arc::new(Erc1155Contract::new(self.rpc.clone(), address)),
            };
            handle
        });

        Ok(ContractSet::new(generation, handles))
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;
    use crate::config::{Chain, ManagedContracts, NamedContracts};

    fn prepare_config() -> EvmConfig {
        EvmConfig {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            chain: Chain::Mainnet,
            verify_chain_id: false,
            request_timeout_secs: 5,
            managed: ManagedContracts {
                dollar_token: Address::from([1; 20]),
                curve3_pool_token: Address::from([2; 20]),
                dollar_metapool: Address::from([3; 20]),
                credit_token: Address::from([4; 20]),
                governance_token: Address::from([5; 20]),
                credit_nft: Address::from([6; 20]),
                staking_share: Address::from([7; 20]),
            },
            named: HashMap::from([(
                Chain::Mainnet,
                NamedContracts {
                    usdc: Address::from([8; 20]),
                },
            )]),
        }
    }

    #[test]
    fn test_asset_addresses() {
        let registry = ContractRegistry::new(prepare_config()).unwrap();

        for (i, asset) in AssetId::ALL.into_iter().enumerate() {
            assert_eq!(
                registry.address(asset).unwrap(),
                Address::from([i as u8 + 1; 20])
            );
        }
    }

    #[test]
    fn test_missing_named_contracts() {
        let mut config = prepare_config();
        config.chain = Chain::Sepolia;
        let registry = ContractRegistry::new(config).unwrap();

        assert!(registry.address(AssetId::Usdc).is_err());
        assert_eq!(
            registry.address(AssetId::Uad).unwrap(),
            Address::from([1; 20])
        );
    }

    #[tokio::test]
    async fn test_resolve_bumps_generation() {
        let registry = ContractRegistry::new(prepare_config()).unwrap();

        let first = registry.resolve().await.unwrap();
        let second = registry.resolve().await.unwrap();

        assert_eq!(first.generation(), 1);
        assert_eq!(second.generation(), 2);
    }

    #[tokio::test]
    async fn test_resolve_fails_without_usdc() {
        let mut config = prepare_config();
        config.named.clear();
        let registry = ContractRegistry::new(config).unwrap();

        assert!(registry.resolve().await.is_err());
    }
}
