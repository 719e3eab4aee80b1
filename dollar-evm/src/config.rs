use std::collections::HashMap;

use alloy_primitives::Address;
use dollar_core::types::AssetId;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EvmConfig {
    pub rpc_url: String,
    pub chain: Chain,
    #[serde(default)]
    pub verify_chain_id: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    pub managed: ManagedContracts,
    pub named: HashMap<Chain, NamedContracts>,
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chain {
    Mainnet,
    Sepolia,
    Anvil,
}

impl Chain {
    pub fn chain_id(&self) -> u64 {
        match self {
            Chain::Mainnet => 1,
            Chain::Sepolia => 11155111,
            Chain::Anvil => 31337,
        }
    }
}

/// Protocol contracts, as registered in the dollar manager.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ManagedContracts {
    pub dollar_token: Address,
    pub curve3_pool_token: Address,
    pub dollar_metapool: Address,
    pub credit_token: Address,
    pub governance_token: Address,
    pub credit_nft: Address,
    pub staking_share: Address,
}

impl ManagedContracts {
    /// Address backing `asset`, `None` for assets outside the protocol.
    pub fn address(&self, asset: AssetId) -> Option<Address> {
        match asset {
            AssetId::Uad => Some(self.dollar_token),
            AssetId::Crv => Some(self.curve3_pool_token),
            AssetId::Uad3Crv => Some(self.dollar_metapool),
            AssetId::Ucr => Some(self.credit_token),
            AssetId::Ubq => Some(self.governance_token),
            AssetId::UcrNft => Some(self.credit_nft),
            AssetId::BondingShares => Some(self.staking_share),
            AssetId::Usdc => None,
        }
    }
}

/// Well-known third party contracts of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct NamedContracts {
    pub usdc: Address,
}
