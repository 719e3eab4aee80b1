use std::fmt::Display;
use std::str::FromStr;

use anyhow::Error;

/// Holdings tracked for a wallet. The set is closed, a snapshot always carries
/// one amount for each of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetId {
    /// Primary stable token
    Uad,
    /// Base liquidity token (3CRV)
    Crv,
    /// Metapool liquidity share token
    Uad3Crv,
    /// Secondary credit token
    Ucr,
    /// Governance token
    Ubq,
    /// Credit redemption position, held as tagged sub-units
    UcrNft,
    /// Staking position, held as tagged sub-units
    BondingShares,
    /// External reference stable asset
    Usdc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Plain fungible `balanceOf(owner)`
    Fungible,
    /// Sum of `balanceOf(owner, tag)` over the tags held by the owner
    Tagged,
}

impl AssetId {
    pub const COUNT: usize = 8;

    /// Canonical order, used for both querying and storage.
    pub const ALL: [AssetId; AssetId::COUNT] = [
        AssetId::Uad,
        AssetId::Crv,
        AssetId::Uad3Crv,
        AssetId::Ucr,
        AssetId::Ubq,
        AssetId::UcrNft,
        AssetId::BondingShares,
        AssetId::Usdc,
    ];

    pub fn query_kind(&self) -> QueryKind {
        match self {
            AssetId::UcrNft | AssetId::BondingShares => QueryKind::Tagged,
            _ => QueryKind::Fungible,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AssetId::Uad => "uad",
            AssetId::Crv => "crv",
            AssetId::Uad3Crv => "uad3crv",
            AssetId::Ucr => "ucr",
            AssetId::Ubq => "ubq",
            AssetId::UcrNft => "ucr_nft",
            AssetId::BondingShares => "bonding_shares",
            AssetId::Usdc => "usdc",
        }
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for AssetId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetId::ALL
            .into_iter()
            .find(|asset| asset.symbol().eq_ignore_ascii_case(s))
            .ok_or(Error::msg(format!("Unknown asset: {}", s)))
    }
}
