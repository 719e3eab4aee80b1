use std::collections::HashMap;

use alloy_primitives::Address;
use anyhow::Error;
use dollar_core::types::AssetId;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WatcherConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub wallet: Option<Address>,
    #[serde(default)]
    pub decimals: HashMap<String, u8>, // asset symbol -> display decimals
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub refresh_interval_secs: Option<u64>,
    #[serde(default = "default_read_commands")]
    pub read_commands: bool,
}

fn default_read_commands() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: None,
            read_commands: default_read_commands(),
        }
    }
}

impl WatcherConfig {
    pub fn validate(&self) -> Result<(), Error> {
        for symbol in self.decimals.keys() {
            symbol.parse::<AssetId>()?;
        }

        if self.settings.refresh_interval_secs == Some(0) {
            return Err(Error::msg("refresh_interval_secs must be greater than 0"));
        }

        Ok(())
    }

    pub fn decimals(&self, asset: AssetId) -> u8 {
        self.decimals
            .get(asset.symbol())
            .copied()
            .unwrap_or(match asset {
                AssetId::Usdc => 6,
                _ => 18,
            })
    }
}
