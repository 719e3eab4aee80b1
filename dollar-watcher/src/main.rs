use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use ::config::{Config, File};
use alloy_primitives::Address;
use anyhow::Error;
use dollar_core::store::{BalancesStore, RefreshOutcome};
use dollar_core::types::BalancesUpdate;
use dollar_evm::{ContractRegistry, EvmConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Interval;
use tracing::{error, info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

mod commands;
mod config;
mod report;

use self::commands::Command;
use self::config::WatcherConfig;
use self::report::{report, start_report_task};

struct Watcher {
    config: Arc<WatcherConfig>,
    registry: ContractRegistry,
    store: BalancesStore,
}

impl Watcher {
    pub fn new(config: WatcherConfig, registry: ContractRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry,
            store: BalancesStore::new(),
        }
    }

    pub async fn reload_contracts(&self) {
        match self.registry.resolve().await {
            Ok(contracts) => self.store.set_contracts(Some(Arc::new(contracts))),
            Err(e) => error!("Failed to resolve contracts: {:?}", e),
        }
    }

    pub fn refresh(&self) {
        let refresher = self.store.refresher();

        tokio::spawn(async move {
            // failures are already logged by the store
            if let Ok(RefreshOutcome::Skipped) = refresher.refresh().await {
                warn!("Cannot refresh balances, no wallet connected or contracts unresolved");
            }
        });
    }

    /// Returns false once the watcher should exit.
    pub async fn handle_command(&self, command: Command) -> bool {
        match command {
            Command::Connect(address) => {
                info!("Connecting wallet {}", address);
                self.store.set_address(Some(address));
            }
            Command::Disconnect => {
                info!("Disconnecting wallet");
                self.store.set_address(None);
            }
            Command::Refresh => self.refresh(),
            Command::Reload => self.reload_contracts().await,
            Command::Show => {
                match self.store.address() {
                    Some(address) => info!("Connected wallet {}", address),
                    None => info!("No wallet connected"),
                }

                let (snapshot, _) = self.store.balances();
                report(
                    &BalancesUpdate {
                        snapshot,
                        freshness: self.store.freshness(),
                    },
                    &self.config,
                );
            }
            Command::Quit => return false,
        }

        true
    }
}

async fn tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => futures::future::pending::<()>().await,
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_line_number(true)
                .compact(),
        )
        .init();

    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .build()?;

    let config: WatcherConfig = config.try_deserialize()?;
    config.validate()?;

    let evm_config = Config::builder()
        .add_source(File::with_name(&std::env::var("EVM_CONFIG_FILE")?))
        .build()?;

    let evm_config: EvmConfig = evm_config.try_deserialize()?;

    let wallet = match std::env::var("WALLET_ADDRESS") {
        Ok(address) => Some(Address::from_str(&address)?),
        Err(_) => config.wallet,
    };

    let watcher = Watcher::new(config, ContractRegistry::new(evm_config)?);

    info!(
        "Watching balances on {:?} through {}",
        watcher.registry.config().chain,
        watcher.registry.config().rpc_url
    );

    let report_task = start_report_task(watcher.store.update_stream(), watcher.config.clone());

    watcher.reload_contracts().await;
    watcher.store.set_address(wallet);

    if wallet.is_none() {
        info!("No wallet configured, waiting for a connect command");
    }

    let mut interval = watcher
        .config
        .settings
        .refresh_interval_secs
        .map(|secs| {
            let mut interval = tokio::time::interval(Duration::from_secs(secs));
            // dependency changes already trigger the first fetch
            interval.reset();
            interval
        });

    let mut read_commands = watcher.config.settings.read_commands;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tick(&mut interval) => watcher.refresh(),
            line = lines.next_line(), if read_commands => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match line.parse::<Command>() {
                    Ok(command) => {
                        if !watcher.handle_command(command).await {
                            break;
                        }
                    }
                    Err(e) => warn!("{}", e),
                },
                Ok(None) => read_commands = false,
                Err(e) => {
                    error!("Failed to read command: {:?}", e);
                    read_commands = false;
                }
            },
        }
    }

    report_task.abort();

    info!("Exiting...");

    Ok(())
}
