use std::collections::VecDeque;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use alloy_primitives::{Address, U256};
use anyhow::Error;
use async_trait::async_trait;

use crate::api::ContractHandle;
use crate::types::{AssetId, ContractSet, QueryKind};

#[derive(Default)]
pub struct MockContract {
    amount: Mutex<U256>,
    tags: Mutex<Vec<(U256, U256)>>, // tag -> amount
    delays: Mutex<VecDeque<Duration>>,
    failing: AtomicBool,
    failing_tag: Mutex<Option<U256>>,
    tag_delay: Mutex<Duration>,
    tag_queries_in_flight: AtomicUsize,
    max_tag_queries_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

impl MockContract {
    pub fn fungible(amount: u64) -> Self {
        let contract = Self::default();
        *contract.amount.lock().unwrap() = U256::from(amount);
        contract
    }

    pub fn tagged(tags: Vec<(u64, u64)>) -> Self {
        let contract = Self::default();
        *contract.tags.lock().unwrap() = tags
            .into_iter()
            .map(|(tag, amount)| (U256::from(tag), U256::from(amount)))
            .collect();
        contract
    }

    pub fn set_amount(&self, amount: u64) {
        *self.amount.lock().unwrap() = U256::from(amount);
        for (_, tag_amount) in self.tags.lock().unwrap().iter_mut() {
            *tag_amount = U256::from(amount);
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fails only the per-tag balance query of `tag`, listing tags still works.
    pub fn set_failing_tag(&self, tag: Option<u64>) {
        *self.failing_tag.lock().unwrap() = tag.map(U256::from);
    }

    pub fn set_tag_delay(&self, delay: Duration) {
        *self.tag_delay.lock().unwrap() = delay;
    }

    pub fn max_tag_queries_in_flight(&self) -> usize {
        self.max_tag_queries_in_flight.load(Ordering::SeqCst)
    }

    /// Delay applied to the next query, in call order.
    pub fn push_delay(&self, delay: Duration) {
        self.delays.lock().unwrap().push_back(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn begin_call(&self) -> Result<(), Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failing = self.failing.load(Ordering::SeqCst);
        let delay = self.delays.lock().unwrap().pop_front().unwrap_or_default();

        tokio::time::sleep(delay).await;

        if failing {
            Err(Error::msg("execution reverted"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ContractHandle for MockContract {
    async fn balance_of(&self, _owner: Address) -> Result<U256, Error> {
        let amount = *self.amount.lock().unwrap();
        self.begin_call().await?;
        Ok(amount)
    }

    async fn holder_tags(&self, _owner: Address) -> Result<Vec<U256>, Error> {
        let tags = self
            .tags
            .lock()
            .unwrap()
            .iter()
            .map(|(tag, _)| *tag)
            .collect();
        self.begin_call().await?;
        Ok(tags)
    }

    async fn balance_of_tag(&self, _owner: Address, tag: U256) -> Result<U256, Error> {
        let in_flight = self.tag_queries_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_tag_queries_in_flight
            .fetch_max(in_flight, Ordering::SeqCst);

        let delay = *self.tag_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        self.tag_queries_in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) || *self.failing_tag.lock().unwrap() == Some(tag) {
            return Err(Error::msg("execution reverted"));
        }

        Ok(self
            .tags
            .lock()
            .unwrap()
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, amount)| *amount)
            .unwrap_or_default())
    }
}

pub struct MockContracts {
    pub contracts: [Arc<MockContract>; AssetId::COUNT],
}

impl MockContracts {
    /// One mock per asset, amounts in `AssetId::ALL` order. Tagged assets hold
    /// their whole amount under tag 1.
    pub fn new(amounts: [u64; AssetId::COUNT]) -> Self {
        let contracts = std::array::from_fn(|i| {
            let contract = match AssetId::ALL[i].query_kind() {
                QueryKind::Fungible => MockContract::fungible(amounts[i]),
                QueryKind::Tagged => MockContract::tagged(vec![(1, amounts[i])]),
            };
            Arc::new(contract)
        });

        Self { contracts }
    }

    pub fn get(&self, asset: AssetId) -> &Arc<MockContract> {
        &self.contracts[asset.index()]
    }

    pub fn contract_set(&self, generation: u64) -> ContractSet {
        ContractSet::new(
            generation,
            std::array::from_fn(|i| self.contracts[i].clone() as Arc<dyn ContractHandle>),
        )
    }

    pub fn total_calls(&self) -> usize {
        self.contracts.iter().map(|c| c.calls()).sum()
    }
}

pub fn wallet(byte: u8) -> Address {
    Address::from([byte; 20])
}
