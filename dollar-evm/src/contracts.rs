use std::sync::Arc;

use alloy_primitives::{Address, U256};
use anyhow::Error;
use async_trait::async_trait;
use dollar_core::api::ContractHandle;

use crate::abi::{decode_uint, decode_uint_array, encode_call, Token};
use crate::rpc::RpcClient;

/// Fungible token, also used for the curve pool share token.
pub struct Erc20Contract {
    rpc: Arc<RpcClient>,
    address: Address,
}

impl Erc20Contract {
    pub fn new(rpc: Arc<RpcClient>, address: Address) -> Self {
        Self { rpc, address }
    }
}

#[async_trait]
impl ContractHandle for Erc20Contract {
    async fn balance_of(&self, owner: Address) -> Result<U256, Error> {
        let data = encode_call("balanceOf(address)", &[Token::Address(owner)]);
        decode_uint(&self.rpc.eth_call(self.address, &data).await?)
    }
}

/// Multi-token position contract tracking which token ids each holder owns.
pub struct Erc1155Contract {
    rpc: Arc<RpcClient>,
    address: Address,
}

impl Erc1155Contract {
    pub fn new(rpc: Arc<RpcClient>, address: Address) -> Self {
        Self { rpc, address }
    }
}

#[async_trait]
impl ContractHandle for Erc1155Contract {
    async fn balance_of(&self, _owner: Address) -> Result<U256, Error> {
        Err(Error::msg(format!(
            "{} is an ERC-1155 contract, balances are tracked per token id",
            self.address
        )))
    }

    async fn holder_tags(&self, owner: Address) -> Result<Vec<U256>, Error> {
        let data = encode_call("holderTokens(address)", &[Token::Address(owner)]);
        decode_uint_array(&self.rpc.eth_call(self.address, &data).await?)
    }

    async fn balance_of_tag(&self, owner: Address, tag: U256) -> Result<U256, Error> {
        let data = encode_call(
            "balanceOf(address,uint256)",
            &[Token::Address(owner), Token::Uint(tag)],
        );
        decode_uint(&self.rpc.eth_call(self.address, &data).await?)
    }
}
