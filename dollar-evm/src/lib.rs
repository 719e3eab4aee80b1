mod abi;
mod config;
mod contracts;
mod registry;
mod rpc;
mod utils;

pub use self::config::{Chain, EvmConfig, ManagedContracts, NamedContracts};
pub use self::contracts::{Erc1155Contract, Erc20Contract};
pub use self::registry::ContractRegistry;
pub use self::rpc::RpcClient;
pub use self::utils::u256_to_decimal;
