//! Chain-facing collaborators of the resolver
//!
//! Address syntax is checked locally. Reachability goes through a JSON-RPC
//! node and the ABI itself comes from an Etherscan-compatible lookup service;
//! both sit behind traits so the resolver can be driven by fakes.

pub mod address;
pub mod etherscan;
pub mod rpc;

pub use address::is_address;
pub use etherscan::{AbiLookup, EtherscanClient, LookupResponse, UNVERIFIED_SOURCE_RESULT};
pub use rpc::{ChainClient, JsonRpcChainClient};
