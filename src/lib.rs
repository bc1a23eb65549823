//! An Ethereum JSON RPC client that normalizes node responses.
//!
//! Nodes encode numbers as `0x` prefixed hex strings and amounts in wei. This
//! crate sends the standard `eth`, `net` and `web3` methods and rewrites the
//! numeric fields of their results into decimal strings, and wei amounts into
//! ether. Every response is tagged with a `status` of `"success"` or
//! `"error"`.
//!
//! ```no_run
//! use ethnorm::{eth, http::Client, types::*};
//!
//! async fn balance(client: &Client, account: Address) -> Result<(), ethnorm::http::Error> {
//!     let response = client.call(eth::GetBalance, (account, BlockSpec::default())).await?;
//!     println!("{:?} ether", response.result());
//!     Ok(())
//! }
//! ```
//!
//! Documentation for the APIs can be found here:
//! <https://ethereum.github.io/execution-apis/>

pub mod config;
#[cfg(feature = "curl")]
pub mod curl;
#[cfg(feature = "http")]
pub mod http;
pub mod jsonrpc;
#[macro_use]
pub mod method;
pub mod normalize;
mod serialization;
pub mod shape;
pub mod types;

use self::types::*;

module! {
    /// The `eth` namespace.
    pub mod eth {
        /// Returns a list of addresses owned by client.
        pub struct Accounts as "eth_accounts"
            Empty => shape::passthrough;

        /// Returns the number of most recent block.
        pub struct BlockNumber as "eth_blockNumber"
            Empty => shape::quantity;

        /// Executes a new message call immediately without creating a
        /// transaction on the block chain.
        pub struct Call as "eth_call"
            (TransactionCall, BlockSpec) => shape::passthrough;

        /// Returns the chain ID of the current network.
        pub struct ChainId as "eth_chainId"
            Empty => shape::quantity;

        /// Returns the client coinbase address.
        pub struct Coinbase as "eth_coinbase"
            Empty => shape::passthrough;

        /// Estimates the gas of a call with empty calldata to the given
        /// address.
        pub struct EstimateGas as "eth_estimateGas"
            (Address,) [serialization::params_estimate_gas] => shape::wei;

        /// Returns the current price per gas, in ether.
        pub struct GasPrice as "eth_gasPrice"
            Empty => shape::wei;

        /// Returns the balance of the account of given address, in ether.
        pub struct GetBalance as "eth_getBalance"
            (Address, BlockSpec) => shape::wei;

        /// Returns information about a block by hash, always with full
        /// transaction objects.
        pub struct GetBlockByHash as "eth_getBlockByHash"
            (Digest,) [serialization::params_block_by_hash] => shape::block_by_hash;

        /// Returns information about a block by number.
        pub struct GetBlockByNumber as "eth_getBlockByNumber"
            (BlockSpec, Hydrated) => shape::block_by_number;

        /// Returns the number of transactions in a block from a block matching
        /// the given block hash.
        pub struct GetBlockTransactionCountByHash as "eth_getBlockTransactionCountByHash"
            (Digest,) => shape::quantity;

        /// Returns the number of transactions in a block matching the given
        /// block number.
        pub struct GetBlockTransactionCountByNumber as "eth_getBlockTransactionCountByNumber"
            (BlockSpec,) => shape::quantity;

        /// Returns code at a given address.
        pub struct GetCode as "eth_getCode"
            (Address, BlockSpec) => shape::passthrough;

        /// Returns an array of all logs matching the specified filter.
        pub struct GetLogs as "eth_getLogs"
            (LogFilter,) => shape::passthrough;

        /// Returns the value from a storage position at a given address.
        pub struct GetStorageAt as "eth_getStorageAt"
            (Address, Quantity, BlockSpec) => shape::passthrough;

        /// Returns information about a transaction by block hash and
        /// transaction index position.
        pub struct GetTransactionByBlockHashAndIndex as "eth_getTransactionByBlockHashAndIndex"
            (Digest, Quantity) => shape::transaction;

        /// Returns information about a transaction by block number and
        /// transaction index position.
        pub struct GetTransactionByBlockNumberAndIndex as "eth_getTransactionByBlockNumberAndIndex"
            (BlockSpec, Quantity) => shape::transaction;

        /// Returns the information about a transaction requested by transaction
        /// hash.
        pub struct GetTransactionByHash as "eth_getTransactionByHash"
            (Digest,) => shape::transaction;

        /// Returns the nonce of an account in the state.
        pub struct GetTransactionCount as "eth_getTransactionCount"
            (Address, BlockSpec) => shape::quantity;

        /// Returns the receipt of a transaction by transaction hash. Receipts
        /// of transactions that are not yet mined produce an error response.
        pub struct GetTransactionReceipt as "eth_getTransactionReceipt"
            (Digest,) => shape::receipt;

        /// Returns the current maxPriorityFeePerGas, in ether.
        pub struct MaxPriorityFeePerGas as "eth_maxPriorityFeePerGas"
            Empty => shape::wei;

        /// Returns the current Ethereum protocol version.
        pub struct ProtocolVersion as "eth_protocolVersion"
            Empty => shape::quantity;

        /// Submits a raw transaction.
        pub struct SendRawTransaction as "eth_sendRawTransaction"
            (Vec<u8>,) [serialization::params_bytes] => shape::passthrough;

        /// Signs and submits a transaction.
        pub struct SendTransaction as "eth_sendTransaction"
            (TransactionCall,) => shape::passthrough;

        /// Returns an EIP-191 signature over the provided data.
        pub struct Sign as "eth_sign"
            (Address, Vec<u8>) [serialization::params_eth_sign] => shape::passthrough;

        /// Returns an object with data about the sync status or false.
        pub struct Syncing as "eth_syncing"
            Empty => shape::passthrough;
    }
}

module! {
    /// The `net` namespace.
    pub mod net {
        /// Returns `true` if the client is actively listening for network
        /// connections.
        pub struct Listening as "net_listening"
            Empty => shape::passthrough;

        /// Returns the number of peers currently connected to the client.
        pub struct PeerCount as "net_peerCount"
            Empty => shape::quantity;

        /// Returns the current network ID.
        pub struct Version as "net_version"
            Empty => shape::passthrough;
    }
}

module! {
    /// The `web3` namespace.
    pub mod web3 {
        /// Returns the current client version.
        pub struct ClientVersion as "web3_clientVersion"
            Empty => shape::passthrough;

        /// Returns the Keccak-256 of the given data.
        pub struct Sha3 as "web3_sha3"
            (Vec<u8>,) [serialization::params_bytes] => shape::passthrough;
    }
}
