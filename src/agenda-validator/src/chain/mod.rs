//! Chain-data provider abstraction.
//!
//! The validator only needs transaction and receipt lookups by hash. Implementations must be
//! safe for concurrent read-only use, since batch validation shares one client across tasks.

mod ethers_client;
mod retry;

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;

use crate::errors::ChainError;

pub use ethers_client::EthersChainClient;
pub use retry::fetch_with_retry;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainTransaction {
    pub hash: B256,
    pub from: Address,
    pub to: Option<Address>,
    /// Raw call input (`data`).
    pub input: Bytes,
    pub block_number: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainReceipt {
    pub transaction_hash: B256,
    /// 1 = success, 0 = reverted; `None` for pre-Byzantium receipts.
    pub status: Option<u64>,
    pub logs: Vec<ChainLog>,
}

impl ChainReceipt {
    pub fn succeeded(&self) -> bool {
        self.status != Some(0)
    }
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn get_transaction(&self, hash: B256) -> Result<Option<ChainTransaction>, ChainError>;

    async fn get_transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<ChainReceipt>, ChainError>;
}

#[async_trait]
impl<T: ChainClient + ?Sized> ChainClient for std::sync::Arc<T> {
    async fn get_transaction(&self, hash: B256) -> Result<Option<ChainTransaction>, ChainError> {
        (**self).get_transaction(hash).await
    }

    async fn get_transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<ChainReceipt>, ChainError> {
        (**self).get_transaction_receipt(hash).await
    }
}
