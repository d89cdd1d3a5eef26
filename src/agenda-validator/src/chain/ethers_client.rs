//! JSON-RPC chain client backed by an ethers `Provider<Http>`.

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::{Log, Transaction, TransactionReceipt, H160, H256},
};
use tracing::debug;

use super::{ChainClient, ChainLog, ChainReceipt, ChainTransaction};
use crate::errors::ChainError;

#[derive(Clone, Debug)]
pub struct EthersChainClient {
    provider: Provider<Http>,
}

impl EthersChainClient {
    pub fn new(rpc_url: &str) -> Result<Self, ChainError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| ChainError::NoEndpoint(format!("{rpc_url}: {e}")))?;
        Ok(Self { provider })
    }
}

fn to_b256(h: H256) -> B256 {
    B256::from(h.0)
}

fn to_address(a: H160) -> Address {
    Address::from(a.0)
}

fn convert_transaction(tx: Transaction) -> ChainTransaction {
    ChainTransaction {
        hash: to_b256(tx.hash),
        from: to_address(tx.from),
        to: tx.to.map(to_address),
        input: Bytes::from(tx.input.to_vec()),
        block_number: tx.block_number.map(|n| n.as_u64()),
    }
}

fn convert_log(log: Log) -> ChainLog {
    ChainLog {
        address: to_address(log.address),
        topics: log.topics.into_iter().map(to_b256).collect(),
        data: Bytes::from(log.data.to_vec()),
    }
}

fn convert_receipt(receipt: TransactionReceipt) -> ChainReceipt {
    ChainReceipt {
        transaction_hash: to_b256(receipt.transaction_hash),
        status: receipt.status.map(|s| s.as_u64()),
        logs: receipt.logs.into_iter().map(convert_log).collect(),
    }
}

#[async_trait]
impl ChainClient for EthersChainClient {
    async fn get_transaction(&self, hash: B256) -> Result<Option<ChainTransaction>, ChainError> {
        debug!(%hash, "eth_getTransactionByHash");
        self.provider
            .get_transaction(H256::from(hash.0))
            .await
            .map(|tx| tx.map(convert_transaction))
            .map_err(|e| ChainError::Provider(e.to_string()))
    }

    async fn get_transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<ChainReceipt>, ChainError> {
        debug!(%hash, "eth_getTransactionReceipt");
        self.provider
            .get_transaction_receipt(H256::from(hash.0))
            .await
            .map(|r| r.map(convert_receipt))
            .map_err(|e| ChainError::Provider(e.to_string()))
    }
}
