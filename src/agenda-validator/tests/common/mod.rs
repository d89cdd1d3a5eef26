//! Shared fixtures: an in-memory chain, an in-memory registry and a signed submission.

#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use agenda_validator::{
    abi::{approveAndCallCall, AgendaCreated, MemoAgendaParams},
    messages::{signature_message, SignatureAction},
    utils::crypto::{address_of, sign_personal_message},
    ChainClient, ChainError, ChainLog, ChainReceipt, ChainTransaction, MetadataRegistry, Network,
    Pipeline, RetryPolicy,
};
use alloy_primitives::{address, Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolEvent, SolType};
use async_trait::async_trait;
use k256::ecdsa::SigningKey;
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

pub const AGENDA_ID: u64 = 101;
pub const TX_HASH: B256 = B256::repeat_byte(0xab);
pub const TARGET: Address = address!("2320542ae933FbAdf8f5B97cA348c7CeDA90fAd7");
pub const SPENDER: Address = address!("dd9f0ccc044b0781289ee318e5971b0139602c26");
pub const TARGET_CALLDATA: &str =
    "0x1e1f0b60000000000000000000000000f078ae62ea4740e19ddf6c0c5e17ecdb820bbee1";
pub const SNAPSHOT_URL: &str = "https://snapshot.org/#/tokamak.eth/proposal/0x1";
pub const TITLE: &str = "Update seigniorage layer";

#[derive(Default)]
pub struct MockChain {
    pub transactions: HashMap<B256, ChainTransaction>,
    pub receipts: HashMap<B256, ChainReceipt>,
    pub calls: AtomicUsize,
}

impl MockChain {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn get_transaction(&self, hash: B256) -> Result<Option<ChainTransaction>, ChainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.transactions.get(&hash).cloned())
    }

    async fn get_transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<ChainReceipt>, ChainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.receipts.get(&hash).cloned())
    }
}

#[derive(Default)]
pub struct MockRegistry {
    pub existing: HashSet<String>,
    pub probes: AtomicUsize,
}

impl MockRegistry {
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataRegistry for MockRegistry {
    async fn file_exists(&self, repo_path: &str) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.existing.contains(repo_path)
    }
}

pub fn signer() -> SigningKey {
    SigningKey::from_slice(&[7u8; 32]).unwrap()
}

pub fn creator() -> Address {
    address_of(signer().verifying_key())
}

pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap()
}

pub fn repo_path(id: u64) -> String {
    format!("data/agendas/sepolia/agenda-{id}.json")
}

/// A create submission signed by [`signer`] at the current time.
pub fn submission() -> Value {
    let created_at = now_rfc3339();
    let tx = TX_HASH.to_string();
    let message = signature_message(SignatureAction::Create, AGENDA_ID, &tx, &created_at);
    let signature = sign_personal_message(&signer(), &message).unwrap();

    json!({
        "id": AGENDA_ID,
        "title": TITLE,
        "description": "Switch the seigniorage layer to the new L2.",
        "network": "sepolia",
        "transaction": tx,
        "creator": {
            "address": creator().to_checksum(None),
            "signature": signature,
        },
        "createdAt": created_at,
        "snapshotUrl": SNAPSHOT_URL,
        "actions": [{
            "title": "updateSeigniorageLayer(address)",
            "contractAddress": TARGET.to_checksum(None),
            "method": "updateSeigniorageLayer(address)",
            "calldata": TARGET_CALLDATA,
            "abi": [{
                "inputs": [{ "internalType": "address", "name": "layer2", "type": "address" }],
                "name": "updateSeigniorageLayer",
                "outputs": [{ "internalType": "bool", "name": "", "type": "bool" }],
                "stateMutability": "nonpayable",
                "type": "function"
            }],
            "sendEth": false,
            "type": "Custom"
        }]
    })
}

/// `approveAndCall` input carrying the memo-style agenda parameters.
pub fn agenda_input(memo: &str) -> Bytes {
    let calldata = Bytes::from(hex::decode(TARGET_CALLDATA.trim_start_matches("0x")).unwrap());
    let params = MemoAgendaParams::abi_encode_params(&(
        vec![TARGET],
        300u128,
        600u128,
        false,
        vec![calldata],
        memo.to_string(),
    ));
    approveAndCallCall {
        spender: SPENDER,
        amount: U256::from(10u64).pow(U256::from(20u64)),
        data: Bytes::from(params),
    }
    .abi_encode()
    .into()
}

pub fn agenda_created_log(id: u64) -> ChainLog {
    let event = AgendaCreated {
        from: creator(),
        id: U256::from(id),
        targets: vec![TARGET],
        noticePeriodSeconds: 300,
        votingPeriodSeconds: 600,
        atomicExecute: false,
    };
    let log = event.encode_log_data();
    ChainLog {
        address: SPENDER,
        topics: log.topics().to_vec(),
        data: log.data.clone(),
    }
}

pub fn transaction(from: Address) -> ChainTransaction {
    ChainTransaction {
        hash: TX_HASH,
        from,
        to: Some(SPENDER),
        input: agenda_input(SNAPSHOT_URL),
        block_number: Some(7_000_000),
    }
}

pub fn receipt(logs: Vec<ChainLog>) -> ChainReceipt {
    ChainReceipt {
        transaction_hash: TX_HASH,
        status: Some(1),
        logs,
    }
}

/// Chain state in which the submission above is fully backed on-chain.
pub fn matching_chain() -> MockChain {
    let mut chain = MockChain::default();
    chain.transactions.insert(TX_HASH, transaction(creator()));
    chain
        .receipts
        .insert(TX_HASH, receipt(vec![agenda_created_log(AGENDA_ID)]));
    chain
}

pub fn pipeline(
    chain: Arc<MockChain>,
    registry: MockRegistry,
) -> Pipeline<Arc<MockChain>, MockRegistry> {
    Pipeline::new(registry).with_client(Network::Sepolia, chain, RetryPolicy::NONE)
}

/// Write `doc` to `<dir>/data/agendas/sepolia/agenda-<id>.json`.
pub fn write_submission(dir: &tempfile::TempDir, id: u64, doc: &Value) -> PathBuf {
    let path = dir.path().join(repo_path(id));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, serde_json::to_string_pretty(doc).unwrap()).unwrap();
    path
}

pub fn pr_title() -> String {
    format!("[Agenda] sepolia - {AGENDA_ID} - {TITLE}")
}
