//! Cross-validation of a submission against its on-chain transaction.
//!
//! Absence is an error (transaction, receipt or event missing; undecodable data). Anything that
//! was found but does not match the document is reported as `false` in [`CrossCheckReport`].

use agenda_metadata_types::AgendaMetadata;
use alloy_primitives::{Address, Bytes, B256, U256};
use tracing::{debug, info};

use crate::{
    abi::AgendaCreated,
    chain::{fetch_with_retry, ChainClient, ChainReceipt, ChainTransaction},
    config::RetryPolicy,
    decoder::{AgendaDecoder, DecodedAgendaParams, EncodingVersion, SolAgendaDecoder},
    errors::CrossCheckError,
    patterns::normalize_address,
    utils::display::display_value,
};

/// Comparison of decoded agenda parameters with the document's actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalldataComparison {
    pub version: EncodingVersion,
    pub targets_match: bool,
    pub calldatas_match: bool,
    /// `None` when the on-chain encoding carries no memo.
    pub memo_matches: Option<bool>,
}

impl CalldataComparison {
    pub fn is_valid(&self) -> bool {
        self.targets_match && self.calldatas_match && self.memo_matches.unwrap_or(true)
    }
}

fn hex_lower(bytes: &Bytes) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn compare_calldata(
    params: &DecodedAgendaParams,
    metadata: &AgendaMetadata,
) -> CalldataComparison {
    let metadata_targets: Vec<String> = metadata
        .actions
        .iter()
        .map(|a| normalize_address(&a.contract_address))
        .collect();
    let tx_targets: Vec<String> = params
        .targets
        .iter()
        .map(|a| normalize_address(&a.to_string()))
        .collect();

    let metadata_calldatas: Vec<String> = metadata
        .actions
        .iter()
        .map(|a| a.calldata.to_lowercase())
        .collect();
    let tx_calldatas: Vec<String> = params.calldatas.iter().map(hex_lower).collect();

    let memo_matches = params
        .memo
        .as_deref()
        .map(|memo| memo == metadata.expected_memo());

    let comparison = CalldataComparison {
        version: params.version,
        targets_match: metadata_targets == tx_targets,
        calldatas_match: metadata_calldatas == tx_calldatas,
        memo_matches,
    };
    if !comparison.targets_match {
        debug!(?metadata_targets, ?tx_targets, "target addresses differ");
    }
    if !comparison.calldatas_match {
        debug!(
            metadata = ?metadata_calldatas.iter().map(|c| display_value(c)).collect::<Vec<_>>(),
            transaction = ?tx_calldatas.iter().map(|c| display_value(c)).collect::<Vec<_>>(),
            "calldata arrays differ"
        );
    }
    comparison
}

/// Case-insensitive comparison of the transaction sender with `expected`.
pub fn sender_matches(tx: &ChainTransaction, expected: &str) -> bool {
    normalize_address(&tx.from.to_string()) == normalize_address(expected)
}

/// Outcome of a full cross-check. Every field is a soft result; hard failures are errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossCheckReport {
    pub transaction: B256,
    pub sender: Address,
    pub sender_matches: bool,
    pub receipt_succeeded: bool,
    pub event_id: U256,
    pub agenda_id_matches: bool,
    pub calldata: CalldataComparison,
}

impl CrossCheckReport {
    pub fn is_valid(&self) -> bool {
        self.sender_matches
            && self.receipt_succeeded
            && self.agenda_id_matches
            && self.calldata.is_valid()
    }

    /// Human-readable reasons for every failed comparison.
    pub fn mismatches(&self, metadata: &AgendaMetadata) -> Vec<String> {
        let mut out = Vec::new();
        if !self.sender_matches {
            out.push(format!(
                "Transaction sender does not match expected address. Actual: {}, Expected: {}",
                self.sender, metadata.creator.address
            ));
        }
        if !self.receipt_succeeded {
            out.push(format!("Transaction {} reverted", self.transaction));
        }
        if !self.agenda_id_matches {
            out.push(format!(
                "Agenda ID from event does not match metadata. Event: {}, Metadata: {}",
                self.event_id, metadata.id
            ));
        }
        if !self.calldata.targets_match {
            out.push("Actions contractAddress array does not match transaction addresses".into());
        }
        if !self.calldata.calldatas_match {
            out.push("Actions calldata array does not match transaction calldatas".into());
        }
        if self.calldata.memo_matches == Some(false) {
            out.push(format!(
                "Memo does not match snapshotUrl/discourseUrl (expected `{}`)",
                display_value(metadata.expected_memo())
            ));
        }
        out
    }
}

/// Resolves a submission's transaction through `client` and checks it with `decoder`.
pub struct CrossValidator<C, D = SolAgendaDecoder> {
    client: C,
    decoder: D,
    retry: RetryPolicy,
}

impl<C: ChainClient> CrossValidator<C, SolAgendaDecoder> {
    pub fn new(client: C) -> Self {
        Self::with_decoder(client, SolAgendaDecoder)
    }
}

impl<C: ChainClient, D: AgendaDecoder> CrossValidator<C, D> {
    pub fn with_decoder(client: C, decoder: D) -> Self {
        Self {
            client,
            decoder,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn fetch_transaction(&self, hash: B256) -> Result<ChainTransaction, CrossCheckError> {
        fetch_with_retry(self.retry, "transaction", || self.client.get_transaction(hash))
            .await?
            .ok_or_else(|| CrossCheckError::TransactionNotFound(hash.to_string()))
    }

    pub async fn fetch_receipt(&self, hash: B256) -> Result<ChainReceipt, CrossCheckError> {
        fetch_with_retry(self.retry, "receipt", || self.client.get_transaction_receipt(hash))
            .await?
            .ok_or_else(|| CrossCheckError::ReceiptNotFound(hash.to_string()))
    }

    /// Locate the `AgendaCreated` event; a receipt without one is a hard failure here.
    pub fn agenda_created_event(
        &self,
        receipt: &ChainReceipt,
    ) -> Result<AgendaCreated, CrossCheckError> {
        self.decoder
            .find_agenda_created(&receipt.logs)?
            .ok_or(CrossCheckError::EventNotFound)
    }

    /// Whether the receipt's `AgendaCreated` event carries `expected_id`.
    pub fn validate_agenda_id(
        &self,
        receipt: &ChainReceipt,
        expected_id: u64,
    ) -> Result<(bool, U256), CrossCheckError> {
        let event = self.agenda_created_event(receipt)?;
        Ok((event.id.to_string() == expected_id.to_string(), event.id))
    }

    pub async fn cross_check(
        &self,
        metadata: &AgendaMetadata,
    ) -> Result<CrossCheckReport, CrossCheckError> {
        let hash: B256 = metadata
            .transaction
            .parse()
            .map_err(|_| CrossCheckError::InvalidHash(metadata.transaction.clone()))?;

        let tx = self.fetch_transaction(hash).await?;
        let sender_matches = sender_matches(&tx, &metadata.creator.address);

        let receipt = self.fetch_receipt(hash).await?;
        let (agenda_id_matches, event_id) = self.validate_agenda_id(&receipt, metadata.id)?;

        let params = self.decoder.decode_transaction_input(&tx.input)?;
        let calldata = compare_calldata(&params, metadata);

        let report = CrossCheckReport {
            transaction: hash,
            sender: tx.from,
            sender_matches,
            receipt_succeeded: receipt.succeeded(),
            event_id,
            agenda_id_matches,
            calldata,
        };
        info!(
            transaction = %hash,
            valid = report.is_valid(),
            version = ?report.calldata.version,
            "cross-checked on-chain transaction"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_metadata_types::{Action, Creator, Network};
    use alloy_primitives::address;

    const TARGET: Address = address!("2320542ae933FbAdf8f5B97cA348c7CeDA90fAd7");

    fn action(calldata: &str) -> Action {
        Action {
            title: "updateSeigniorage()".into(),
            contract_address: TARGET.to_checksum(None),
            method: "updateSeigniorage()".into(),
            calldata: calldata.into(),
            abi: vec![],
            send_eth: Some(false),
            id: None,
            kind: None,
        }
    }

    fn metadata(actions: Vec<Action>) -> AgendaMetadata {
        AgendaMetadata {
            id: 5,
            title: "t".into(),
            description: "d".into(),
            network: Network::Mainnet,
            transaction: format!("0x{}", "00".repeat(32)),
            creator: Creator {
                address: Address::ZERO.to_string(),
                signature: String::new(),
            },
            created_at: "2025-01-01T00:00:00Z".into(),
            updated_at: None,
            snapshot_url: None,
            discourse_url: Some("https://forum.tokamak.network/t/1".into()),
            actions,
        }
    }

    fn params(memo: Option<&str>) -> DecodedAgendaParams {
        DecodedAgendaParams {
            targets: vec![TARGET],
            notice_period: 1,
            voting_period: 2,
            atomic_execute: true,
            calldatas: vec![Bytes::from(vec![0x76, 0x4a, 0x78, 0x56])],
            memo: memo.map(str::to_string),
            version: if memo.is_some() {
                EncodingVersion::New
            } else {
                EncodingVersion::Legacy
            },
        }
    }

    #[test]
    fn matching_actions_pass_case_insensitively() {
        let cmp = compare_calldata(&params(None), &metadata(vec![action("0x764A7856")]));
        assert!(cmp.is_valid());
        assert_eq!(cmp.memo_matches, None);
    }

    #[test]
    fn order_and_length_matter() {
        let doc = metadata(vec![action("0x764a7856"), action("0x764a7856")]);
        let cmp = compare_calldata(&params(None), &doc);
        assert!(!cmp.targets_match);
        assert!(!cmp.calldatas_match);
    }

    #[test]
    fn memo_checked_only_when_encoded() {
        let doc = metadata(vec![action("0x764a7856")]);
        assert_eq!(
            compare_calldata(&params(Some("https://forum.tokamak.network/t/1")), &doc).memo_matches,
            Some(true)
        );
        let cmp = compare_calldata(&params(Some("https://elsewhere")), &doc);
        assert_eq!(cmp.memo_matches, Some(false));
        assert!(!cmp.is_valid());
    }

    #[test]
    fn empty_memo_matches_document_without_urls() {
        let mut doc = metadata(vec![action("0x764a7856")]);
        doc.discourse_url = None;
        assert_eq!(compare_calldata(&params(Some("")), &doc).memo_matches, Some(true));
    }

    #[test]
    fn report_lists_each_mismatch() {
        let doc = metadata(vec![action("0x00")]);
        let report = CrossCheckReport {
            transaction: B256::ZERO,
            sender: Address::repeat_byte(1),
            sender_matches: false,
            receipt_succeeded: true,
            event_id: U256::from(6u64),
            agenda_id_matches: false,
            calldata: compare_calldata(&params(None), &doc),
        };
        assert!(!report.is_valid());
        let reasons = report.mismatches(&doc);
        assert_eq!(reasons.len(), 3);
        assert!(reasons[0].starts_with("Transaction sender does not match"));
        assert!(reasons[1].contains("Event: 6, Metadata: 5"));
        assert!(reasons[2].contains("calldata array"));
    }
}
