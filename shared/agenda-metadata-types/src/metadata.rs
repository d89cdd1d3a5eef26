use serde::{Deserialize, Serialize};

use crate::network::Network;

/// Agenda metadata document as submitted in a pull request.
///
/// Field names follow the JSON layout (`camelCase`). Parsing into this type does not
/// enforce formats; that is the job of the schema validator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaMetadata {
    /// On-chain agenda id.
    pub id: u64,
    pub title: String,
    pub description: String,
    pub network: Network,
    /// Hash of the transaction that created the agenda (0x + 64 hex).
    pub transaction: String,
    pub creator: Creator,
    pub created_at: String,
    /// Present only on updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discourse_url: Option<String>,
    pub actions: Vec<Action>,
}

impl AgendaMetadata {
    pub fn is_update(&self) -> bool {
        self.updated_at.is_some()
    }

    /// Timestamp the creator signed: `updatedAt` for updates, `createdAt` otherwise.
    pub fn signed_timestamp(&self) -> &str {
        self.updated_at.as_deref().unwrap_or(&self.created_at)
    }

    /// Memo expected in newer on-chain encodings.
    pub fn expected_memo(&self) -> &str {
        self.snapshot_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.discourse_url.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub address: String,
    pub signature: String,
}

/// One call target of the agenda.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub title: String,
    pub contract_address: String,
    /// Function signature, eg `transfer(address,uint256)`.
    pub method: String,
    pub calldata: String,
    pub abi: Vec<AbiItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_eth: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// ABI function descriptor attached to an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiItem {
    pub inputs: Vec<AbiParam>,
    pub name: String,
    pub outputs: Vec<AbiParam>,
    pub state_mutability: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiParam {
    pub internal_type: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}
