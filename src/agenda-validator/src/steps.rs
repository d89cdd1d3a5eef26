//! The individual validation steps and their uniform `run` entry point.

use core::fmt;
use core::str::FromStr;
use std::{collections::HashMap, time::Duration};

use agenda_metadata_types::{AgendaMetadata, Network};
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;

use crate::{
    chain::ChainClient,
    cross_check::CrossValidator,
    decoder::AgendaDecoder,
    errors::{ChainError, CrossCheckError, ValidationError},
    patterns::{
        agenda_id_from_path, is_agenda_path, network_segment, parse_pr_title, repo_relative_path,
        PR_TITLE_CREATE_PREFIX, PR_TITLE_UPDATE_PREFIX,
    },
    registry::MetadataRegistry,
    schema::validate_schema,
    signature::{agenda_signature_message, recover_signer, verify_agenda_signature},
    timestamp::{validate_signature_timestamp_at, validate_update_order},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValidationStep {
    Schema,
    Format,
    PrTitle,
    Time,
    Signature,
    Transaction,
}

impl ValidationStep {
    /// Canonical execution order.
    pub const ALL: [ValidationStep; 6] = [
        ValidationStep::Schema,
        ValidationStep::Format,
        ValidationStep::PrTitle,
        ValidationStep::Time,
        ValidationStep::Signature,
        ValidationStep::Transaction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStep::Schema => "schema",
            ValidationStep::Format => "format",
            ValidationStep::PrTitle => "pr-title",
            ValidationStep::Time => "time",
            ValidationStep::Signature => "signature",
            ValidationStep::Transaction => "transaction",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ValidationStep::Schema => "JSON schema validation",
            ValidationStep::Format => "File format and path validation",
            ValidationStep::PrTitle => "PR title consistency validation",
            ValidationStep::Time => "Time validation (1-hour rule)",
            ValidationStep::Signature => "Creator signature validation",
            ValidationStep::Transaction => "On-chain transaction validation",
        }
    }
}

impl fmt::Display for ValidationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error(
    "unknown validation step `{0}` (available: schema, format, pr-title, time, signature, \
     transaction, all)"
)]
pub struct UnknownStep(pub String);

impl FromStr for ValidationStep {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValidationStep::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| UnknownStep(s.to_string()))
    }
}

/// Parse step names (`all` expands to every step). The result is deduplicated and in canonical
/// order regardless of input order; an empty selection means all steps.
pub fn parse_steps<I, S>(names: I) -> Result<Vec<ValidationStep>, UnknownStep>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut selected = Vec::new();
    let mut saw_any = false;
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        saw_any = true;
        if name == "all" {
            selected.extend(ValidationStep::ALL);
        } else {
            selected.push(name.parse()?);
        }
    }
    if !saw_any {
        return Ok(ValidationStep::ALL.to_vec());
    }
    selected.sort();
    selected.dedup();
    Ok(selected)
}

/// A submission as read from disk: raw JSON plus its typed view, if it has one.
#[derive(Clone, Debug)]
pub struct SubmittedDocument {
    pub path: String,
    pub raw: Value,
    parsed: Result<AgendaMetadata, String>,
}

impl SubmittedDocument {
    pub fn new(path: impl Into<String>, raw: Value) -> Self {
        let parsed = serde_json::from_value(raw.clone()).map_err(|e| e.to_string());
        Self {
            path: path.into(),
            raw,
            parsed,
        }
    }

    pub fn metadata(&self) -> Result<&AgendaMetadata, ValidationError> {
        self.parsed
            .as_ref()
            .map_err(|e| ValidationError::Unreadable(e.clone()))
    }
}

/// Collaborators and settings shared by every step of one run.
pub struct StepContext<'a, C, D, R> {
    pub pr_title: Option<&'a str>,
    pub registry: &'a R,
    pub validators: &'a HashMap<Network, CrossValidator<C, D>>,
    pub now: OffsetDateTime,
    pub signature_window: Duration,
}

impl ValidationStep {
    pub async fn run<C, D, R>(
        self,
        doc: &SubmittedDocument,
        ctx: &StepContext<'_, C, D, R>,
    ) -> Result<(), ValidationError>
    where
        C: ChainClient,
        D: AgendaDecoder,
        R: MetadataRegistry,
    {
        info!(step = %self, path = %doc.path, "running validation step");
        match self {
            ValidationStep::Schema => check_schema(doc),
            ValidationStep::Format => check_format(doc.metadata()?, &doc.path),
            ValidationStep::PrTitle => {
                let title = ctx.pr_title.ok_or_else(|| {
                    ValidationError::Consistency(
                        "PR title is required (use --pr-title or PR_TITLE)".into(),
                    )
                })?;
                check_pr_title(doc.metadata()?, &doc.path, title, ctx.registry).await
            }
            ValidationStep::Time => check_time(doc.metadata()?, ctx.now, ctx.signature_window),
            ValidationStep::Signature => check_signature(doc.metadata()?),
            ValidationStep::Transaction => {
                let metadata = doc.metadata()?;
                let validator = ctx.validators.get(&metadata.network).ok_or_else(|| {
                    CrossCheckError::Chain(ChainError::NoEndpoint(metadata.network.to_string()))
                })?;
                check_transaction(metadata, validator).await
            }
        }
    }
}

pub fn check_schema(doc: &SubmittedDocument) -> Result<(), ValidationError> {
    validate_schema(&doc.raw)
        .into_result()
        .map_err(ValidationError::Structural)
}

pub fn check_format(metadata: &AgendaMetadata, path: &str) -> Result<(), ValidationError> {
    let network = network_segment(path).ok_or_else(|| {
        ValidationError::Consistency(format!("Could not extract network from file path: {path}"))
    })?;
    let id = agenda_id_from_path(path).ok_or_else(|| {
        ValidationError::Consistency(format!(
            "Could not extract ID from filename (expected agenda-<id>.json): {path}"
        ))
    })?;

    let relative = repo_relative_path(path).unwrap_or(path);
    if !is_agenda_path(relative) {
        return Err(ValidationError::Consistency(format!(
            "File must be stored under data/agendas/<mainnet|sepolia>/, got {relative}"
        )));
    }
    if metadata.network.as_str() != network {
        return Err(ValidationError::Consistency(format!(
            "Network mismatch: metadata.network=\"{}\", path network=\"{network}\"",
            metadata.network
        )));
    }
    if metadata.id != id {
        return Err(ValidationError::Consistency(format!(
            "ID mismatch: metadata.id={}, filename ID={id}",
            metadata.id
        )));
    }
    Ok(())
}

pub async fn check_pr_title<R: MetadataRegistry>(
    metadata: &AgendaMetadata,
    path: &str,
    pr_title: &str,
    registry: &R,
) -> Result<(), ValidationError> {
    let info = parse_pr_title(pr_title).ok_or_else(|| {
        ValidationError::Consistency(format!(
            "PR title must be \"{PR_TITLE_CREATE_PREFIX} <network> - <id> - <title>\" or \"{PR_TITLE_UPDATE_PREFIX} <network> - <id> - <title>\", got \"{pr_title}\""
        ))
    })?;

    if info.network != metadata.network || info.id != metadata.id {
        let prefix = if info.is_update {
            PR_TITLE_UPDATE_PREFIX
        } else {
            PR_TITLE_CREATE_PREFIX
        };
        return Err(ValidationError::Consistency(format!(
            "PR title format error: expected \"{prefix} {} - {} - <title>\", got \"{pr_title}\"",
            metadata.network, metadata.id
        )));
    }
    if info.title != metadata.title.trim() {
        return Err(ValidationError::Consistency(format!(
            "PR title does not match metadata title: \"{}\" vs \"{}\"",
            info.title,
            metadata.title.trim()
        )));
    }
    if info.is_update != metadata.is_update() {
        return Err(ValidationError::Consistency(if info.is_update {
            "Update PR requires updatedAt in the metadata".to_string()
        } else {
            "Create PR must not set updatedAt in the metadata".to_string()
        }));
    }

    let repo_path = repo_relative_path(path).unwrap_or(path);
    let exists = registry.file_exists(repo_path).await;
    if info.is_update && !exists {
        return Err(ValidationError::Consistency(format!(
            "Update operation requires existing file on the main branch, but {repo_path} does not exist"
        )));
    }
    if !info.is_update && exists {
        return Err(ValidationError::Consistency(format!(
            "Create operation requires new file, but {repo_path} already exists on the main branch"
        )));
    }
    Ok(())
}

pub fn check_time(
    metadata: &AgendaMetadata,
    now: OffsetDateTime,
    window: Duration,
) -> Result<(), ValidationError> {
    validate_signature_timestamp_at(metadata.signed_timestamp(), now, window)?;
    if let Some(updated_at) = &metadata.updated_at {
        validate_update_order(&metadata.created_at, updated_at)?;
    }
    Ok(())
}

pub fn check_signature(metadata: &AgendaMetadata) -> Result<(), ValidationError> {
    if verify_agenda_signature(metadata) {
        return Ok(());
    }
    let recovered = recover_signer(&agenda_signature_message(metadata), &metadata.creator.signature)
        .map(|a| a.to_string())
        .unwrap_or_else(|e| format!("none ({e})"));
    Err(ValidationError::Cryptographic(format!(
        "Signature does not match expected address. Recovered: {recovered}, Expected: {}",
        metadata.creator.address
    )))
}

pub async fn check_transaction<C: ChainClient, D: AgendaDecoder>(
    metadata: &AgendaMetadata,
    validator: &CrossValidator<C, D>,
) -> Result<(), ValidationError> {
    let report = validator.cross_check(metadata).await?;
    if report.is_valid() {
        Ok(())
    } else {
        Err(ValidationError::Mismatch(report.mismatches(metadata).join("; ")))
    }
}
