//! Runs a selection of [`ValidationStep`]s over metadata files and collects per-file reports.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use agenda_metadata_types::Network;
use futures::future::join_all;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    chain::{ChainClient, EthersChainClient},
    config::{RetryPolicy, ValidatorConfig, SIGNATURE_VALID_DURATION},
    cross_check::CrossValidator,
    errors::{ChainError, ValidationError},
    registry::{GithubRawRegistry, MetadataRegistry},
    steps::{StepContext, SubmittedDocument, ValidationStep},
};

/// The step that stopped a file, or `None` when the file could not be loaded at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepFailure {
    pub step: Option<ValidationStep>,
    pub error: ValidationError,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileReport {
    pub path: String,
    pub passed: Vec<ValidationStep>,
    pub failure: Option<StepFailure>,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        self.failure.is_none()
    }

    fn rejected(path: String, error: ValidationError) -> Self {
        Self {
            path,
            passed: Vec::new(),
            failure: Some(StepFailure { step: None, error }),
        }
    }
}

pub struct Pipeline<C = EthersChainClient, R = GithubRawRegistry> {
    validators: HashMap<Network, CrossValidator<C>>,
    registry: R,
    signature_window: Duration,
    clock: fn() -> OffsetDateTime,
}

impl Pipeline<EthersChainClient, GithubRawRegistry> {
    /// One JSON-RPC client per network plus the raw-content registry, as configured.
    pub fn from_config(config: &ValidatorConfig) -> Result<Self, ChainError> {
        let mut pipeline = Self::new(GithubRawRegistry::new(&config.metadata_repository))
            .with_signature_window(config.signature_window);
        for network in Network::ALL {
            let client = EthersChainClient::new(config.rpc_url(network))?;
            pipeline = pipeline.with_client(network, client, config.retry);
        }
        Ok(pipeline)
    }
}

impl<C: ChainClient, R: MetadataRegistry> Pipeline<C, R> {
    pub fn new(registry: R) -> Self {
        Self {
            validators: HashMap::new(),
            registry,
            signature_window: SIGNATURE_VALID_DURATION,
            clock: OffsetDateTime::now_utc,
        }
    }

    pub fn with_client(mut self, network: Network, client: C, retry: RetryPolicy) -> Self {
        self.validators
            .insert(network, CrossValidator::new(client).with_retry(retry));
        self
    }

    pub fn with_signature_window(mut self, window: Duration) -> Self {
        self.signature_window = window;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn validator(&self, network: Network) -> Option<&CrossValidator<C>> {
        self.validators.get(&network)
    }

    pub async fn validate_file(
        &self,
        path: &Path,
        pr_title: Option<&str>,
        steps: &[ValidationStep],
    ) -> FileReport {
        let path_str = path.display().to_string();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path_str, error = %e, "could not read metadata file");
                return FileReport::rejected(
                    path_str,
                    ValidationError::Unreadable(format!("failed to read file: {e}")),
                );
            }
        };
        let raw: Value = match serde_json::from_str(&contents) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path_str, error = %e, "metadata file is not valid JSON");
                return FileReport::rejected(
                    path_str,
                    ValidationError::Unreadable(format!("invalid JSON: {e}")),
                );
            }
        };
        self.validate_document(&path_str, raw, pr_title, steps).await
    }

    /// Runs `steps` in the given order, stopping at the first failure.
    pub async fn validate_document(
        &self,
        path: &str,
        raw: Value,
        pr_title: Option<&str>,
        steps: &[ValidationStep],
    ) -> FileReport {
        let doc = SubmittedDocument::new(path, raw);
        let ctx = StepContext {
            pr_title,
            registry: &self.registry,
            validators: &self.validators,
            now: (self.clock)(),
            signature_window: self.signature_window,
        };

        let mut passed = Vec::with_capacity(steps.len());
        for &step in steps {
            match step.run(&doc, &ctx).await {
                Ok(()) => {
                    info!(%step, path, "step passed");
                    passed.push(step);
                }
                Err(error) => {
                    warn!(%step, path, %error, "step failed");
                    return FileReport {
                        path: path.to_string(),
                        passed,
                        failure: Some(StepFailure {
                            step: Some(step),
                            error,
                        }),
                    };
                }
            }
        }
        FileReport {
            path: path.to_string(),
            passed,
            failure: None,
        }
    }

    pub async fn validate_files(
        &self,
        paths: &[PathBuf],
        pr_title: Option<&str>,
        steps: &[ValidationStep],
    ) -> Vec<FileReport> {
        join_all(
            paths
                .iter()
                .map(|path| self.validate_file(path, pr_title, steps)),
        )
        .await
    }
}
