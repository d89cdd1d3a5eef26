//! Validation pipeline for DAO agenda metadata submissions.
//!
//! A submission is a JSON document under `data/agendas/<network>/agenda-<id>.json` describing an
//! agenda that was created on-chain through `TON.approveAndCall`. The pipeline checks, in order:
//! - schema: structural shape of the document
//! - format: path/file name agree with `network` and `id`
//! - pr-title: the pull request title agrees with the document and with the remote repository
//! - time: the signed timestamp is fresh
//! - signature: the creator signed the canonical message
//! - transaction: the on-chain transaction, receipt and `AgendaCreated` event match the document

pub mod abi;
pub mod chain;
pub mod config;
pub mod cross_check;
pub mod decoder;
pub mod errors;
pub mod messages;
pub mod patterns;
pub mod pipeline;
pub mod registry;
pub mod schema;
pub mod signature;
pub mod steps;
pub mod timestamp;
pub mod utils;

pub use agenda_metadata_types::{AbiItem, AbiParam, Action, AgendaMetadata, Creator, Network};

pub use chain::{ChainClient, ChainLog, ChainReceipt, ChainTransaction, EthersChainClient};
pub use config::{RetryPolicy, ValidatorConfig};
pub use cross_check::{CalldataComparison, CrossCheckReport, CrossValidator};
pub use decoder::{AgendaDecoder, DecodedAgendaParams, EncodingVersion, SolAgendaDecoder};
pub use errors::{ChainError, CrossCheckError, DecodeError, TimestampError, ValidationError};
pub use pipeline::{FileReport, Pipeline, StepFailure};
pub use registry::{GithubRawRegistry, MetadataRegistry};
pub use schema::{validate_schema, SchemaIssue, SchemaReport};
pub use steps::ValidationStep;
