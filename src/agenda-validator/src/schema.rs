//! Structural validation of an agenda metadata document.
//!
//! Purely syntactic: no network access and no cross-field checks beyond shape and format.
//! The document is checked against an embedded draft 2020-12 JSON Schema and every violation
//! is collected; validation never stops at the first problem. Unknown fields are ignored.

use core::fmt;
use std::sync::LazyLock;

use jsonschema::{error::ValidationErrorKind, Draft, Validator};
use serde_json::{json, Value};

use crate::{
    patterns::{
        ADDRESS_PATTERN, FUNCTION_SIGNATURE_PATTERN, HEX_STRING_PATTERN, SIGNATURE_PATTERN,
        TRANSACTION_HASH_PATTERN,
    },
    utils::display::display_value,
};

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 50_000;
pub const MAX_ACTION_TITLE_CHARS: usize = 100;

/// One field-level schema violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaIssue {
    /// JSON path of the offending field, eg `actions[0].contractAddress`.
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub issues: Vec<SchemaIssue>,
}

impl SchemaReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_result(self) -> Result<(), Vec<SchemaIssue>> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(self.issues)
        }
    }
}

/// The canonical (timestamped) agenda metadata schema.
pub fn agenda_metadata_schema() -> Value {
    let abi_param = json!({
        "type": "object",
        "required": ["internalType", "name", "type"],
        "properties": {
            "internalType": { "type": "string" },
            "name": { "type": "string" },
            "type": { "type": "string" }
        }
    });

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "Agenda metadata",
        "type": "object",
        "required": [
            "id", "title", "description", "network", "transaction", "creator", "createdAt",
            "actions"
        ],
        "properties": {
            "id": { "type": "integer", "minimum": 1 },
            "title": { "type": "string", "minLength": 1, "maxLength": MAX_TITLE_CHARS },
            "description": {
                "type": "string",
                "minLength": 1,
                "maxLength": MAX_DESCRIPTION_CHARS
            },
            "network": { "type": "string", "enum": ["mainnet", "sepolia"] },
            "transaction": { "type": "string", "pattern": TRANSACTION_HASH_PATTERN },
            "creator": {
                "type": "object",
                "required": ["address", "signature"],
                "properties": {
                    "address": { "type": "string", "pattern": ADDRESS_PATTERN },
                    "signature": { "type": "string", "pattern": SIGNATURE_PATTERN }
                }
            },
            "createdAt": { "type": "string", "format": "date-time" },
            "updatedAt": { "type": "string", "format": "date-time" },
            "snapshotUrl": { "type": "string", "format": "uri" },
            "discourseUrl": { "type": "string", "format": "uri" },
            "actions": {
                "type": "array",
                "minItems": 1,
                "items": { "$ref": "#/$defs/action" }
            }
        },
        "$defs": {
            "action": {
                "type": "object",
                "required": ["title", "contractAddress", "method", "calldata", "abi"],
                "properties": {
                    "title": {
                        "type": "string",
                        "minLength": 1,
                        "maxLength": MAX_ACTION_TITLE_CHARS
                    },
                    "contractAddress": { "type": "string", "pattern": ADDRESS_PATTERN },
                    "method": { "type": "string", "pattern": FUNCTION_SIGNATURE_PATTERN },
                    "calldata": { "type": "string", "pattern": HEX_STRING_PATTERN },
                    "abi": { "type": "array", "items": { "$ref": "#/$defs/abiItem" } },
                    "sendEth": { "type": "boolean" },
                    "id": { "type": "string", "minLength": 1 },
                    "type": { "type": "string", "minLength": 1 }
                }
            },
            "abiItem": {
                "type": "object",
                "required": ["inputs", "name", "outputs", "stateMutability", "type"],
                "properties": {
                    "inputs": { "type": "array", "items": abi_param.clone() },
                    "outputs": { "type": "array", "items": abi_param },
                    "name": { "type": "string" },
                    "stateMutability": { "type": "string" },
                    "type": { "type": "string" }
                }
            }
        }
    })
}

static VALIDATOR: LazyLock<Validator> = LazyLock::new(|| {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .should_validate_formats(true)
        .build(&agenda_metadata_schema())
        .expect("invalid built-in agenda schema")
});

/// Validate the full document structure.
pub fn validate_schema(document: &Value) -> SchemaReport {
    let issues = VALIDATOR
        .iter_errors(document)
        .map(|error| {
            let path = dotted_path(&error.instance_path.to_string());
            match &error.kind {
                ValidationErrorKind::Required { property, .. } => {
                    let field = property
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| property.to_string());
                    SchemaIssue {
                        path: join(&path, &field),
                        message: "Required".to_string(),
                    }
                }
                _ => SchemaIssue {
                    path,
                    message: short_message(&error.to_string(), &error.instance.to_string()),
                },
            }
        })
        .collect();
    SchemaReport { issues }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// `/actions/0/contractAddress` -> `actions[0].contractAddress`.
fn dotted_path(pointer: &str) -> String {
    let mut out = String::new();
    for token in pointer.split('/').skip(1) {
        let token = token.replace("~1", "/").replace("~0", "~");
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            out.push('[');
            out.push_str(&token);
            out.push(']');
        } else {
            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(&token);
        }
    }
    out
}

/// Error text with the offending value shortened; long descriptions would otherwise be echoed
/// back in full.
fn short_message(message: &str, instance: &str) -> String {
    match message.strip_prefix(instance) {
        Some(rest) => format!("{} {}", display_value(instance), rest.trim_start()),
        None => display_value(message),
    }
}
