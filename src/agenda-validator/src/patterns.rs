//! Format validators for addresses, hashes, signatures, storage paths and PR titles.

use std::sync::LazyLock;

use agenda_metadata_types::Network;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid built-in pattern")
}

pub const ADDRESS_PATTERN: &str = r"^0x[a-fA-F0-9]{40}$";
pub const TRANSACTION_HASH_PATTERN: &str = r"^0x[a-fA-F0-9]{64}$";
pub const SIGNATURE_PATTERN: &str = r"^0x[a-fA-F0-9]{130}$";
pub const HEX_STRING_PATTERN: &str = r"^0x[a-fA-F0-9]+$";
pub const FUNCTION_SIGNATURE_PATTERN: &str = r"^[a-zA-Z0-9_]+\([a-zA-Z0-9_,\s]*\)$";

static ADDRESS: LazyLock<Regex> = LazyLock::new(|| compile(ADDRESS_PATTERN));
static TRANSACTION_HASH: LazyLock<Regex> = LazyLock::new(|| compile(TRANSACTION_HASH_PATTERN));
static SIGNATURE: LazyLock<Regex> = LazyLock::new(|| compile(SIGNATURE_PATTERN));
static HEX_STRING: LazyLock<Regex> = LazyLock::new(|| compile(HEX_STRING_PATTERN));
static FUNCTION_SIGNATURE: LazyLock<Regex> =
    LazyLock::new(|| compile(FUNCTION_SIGNATURE_PATTERN));
static AGENDA_FILE: LazyLock<Regex> = LazyLock::new(|| compile(r"^agenda-(\d+)\.json$"));
static AGENDA_PATH: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^data/agendas/(mainnet|sepolia)/"));
static PATH_NETWORK_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?:^|/)data/agendas/([^/]+)/"));
static PR_TITLE_CREATE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\[Agenda\]\s+(mainnet|sepolia)\s*-\s*(\d+)\s*-\s*(.+)$"));
static PR_TITLE_UPDATE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\[Agenda Update\]\s+(mainnet|sepolia)\s*-\s*(\d+)\s*-\s*(.+)$"));

pub const PR_TITLE_CREATE_PREFIX: &str = "[Agenda]";
pub const PR_TITLE_UPDATE_PREFIX: &str = "[Agenda Update]";

/// `0x` + 40 hex characters.
pub fn is_valid_address(value: &str) -> bool {
    ADDRESS.is_match(value)
}

/// `0x` + 64 hex characters.
pub fn is_valid_transaction_hash(value: &str) -> bool {
    TRANSACTION_HASH.is_match(value)
}

/// `0x` + 130 hex characters (r || s || v).
pub fn is_valid_signature(value: &str) -> bool {
    SIGNATURE.is_match(value)
}

pub fn is_hex_string(value: &str) -> bool {
    HEX_STRING.is_match(value)
}

pub fn is_function_signature(value: &str) -> bool {
    FUNCTION_SIGNATURE.is_match(value)
}

pub fn is_agenda_file_name(value: &str) -> bool {
    AGENDA_FILE.is_match(value)
}

/// Repository-relative storage path rooted at `data/agendas/<mainnet|sepolia>/`.
pub fn is_agenda_path(value: &str) -> bool {
    AGENDA_PATH.is_match(value)
}

pub fn normalize_address(address: &str) -> String {
    address.to_lowercase()
}

/// Network directory of a storage path; the segment is returned even if it is not a known
/// network so callers can report it.
pub fn network_segment(path: &str) -> Option<&str> {
    PATH_NETWORK_SEGMENT
        .captures(path)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Agenda id embedded in the file name (`agenda-<id>.json`).
pub fn agenda_id_from_path(path: &str) -> Option<u64> {
    let file_name = path.rsplit('/').next()?;
    AGENDA_FILE
        .captures(file_name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Strip any checkout prefix so the path starts at `data/agendas/`.
pub fn repo_relative_path(path: &str) -> Option<&str> {
    let m = PATH_NETWORK_SEGMENT.find(path)?;
    let start = if path[m.start()..].starts_with('/') {
        m.start() + 1
    } else {
        m.start()
    };
    Some(&path[start..])
}

/// Fields parsed out of an agenda pull request title.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrTitleInfo {
    pub network: Network,
    pub id: u64,
    pub title: String,
    pub is_update: bool,
}

/// Parse `[Agenda] <network> - <id> - <title>` or `[Agenda Update] <network> - <id> - <title>`.
pub fn parse_pr_title(pr_title: &str) -> Option<PrTitleInfo> {
    let (captures, is_update) = match PR_TITLE_CREATE.captures(pr_title) {
        Some(c) => (c, false),
        None => (PR_TITLE_UPDATE.captures(pr_title)?, true),
    };

    let network = captures.get(1)?.as_str().parse().ok()?;
    let id = captures.get(2)?.as_str().parse().ok()?;
    let title = captures.get(3)?.as_str().trim().to_string();

    Some(PrTitleInfo {
        network,
        id,
        title,
        is_update,
    })
}
