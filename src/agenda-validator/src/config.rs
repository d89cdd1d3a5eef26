//! Runtime configuration: RPC endpoints, remote repository, retry and freshness windows.

use std::time::Duration;

use agenda_metadata_types::Network;

/// Signatures (and the timestamp they cover) must be created within this window of "now".
pub const SIGNATURE_VALID_DURATION: Duration = Duration::from_secs(60 * 60);

pub const DEFAULT_MAINNET_RPC_URL: &str = "https://ethereum.drpc.org";
pub const DEFAULT_SEPOLIA_RPC_URL: &str = "https://sepolia.drpc.org";

/// `org/repo` holding the merged metadata on its `main` branch.
pub const DEFAULT_METADATA_REPOSITORY: &str = "tokamak-network/dao-agenda-metadata-repository";

pub const MAINNET_RPC_ENV: &str = "MAINNET_RPC_URL";
pub const SEPOLIA_RPC_ENV: &str = "SEPOLIA_RPC_URL";
pub const METADATA_REPOSITORY_ENV: &str = "METADATA_REPOSITORY";

/// Bounded linear backoff for transaction/receipt lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Single attempt, no sleeping.
    pub const NONE: RetryPolicy = RetryPolicy {
        max_attempts: 1,
        base_delay: Duration::ZERO,
    };

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorConfig {
    pub mainnet_rpc_url: String,
    pub sepolia_rpc_url: String,
    pub metadata_repository: String,
    pub retry: RetryPolicy,
    pub signature_window: Duration,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            mainnet_rpc_url: DEFAULT_MAINNET_RPC_URL.to_string(),
            sepolia_rpc_url: DEFAULT_SEPOLIA_RPC_URL.to_string(),
            metadata_repository: DEFAULT_METADATA_REPOSITORY.to_string(),
            retry: RetryPolicy::default(),
            signature_window: SIGNATURE_VALID_DURATION,
        }
    }
}

impl ValidatorConfig {
    /// Defaults overridden by `MAINNET_RPC_URL`, `SEPOLIA_RPC_URL` and `METADATA_REPOSITORY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            mainnet_rpc_url: value(MAINNET_RPC_ENV).unwrap_or(defaults.mainnet_rpc_url),
            sepolia_rpc_url: value(SEPOLIA_RPC_ENV).unwrap_or(defaults.sepolia_rpc_url),
            metadata_repository: value(METADATA_REPOSITORY_ENV)
                .unwrap_or(defaults.metadata_repository),
            ..defaults
        }
    }

    pub fn rpc_url(&self, network: Network) -> &str {
        match network {
            Network::Mainnet => &self.mainnet_rpc_url,
            Network::Sepolia => &self.sepolia_rpc_url,
        }
    }
}
