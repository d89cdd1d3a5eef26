//! Existence checks against the merged metadata on the remote default branch.

use async_trait::async_trait;
use tracing::warn;

/// Answers whether a repository-relative path already exists on the default branch.
#[async_trait]
pub trait MetadataRegistry: Send + Sync {
    /// `true` only when the remote positively confirms the file exists.
    async fn file_exists(&self, repo_path: &str) -> bool;
}

/// HEAD request against `https://raw.githubusercontent.com/<org>/<repo>/main/<path>`.
#[derive(Clone, Debug)]
pub struct GithubRawRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl GithubRawRegistry {
    pub const RAW_CONTENT_HOST: &'static str = "https://raw.githubusercontent.com";

    /// `repository` is `org/repo`.
    pub fn new(repository: &str) -> Self {
        Self::with_base_url(format!(
            "{}/{}/main",
            Self::RAW_CONTENT_HOST,
            repository.trim_matches('/')
        ))
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn url_for(&self, repo_path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            repo_path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl MetadataRegistry for GithubRawRegistry {
    async fn file_exists(&self, repo_path: &str) -> bool {
        let url = self.url_for(repo_path);
        match self.client.head(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                warn!(%url, error = %err, "could not check file existence on remote repository");
                false
            }
        }
    }
}
