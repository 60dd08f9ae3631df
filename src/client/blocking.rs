//! Blocking wrapper around [`JenkinsClient`]
//!
//! Each call runs to completion on a runtime owned by the wrapper, so it
//! must not be used from within an async context.

use tokio::runtime::Runtime;

use super::{
    config::ClientConfig,
    error::{ClientError, Result},
    service::JenkinsClient,
};
use crate::{
    domain::{BuildReport, BuildState, BuildStatus},
    job_path::{BuildUrl, QueueItemUrl},
};

pub struct BlockingClient {
    client: JenkinsClient,
    rt: Runtime,
}

impl BlockingClient {
    /// Create a blocking client using the default transport
    pub fn new(config: ClientConfig) -> Result<Self> {
        let rt = Runtime::new()
            .map_err(|e| ClientError::config(format!("Failed to create runtime: {e}")))?;

        let client = JenkinsClient::new(config)?;

        Ok(Self { client, rt })
    }

    /// Wrap an existing async client
    pub fn from_client(client: JenkinsClient) -> Result<Self> {
        let rt = Runtime::new()
            .map_err(|e| ClientError::config(format!("Failed to create runtime: {e}")))?;

        Ok(Self { client, rt })
    }

    pub fn build_job(&self, job_path: &str) -> Result<BuildUrl> {
        self.rt.block_on(self.client.build_job(job_path))
    }

    pub fn trigger(&self, job_path: &str) -> Result<QueueItemUrl> {
        self.rt.block_on(self.client.trigger(job_path))
    }

    pub fn resolve_build_url(&self, item_url: &QueueItemUrl) -> Result<BuildUrl> {
        self.rt.block_on(self.client.resolve_build_url(item_url))
    }

    pub fn build_status(&self, build_url: &BuildUrl) -> Result<(BuildState, BuildStatus)> {
        self.rt.block_on(self.client.build_status(build_url))
    }

    pub fn build_report(&self, build_url: &BuildUrl) -> Result<BuildReport> {
        self.rt.block_on(self.client.build_report(build_url))
    }

    pub fn wait_for_completion(&self, build_url: &BuildUrl) -> Result<BuildReport> {
        self.rt.block_on(self.client.wait_for_completion(build_url))
    }

    /// The wrapped async client
    pub fn inner(&self) -> &JenkinsClient {
        &self.client
    }
}

impl std::fmt::Debug for BlockingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingClient")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::error::Stage;

    #[test]
    fn test_blocking_client_creation() {
        let config = ClientConfig::new("https://ci.example.com", "alice", "s3cret");
        let client = BlockingClient::new(config).unwrap();
        assert_eq!(client.inner().config().base_url, "https://ci.example.com");
    }

    #[test]
    fn test_blocking_invalid_job_path() {
        let config = ClientConfig::new("https://ci.example.com", "alice", "s3cret");
        let client = BlockingClient::new(config).unwrap();

        let err = client.trigger("").unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Trigger));
    }
}
