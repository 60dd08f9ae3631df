//! High-level build operations

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use super::{
    api::JenkinsApi,
    config::ClientConfig,
    error::{ClientError, Result, Stage},
    poller::{Poller, Progress},
};
use crate::{
    domain::{BuildReport, BuildState, BuildStatus},
    job_path::{api_json_url, BuildUrl, JobPath, QueueItemUrl},
};

/// Client for triggering builds and following them to completion
///
/// Cloning is cheap; clones share the transport and configuration.
#[derive(Debug, Clone)]
pub struct JenkinsClient {
    api: Arc<JenkinsApi>,
}

impl JenkinsClient {
    /// Create a client using the default transport
    ///
    /// The transport verifies TLS certificates unless
    /// [`ClientConfig::accept_invalid_certs`] was set.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_api(Arc::new(JenkinsApi::new(config)?)))
    }

    /// Create a client using a caller-supplied transport
    pub fn with_http_client(config: ClientConfig, client: reqwest::Client) -> Self {
        Self::from_api(Arc::new(JenkinsApi::with_http_client(config, client)))
    }

    /// Create client from existing API client
    pub fn from_api(api: Arc<JenkinsApi>) -> Self {
        Self { api }
    }

    /// Trigger a job and wait until the server assigns it a build
    #[instrument(skip(self))]
    pub async fn build_job(&self, job_path: &str) -> Result<BuildUrl> {
        let item_url = self.trigger(job_path).await?;
        let build_url = self.resolve_build_url(&item_url).await?;

        info!(build_url = %build_url, "Build started");
        Ok(build_url)
    }

    /// Enqueue a job and return its queue item location
    #[instrument(skip(self))]
    pub async fn trigger(&self, job_path: &str) -> Result<QueueItemUrl> {
        let result = async {
            let job_path = JobPath::parse(job_path)?;
            self.api.trigger_build(&job_path).await
        }
        .await;

        result.map_err(|e| {
            error!(error = %e, "Failed to trigger build");
            e.at(Stage::Trigger)
        })
    }

    /// Resolve a queue item to the build it was assigned
    ///
    /// Polls within the configured queue bound; with a zero bound the queue
    /// item is read exactly once.
    #[instrument(skip(self), fields(url = %item_url))]
    pub async fn resolve_build_url(&self, item_url: &QueueItemUrl) -> Result<BuildUrl> {
        let poller = Poller::for_queue(&self.config().polling);

        let result = if poller.is_single_shot() {
            match self.check_queue_item(item_url).await {
                Ok((Progress::Ready(build_url), _)) => Ok(build_url),
                Ok((Progress::Pending, why)) => {
                    Err(ClientError::QueueItemPending { url: item_url.to_string(), why })
                },
                Err(e) => Err(e),
            }
        } else {
            let outcome = poller
                .poll(|| async {
                    self.check_queue_item(item_url)
                        .await
                        .map(|(progress, _)| progress)
                })
                .await;

            match outcome {
                Ok(Some(build_url)) => Ok(build_url),
                Ok(None) => Err(ClientError::QueueTimeout {
                    url: item_url.to_string(),
                    waited: poller.bound(),
                }),
                Err(e) => Err(e),
            }
        };

        result.map_err(|e| {
            error!(error = %e, "Failed to resolve queue item");
            e.at(Stage::Resolve)
        })
    }

    /// Current state and outcome of a build
    pub async fn build_status(&self, build_url: &BuildUrl) -> Result<(BuildState, BuildStatus)> {
        self.build_report(build_url)
            .await
            .map(|report| report.classification())
    }

    /// Current state and outcome of a build, including the raw result string
    #[instrument(skip(self), fields(url = %build_url))]
    pub async fn build_report(&self, build_url: &BuildUrl) -> Result<BuildReport> {
        self.fetch_report(build_url).await.map_err(|e| {
            error!(error = %e, "Failed to fetch build status");
            e.at(Stage::Status)
        })
    }

    /// Poll a build until it completes or the build bound elapses
    #[instrument(skip(self), fields(url = %build_url))]
    pub async fn wait_for_completion(&self, build_url: &BuildUrl) -> Result<BuildReport> {
        let poller = Poller::for_build(&self.config().polling);

        let outcome = poller
            .poll(|| async {
                let report = self.fetch_report(build_url).await?;
                if report.is_complete() {
                    Ok(Progress::Ready(report))
                } else {
                    Ok(Progress::Pending)
                }
            })
            .await;

        let result = match outcome {
            Ok(Some(report)) => {
                info!(result = ?report.result, "Build finished");
                Ok(report)
            },
            Ok(None) => Err(ClientError::BuildTimeout {
                url: build_url.to_string(),
                waited: poller.bound(),
            }),
            Err(e) => Err(e),
        };

        result.map_err(|e| {
            warn!(error = %e, "Stopped waiting for build");
            e.at(Stage::Status)
        })
    }

    /// Get current configuration
    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    /// Get reference to the underlying API client
    pub fn api(&self) -> &JenkinsApi {
        &self.api
    }

    /// Read a queue item once; a pending item also yields the server's reason
    async fn check_queue_item(
        &self,
        item_url: &QueueItemUrl,
    ) -> Result<(Progress<BuildUrl>, Option<String>)> {
        let item = self.api.get_queue_item(item_url).await?;

        if item.cancelled {
            return Err(ClientError::QueueItemCancelled { url: item_url.to_string() });
        }

        match item.executable {
            Some(executable) => Ok((Progress::Ready(BuildUrl::new(executable.url)), None)),
            None => {
                debug!(why = ?item.why, "Queue item not yet assigned");
                Ok((Progress::Pending, item.why))
            },
        }
    }

    async fn fetch_report(&self, build_url: &BuildUrl) -> Result<BuildReport> {
        let build = self.api.get_build(build_url).await?;
        let building = build.building.ok_or_else(|| {
            ClientError::missing_field(api_json_url(build_url.as_str()), "building")
        })?;

        let report = BuildReport::classify(building, build, self.config().status_mapping);
        debug!(
            state = ?report.state,
            status = ?report.status,
            result = ?report.result,
            "Build state"
        );
        Ok(report)
    }
}
