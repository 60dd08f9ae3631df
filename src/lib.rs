//! Trigger Jenkins builds and follow them to a result.
//!
//! ```no_run
//! use jenkins_build_client::{ClientConfig, JenkinsClient};
//!
//! # async fn run() -> jenkins_build_client::Result<()> {
//! let config = ClientConfig::new("https://ci.example.com", "alice", "api-token");
//! let client = JenkinsClient::new(config)?;
//!
//! let build_url = client.build_job("folder/app").await?;
//! let (state, status) = client.build_status(&build_url).await?;
//! println!("{build_url}: {state:?} {status:?}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod domain;
pub mod job_path;
pub mod logging;

pub use client::{
    BlockingClient, ClientConfig, ClientError, JenkinsClient, PollingConfig, Result, Stage,
    StatusMapping,
};
pub use domain::{BuildReport, BuildState, BuildStatus};
pub use job_path::{BuildUrl, JobPath, QueueItemUrl};
