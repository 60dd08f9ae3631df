//! Test utilities and common test fixtures for client modules

use std::time::Duration;

use serde_json::json;

use crate::client::config::{ClientConfig, PollingConfig};


pub const TEST_USER: &str = "alice";
pub const TEST_TOKEN: &str = "s3cret";

/// Queue item JSON once a build has been assigned
pub fn queue_item_json(build_url: &str) -> serde_json::Value {
    json!({
        "_class": "hudson.model.Queue$LeftItem",
        "blocked": false,
        "buildable": false,
        "cancelled": false,
        "executable": {
            "_class": "org.jenkinsci.plugins.workflow.job.WorkflowRun",
            "number": 5,
            "url": build_url
        },
        "id": 1,
        "why": null
    })
}

/// Queue item JSON while the item is still waiting
pub fn pending_queue_item_json(why: &str) -> serde_json::Value {
    json!({
        "_class": "hudson.model.Queue$WaitingItem",
        "blocked": false,
        "buildable": false,
        "id": 1,
        "why": why
    })
}

/// Queue item JSON after the item was cancelled
pub fn cancelled_queue_item_json() -> serde_json::Value {
    json!({
        "_class": "hudson.model.Queue$LeftItem",
        "cancelled": true,
        "executable": null,
        "id": 1
    })
}

/// Build JSON as returned by `{build}/api/json`
pub fn build_json(building: bool, result: Option<&str>) -> serde_json::Value {
    json!({
        "_class": "org.jenkinsci.plugins.workflow.job.WorkflowRun",
        "building": building,
        "duration": if building { 0 } else { 42_000 },
        "number": 5,
        "result": result,
        "timestamp": 1_700_000_000_000_i64,
        "url": "http://x/job/a/5/"
    })
}

/// Polling bounds small enough for tests
pub fn test_polling_config() -> PollingConfig {
    PollingConfig {
        queue_interval: Duration::from_millis(10),
        queue_timeout: Duration::from_secs(2),
        build_interval: Duration::from_millis(10),
        build_timeout: Duration::from_secs(2),
    }
}

/// Mock HTTP server for testing
pub struct MockServer {
    pub server: wiremock::MockServer,
}

impl MockServer {
    /// Start a new mock server
    pub async fn start() -> Self {
        let server = wiremock::MockServer::start().await;
        Self { server }
    }

    /// Get the base URL of the mock server
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Absolute URL on this server
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.server.uri(), path)
    }

    /// Create a test config pointing to this mock server
    pub fn test_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url(), TEST_USER, TEST_TOKEN)
            .with_polling(test_polling_config())
    }
}

#[cfg(test)]
#[allow(clippy::module_inception)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_shapes() {
        let item = queue_item_json("http://x/job/a/5/");
        assert_eq!(item["executable"]["url"], "http://x/job/a/5/");

        let pending = pending_queue_item_json("In the quiet period");
        assert!(pending.get("executable").is_none());

        let build = build_json(false, Some("FAILURE"));
        assert_eq!(build["building"], false);
        assert_eq!(build["result"], "FAILURE");

        let running = build_json(true, None);
        assert!(running["result"].is_null());
    }
}
