//! Configuration management for the Jenkins client

use std::{path::PathBuf, time::Duration};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use super::error::{ClientError, Result};
use crate::config::JenkinsConfig;

/// Main configuration for the Jenkins client
#[derive(Clone)]
pub struct ClientConfig {
    /// Jenkins instance base URL
    pub base_url: CompactString,
    /// User the API token belongs to
    pub username: CompactString,
    /// API token
    pub token: CompactString,
    /// How finished builds are classified
    pub status_mapping: StatusMapping,
    /// Polling configuration
    pub polling: PollingConfig,
    /// Request configuration
    pub request: RequestConfig,
    /// Debug configuration
    pub debug: DebugConfig,
}

/// How a finished build's `result` field maps onto [`crate::BuildStatus`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusMapping {
    /// `SUCCESS` is a success, `FAILURE` a failure, anything else unknown
    #[default]
    FromResult,
    /// Every finished build is a success, regardless of `result`
    AssumeSuccess,
}

/// Polling bounds for queue resolution and build completion
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Delay between queue item lookups
    pub queue_interval: Duration,
    /// Upper bound for queue resolution; zero means a single lookup
    pub queue_timeout: Duration,
    /// Delay between build status lookups
    pub build_interval: Duration,
    /// Upper bound for waiting on a build to complete
    pub build_timeout: Duration,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
}

/// Debug and logging configuration
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Enable debug logging of HTTP responses
    pub log_responses: bool,
    /// Directory for storing debug logs
    pub log_directory: Option<PathBuf>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            queue_interval: Duration::from_secs(1),
            queue_timeout: Duration::from_secs(60),
            build_interval: Duration::from_secs(5),
            build_timeout: Duration::from_secs(60 * 60),
        }
    }
}

impl PollingConfig {
    /// Look the queue item up exactly once
    pub fn single_shot() -> Self {
        Self { queue_timeout: Duration::ZERO, ..Self::default() }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_responses: false,
            log_directory: Some(PathBuf::from("jenkins-client-logs")),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .field("status_mapping", &self.status_mapping)
            .field("polling", &self.polling)
            .field("request", &self.request)
            .field("debug", &self.debug)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new client configuration
    ///
    /// Nothing is validated here; see [`ClientConfig::validate`].
    pub fn new(
        base_url: impl Into<CompactString>,
        username: impl Into<CompactString>,
        token: impl Into<CompactString>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            token: token.into(),
            status_mapping: StatusMapping::default(),
            polling: PollingConfig::default(),
            request: RequestConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::config_validation("base_url", "cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::config_validation(
                "base_url",
                "must start with http:// or https://",
            ));
        }

        if self.username.is_empty() {
            return Err(ClientError::config_validation("username", "cannot be empty"));
        }

        if self.token.is_empty() {
            return Err(ClientError::config_validation("token", "cannot be empty"));
        }

        if self.request.timeout.is_zero() {
            return Err(ClientError::config("Timeout must be greater than zero"));
        }

        if self.polling.queue_interval.is_zero() || self.polling.build_interval.is_zero() {
            return Err(ClientError::config("Polling intervals must be greater than zero"));
        }

        Ok(())
    }

    /// Base URL without trailing slashes
    pub(crate) fn server_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl From<JenkinsConfig> for ClientConfig {
    fn from(config: JenkinsConfig) -> Self {
        let mut polling = PollingConfig::default();
        if let Some(secs) = config.queue_timeout_secs {
            polling.queue_timeout = Duration::from_secs(secs);
        }

        Self::new(config.url, config.username, config.token)
            .with_status_mapping(config.status_mapping)
            .with_polling(polling)
            .accept_invalid_certs(config.accept_invalid_certs)
    }
}

impl ClientConfig {
    /// Set status mapping
    pub fn with_status_mapping(mut self, mapping: StatusMapping) -> Self {
        self.status_mapping = mapping;
        self
    }

    /// Set polling configuration
    pub fn with_polling(mut self, polling: PollingConfig) -> Self {
        self.polling = polling;
        self
    }

    /// Set request configuration
    pub fn with_request(mut self, request: RequestConfig) -> Self {
        self.request = request;
        self
    }

    /// Set debug configuration
    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = debug;
        self
    }

    /// Enable debug logging
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug.log_responses = enabled;
        self
    }

    /// Disable TLS certificate verification on the default transport
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.request.accept_invalid_certs = accept;
        self
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<CompactString>,
    username: Option<CompactString>,
    token: Option<CompactString>,
    status_mapping: Option<StatusMapping>,
    polling: Option<PollingConfig>,
    request: Option<RequestConfig>,
    debug: Option<DebugConfig>,
}

impl ClientConfigBuilder {
    /// Set base URL
    pub fn base_url(mut self, url: impl Into<CompactString>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set user name
    pub fn username(mut self, username: impl Into<CompactString>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set API token
    pub fn token(mut self, token: impl Into<CompactString>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set status mapping
    pub fn status_mapping(mut self, mapping: StatusMapping) -> Self {
        self.status_mapping = Some(mapping);
        self
    }

    /// Set polling configuration
    pub fn polling(mut self, polling: PollingConfig) -> Self {
        self.polling = Some(polling);
        self
    }

    /// Set request configuration
    pub fn request(mut self, request: RequestConfig) -> Self {
        self.request = Some(request);
        self
    }

    /// Set debug configuration
    pub fn debug(mut self, debug: DebugConfig) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Enable debug logging
    pub fn debug_logging(mut self, enabled: bool) -> Self {
        let mut debug = self.debug.unwrap_or_default();
        debug.log_responses = enabled;
        self.debug = Some(debug);
        self
    }

    /// Set queue polling interval and bound
    pub fn queue_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        let mut polling = self.polling.unwrap_or_default();
        polling.queue_interval = interval;
        polling.queue_timeout = timeout;
        self.polling = Some(polling);
        self
    }

    /// Set build polling interval and bound
    pub fn build_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        let mut polling = self.polling.unwrap_or_default();
        polling.build_interval = interval;
        polling.build_timeout = timeout;
        self.polling = Some(polling);
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let mut request = self.request.unwrap_or_default();
        request.timeout = timeout;
        self.request = Some(request);
        self
    }

    /// Disable TLS certificate verification
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        let mut request = self.request.unwrap_or_default();
        request.accept_invalid_certs = accept;
        self.request = Some(request);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ClientConfig> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::config("Base URL is required"))?;
        let username = self
            .username
            .ok_or_else(|| ClientError::config("Username is required"))?;
        let token = self
            .token
            .ok_or_else(|| ClientError::config("Token is required"))?;

        let config = ClientConfig {
            base_url,
            username,
            token,
            status_mapping: self.status_mapping.unwrap_or_default(),
            polling: self.polling.unwrap_or_default(),
            request: self.request.unwrap_or_default(),
            debug: self.debug.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
