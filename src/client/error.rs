//! Error types for Jenkins client operations

use std::{fmt, time::Duration};

use compact_str::CompactString;
use thiserror::Error;

/// The step of the trigger → resolve → status chain an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// POST to the job's build endpoint
    Trigger,
    /// Queue item lookup for the assigned executable
    Resolve,
    /// Build state query
    Status,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Trigger => "trigger",
            Stage::Resolve => "resolve",
            Stage::Status => "status",
        };
        f.write_str(name)
    }
}

/// Structured error types for Jenkins client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error with endpoint context
    #[error("Failed to parse JSON response from {endpoint}: {message}")]
    JsonParse {
        endpoint: String,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Jenkins returned a non-success status
    #[error("Jenkins API error (HTTP {status}): {message}")]
    JenkinsApi { status: u16, message: CompactString },

    /// Credentials were rejected
    #[error("Authentication failed")]
    Authentication,

    /// Resource not found
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Trigger response carried no queue item location
    #[error("No Location header in trigger response from {url}")]
    MissingLocation { url: String },

    /// A required field was absent from a JSON response
    #[error("Response from {endpoint} is missing field `{field}`")]
    MissingField { endpoint: String, field: &'static str },

    /// Job path cannot be turned into a trigger URL
    #[error("Invalid job path {path:?}: {message}")]
    InvalidJobPath { path: String, message: String },

    /// Invalid URL format
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Queue item has no executable yet
    #[error("Queue item {url} has not been assigned a build yet{}", why_suffix(.why))]
    QueueItemPending { url: String, why: Option<String> },

    /// Queue item was cancelled before a build started
    #[error("Queue item {url} was cancelled")]
    QueueItemCancelled { url: String },

    /// Queue item did not resolve within the polling bound
    #[error("Queue item {url} not resolved after {waited:?}")]
    QueueTimeout { url: String, waited: Duration },

    /// Build did not complete within the polling bound
    #[error("Build {url} still running after {waited:?}")]
    BuildTimeout { url: String, waited: Duration },

    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration field validation failed
    #[error("Invalid {field}: {message}")]
    ConfigValidation { field: String, message: String },

    /// Configuration file could not be read or written
    #[error("Failure accessing configuration file: {0}")]
    ConfigFile(String),

    /// Any of the above, tagged with the stage that produced it
    #[error("{stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<ClientError>,
    },
}

fn why_suffix(why: &Option<String>) -> String {
    why.as_deref()
        .map(|why| format!(" ({why})"))
        .unwrap_or_default()
}

impl ClientError {
    /// Create a JSON parsing error with endpoint context
    pub fn json_parse(
        endpoint: impl Into<String>,
        message: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::JsonParse {
            endpoint: endpoint.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a Jenkins API error
    pub fn jenkins_api(status: u16, message: impl Into<CompactString>) -> Self {
        Self::JenkinsApi { status, message: message.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a configuration field validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation { field: field.into(), message: message.into() }
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Create an invalid job path error
    pub fn invalid_job_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidJobPath { path: path.into(), message: message.into() }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a missing field error
    pub fn missing_field(endpoint: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField { endpoint: endpoint.into(), field }
    }

    /// Tag this error with the stage it occurred in.
    ///
    /// An error that already carries a stage keeps its original one.
    pub fn at(self, stage: Stage) -> Self {
        match self {
            tagged @ ClientError::Stage { .. } => tagged,
            other => ClientError::Stage { stage, source: Box::new(other) },
        }
    }

    /// The stage this error was raised in, if it was tagged
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ClientError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The underlying error with any stage tag removed
    pub fn root(&self) -> &ClientError {
        match self {
            ClientError::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this error indicates a temporary network issue
    pub fn is_network_error(&self) -> bool {
        match self.root() {
            ClientError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ClientError::config("Invalid token");
        assert!(matches!(err, ClientError::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: Invalid token");
    }

    #[test]
    fn test_jenkins_api_error() {
        let err = ClientError::jenkins_api(500, "Internal Server Error");
        assert!(matches!(err, ClientError::JenkinsApi { status: 500, .. }));
        assert_eq!(err.to_string(), "Jenkins API error (HTTP 500): Internal Server Error");
    }

    #[test]
    fn test_stage_tagging() {
        let err = ClientError::not_found("job/app").at(Stage::Trigger);
        assert_eq!(err.stage(), Some(Stage::Trigger));
        assert!(matches!(err.root(), ClientError::NotFound { .. }));
        assert_eq!(err.to_string(), "trigger failed: Resource not found: job/app");
    }

    #[test]
    fn test_stage_is_not_overwritten() {
        let err = ClientError::Authentication
            .at(Stage::Resolve)
            .at(Stage::Status);
        assert_eq!(err.stage(), Some(Stage::Resolve));
    }

    #[test]
    fn test_untagged_error_has_no_stage() {
        assert_eq!(ClientError::Authentication.stage(), None);
    }

    #[test]
    fn test_pending_message_includes_reason() {
        let err = ClientError::QueueItemPending {
            url: "http://x/queue/item/1/".into(),
            why: Some("Waiting for next available executor".into()),
        };
        assert_eq!(
            err.to_string(),
            "Queue item http://x/queue/item/1/ has not been assigned a build yet \
             (Waiting for next available executor)"
        );

        let err = ClientError::QueueItemPending { url: "http://x/queue/item/1/".into(), why: None };
        assert!(err.to_string().ends_with("assigned a build yet"));
    }

    #[test]
    fn test_network_errors() {
        assert!(!ClientError::Authentication.is_network_error());
        assert!(!ClientError::config("test").is_network_error());
        assert!(!ClientError::config("test")
            .at(Stage::Trigger)
            .is_network_error());
    }
}
