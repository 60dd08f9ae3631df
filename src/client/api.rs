//! Core HTTP client for the Jenkins remote access API

use chrono::Local;
use compact_str::{format_compact, CompactString};
use reqwest::{header::LOCATION, Client, Method, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::{
    config::ClientConfig,
    error::{ClientError, Result},
};
use crate::{
    domain::{BuildDto, QueueItemDto},
    job_path::{api_json_url, BuildUrl, JobPath, QueueItemUrl},
};

const ERROR_PREVIEW_LEN: usize = 300;

/// Pure HTTP client for the Jenkins API
#[derive(Debug, Clone)]
pub struct JenkinsApi {
    client: Client,
    config: ClientConfig,
}

impl JenkinsApi {
    /// Create a new Jenkins API client with the default transport
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.request.accept_invalid_certs {
            warn!(
                base_url = %config.base_url,
                "TLS certificate verification is disabled for this client"
            );
        }

        let client = Client::builder()
            .timeout(config.request.timeout)
            .danger_accept_invalid_certs(config.request.accept_invalid_certs)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self { client, config })
    }

    /// Create a Jenkins API client on top of a caller-supplied transport
    pub fn with_http_client(config: ClientConfig, client: Client) -> Self {
        Self { client, config }
    }

    /// POST to the job's build endpoint and return the queue item location
    #[instrument(skip(self), fields(job_path = %job_path))]
    pub async fn trigger_build(&self, job_path: &JobPath) -> Result<QueueItemUrl> {
        let url = self.build_trigger_url(job_path);
        let response = self.request(Method::POST, &url).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return self.handle_error_response(status.as_u16(), &url, &body);
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        // drain so the connection goes back to the pool; the build is already queued
        let final_url = response.url().clone();
        if let Err(e) = response.bytes().await {
            warn!(error = %e, "Failed to read trigger response body");
        }

        let location = location.ok_or_else(|| ClientError::MissingLocation { url: url.clone() })?;
        let item_url = final_url
            .join(&location)
            .map_err(|_| ClientError::invalid_url(location.clone()))?;

        debug!(queue_item = %item_url, "Build queued");
        Ok(QueueItemUrl::new(item_url.as_str()))
    }

    /// Get the queue item behind a trigger's `Location`
    #[instrument(skip(self), fields(url = %item_url))]
    pub async fn get_queue_item(&self, item_url: &QueueItemUrl) -> Result<QueueItemDto> {
        self.get_json(&api_json_url(item_url.as_str())).await
    }

    /// Get the raw state of a build
    #[instrument(skip(self), fields(url = %build_url))]
    pub async fn get_build(&self, build_url: &BuildUrl) -> Result<BuildDto> {
        self.get_json(&api_json_url(build_url.as_str())).await
    }

    /// Get current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send an authenticated request with an empty body
    pub(crate) async fn request(&self, method: Method, url: &str) -> Result<Response> {
        let response = self
            .client
            .request(method, url)
            .basic_auth(self.config.username.as_str(), Some(self.config.token.as_str()))
            .send()
            .await?;

        Ok(response)
    }

    // Private helper methods

    /// Perform authenticated GET request and deserialize JSON response
    async fn get_json<T>(&self, url: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.request(Method::GET, url).await?;
        self.handle_response(url, response).await
    }

    /// Handle HTTP response and deserialize JSON
    async fn handle_response<T>(&self, url: &str, response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url_path = response.url().path().to_string();
        let status = response.status();
        let body = response.text().await?;

        if self.config.debug.log_responses {
            self.log_response_to_file(&url_path, &body);
        }

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| {
                ClientError::json_parse(url, format!("Failed to parse response from {url_path}"), e)
            })
        } else {
            self.handle_error_response(status.as_u16(), url, &body)
        }
    }

    /// Handle error responses from Jenkins
    fn handle_error_response<T>(&self, status: u16, url: &str, body: &str) -> Result<T> {
        match status {
            401 | 403 => Err(ClientError::Authentication),
            404 => Err(ClientError::not_found(url)),
            _ => Err(ClientError::jenkins_api(status, error_preview(body))),
        }
    }

    /// Build URL for the trigger endpoint
    fn build_trigger_url(&self, job_path: &JobPath) -> String {
        format!("{}/{}/build", self.config.server_url(), job_path.api_path())
    }

    /// Log HTTP response to file for debugging
    fn log_response_to_file(&self, path: &str, body: &str) {
        if let Some(log_dir) = &self.config.debug.log_directory {
            if !log_dir.exists() {
                if let Err(e) = std::fs::create_dir_all(log_dir) {
                    warn!("Failed to create log directory: {}", e);
                    return;
                }
            }

            let filename = format!(
                "{}_{}.json",
                Local::now().format("%Y-%m-%d_%H-%M-%S"),
                path.replace('/', "_")
            );

            let log_path = log_dir.join(filename);

            if let Err(e) = std::fs::write(&log_path, body) {
                warn!("Failed to write response log to {:?}: {}", log_path, e);
            } else {
                debug!("Response logged to {:?}", log_path);
            }
        }
    }
}

/// Jenkins answers most errors with an HTML page; keep only something readable
fn error_preview(body: &str) -> CompactString {
    let body = body.trim();
    if body.is_empty() {
        return "empty response body".into();
    }

    let head = body.chars().take(64).collect::<String>().to_ascii_lowercase();
    if head.starts_with("<!doctype html") || head.contains("<html") {
        return "HTML error page, see the Jenkins log for details".into();
    }

    if body.chars().count() > ERROR_PREVIEW_LEN {
        let preview: String = body.chars().take(ERROR_PREVIEW_LEN).collect();
        format_compact!("{preview}...")
    } else {
        body.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig::new("https://ci.example.com", "alice", "s3cret")
    }

    #[test]
    fn test_api_creation() {
        let api = JenkinsApi::new(test_config());
        assert!(api.is_ok());
    }

    #[test]
    fn test_api_creation_skips_validation() {
        let api = JenkinsApi::new(ClientConfig::new("", "", ""));
        assert!(api.is_ok());
    }

    #[test]
    fn test_build_trigger_url() {
        let api = JenkinsApi::new(test_config()).unwrap();
        let path = JobPath::parse("folder/app").unwrap();

        assert_eq!(
            api.build_trigger_url(&path),
            "https://ci.example.com/job/folder/job/app/build"
        );
    }

    #[test]
    fn test_build_trigger_url_with_trailing_slash() {
        let config = ClientConfig::new("https://ci.example.com/", "alice", "s3cret");
        let api = JenkinsApi::new(config).unwrap();
        let path = JobPath::parse("app").unwrap();

        assert_eq!(api.build_trigger_url(&path), "https://ci.example.com/job/app/build");
    }

    #[test]
    fn test_error_handling() {
        let api = JenkinsApi::new(test_config()).unwrap();

        let error = api.handle_error_response::<()>(401, "u", "");
        assert!(matches!(error, Err(ClientError::Authentication)));

        let error = api.handle_error_response::<()>(403, "u", "");
        assert!(matches!(error, Err(ClientError::Authentication)));

        let error = api.handle_error_response::<()>(404, "u", "");
        assert!(matches!(error, Err(ClientError::NotFound { .. })));

        let error = api.handle_error_response::<()>(500, "u", "boom");
        assert!(matches!(error, Err(ClientError::JenkinsApi { status: 500, .. })));
    }

    #[test]
    fn test_error_preview() {
        assert_eq!(error_preview(""), "empty response body");
        assert!(error_preview("<!DOCTYPE html><html></html>").starts_with("HTML error page"));
        assert!(error_preview("<HTML><body>Oops</body></HTML>").starts_with("HTML error page"));

        let long = "x".repeat(ERROR_PREVIEW_LEN + 10);
        let preview = error_preview(&long);
        assert_eq!(preview.len(), ERROR_PREVIEW_LEN + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_error_preview_lowercase_doctype() {
        let body = format!("<!doctype html><html>{}</html>", "x".repeat(ERROR_PREVIEW_LEN));
        assert_eq!(error_preview(&body), "HTML error page, see the Jenkins log for details");
    }
}
