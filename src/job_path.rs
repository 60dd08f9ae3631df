use std::{fmt, str::FromStr};

use compact_str::CompactString;
use itertools::Itertools;

use crate::client::error::ClientError;

/// A slash-separated job path such as `folder/job`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobPath {
    segments: Vec<CompactString>,
}

/// Queue item location returned by a trigger request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueueItemUrl {
    value: CompactString,
}

/// URL of a build assigned by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildUrl {
    value: CompactString,
}

impl JobPath {
    pub fn parse(path: &str) -> Result<Self, ClientError> {
        if path.is_empty() {
            return Err(ClientError::invalid_job_path(path, "job path cannot be empty"));
        }

        let segments: Vec<CompactString> = path.split('/').map(CompactString::from).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ClientError::invalid_job_path(path, "job path contains an empty segment"));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[CompactString] {
        &self.segments
    }

    /// Path below the server root, with `job/` before every segment
    pub fn api_path(&self) -> String {
        format!("job/{}", self.segments.iter().join("/job/"))
    }
}

impl FromStr for JobPath {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for JobPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.segments.iter().join("/"))
    }
}

impl QueueItemUrl {
    pub fn new(url: impl Into<CompactString>) -> Self {
        Self { value: url.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl BuildUrl {
    pub fn new(url: impl Into<CompactString>) -> Self {
        Self { value: url.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for QueueItemUrl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for BuildUrl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<&str> for BuildUrl {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for BuildUrl {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}

/// `{url}/api/json`, without doubling a trailing slash
pub(crate) fn api_json_url(url: &str) -> String {
    format!("{}/api/json", url.trim_end_matches('/'))
}
