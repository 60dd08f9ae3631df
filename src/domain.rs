// Jenkins remote access API: https://www.jenkins.io/doc/book/using/remote-access-api/
use std::time::Duration;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::Deserialize;

use crate::client::config::StatusMapping;

/// Whether a build is still executing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Running,
    Complete,
}

/// Caller-facing outcome of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    Fail,
    Success,
    Unknown,
}

/// Classified build state together with what the server actually reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub state: BuildState,
    pub status: BuildStatus,
    /// Raw `result` string, e.g. `SUCCESS`, `FAILURE`, `UNSTABLE`, `ABORTED`
    pub result: Option<CompactString>,
    pub number: Option<u32>,
    /// Canonical build URL as reported by the server
    pub url: Option<CompactString>,
    pub started_at: Option<DateTime<Utc>>,
    /// Only known once the build is complete
    pub duration: Option<Duration>,
}

impl BuildReport {
    pub fn is_complete(&self) -> bool {
        self.state == BuildState::Complete
    }

    /// The `(state, status)` pair returned by `build_status`
    pub fn classification(&self) -> (BuildState, BuildStatus) {
        (self.state, self.status)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueItemDto {
    #[serde(default)]
    pub executable: Option<ExecutableDto>,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub why: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutableDto {
    pub url: CompactString,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildDto {
    #[serde(default)]
    pub building: Option<bool>,
    #[serde(default)]
    pub result: Option<CompactString>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub url: Option<CompactString>,
    /// Milliseconds; zero while the build is running
    #[serde(default)]
    pub duration: Option<u64>,
    /// Start time, epoch milliseconds
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl BuildStatus {
    /// Map a finished build's `result` string.
    pub(crate) fn from_result(result: Option<&str>) -> Self {
        match result {
            Some("SUCCESS") => BuildStatus::Success,
            Some("FAILURE") => BuildStatus::Fail,
            _ => BuildStatus::Unknown,
        }
    }
}

impl BuildReport {
    pub(crate) fn classify(building: bool, dto: BuildDto, mapping: StatusMapping) -> Self {
        let (state, status) = if building {
            (BuildState::Running, BuildStatus::Unknown)
        } else {
            let status = match mapping {
                StatusMapping::FromResult => BuildStatus::from_result(dto.result.as_deref()),
                StatusMapping::AssumeSuccess => BuildStatus::Success,
            };
            (BuildState::Complete, status)
        };

        let duration = match state {
            BuildState::Complete => dto.duration.map(Duration::from_millis),
            BuildState::Running => None,
        };

        Self {
            state,
            status,
            result: dto.result,
            number: dto.number,
            url: dto.url,
            started_at: dto.timestamp.and_then(DateTime::<Utc>::from_timestamp_millis),
            duration,
        }
    }
}
