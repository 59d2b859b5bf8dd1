//! Cloud function models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a function deployment job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum JobStatus {
    Pending = 1,
    Deploying = 2,
    Active = 3,
    Retired = 4,
    Failed = 100,
}

impl JobStatus {
    /// Human-readable name, for presentation only.
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Deploying => "deploying",
            JobStatus::Active => "active",
            JobStatus::Retired => "retired",
            JobStatus::Failed => "failed",
        }
    }
}

impl From<JobStatus> for i32 {
    fn from(status: JobStatus) -> i32 {
        status as i32
    }
}

impl TryFrom<i32> for JobStatus {
    type Error = String;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(JobStatus::Pending),
            2 => Ok(JobStatus::Deploying),
            3 => Ok(JobStatus::Active),
            4 => Ok(JobStatus::Retired),
            100 => Ok(JobStatus::Failed),
            other => Err(format!("unknown job status code: {}", other)),
        }
    }
}

/// One deployment job of a cloud function.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionJob {
    pub job_uuid: String,
    pub function_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub job_status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
}

/// Body of `POST /cloud-functions/{uuid}/jobs`: points the job at the
/// upload session that carried the source bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub session_uuid: String,
}
