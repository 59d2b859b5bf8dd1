//! Website hosting models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Target environment of a website deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum DeploymentEnvironment {
    Staging = 1,
    Production = 2,
}

impl DeploymentEnvironment {
    pub fn label(&self) -> &'static str {
        match self {
            DeploymentEnvironment::Staging => "staging",
            DeploymentEnvironment::Production => "production",
        }
    }
}

impl From<DeploymentEnvironment> for i32 {
    fn from(environment: DeploymentEnvironment) -> i32 {
        environment as i32
    }
}

impl TryFrom<i32> for DeploymentEnvironment {
    type Error = String;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(DeploymentEnvironment::Staging),
            2 => Ok(DeploymentEnvironment::Production),
            other => Err(format!("unknown deployment environment code: {}", other)),
        }
    }
}

/// Progress of a website deployment, as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum DeploymentStatus {
    Pending = 0,
    InProgress = 1,
    Successful = 10,
    Failed = 100,
}

impl DeploymentStatus {
    /// Human-readable name, for presentation only.
    pub fn label(&self) -> &'static str {
        match self {
            DeploymentStatus::Pending => "pending",
            DeploymentStatus::InProgress => "in progress",
            DeploymentStatus::Successful => "successful",
            DeploymentStatus::Failed => "failed",
        }
    }

    /// Whether the deployment has reached a terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(self, DeploymentStatus::Successful | DeploymentStatus::Failed)
    }
}

impl From<DeploymentStatus> for i32 {
    fn from(status: DeploymentStatus) -> i32 {
        status as i32
    }
}

impl TryFrom<i32> for DeploymentStatus {
    type Error = String;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(DeploymentStatus::Pending),
            1 => Ok(DeploymentStatus::InProgress),
            10 => Ok(DeploymentStatus::Successful),
            100 => Ok(DeploymentStatus::Failed),
            other => Err(format!("unknown deployment status code: {}", other)),
        }
    }
}

/// One deployment of a website's uploaded content to an environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub deployment_uuid: String,
    pub website_uuid: String,
    pub environment: DeploymentEnvironment,
    pub deployment_status: DeploymentStatus,
    /// Directory identifier of the deployed content, once assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

/// Body of `POST /hosting/websites/{uuid}/deploy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub environment: DeploymentEnvironment,
}
