//! Request and response DTOs for the dashboard HTTP API.

use crate::ChartKind;
use serde::{Deserialize, Serialize};

/// Outcome marker carried by every JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// Response of a plot submission.
///
/// On success `function` and `job_id` are set; on a rejected parameter `error`
/// holds the description and `id` names the offending parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SubmitResponse {
    pub fn ok(function: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            function: Some(function.into()),
            job_id: Some(job_id.into()),
            error: None,
            id: None,
        }
    }

    pub fn error(error: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            function: None,
            job_id: None,
            error: Some(error.into()),
            id: Some(id.into()),
        }
    }
}

/// Body of the blocking wait request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitRequest {
    #[serde(alias = "job_uuid")]
    pub job_id: String,
}

/// Bare status reply, optionally with an error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
        }
    }
}

/// Status envelope with a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> DataResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: Status::Ok,
            message: None,
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Completed and Failed are terminal; nothing leaves them.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Point-in-time snapshot of a job, as reported by the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    pub job_id: String,
    pub status: JobStatus,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One entry of the function list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSummary {
    pub name: String,
    pub label: String,
    pub description: String,
}

/// Parameter description used by clients to build their input form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSchema {
    pub id: String,
    pub label: String,
    pub kind: String,
    /// Default value in the input format (e.g. `01/01/2013`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Accepted labels for category parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub allow_multiple: bool,
    #[serde(default)]
    pub allow_all: bool,
    #[serde(default)]
    pub allow_null: bool,
}

/// Full description of one function and its parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSchema {
    pub name: String,
    pub label: String,
    pub description: String,
    pub chart: ChartKind,
    pub parameters: Vec<ParameterSchema>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_error_names_parameter() {
        let body = serde_json::to_value(SubmitResponse::error("Wrong month", "start")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "status": "error", "error": "Wrong month", "id": "start" })
        );
    }

    #[test]
    fn wait_request_accepts_legacy_field() {
        let req: WaitRequest = serde_json::from_str(r#"{"job_uuid":"abc"}"#).unwrap();
        assert_eq!(req.job_id, "abc");
        let req: WaitRequest = serde_json::from_str(r#"{"job_id":"def"}"#).unwrap();
        assert_eq!(req.job_id, "def");
    }

    #[test]
    fn terminal_states() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }
}
