// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! API contract types for the Revu backend REST service

use revu_domain_types::{AnalysisKind, ModelChoice};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Request body for the single-file analysis endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1, message = "Code cannot be empty"))]
    pub code: String,
    pub model_choice: ModelChoice,
}

/// Request body for `POST /api/v1/projects/{projectId}/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAnalyzeRequest {
    pub file_index: usize,
    /// Backend analysis-type label (`bugs`, `optimize`, ...).
    pub analysis_type: String,
    pub model_choice: ModelChoice,
}

/// Raw success envelope returned by the analysis endpoints.
///
/// The backend names the result field differently per analysis kind
/// (`result`, `explanation`, `optimized_code`, `unit_tests`,
/// `edge_case_analysis`). The kind-specific field is captured in `extra`
/// and extracted by [`RawAnalysisEnvelope::normalize`], so callers never
/// see the backend's naming convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAnalysisEnvelope {
    #[serde(default = "success_status")]
    pub status: String,
    #[serde(default)]
    pub execution_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    /// Present on project-analysis responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn success_status() -> String {
    "success".to_string()
}

/// One analysis result with the backend field naming erased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub result_text: String,
    pub execution_time_seconds: f64,
    pub model_used: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl RawAnalysisEnvelope {
    /// True unless the backend reported `status: "error"`.
    pub fn is_success(&self) -> bool {
        self.status != "error"
    }

    /// Extract the kind-specific result field into the normalized shape.
    ///
    /// The project-analysis endpoint always uses `result` regardless of
    /// kind, so extraction falls back to it when the kind-specific field
    /// is absent. A missing field yields empty text, matching the
    /// backend's own defaulting.
    pub fn normalize(self, kind: AnalysisKind, requested_model: ModelChoice) -> AnalysisResult {
        let field = kind.descriptor().result_field;
        let result_text = self
            .extra
            .get(field)
            .or_else(|| self.extra.get("result"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        AnalysisResult {
            result_text,
            execution_time_seconds: self.execution_time,
            model_used: self.model_used.unwrap_or_else(|| requested_model.as_str().to_string()),
            file_name: self.file_name,
        }
    }
}

/// Request body for `POST /api/v1/conversational/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, message = "Code cannot be empty"))]
    pub code: String,
    #[validate(length(min = 1, message = "Question cannot be empty"))]
    pub question: String,
    pub session_id: String,
    pub model_choice: ModelChoice,
}

/// Request body for `POST /api/v1/conversational/{projectId}/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProjectChatRequest {
    #[validate(length(min = 1, message = "Question cannot be empty"))]
    pub question: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_index: Option<usize>,
}

/// Success envelope for both chat endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default = "success_status")]
    pub status: String,
    pub response: String,
    pub session_id: String,
    #[serde(default)]
    pub execution_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    /// Human-readable description of what the answer was scoped to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_info: Option<String>,
}

/// One file entry in a project registration response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFileEntry {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub size: u64,
}

/// Success envelope for `POST /api/v1/projects/upload` and
/// `POST /api/v1/projects/github`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRegistration {
    pub project_id: String,
    pub project_name: String,
    pub total_files: usize,
    pub files: Vec<ProjectFileEntry>,
}

/// Request body for `POST /api/v1/projects/github`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoDownloadRequest {
    pub repo_url: String,
}

/// Response of `GET /api/v1/projects/github/validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub details: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use revu_domain_types::AnalysisKind;

    #[test]
    fn normalize_extracts_the_kind_specific_field() {
        for (kind, field) in [
            (AnalysisKind::BugDetection, "result"),
            (AnalysisKind::Explanation, "explanation"),
            (AnalysisKind::Optimization, "optimized_code"),
            (AnalysisKind::TestGeneration, "unit_tests"),
            (AnalysisKind::EdgeCaseDetection, "edge_case_analysis"),
        ] {
            let body = format!(
                r#"{{"status":"success","{}":"the text","execution_time":1.5,"model_used":"gpt-4o"}}"#,
                field
            );
            let envelope: RawAnalysisEnvelope = serde_json::from_str(&body).unwrap();
            let normalized = envelope.normalize(kind, ModelChoice::Gpt4o);
            assert_eq!(normalized.result_text, "the text", "kind {:?}", kind);
            assert_eq!(normalized.execution_time_seconds, 1.5);
            assert_eq!(normalized.model_used, "gpt-4o");
        }
    }

    #[test]
    fn normalize_falls_back_to_result_for_project_envelopes() {
        let body = r#"{"status":"success","result":"explained","file_name":"main.py"}"#;
        let envelope: RawAnalysisEnvelope = serde_json::from_str(body).unwrap();
        let normalized = envelope.normalize(AnalysisKind::Explanation, ModelChoice::O3Mini);
        assert_eq!(normalized.result_text, "explained");
        assert_eq!(normalized.file_name.as_deref(), Some("main.py"));
        // Model falls back to the requested one when the backend omits it
        assert_eq!(normalized.model_used, "o3-mini");
    }

    #[test]
    fn error_envelope_accepts_detail_alias() {
        let envelope: crate::ErrorEnvelope =
            serde_json::from_str(r#"{"detail":"Bad request"}"#).unwrap();
        assert_eq!(envelope.message, "Bad request");
        assert_eq!(envelope.status, "error");
    }

    #[test]
    fn project_chat_request_omits_absent_file_index() {
        let request = ProjectChatRequest {
            question: "How does this fit together?".to_string(),
            session_id: "project-p1".to_string(),
            file_index: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("file_index").is_none());
    }

    #[test]
    fn registration_round_trips() {
        let body = r#"{
            "project_id": "p-42",
            "project_name": "demo",
            "total_files": 1,
            "files": [{"name": "main.py", "path": "src/main.py", "size": 120}]
        }"#;
        let registration: ProjectRegistration = serde_json::from_str(body).unwrap();
        assert_eq!(registration.total_files, 1);
        assert_eq!(registration.files[0].name, "main.py");
    }
}
