// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Main REST API client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use revu_api_contract::{
    validation, AnalysisResult, AnalyzeRequest, ApiContractError, ChatRequest, ChatResponse,
    ErrorEnvelope, HealthStatus, ProjectAnalyzeRequest, ProjectChatRequest, ProjectRegistration,
    RawAnalysisEnvelope, RepoDownloadRequest, RepoValidation,
};
use revu_client_api::{Gateway, GatewayError, GatewayResult};
use revu_domain_types::{AnalysisKind, ModelChoice};

use crate::timeouts;

/// REST API client for the Revu backend service
#[derive(Debug, Clone)]
pub struct RestGateway {
    http_client: HttpClient,
    base_url: Url,
}

impl RestGateway {
    /// Create a new REST gateway against a base endpoint
    pub fn new(base_url: Url) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
        }
    }

    /// Create a gateway from a base URL string
    pub fn from_url(base_url: &str) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(base_url)?;
        Ok(Self::new(base_url))
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // Private helper methods

    async fn get<T: DeserializeOwned>(&self, path: &str, timeout: Duration) -> GatewayResult<T> {
        self.request(Method::GET, path, None::<&()>, timeout).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> GatewayResult<T> {
        self.request(Method::POST, path, Some(body), timeout).await
    }

    async fn request<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        timeout: Duration,
    ) -> GatewayResult<T> {
        let url = self.join(path)?;
        debug!(%method, %url, "gateway request");

        let mut request = self.http_client.request(method, url).timeout(timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| send_error(e, timeout))?;
        Self::handle_response(response).await
    }

    fn join(&self, path: &str) -> GatewayResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| GatewayError::Transport(format!("invalid request path {}: {}", path, e)))
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if status.is_success() {
            serde_json::from_str(&text).map_err(|e| {
                warn!(%status, error = %e, "undecodable gateway response");
                GatewayError::Decode(e.to_string())
            })
        } else {
            Err(error_from_status(status, &text))
        }
    }

    /// Run one analysis envelope exchange and normalize the result field.
    async fn analysis_call<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
        kind: AnalysisKind,
        model: ModelChoice,
    ) -> GatewayResult<AnalysisResult> {
        let envelope: RawAnalysisEnvelope = self.post(path, body, timeout).await?;
        if envelope.is_success() {
            Ok(envelope.normalize(kind, model))
        } else {
            let message = envelope
                .message
                .unwrap_or_else(|| format!("{} failed", kind.display_name()));
            Err(GatewayError::Backend { message })
        }
    }
}

/// Map a contract validation failure into the normalized error channel.
fn invalid_request(error: ApiContractError) -> GatewayError {
    GatewayError::InvalidRequest(error.to_string())
}

/// Map a failed send into the normalized error channel.
fn send_error(error: reqwest::Error, timeout: Duration) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout {
            seconds: timeout.as_secs(),
        }
    } else {
        GatewayError::Transport(error.to_string())
    }
}

/// Normalize a non-2xx response body into a backend error.
fn error_from_status(status: StatusCode, body: &str) -> GatewayError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => GatewayError::Backend {
            message: envelope.message,
        },
        Err(_) => GatewayError::Backend {
            message: if body.trim().is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                format!("HTTP {}: {}", status.as_u16(), body.trim())
            },
        },
    }
}

/// Error mapping specific to repository downloads.
fn download_error(status: StatusCode, body: &str) -> GatewayError {
    match status {
        StatusCode::NOT_FOUND => GatewayError::RepositoryNotFound,
        StatusCode::REQUEST_TIMEOUT => GatewayError::RepositoryTooLarge,
        _ => error_from_status(status, body),
    }
}

#[async_trait]
impl Gateway for RestGateway {
    async fn health(&self) -> GatewayResult<HealthStatus> {
        self.get("/health", timeouts::PROBE).await
    }

    async fn analyze(
        &self,
        kind: AnalysisKind,
        code: &str,
        model: ModelChoice,
    ) -> GatewayResult<AnalysisResult> {
        let request = AnalyzeRequest {
            code: code.to_string(),
            model_choice: model,
        };
        validation::validate_analyze_request(&request).map_err(invalid_request)?;
        self.analysis_call(
            kind.descriptor().endpoint,
            &request,
            timeouts::ANALYSIS,
            kind,
            model,
        )
        .await
    }

    async fn analyze_project_file(
        &self,
        project_id: &str,
        file_index: usize,
        kind: AnalysisKind,
        model: ModelChoice,
    ) -> GatewayResult<AnalysisResult> {
        let path = format!("/api/v1/projects/{}/analyze", project_id);
        let request = ProjectAnalyzeRequest {
            file_index,
            analysis_type: kind.descriptor().project_label.to_string(),
            model_choice: model,
        };
        self.analysis_call(&path, &request, timeouts::TRANSFER, kind, model)
            .await
    }

    async fn chat_about_code(&self, request: &ChatRequest) -> GatewayResult<ChatResponse> {
        validation::validate_chat_request(request).map_err(invalid_request)?;
        self.post("/api/v1/conversational/chat", request, timeouts::ANALYSIS)
            .await
    }

    async fn chat_about_project(
        &self,
        project_id: &str,
        request: &ProjectChatRequest,
    ) -> GatewayResult<ChatResponse> {
        validation::validate_project_chat_request(request).map_err(invalid_request)?;
        let path = format!("/api/v1/conversational/{}/chat", project_id);
        self.post(&path, request, timeouts::ANALYSIS).await
    }

    async fn upload_archive(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> GatewayResult<ProjectRegistration> {
        let url = self.join("/api/v1/projects/upload")?;
        debug!(%url, file_name, size = bytes.len(), "uploading project archive");

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/zip")
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http_client
            .post(url)
            .multipart(form)
            .timeout(timeouts::TRANSFER)
            .send()
            .await
            .map_err(|e| send_error(e, timeouts::TRANSFER))?;
        Self::handle_response(response).await
    }

    async fn validate_repository(&self, repo_url: &str) -> GatewayResult<RepoValidation> {
        let mut url = self.join("/api/v1/projects/github/validate")?;
        url.query_pairs_mut().append_pair("repo_url", repo_url);

        let response = self
            .http_client
            .get(url)
            .timeout(timeouts::PROBE)
            .send()
            .await
            .map_err(|e| send_error(e, timeouts::PROBE))?;

        let status = response.status();
        if status.is_success() {
            Self::handle_response(response).await
        } else {
            // Validation failure is a value, not an error: the two-phase
            // ingestion flow decides what to do with an invalid reference.
            Ok(RepoValidation {
                valid: false,
                name: None,
                language: None,
                description: None,
                error: Some(format!("Validation API error: {}", status.as_u16())),
            })
        }
    }

    async fn download_repository(&self, repo_url: &str) -> GatewayResult<ProjectRegistration> {
        // Downloads independently re-validate: a stale or never-validated
        // reference must not start a transfer.
        let validation = self.validate_repository(repo_url).await?;
        if !validation.valid {
            return Err(GatewayError::Backend {
                message: format!(
                    "Invalid repository: {}",
                    validation.error.unwrap_or_else(|| "Unknown validation error".to_string())
                ),
            });
        }

        let url = self.join("/api/v1/projects/github")?;
        let request = RepoDownloadRequest {
            repo_url: repo_url.to_string(),
        };

        let response = self
            .http_client
            .post(url)
            .json(&request)
            .timeout(timeouts::TRANSFER)
            .send()
            .await
            .map_err(|e| send_error(e, timeouts::TRANSFER))?;

        let status = response.status();
        if status.is_success() {
            Self::handle_response(response).await
        } else {
            let text = response
                .text()
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()))?;
            Err(download_error(status, &text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_2xx_bodies_normalize_to_backend_errors() {
        let err = error_from_status(
            StatusCode::BAD_REQUEST,
            r#"{"status":"error","message":"model overloaded"}"#,
        );
        assert_eq!(err, GatewayError::backend("model overloaded"));

        let err = error_from_status(StatusCode::BAD_REQUEST, r#"{"detail":"Bad request"}"#);
        assert_eq!(err, GatewayError::backend("Bad request"));

        let err = error_from_status(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err, GatewayError::backend("HTTP 500"));
    }

    #[test]
    fn download_statuses_map_to_specific_causes() {
        assert_eq!(
            download_error(StatusCode::NOT_FOUND, ""),
            GatewayError::RepositoryNotFound
        );
        assert_eq!(
            download_error(StatusCode::REQUEST_TIMEOUT, ""),
            GatewayError::RepositoryTooLarge
        );
        assert!(matches!(
            download_error(StatusCode::BAD_GATEWAY, "upstream down"),
            GatewayError::Backend { .. }
        ));
    }

    #[test]
    fn download_error_messages_are_human_readable() {
        assert!(GatewayError::RepositoryNotFound.to_string().contains("not found or is private"));
        assert!(GatewayError::RepositoryTooLarge.to_string().contains("too large"));
    }

    // The base URL is unroutable on purpose: a request that fails contract
    // validation must never be sent.
    fn offline_gateway() -> RestGateway {
        RestGateway::from_url("http://127.0.0.1:9/").unwrap()
    }

    #[tokio::test]
    async fn empty_code_is_rejected_before_any_request() {
        let gateway = offline_gateway();
        let err = gateway
            .analyze(AnalysisKind::BugDetection, "", ModelChoice::Gpt4o)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn blank_chat_questions_are_rejected_before_any_request() {
        let gateway = offline_gateway();

        let request = ChatRequest {
            code: "print('hi')".to_string(),
            question: String::new(),
            session_id: "s-1".to_string(),
            model_choice: ModelChoice::Gpt4o,
        };
        let err = gateway.chat_about_code(&request).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));

        let request = ProjectChatRequest {
            question: String::new(),
            session_id: "s-1".to_string(),
            file_index: None,
        };
        let err = gateway.chat_about_project("p-1", &request).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
    }
}
