// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway abstraction for the Revu backend
//!
//! This crate defines the [`Gateway`] trait: one async operation per
//! backend capability, over the shared contract types. The orchestration
//! core depends only on this trait, so the production REST client and
//! scripted test doubles are interchangeable.
//!
//! Every operation is a single attempt with a bounded timeout. All
//! failure modes — transport errors, deadlines, non-2xx statuses,
//! backend-reported errors — surface through [`GatewayError`], the one
//! failure channel callers check. Implementations never panic across
//! this boundary.

use async_trait::async_trait;
use revu_api_contract::{
    AnalysisResult, ChatRequest, ChatResponse, HealthStatus, ProjectChatRequest,
    ProjectRegistration, RepoValidation,
};
use revu_domain_types::{AnalysisKind, ModelChoice};
use thiserror::Error;

/// Normalized failure channel for all gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The request failed contract validation; nothing was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network-level failure before a response was received.
    #[error("Could not reach the backend service: {0}")]
    Transport(String),

    /// The per-call deadline elapsed.
    #[error("The request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The backend reported an error; its message passes through verbatim.
    #[error("{message}")]
    Backend { message: String },

    /// A 2xx response that could not be decoded into the expected shape.
    #[error("Unexpected response from the backend: {0}")]
    Decode(String),

    /// Repository download returned 404.
    #[error("Repository not found or is private. Make sure the repository exists and is public.")]
    RepositoryNotFound,

    /// Repository download returned 408.
    #[error("Download timed out. Repository might be too large. Try a smaller repository.")]
    RepositoryTooLarge,
}

impl GatewayError {
    pub fn backend(message: impl Into<String>) -> Self {
        GatewayError::Backend {
            message: message.into(),
        }
    }
}

/// Result alias used by every gateway operation.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// The sole seam through which Revu components talk to the backend.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `GET /health`. 5 second deadline.
    async fn health(&self) -> GatewayResult<HealthStatus>;

    /// Single-file analysis for one kind. 60 second deadline.
    ///
    /// The kind-specific backend result field is already normalized into
    /// [`AnalysisResult::result_text`].
    async fn analyze(
        &self,
        kind: AnalysisKind,
        code: &str,
        model: ModelChoice,
    ) -> GatewayResult<AnalysisResult>;

    /// Analysis of one file inside a registered project. 120 second deadline.
    async fn analyze_project_file(
        &self,
        project_id: &str,
        file_index: usize,
        kind: AnalysisKind,
        model: ModelChoice,
    ) -> GatewayResult<AnalysisResult>;

    /// File-scoped conversational turn. 60 second deadline.
    async fn chat_about_code(&self, request: &ChatRequest) -> GatewayResult<ChatResponse>;

    /// Project-scoped conversational turn. 60 second deadline.
    async fn chat_about_project(
        &self,
        project_id: &str,
        request: &ProjectChatRequest,
    ) -> GatewayResult<ChatResponse>;

    /// Register a ZIP archive as a project. 120 second deadline.
    async fn upload_archive(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> GatewayResult<ProjectRegistration>;

    /// Check a repository reference before download. 5 second deadline.
    async fn validate_repository(&self, repo_url: &str) -> GatewayResult<RepoValidation>;

    /// Download a validated repository. 120 second deadline.
    ///
    /// Implementations map 404 to [`GatewayError::RepositoryNotFound`] and
    /// 408 to [`GatewayError::RepositoryTooLarge`].
    async fn download_repository(&self, repo_url: &str) -> GatewayResult<ProjectRegistration>;
}
