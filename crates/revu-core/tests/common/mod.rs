// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted gateway double shared by the behavior tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::Notify;

use revu_api_contract::{
    AnalysisResult, ChatRequest, ChatResponse, HealthStatus, ProjectChatRequest,
    ProjectFileEntry, ProjectRegistration, RepoValidation,
};
use revu_client_api::{Gateway, GatewayError, GatewayResult};
use revu_core::analysis::CancelToken;
use revu_domain_types::{AnalysisKind, Artifact, ModelChoice};

/// A gateway whose responses are scripted per operation and which records
/// every call it receives.
#[derive(Default)]
pub struct ScriptedGateway {
    calls: Mutex<Vec<String>>,
    analysis: Mutex<HashMap<AnalysisKind, GatewayResult<AnalysisResult>>>,
    chat: Mutex<VecDeque<GatewayResult<ChatResponse>>>,
    upload: Mutex<Option<GatewayResult<ProjectRegistration>>>,
    validations: Mutex<HashMap<String, RepoValidation>>,
    download: Mutex<Option<GatewayResult<ProjectRegistration>>>,
    /// Cancel this token once the given number of analysis calls have run.
    cancel_after: Mutex<Option<(usize, CancelToken)>>,
    analysis_calls_seen: Mutex<usize>,
    /// When set, chat calls block until the notify is signalled.
    chat_gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn script_analysis_success(&self, kind: AnalysisKind, text: &str, seconds: f64) {
        lock(&self.analysis).insert(kind, Ok(analysis_result(text, seconds)));
    }

    pub fn script_analysis_error(&self, kind: AnalysisKind, message: &str) {
        lock(&self.analysis).insert(kind, Err(GatewayError::backend(message)));
    }

    pub fn script_chat_answer(&self, answer: &str) {
        lock(&self.chat).push_back(Ok(chat_response(answer)));
    }

    pub fn script_chat_error(&self, message: &str) {
        lock(&self.chat).push_back(Err(GatewayError::backend(message)));
    }

    pub fn script_upload(&self, registration: ProjectRegistration) {
        *lock(&self.upload) = Some(Ok(registration));
    }

    pub fn script_validation(&self, url: &str, validation: RepoValidation) {
        lock(&self.validations).insert(url.to_string(), validation);
    }

    pub fn script_download(&self, registration: ProjectRegistration) {
        *lock(&self.download) = Some(Ok(registration));
    }

    pub fn cancel_after_analyses(&self, count: usize, token: CancelToken) {
        *lock(&self.cancel_after) = Some((count, token));
    }

    /// Make every chat call block until the returned notify is signalled.
    pub fn gate_chat(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *lock(&self.chat_gate) = Some(gate.clone());
        gate
    }

    fn record(&self, call: String) {
        lock(&self.calls).push(call);
    }

    fn analysis_outcome(&self, kind: AnalysisKind) -> GatewayResult<AnalysisResult> {
        let result = lock(&self.analysis)
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| Ok(analysis_result("ok", 0.1)));
        let mut seen = lock(&self.analysis_calls_seen);
        *seen += 1;
        if let Some((count, token)) = lock(&self.cancel_after).as_ref() {
            if *seen >= *count {
                token.cancel();
            }
        }
        result
    }

    async fn chat_outcome(&self, echo: &str) -> GatewayResult<ChatResponse> {
        let gate = lock(&self.chat_gate).clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        lock(&self.chat)
            .pop_front()
            .unwrap_or_else(|| Ok(chat_response(&format!("answer to {}", echo))))
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn health(&self) -> GatewayResult<HealthStatus> {
        self.record("health".to_string());
        Ok(HealthStatus {
            status: "healthy".to_string(),
            details: Default::default(),
        })
    }

    async fn analyze(
        &self,
        kind: AnalysisKind,
        _code: &str,
        _model: ModelChoice,
    ) -> GatewayResult<AnalysisResult> {
        self.record(format!("analyze:{}", kind.descriptor().project_label));
        self.analysis_outcome(kind)
    }

    async fn analyze_project_file(
        &self,
        project_id: &str,
        file_index: usize,
        kind: AnalysisKind,
        _model: ModelChoice,
    ) -> GatewayResult<AnalysisResult> {
        self.record(format!(
            "analyze_project:{}:{}:{}",
            project_id,
            file_index,
            kind.descriptor().project_label
        ));
        self.analysis_outcome(kind)
    }

    async fn chat_about_code(&self, request: &ChatRequest) -> GatewayResult<ChatResponse> {
        self.record(format!("chat_code:{}", request.session_id));
        self.chat_outcome(&request.question).await
    }

    async fn chat_about_project(
        &self,
        project_id: &str,
        request: &ProjectChatRequest,
    ) -> GatewayResult<ChatResponse> {
        self.record(format!(
            "chat_project:{}:{}:file={:?}",
            project_id, request.session_id, request.file_index
        ));
        self.chat_outcome(&request.question).await
    }

    async fn upload_archive(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> GatewayResult<ProjectRegistration> {
        self.record(format!("upload:{}:{}", file_name, bytes.len()));
        lock(&self.upload)
            .clone()
            .unwrap_or_else(|| Err(GatewayError::backend("no scripted registration")))
    }

    async fn validate_repository(&self, repo_url: &str) -> GatewayResult<RepoValidation> {
        self.record(format!("validate:{}", repo_url));
        Ok(lock(&self.validations).get(repo_url).cloned().unwrap_or(RepoValidation {
            valid: false,
            name: None,
            language: None,
            description: None,
            error: Some("Unknown repository".to_string()),
        }))
    }

    async fn download_repository(&self, repo_url: &str) -> GatewayResult<ProjectRegistration> {
        self.record(format!("download:{}", repo_url));
        lock(&self.download)
            .clone()
            .unwrap_or_else(|| Err(GatewayError::backend("no scripted registration")))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn analysis_result(text: &str, seconds: f64) -> AnalysisResult {
    AnalysisResult {
        result_text: text.to_string(),
        execution_time_seconds: seconds,
        model_used: "gpt-4o".to_string(),
        file_name: None,
    }
}

pub fn chat_response(answer: &str) -> ChatResponse {
    ChatResponse {
        status: "success".to_string(),
        response: answer.to_string(),
        session_id: "scripted".to_string(),
        execution_time: 0.4,
        model_used: Some("gpt-4o".to_string()),
        context_info: None,
    }
}

pub fn single_file_artifact() -> Artifact {
    Artifact::SingleFile {
        file_name: "app.py".to_string(),
        code: "def add(a, b):\n    return a + b\n".to_string(),
    }
}

pub fn project_artifact(project_id: &str, file_names: &[&str]) -> Artifact {
    Artifact::Project {
        project_id: project_id.to_string(),
        project_name: "demo".to_string(),
        files: file_names
            .iter()
            .enumerate()
            .map(|(index, name)| revu_domain_types::ArtifactFile {
                name: (*name).to_string(),
                path: (*name).to_string(),
                size: 100,
                index,
            })
            .collect(),
    }
}

pub fn registration(project_id: &str, file_names: &[&str]) -> ProjectRegistration {
    ProjectRegistration {
        project_id: project_id.to_string(),
        project_name: "demo".to_string(),
        total_files: file_names.len(),
        files: file_names
            .iter()
            .map(|name| ProjectFileEntry {
                name: (*name).to_string(),
                path: (*name).to_string(),
                size: 100,
            })
            .collect(),
    }
}
