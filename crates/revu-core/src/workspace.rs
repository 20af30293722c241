// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The top-level session-state owner
//!
//! A [`Workspace`] is the composition root's handle on "what is loaded
//! right now": the current artifact, the latest analysis report, and the
//! chat session. The artifact is shared read-only (via `Arc`) with the
//! runner and the chat manager; only the workspace may replace it, and
//! replacing it invalidates every dependent piece of state. Stale
//! outcomes or histories are never observable against a new artifact.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use revu_client_api::Gateway;
use revu_domain_types::{Artifact, ArtifactIdentity, ChatTurn, ConversationScope, ModelChoice};

use crate::analysis::{
    AnalysisEvent, AnalysisRunner, AnalysisSelection, CancelToken, RunError, RunReport,
};
use crate::chat::{ChatSession, SessionError};

/// Errors surfaced by workspace operations.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("No artifact is loaded")]
    NoArtifact,

    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

struct ActiveSession {
    artifact: Arc<Artifact>,
    chat: ChatSession,
    report: Option<RunReport>,
}

/// Owner of the current artifact and all state derived from it.
pub struct Workspace {
    gateway: Arc<dyn Gateway>,
    runner: AnalysisRunner,
    model: ModelChoice,
    active: Option<ActiveSession>,
}

impl Workspace {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let runner = AnalysisRunner::new(gateway.clone());
        Self {
            gateway,
            runner,
            model: ModelChoice::default(),
            active: None,
        }
    }

    pub fn with_model(mut self, model: ModelChoice) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> ModelChoice {
        self.model
    }

    /// The currently loaded artifact, if any.
    pub fn artifact(&self) -> Option<&Arc<Artifact>> {
        self.active.as_ref().map(|a| &a.artifact)
    }

    /// The report of the most recent analysis run against the current
    /// artifact, if one has completed.
    pub fn report(&self) -> Option<&RunReport> {
        self.active.as_ref().and_then(|a| a.report.as_ref())
    }

    /// Load a new artifact, discarding all state tied to the previous one.
    pub fn replace_artifact(&mut self, artifact: Artifact) -> ArtifactIdentity {
        let identity = artifact.identity();
        let artifact = Arc::new(artifact);
        info!(name = artifact.display_name(), "artifact replaced; dependent state invalidated");
        self.active = Some(ActiveSession {
            chat: ChatSession::new(artifact.clone(), self.model),
            artifact,
            report: None,
        });
        identity
    }

    /// Drop the artifact and everything derived from it.
    pub fn clear(&mut self) {
        self.active = None;
        info!("workspace cleared");
    }

    /// Run an analysis batch against the current artifact.
    ///
    /// The resulting report replaces the previous one wholesale, so
    /// switching the selected file can never leave stale outcomes behind.
    pub async fn run_analysis(
        &mut self,
        selection: &AnalysisSelection,
        file_index: Option<usize>,
        events: Option<&UnboundedSender<AnalysisEvent>>,
        cancel: Option<&CancelToken>,
    ) -> Result<&RunReport, WorkspaceError> {
        let active = self.active.as_mut().ok_or(WorkspaceError::NoArtifact)?;
        let report = self
            .runner
            .run_with_events(&active.artifact, selection, self.model, file_index, events, cancel)
            .await?;
        Ok(active.report.insert(report))
    }

    /// Ask a question under a scope of the current artifact.
    pub async fn ask(
        &self,
        question: &str,
        scope: ConversationScope,
    ) -> Result<ChatTurn, WorkspaceError> {
        let active = self.active.as_ref().ok_or(WorkspaceError::NoArtifact)?;
        let turn = active.chat.ask(&*self.gateway, question, scope).await?;
        Ok(turn)
    }

    /// The chat session for the current artifact.
    pub fn chat(&self) -> Option<&ChatSession> {
        self.active.as_ref().map(|a| &a.chat)
    }
}
