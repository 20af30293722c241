// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation session manager
//!
//! A [`ChatSession`] belongs to one live artifact. Each conversation is
//! keyed by a [`ConversationScope`] — the entire artifact or one file
//! within it — and keeps its own ordered, append-only history; histories
//! of different scopes never mix. A correlation token is minted per scope
//! from the scope and a request-time value, then reused for later turns
//! so the backend can keep its own conversational memory without the
//! client replaying prior turns.
//!
//! At most one question may be in flight per scope. A failed turn appends
//! nothing and preserves the question so the caller can resubmit it.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use revu_api_contract::{ChatRequest, ProjectChatRequest};
use revu_client_api::{Gateway, GatewayError};
use revu_domain_types::{Artifact, ChatTurn, ConversationScope, ModelChoice};

/// Errors produced by the session manager.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Question cannot be empty")]
    EmptyQuestion,

    #[error("Scope '{0}' is not valid for this artifact")]
    InvalidScope(ConversationScope),

    #[error("A question is already pending for scope '{0}'")]
    QuestionPending(ConversationScope),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Default)]
struct SessionState {
    histories: HashMap<ConversationScope, Vec<ChatTurn>>,
    session_ids: HashMap<ConversationScope, String>,
    pending: HashMap<ConversationScope, String>,
    in_flight: HashSet<ConversationScope>,
}

/// Scope-keyed conversation state for one artifact.
pub struct ChatSession {
    artifact: Arc<Artifact>,
    model: ModelChoice,
    state: Mutex<SessionState>,
}

impl ChatSession {
    pub fn new(artifact: Arc<Artifact>, model: ModelChoice) -> Self {
        Self {
            artifact,
            model,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn artifact(&self) -> &Arc<Artifact> {
        &self.artifact
    }

    /// Ask one question under a scope and append the completed turn to
    /// that scope's history.
    pub async fn ask(
        &self,
        gateway: &dyn Gateway,
        question: &str,
        scope: ConversationScope,
    ) -> Result<ChatTurn, SessionError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(SessionError::EmptyQuestion);
        }
        if !scope.is_valid_for(&self.artifact) {
            return Err(SessionError::InvalidScope(scope));
        }

        let session_id = {
            let mut state = self.lock();
            if state.in_flight.contains(&scope) {
                return Err(SessionError::QuestionPending(scope));
            }
            state.in_flight.insert(scope);
            state.pending.insert(scope, question.to_string());
            state
                .session_ids
                .entry(scope)
                .or_insert_with(|| self.mint_session_id(scope))
                .clone()
        };
        // Clears the in-flight marker even if this future is dropped
        let _guard = InFlightGuard {
            session: self,
            scope,
        };

        debug!(%scope, %session_id, "sending question");
        let response = match &*self.artifact {
            Artifact::SingleFile { code, .. } => {
                let request = ChatRequest {
                    code: code.clone(),
                    question: question.to_string(),
                    session_id,
                    model_choice: self.model,
                };
                gateway.chat_about_code(&request).await
            }
            Artifact::Project { project_id, .. } | Artifact::Repository { project_id, .. } => {
                let request = ProjectChatRequest {
                    question: question.to_string(),
                    session_id,
                    file_index: scope.file_index(),
                };
                gateway.chat_about_project(project_id, &request).await
            }
        };

        // A failed turn keeps the pending question for resubmission
        let response = response?;

        let turn = ChatTurn {
            question: question.to_string(),
            answer: response.response,
            asked_at: Utc::now(),
        };
        let mut state = self.lock();
        state.pending.remove(&scope);
        state.histories.entry(scope).or_default().push(turn.clone());
        info!(%scope, turns = state.histories[&scope].len(), "turn appended");
        Ok(turn)
    }

    /// The ordered history for one scope.
    pub fn history(&self, scope: ConversationScope) -> Vec<ChatTurn> {
        self.lock().histories.get(&scope).cloned().unwrap_or_default()
    }

    /// The question preserved from the last failed turn, if any.
    pub fn pending_question(&self, scope: ConversationScope) -> Option<String> {
        self.lock().pending.get(&scope).cloned()
    }

    /// Discard one scope's history, correlation token, and pending input.
    pub fn clear(&self, scope: ConversationScope) {
        let mut state = self.lock();
        state.histories.remove(&scope);
        state.session_ids.remove(&scope);
        state.pending.remove(&scope);
    }

    /// Discard everything held by this session.
    pub fn clear_all(&self) {
        let mut state = self.lock();
        state.histories.clear();
        state.session_ids.clear();
        state.pending.clear();
    }

    fn mint_session_id(&self, scope: ConversationScope) -> String {
        match (&*self.artifact, scope) {
            (Artifact::SingleFile { .. }, _) => format!("file-{}", Uuid::new_v4()),
            (artifact, ConversationScope::EntireProject) => {
                format!(
                    "project-{}-{}",
                    artifact.project_id().unwrap_or_default(),
                    Uuid::new_v4()
                )
            }
            (artifact, ConversationScope::SpecificFile(index)) => {
                format!(
                    "project-{}-file-{}-{}",
                    artifact.project_id().unwrap_or_default(),
                    index,
                    Uuid::new_v4()
                )
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct InFlightGuard<'a> {
    session: &'a ChatSession,
    scope: ConversationScope,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.session.lock().in_flight.remove(&self.scope);
    }
}

/// Scope-appropriate prompt suggestions, purely a UI affordance.
///
/// Stateless: the same scope always yields the same list.
pub fn suggestions(artifact: &Artifact, scope: ConversationScope) -> &'static [&'static str] {
    const FILE_SUGGESTIONS: &[&str] = &[
        "What does this code do?",
        "Are there any security issues?",
        "How can I optimize this?",
        "What edge cases should I consider?",
        "Is this code following best practices?",
    ];
    const PROJECT_SUGGESTIONS: &[&str] = &[
        "What is the overall architecture?",
        "How do these files work together?",
        "What's the main entry point?",
        "Any architectural improvements?",
        "Which files are most critical?",
    ];

    if artifact.is_multi_file() && scope == ConversationScope::EntireProject {
        PROJECT_SUGGESTIONS
    } else {
        FILE_SUGGESTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_file_session() -> ChatSession {
        let artifact = Arc::new(Artifact::SingleFile {
            file_name: "app.py".to_string(),
            code: "print('hi')".to_string(),
        });
        ChatSession::new(artifact, ModelChoice::Gpt4o)
    }

    #[test]
    fn session_ids_are_stable_within_a_scope() {
        let session = single_file_session();
        let first = session.mint_session_id(ConversationScope::EntireProject);
        // Minting twice gives fresh values; or_insert_with keeps the first
        let second = session.mint_session_id(ConversationScope::EntireProject);
        assert_ne!(first, second);
        assert!(first.starts_with("file-"));
    }

    #[test]
    fn suggestions_differ_by_scope() {
        let single = Artifact::SingleFile {
            file_name: "app.py".to_string(),
            code: String::new(),
        };
        let project = Artifact::Project {
            project_id: "p-1".to_string(),
            project_name: "demo".to_string(),
            files: vec![],
        };
        let file_level = suggestions(&single, ConversationScope::EntireProject);
        let project_level = suggestions(&project, ConversationScope::EntireProject);
        assert_ne!(file_level, project_level);
        // A file scope inside a project gets file-level suggestions
        assert_eq!(
            suggestions(&project, ConversationScope::SpecificFile(0)),
            file_level
        );
        // Stateless: same scope, same list
        assert_eq!(
            suggestions(&project, ConversationScope::EntireProject),
            project_level
        );
    }
}
