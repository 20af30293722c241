// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation types
//!
//! A chat session is identified by `(artifact identity, scope)`. Histories
//! are append-only and live only for the current process; replacing the
//! artifact discards them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;

/// The chat context within a multi-file artifact.
///
/// For single-file artifacts the scope is implicitly the whole file and
/// [`ConversationScope::EntireProject`] is used as the session key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationScope {
    EntireProject,
    SpecificFile(usize),
}

impl ConversationScope {
    /// Validate this scope against an artifact.
    ///
    /// File scopes require a multi-file artifact and an in-range index.
    pub fn is_valid_for(self, artifact: &Artifact) -> bool {
        match self {
            ConversationScope::EntireProject => true,
            ConversationScope::SpecificFile(index) => {
                artifact.is_multi_file() && artifact.file(index).is_some()
            }
        }
    }

    pub fn file_index(self) -> Option<usize> {
        match self {
            ConversationScope::EntireProject => None,
            ConversationScope::SpecificFile(index) => Some(index),
        }
    }
}

impl std::fmt::Display for ConversationScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationScope::EntireProject => write!(f, "entire project"),
            ConversationScope::SpecificFile(index) => write!(f, "file {}", index),
        }
    }
}

/// One completed question/answer exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}
