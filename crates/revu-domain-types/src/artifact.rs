// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The artifact model
//!
//! An [`Artifact`] is the canonical representation of "what was uploaded":
//! a single source file held in memory, a ZIP project registered with the
//! backend, or a downloaded remote repository. Project and repository
//! artifacts carry the backend-assigned project id and the file catalog
//! returned at registration time; file contents stay server-side and are
//! addressed by index.
//!
//! Artifacts are immutable once constructed. A new upload produces a new
//! artifact; nothing in the system mutates one in place.

use serde::{Deserialize, Serialize};

/// One file inside a project or repository artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFile {
    pub name: String,
    pub path: String,
    pub size: u64,
    /// Position in the backend's file catalog; used to address the file
    /// in project-scoped analysis and chat calls.
    pub index: usize,
}

/// Origin metadata for a repository artifact, captured during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoOrigin {
    pub url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The unified representation of an uploaded code unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Artifact {
    /// A single source file read fully into memory.
    SingleFile { file_name: String, code: String },
    /// A ZIP project registered with the backend.
    Project {
        project_id: String,
        project_name: String,
        files: Vec<ArtifactFile>,
    },
    /// A remote repository downloaded by the backend.
    Repository {
        project_id: String,
        project_name: String,
        origin: RepoOrigin,
        files: Vec<ArtifactFile>,
    },
}

/// Stable identity of an artifact, used to detect replacement.
///
/// Outcomes and chat histories are keyed by this identity and must be
/// discarded whenever it changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactIdentity {
    SingleFile(String),
    Project(String),
}

impl Artifact {
    /// The identity key for this artifact.
    pub fn identity(&self) -> ArtifactIdentity {
        match self {
            Artifact::SingleFile { file_name, .. } => {
                ArtifactIdentity::SingleFile(file_name.clone())
            }
            Artifact::Project { project_id, .. } | Artifact::Repository { project_id, .. } => {
                ArtifactIdentity::Project(project_id.clone())
            }
        }
    }

    /// Human-readable name for display and logging.
    pub fn display_name(&self) -> &str {
        match self {
            Artifact::SingleFile { file_name, .. } => file_name,
            Artifact::Project { project_name, .. }
            | Artifact::Repository { project_name, .. } => project_name,
        }
    }

    /// Backend project id, if this artifact is registered server-side.
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Artifact::SingleFile { .. } => None,
            Artifact::Project { project_id, .. } | Artifact::Repository { project_id, .. } => {
                Some(project_id)
            }
        }
    }

    /// The file catalog for multi-file artifacts.
    pub fn files(&self) -> &[ArtifactFile] {
        match self {
            Artifact::SingleFile { .. } => &[],
            Artifact::Project { files, .. } | Artifact::Repository { files, .. } => files,
        }
    }

    /// Look up a file by catalog index.
    pub fn file(&self, index: usize) -> Option<&ArtifactFile> {
        self.files().get(index)
    }

    /// True for project and repository artifacts.
    pub fn is_multi_file(&self) -> bool {
        !matches!(self, Artifact::SingleFile { .. })
    }
}
