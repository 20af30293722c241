// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Artifact ingestion
//!
//! Three structurally different upload paths produce one [`Artifact`]:
//!
//! - a single source file, read fully into memory as text;
//! - a ZIP project archive, registered with the backend as an opaque
//!   multipart payload;
//! - a remote repository reference, downloaded by the backend after a
//!   mandatory validation phase.
//!
//! Every path validates its input before touching the network. Rejected
//! inputs never reach the gateway.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use revu_api_contract::{validation, ProjectRegistration, RepoValidation};
use revu_client_api::{Gateway, GatewayError};
use revu_domain_types::{Artifact, ArtifactFile, RepoOrigin};

/// Fixed ceiling for project archives. Larger uploads are rejected
/// client-side.
pub const MAX_ARCHIVE_BYTES: u64 = 50 * 1024 * 1024;

/// Errors produced by the ingestion flows.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file type for {file_name}: expected one of [{expected}]")]
    UnsupportedExtension { file_name: String, expected: String },

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8 text")]
    NotText { path: String },

    #[error("Archive is {size} bytes, above the {limit} byte ceiling. Keep ZIP files under 50MB.")]
    ArchiveTooLarge { size: u64, limit: u64 },

    #[error("Invalid repository reference: {0}")]
    InvalidRepository(String),

    #[error("Repository {0} has not been validated. Run validation before downloading.")]
    NotValidated(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Ingestion of a single source file into an in-memory artifact.
#[derive(Debug, Clone)]
pub struct SingleFileIngestor {
    allowed_extensions: Vec<String>,
}

impl Default for SingleFileIngestor {
    fn default() -> Self {
        // The backend's analysis chains are Python-oriented
        Self {
            allowed_extensions: vec!["py".to_string()],
        }
    }
}

impl SingleFileIngestor {
    pub fn new(allowed_extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed_extensions: allowed_extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Read a file from disk and produce a single-file artifact.
    ///
    /// No artifact is emitted for a wrong-extension or unreadable file.
    pub async fn ingest(&self, path: &Path) -> Result<Artifact, IngestError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.check_extension(&file_name)?;

        let bytes = tokio::fs::read(path).await.map_err(|source| IngestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let code = String::from_utf8(bytes).map_err(|_| IngestError::NotText {
            path: path.display().to_string(),
        })?;

        info!(file_name, bytes = code.len(), "ingested single file");
        Ok(Artifact::SingleFile { file_name, code })
    }

    /// Build a single-file artifact from already-loaded source text, for
    /// pasted code.
    pub fn from_source(
        &self,
        file_name: impl Into<String>,
        code: impl Into<String>,
    ) -> Result<Artifact, IngestError> {
        let file_name = file_name.into();
        self.check_extension(&file_name)?;
        Ok(Artifact::SingleFile {
            file_name,
            code: code.into(),
        })
    }

    fn check_extension(&self, file_name: &str) -> Result<(), IngestError> {
        let extension = file_name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase());
        let allowed = extension
            .as_deref()
            .is_some_and(|ext| self.allowed_extensions.iter().any(|a| a == ext));
        if allowed {
            Ok(())
        } else {
            Err(IngestError::UnsupportedExtension {
                file_name: file_name.to_string(),
                expected: self.allowed_extensions.join(", "),
            })
        }
    }
}

/// Ingestion of ZIP project archives through the backend registration
/// endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveIngestor;

impl ArchiveIngestor {
    /// Register an archive from disk. The size ceiling is checked before
    /// the file is read, and again nothing is sent when it fails.
    pub async fn ingest(
        &self,
        gateway: &dyn Gateway,
        path: &Path,
    ) -> Result<Artifact, IngestError> {
        let metadata = tokio::fs::metadata(path).await.map_err(|source| IngestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if metadata.len() > MAX_ARCHIVE_BYTES {
            return Err(IngestError::ArchiveTooLarge {
                size: metadata.len(),
                limit: MAX_ARCHIVE_BYTES,
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(|source| IngestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project.zip".to_string());
        self.ingest_bytes(gateway, &file_name, bytes).await
    }

    /// Register archive bytes already held in memory.
    pub async fn ingest_bytes(
        &self,
        gateway: &dyn Gateway,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Artifact, IngestError> {
        if bytes.len() as u64 > MAX_ARCHIVE_BYTES {
            return Err(IngestError::ArchiveTooLarge {
                size: bytes.len() as u64,
                limit: MAX_ARCHIVE_BYTES,
            });
        }

        debug!(file_name, size = bytes.len(), "registering project archive");
        let registration = gateway.upload_archive(file_name, bytes).await?;
        info!(
            project_id = %registration.project_id,
            files = registration.total_files,
            "project registered"
        );
        Ok(project_artifact(registration))
    }
}

/// Two-phase repository ingestion: `validate` must succeed for a URL
/// before `download` is permitted for it.
#[derive(Debug, Default)]
pub struct RepoIngestor {
    validated: HashMap<String, RepoValidation>,
}

impl RepoIngestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase one: check the repository reference with the backend.
    ///
    /// Malformed URLs are rejected before the network call. A negative
    /// validation is returned as a value and does not authorize download.
    pub async fn validate(
        &mut self,
        gateway: &dyn Gateway,
        repo_url: &str,
    ) -> Result<RepoValidation, IngestError> {
        validation::validate_repository_url(repo_url)
            .map_err(|e| IngestError::InvalidRepository(e.to_string()))?;

        let result = gateway.validate_repository(repo_url).await?;
        if result.valid {
            self.validated.insert(repo_url.to_string(), result.clone());
        } else {
            self.validated.remove(repo_url);
        }
        Ok(result)
    }

    /// Whether a URL currently holds a successful validation.
    pub fn is_validated(&self, repo_url: &str) -> bool {
        self.validated.contains_key(repo_url)
    }

    /// Phase two: download a previously validated repository.
    ///
    /// The gateway re-validates independently before transferring, so a
    /// repository that disappeared between the phases still fails cleanly.
    pub async fn download(
        &mut self,
        gateway: &dyn Gateway,
        repo_url: &str,
    ) -> Result<Artifact, IngestError> {
        let validation = self
            .validated
            .get(repo_url)
            .cloned()
            .ok_or_else(|| IngestError::NotValidated(repo_url.to_string()))?;

        let registration = gateway.download_repository(repo_url).await?;
        info!(
            project_id = %registration.project_id,
            files = registration.total_files,
            repo_url,
            "repository downloaded"
        );

        let origin = RepoOrigin {
            url: repo_url.to_string(),
            name: validation.name.unwrap_or_else(|| registration.project_name.clone()),
            language: validation.language,
            description: validation.description,
        };
        Ok(repository_artifact(registration, origin))
    }
}

fn artifact_files(registration: &ProjectRegistration) -> Vec<ArtifactFile> {
    registration
        .files
        .iter()
        .enumerate()
        .map(|(index, f)| ArtifactFile {
            name: f.name.clone(),
            path: f.path.clone(),
            size: f.size,
            index,
        })
        .collect()
}

fn project_artifact(registration: ProjectRegistration) -> Artifact {
    let files = artifact_files(&registration);
    Artifact::Project {
        project_id: registration.project_id,
        project_name: registration.project_name,
        files,
    }
}

fn repository_artifact(registration: ProjectRegistration, origin: RepoOrigin) -> Artifact {
    let files = artifact_files(&registration);
    Artifact::Repository {
        project_id: registration.project_id,
        project_name: registration.project_name,
        origin,
        files,
    }
}
