// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side orchestration core for the Revu code review platform
//!
//! This crate ties the pieces together on the client side of the system:
//!
//! - [`ingest`] turns the three upload paths (single source file, ZIP
//!   project archive, remote repository reference) into one [`Artifact`]
//!   model, rejecting invalid inputs before any network call.
//! - [`analysis`] drives a user-selected batch of analysis kinds against
//!   one artifact strictly sequentially, reporting fractional progress
//!   and aggregating per-kind success and failure.
//! - [`chat`] scopes follow-up conversations to the whole artifact or one
//!   file within it, keeping an append-only history per scope.
//! - [`workspace`] owns the current artifact and cascade-invalidates
//!   outcomes and chat histories whenever it is replaced.
//!
//! All network I/O goes through the [`revu_client_api::Gateway`] trait;
//! nothing in this crate talks to the backend directly.
//!
//! [`Artifact`]: revu_domain_types::Artifact

pub mod analysis;
pub mod chat;
pub mod ingest;
pub mod workspace;

pub use analysis::{
    AnalysisEvent, AnalysisRunner, AnalysisSelection, CancelToken, OutcomeMap, RunError,
    RunReport, RunStatus,
};
pub use chat::{suggestions, ChatSession, SessionError};
pub use ingest::{
    ArchiveIngestor, IngestError, RepoIngestor, SingleFileIngestor, MAX_ARCHIVE_BYTES,
};
pub use workspace::{Workspace, WorkspaceError};
