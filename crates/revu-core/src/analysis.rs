// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The analysis batch runner
//!
//! [`AnalysisRunner`] drives a non-empty selection of analysis kinds
//! against one artifact, strictly sequentially in the caller-supplied
//! order. Sequential execution is a deliberate backpressure choice: at
//! most one gateway call is in flight per batch, so the backend's model
//! serving capacity is never fanned out per user, and progress is
//! deterministic and legible.
//!
//! Before kind `i` of `n` starts, progress is `(i - 1 + 0.5) / n`; when it
//! completes, `i / n`. A failing kind is recorded as that kind's outcome
//! and the loop continues; there is no single pass/fail verdict for a
//! batch. A cancellation token is checked between kinds only, so a
//! cancelled batch keeps the outcomes it already collected and records
//! the rest as skipped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use revu_client_api::Gateway;
use revu_domain_types::{AnalysisKind, AnalysisOutcome, Artifact, ModelChoice};

/// Errors that make a batch unrunnable. Per-kind analysis failures are
/// not errors here; they land in the outcome map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("At least one analysis kind must be selected")]
    EmptySelection,

    #[error("A file must be selected to analyze a multi-file artifact")]
    FileIndexRequired,

    #[error("File index {index} is out of range for a project with {total} files")]
    FileIndexOutOfRange { index: usize, total: usize },
}

/// A validated, ordered, de-duplicated set of analysis kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSelection(Vec<AnalysisKind>);

impl AnalysisSelection {
    /// Build a selection from the caller-supplied order. Duplicates keep
    /// their first position; an empty selection is rejected.
    pub fn new(kinds: impl IntoIterator<Item = AnalysisKind>) -> Result<Self, RunError> {
        let mut ordered = Vec::new();
        for kind in kinds {
            if !ordered.contains(&kind) {
                ordered.push(kind);
            }
        }
        if ordered.is_empty() {
            return Err(RunError::EmptySelection);
        }
        Ok(Self(ordered))
    }

    /// Every kind the platform offers, in catalog order.
    pub fn all() -> Self {
        Self(AnalysisKind::ALL.to_vec())
    }

    pub fn kinds(&self) -> &[AnalysisKind] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Cooperative cancellation flag, checked between kinds.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisEvent {
    /// Kind `index` of `total` is about to start; `fraction` is the
    /// in-flight marker `(index + 0.5) / total`.
    Started {
        kind: AnalysisKind,
        index: usize,
        total: usize,
        fraction: f64,
    },
    /// Kind `index` finished (successfully or not); `fraction` is
    /// `(index + 1) / total`.
    Finished {
        kind: AnalysisKind,
        index: usize,
        total: usize,
        fraction: f64,
        success: bool,
    },
    /// The batch reached its terminal state.
    BatchComplete { status: RunStatus },
}

impl AnalysisEvent {
    pub fn fraction(&self) -> f64 {
        match self {
            AnalysisEvent::Started { fraction, .. } | AnalysisEvent::Finished { fraction, .. } => {
                *fraction
            }
            AnalysisEvent::BatchComplete { .. } => 1.0,
        }
    }
}

/// Terminal status of a batch. Partial failure is representable; there is
/// no aggregate pass/fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every requested kind succeeded.
    Completed,
    /// Every requested kind ran; at least one recorded an error.
    CompletedWithErrors,
    /// The batch was cancelled between kinds; unreached kinds are skipped.
    Cancelled,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Completed => write!(f, "complete"),
            RunStatus::CompletedWithErrors => write!(f, "complete with errors"),
            RunStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Per-kind outcomes in the order the kinds were requested.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutcomeMap(Vec<(AnalysisKind, AnalysisOutcome)>);

impl OutcomeMap {
    fn record(&mut self, kind: AnalysisKind, outcome: AnalysisOutcome) {
        self.0.push((kind, outcome));
    }

    pub fn get(&self, kind: AnalysisKind) -> Option<&AnalysisOutcome> {
        self.0.iter().find(|(k, _)| *k == kind).map(|(_, o)| o)
    }

    pub fn kinds(&self) -> impl Iterator<Item = AnalysisKind> + '_ {
        self.0.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnalysisKind, &AnalysisOutcome)> {
        self.0.iter().map(|(k, o)| (*k, o))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn successes(&self) -> usize {
        self.0.iter().filter(|(_, o)| o.is_success()).count()
    }
}

/// The final state of one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outcomes: OutcomeMap,
    pub status: RunStatus,
    /// The file the batch ran against, for multi-file artifacts.
    pub file_index: Option<usize>,
}

/// Sequential batch executor over the gateway.
#[derive(Clone)]
pub struct AnalysisRunner {
    gateway: Arc<dyn Gateway>,
}

impl AnalysisRunner {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Run a batch, discarding progress events.
    pub async fn run(
        &self,
        artifact: &Artifact,
        selection: &AnalysisSelection,
        model: ModelChoice,
        file_index: Option<usize>,
    ) -> Result<RunReport, RunError> {
        self.run_with_events(artifact, selection, model, file_index, None, None).await
    }

    /// Run a batch with observable progress and optional cancellation.
    ///
    /// Events are best-effort: a dropped receiver never fails the run.
    pub async fn run_with_events(
        &self,
        artifact: &Artifact,
        selection: &AnalysisSelection,
        model: ModelChoice,
        file_index: Option<usize>,
        events: Option<&UnboundedSender<AnalysisEvent>>,
        cancel: Option<&CancelToken>,
    ) -> Result<RunReport, RunError> {
        let target = AnalysisTarget::resolve(artifact, file_index)?;
        let total = selection.len();
        let mut outcomes = OutcomeMap::default();
        let mut cancelled = false;

        for (index, &kind) in selection.kinds().iter().enumerate() {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                cancelled = true;
                for &remaining in &selection.kinds()[index..] {
                    outcomes.record(remaining, AnalysisOutcome::Skipped);
                }
                break;
            }

            emit(
                events,
                AnalysisEvent::Started {
                    kind,
                    index,
                    total,
                    fraction: (index as f64 + 0.5) / total as f64,
                },
            );
            info!(kind = %kind, index, total, "running analysis");

            let outcome = match self.call(&target, kind, model).await {
                Ok(result) => AnalysisOutcome::Success {
                    result_text: result.result_text,
                    execution_time_seconds: result.execution_time_seconds,
                    model_used: result.model_used,
                },
                Err(e) => {
                    warn!(kind = %kind, error = %e, "analysis kind failed; batch continues");
                    AnalysisOutcome::Error {
                        message: e.to_string(),
                    }
                }
            };
            let success = outcome.is_success();
            outcomes.record(kind, outcome);

            emit(
                events,
                AnalysisEvent::Finished {
                    kind,
                    index,
                    total,
                    fraction: (index + 1) as f64 / total as f64,
                    success,
                },
            );
        }

        let status = if cancelled {
            RunStatus::Cancelled
        } else if outcomes.successes() == total {
            RunStatus::Completed
        } else {
            RunStatus::CompletedWithErrors
        };
        emit(events, AnalysisEvent::BatchComplete { status });
        info!(%status, successes = outcomes.successes(), total, "batch finished");

        Ok(RunReport {
            outcomes,
            status,
            file_index: target.file_index(),
        })
    }

    async fn call(
        &self,
        target: &AnalysisTarget<'_>,
        kind: AnalysisKind,
        model: ModelChoice,
    ) -> revu_client_api::GatewayResult<revu_api_contract::AnalysisResult> {
        match target {
            AnalysisTarget::Code { code } => self.gateway.analyze(kind, code, model).await,
            AnalysisTarget::ProjectFile {
                project_id,
                file_index,
            } => {
                self.gateway
                    .analyze_project_file(project_id, *file_index, kind, model)
                    .await
            }
        }
    }
}

/// What a batch analyzes: in-memory code or one file of a registered
/// project.
enum AnalysisTarget<'a> {
    Code { code: &'a str },
    ProjectFile {
        project_id: &'a str,
        file_index: usize,
    },
}

impl<'a> AnalysisTarget<'a> {
    fn resolve(artifact: &'a Artifact, file_index: Option<usize>) -> Result<Self, RunError> {
        match artifact {
            // The whole file is the implicit target; a stray index is
            // meaningless and ignored.
            Artifact::SingleFile { code, .. } => Ok(AnalysisTarget::Code { code }),
            Artifact::Project { project_id, files, .. }
            | Artifact::Repository { project_id, files, .. } => {
                let index = file_index.ok_or(RunError::FileIndexRequired)?;
                if index >= files.len() {
                    return Err(RunError::FileIndexOutOfRange {
                        index,
                        total: files.len(),
                    });
                }
                Ok(AnalysisTarget::ProjectFile {
                    project_id,
                    file_index: index,
                })
            }
        }
    }

    fn file_index(&self) -> Option<usize> {
        match self {
            AnalysisTarget::Code { .. } => None,
            AnalysisTarget::ProjectFile { file_index, .. } => Some(*file_index),
        }
    }
}

fn emit(events: Option<&UnboundedSender<AnalysisEvent>>, event: AnalysisEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}
