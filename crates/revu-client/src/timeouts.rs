// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-call-class deadlines
//!
//! Every gateway call carries exactly one of these deadlines. Health and
//! validation probes fail fast; single analysis and chat calls wait for
//! one model invocation; archive and repository transfers get the longest
//! budget.

use std::time::Duration;

/// Health checks and repository validation probes.
pub const PROBE: Duration = Duration::from_secs(5);

/// Single analysis and conversational calls.
pub const ANALYSIS: Duration = Duration::from_secs(60);

/// Archive upload, repository download, and project-file analysis.
pub const TRANSFER: Duration = Duration::from_secs(120);
