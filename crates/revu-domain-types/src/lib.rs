// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types for the Revu code review client
//!
//! This crate contains the core domain types shared across the Revu
//! components: the artifact model produced by ingestion, the analysis
//! vocabulary consumed by the batch runner, and the conversation types
//! used by the chat session manager.
//!
//! These types are UI-agnostic and perform no I/O.

pub mod analysis;
pub mod artifact;
pub mod chat;
pub mod model;

// Re-export commonly used types
pub use analysis::*;
pub use artifact::*;
pub use chat::*;
pub use model::*;
