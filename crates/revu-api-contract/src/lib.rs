// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Revu backend REST API contract types and validation
//!
//! This crate defines the request/response schema for the code review
//! backend, including the heterogeneous analysis envelopes and their
//! normalization into a single result shape. The types are shared between
//! the production client and test doubles so both speak the exact same
//! wire format.

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;
