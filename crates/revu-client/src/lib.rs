// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST API client for the Revu backend service
//!
//! This crate provides the production HTTP client for the code review
//! backend. It implements the [`revu_client_api::Gateway`] trait over
//! reqwest with bounded per-call-class timeouts, normalizes the backend's
//! heterogeneous analysis result fields into one shape, and absorbs every
//! transport-level failure into the single [`revu_client_api::GatewayError`]
//! channel.
//!
//! The client performs exactly one attempt per call; retries are the
//! caller's decision.

pub mod client;
pub mod timeouts;

pub use client::*;
