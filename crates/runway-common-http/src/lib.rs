// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client utilities for Runway.
//!
//! Every outbound client carries the same `User-Agent` so the orchestration
//! service can tell provisioner callbacks apart from other traffic.

mod client;

pub use client::{builder, new_client_with_timeout, user_agent};
