// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provisioner configuration.

use std::time::Duration;

/// Default bound on a single script execution.
pub const DEFAULT_EXEC_TIMEOUT_SECS: u64 = 300;

/// Configuration for provisioning and script execution.
#[derive(Debug, Clone)]
pub struct ProvisionerConfig {
	/// Image tag appended to the language name (`python` → `python:latest`)
	pub image_tag: String,
	/// Maximum time a script may run before it is cancelled
	pub exec_timeout_secs: u64,
}

impl ProvisionerConfig {
	pub fn exec_timeout(&self) -> Duration {
		Duration::from_secs(self.exec_timeout_secs)
	}
}

impl Default for ProvisionerConfig {
	fn default() -> Self {
		Self {
			image_tag: "latest".to_string(),
			exec_timeout_secs: DEFAULT_EXEC_TIMEOUT_SECS,
		}
	}
}

/// Configuration for the orchestration status callback.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
	/// Endpoint receiving status reports
	pub callback_url: String,
	/// HTTP timeout for a single report
	pub timeout_secs: u64,
}

impl ReporterConfig {
	pub fn new(callback_url: impl Into<String>) -> Self {
		Self {
			callback_url: callback_url.into(),
			timeout_secs: 30,
		}
	}
}
