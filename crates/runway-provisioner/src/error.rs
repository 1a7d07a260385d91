// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provisioner error types.

use std::time::Duration;

use runway_k8s::K8sError;

use crate::pipeline::Stage;
use crate::types::{ExecutionOutput, StatusReport};

/// A cluster operation failed during provisioning.
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed: {source}")]
pub struct ProvisionError {
	pub stage: Stage,
	#[source]
	pub source: K8sError,
}

/// Script execution failed. Carries whatever output was captured.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
	/// The script ran past the execution deadline
	#[error("Execution timed out after {timeout:?}")]
	Timeout {
		timeout: Duration,
		output: ExecutionOutput,
	},

	/// Non-zero exit, missing exit status, or exec channel failure
	#[error("Command execution failed: {message}")]
	Failed {
		message: String,
		output: ExecutionOutput,
	},
}

impl ExecutionError {
	/// Output captured before the failure.
	pub fn output(&self) -> &ExecutionOutput {
		match self {
			ExecutionError::Timeout { output, .. } | ExecutionError::Failed { output, .. } => output,
		}
	}

	pub fn is_timeout(&self) -> bool {
		matches!(self, ExecutionError::Timeout { .. })
	}
}

/// Delivering the status report failed.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
	#[error("Failed to build HTTP client: {0}")]
	ClientBuild(#[source] reqwest::Error),

	#[error("Failed to serialize status report: {0}")]
	Serialize(#[from] serde_json::Error),

	#[error("Failed to send status report: {0}")]
	Transport(#[source] reqwest::Error),

	#[error("Orchestrator returned unexpected status: {status}")]
	UnexpectedStatus { status: reqwest::StatusCode },
}

/// Terminal failure of a request flow.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
	/// Provisioning failed; nothing was executed or reported
	#[error(transparent)]
	Provision(#[from] ProvisionError),

	/// The script failed; the report was still delivered
	#[error("{error}")]
	Execution {
		error: ExecutionError,
		report: StatusReport,
	},

	/// The report could not be delivered
	#[error("{error}")]
	Report {
		error: ReportError,
		output: ExecutionOutput,
	},
}

impl FlowError {
	/// The stage at which the flow stopped.
	pub fn stage(&self) -> Stage {
		match self {
			FlowError::Provision(e) => e.stage,
			FlowError::Execution { .. } => Stage::Execute,
			FlowError::Report { .. } => Stage::Report,
		}
	}
}
