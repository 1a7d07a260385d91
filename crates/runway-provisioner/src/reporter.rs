// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Status reporting to the orchestration callback.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::config::ReporterConfig;
use crate::error::ReportError;
use crate::types::{ExecutionOutput, GitInfo, ReportStatus, StatusReport};

/// Step name carried by every status report.
pub const REPORT_STEP: &str = "response from k8s";

const JSON: &str = "application/json";

/// Classify captured output into a status report.
///
/// Non-empty stdout is a success with stdout as details; otherwise the run is
/// failed with stderr as details. The exit status plays no part.
pub fn build_report(output: &ExecutionOutput, git_info: &GitInfo) -> StatusReport {
	let (status, details) = if output.stdout.is_empty() {
		(ReportStatus::Failed, &output.stderr)
	} else {
		(ReportStatus::Success, &output.stdout)
	};

	StatusReport {
		status,
		step: REPORT_STEP.to_string(),
		details: (!details.is_empty()).then(|| details.clone()),
		git_info: git_info.clone(),
	}
}

/// Posts status reports to the orchestration service.
#[derive(Debug, Clone)]
pub struct ResultReporter {
	http_client: reqwest::Client,
	endpoint: String,
}

impl ResultReporter {
	pub fn new(config: &ReporterConfig) -> Result<Self, ReportError> {
		let http_client =
			runway_common_http::new_client_with_timeout(Duration::from_secs(config.timeout_secs))
				.map_err(ReportError::ClientBuild)?;
		Ok(Self {
			http_client,
			endpoint: config.callback_url.clone(),
		})
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Classify `output` and deliver the report. Only `202 Accepted` counts
	/// as delivered.
	#[tracing::instrument(skip_all, fields(endpoint = %self.endpoint))]
	pub async fn report(
		&self,
		output: &ExecutionOutput,
		git_info: &GitInfo,
	) -> Result<StatusReport, ReportError> {
		let report = build_report(output, git_info);
		let body = serde_json::to_vec(&report)?;

		let response = self
			.http_client
			.post(&self.endpoint)
			.header(CONTENT_TYPE, JSON)
			.header(ACCEPT, JSON)
			.body(body)
			.send()
			.await
			.map_err(ReportError::Transport)?;

		let status = response.status();
		if status != StatusCode::ACCEPTED {
			tracing::warn!(%status, "Orchestrator rejected status report");
			return Err(ReportError::UnexpectedStatus { status });
		}

		tracing::info!(report_status = %report.status, "Status report accepted");
		Ok(report)
	}
}
