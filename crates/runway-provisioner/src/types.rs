// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request, naming and report types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest name Kubernetes accepts for a namespace, pod or service.
pub const MAX_NAME_LEN: usize = 63;

/// Source repository of the backend to provision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitInfo {
	pub repo_url: String,
	#[serde(default)]
	pub commit_id: String,
}

/// A backend provisioning request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionRequest {
	pub user_id: i64,
	pub git_info: GitInfo,
	pub language: String,
	#[serde(default)]
	pub database: String,
	pub environment: String,
	pub project_name: String,
}

/// JSON envelope accepted by the API: `{"data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBody {
	pub data: ProvisionRequest,
}

/// A request that cannot be provisioned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
	#[error("missing required field: {0}")]
	MissingField(&'static str),

	#[error("invalid resource name {name:?}: {reason}")]
	InvalidName { name: String, reason: &'static str },
}

impl ProvisionRequest {
	/// Reject requests whose fields are empty or whose derived names the
	/// cluster would refuse.
	pub fn validate(&self) -> Result<(), RequestError> {
		let required = [
			("project_name", &self.project_name),
			("environment", &self.environment),
			("language", &self.language),
			("git_info.repo_url", &self.git_info.repo_url),
		];
		for (field, value) in required {
			if value.trim().is_empty() {
				return Err(RequestError::MissingField(field));
			}
		}

		let names = ResourceNames::derive(self);
		// Services follow RFC 1035 and must start with a letter; the pod name
		// shares their prefix.
		for (name, letter_first) in [
			(&names.namespace, false),
			(&names.config_map, false),
			(&names.workload, true),
			(&names.container, false),
			(&names.service, true),
		] {
			validate_dns_label(name, letter_first)?;
		}
		Ok(())
	}
}

fn validate_dns_label(name: &str, letter_first: bool) -> Result<(), RequestError> {
	let invalid = |reason| RequestError::InvalidName {
		name: name.to_string(),
		reason,
	};
	if name.len() > MAX_NAME_LEN {
		return Err(invalid("longer than 63 characters"));
	}
	if !name
		.chars()
		.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
	{
		return Err(invalid("only lowercase letters, digits and '-' are allowed"));
	}
	if letter_first && !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
		return Err(invalid("must start with a letter"));
	}
	if !name.starts_with(|c: char| c.is_ascii_alphanumeric()) {
		return Err(invalid("must start with a letter or digit"));
	}
	if name.ends_with('-') {
		return Err(invalid("must end with a letter or digit"));
	}
	Ok(())
}

pub fn namespace_name(project_name: &str, user_id: i64) -> String {
	format!("{project_name}-{user_id}-ns")
}

pub fn config_map_name(project_name: &str) -> String {
	format!("{project_name}-cfm")
}

pub fn workload_name(environment: &str, project_name: &str) -> String {
	format!("{environment}-{project_name}-app")
}

pub fn container_name(workload: &str) -> String {
	format!("{workload}-container")
}

pub fn service_name(workload: &str) -> String {
	format!("{workload}-service")
}

/// Every cluster resource name derived from a request.
///
/// Both flows derive names the same way, so `test` finds the pod `create`
/// made for an identical request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
	pub namespace: String,
	pub config_map: String,
	pub workload: String,
	pub container: String,
	pub service: String,
}

impl ResourceNames {
	pub fn derive(request: &ProvisionRequest) -> Self {
		let workload = workload_name(&request.environment, &request.project_name);
		Self {
			namespace: namespace_name(&request.project_name, request.user_id),
			config_map: config_map_name(&request.project_name),
			container: container_name(&workload),
			service: service_name(&workload),
			workload,
		}
	}
}

/// Captured output of one script execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutput {
	pub stdout: String,
	pub stderr: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
	Success,
	Failed,
}

impl fmt::Display for ReportStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ReportStatus::Success => write!(f, "success"),
			ReportStatus::Failed => write!(f, "failed"),
		}
	}
}

/// Body posted to the orchestration callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
	pub status: ReportStatus,
	pub step: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub details: Option<String>,
	pub git_info: GitInfo,
}
