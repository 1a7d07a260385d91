// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use runway_provisioner::{ExecutionOutput, FlowError, Stage};
use serde::Serialize;

/// Server error types for backend requests.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// Invalid request payload.
	#[error("Invalid request: {0}")]
	BadRequest(String),

	/// No Kubernetes client could be created at startup.
	#[error("Kubernetes client unavailable")]
	ClientInit,

	/// A request flow failed.
	#[error(transparent)]
	Flow(#[from] FlowError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
	/// Output captured before an execution failure.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub output: Option<ExecutionOutput>,
}

impl ErrorResponse {
	fn new(error: &str, message: impl Into<String>) -> Self {
		Self {
			error: error.to_string(),
			message: message.into(),
			output: None,
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, body) = match self {
			ServerError::BadRequest(message) => (
				StatusCode::BAD_REQUEST,
				ErrorResponse::new("invalid_request", message),
			),
			ServerError::ClientInit => (
				StatusCode::INTERNAL_SERVER_ERROR,
				ErrorResponse::new("client_init_failed", "Failed to initialize Kubernetes client"),
			),
			ServerError::Flow(FlowError::Provision(e)) => {
				let (error, action) = match e.stage {
					Stage::Namespace => ("namespace_failed", "Failed to create namespace"),
					Stage::ScriptConfig => ("script_config_failed", "Failed to create script config"),
					_ => ("deploy_failed", "Failed to deploy workload"),
				};
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new(error, format!("{action}: {}", e.source)),
				)
			}
			ServerError::Flow(FlowError::Execution { error, .. }) => {
				let message = error.to_string();
				let mut body = ErrorResponse::new("execution_failed", message);
				body.output = Some(error.output().clone());
				(StatusCode::INTERNAL_SERVER_ERROR, body)
			}
			ServerError::Flow(FlowError::Report { error, .. }) => {
				tracing::error!(error = %error, "status report failed");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new(
						"report_failed",
						"Failed to send response back to the orchestration app",
					),
				)
			}
		};

		(status, Json(body)).into_response()
	}
}
