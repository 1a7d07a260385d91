// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Backend create and test handlers.

use axum::{
	extract::{rejection::JsonRejection, State},
	Json,
};
use runway_provisioner::{ExecutionOutput, ProvisionRequest, RequestBody};
use serde::Serialize;

use crate::{api::AppState, error::ServerError};

#[derive(Debug, Serialize)]
pub struct BackendResponse {
	pub message: &'static str,
	pub data: ProvisionRequest,
	pub output: ExecutionOutput,
}

fn parse_request(
	payload: Result<Json<RequestBody>, JsonRejection>,
) -> Result<ProvisionRequest, ServerError> {
	let Json(body) = payload.map_err(|rejection| {
		tracing::debug!(error = %rejection, "rejected request body");
		ServerError::BadRequest("Invalid request body".to_string())
	})?;
	body.data
		.validate()
		.map_err(|e| ServerError::BadRequest(format!("Invalid request body: {e}")))?;
	Ok(body.data)
}

/// POST /create - provision a backend, run its setup script and report.
#[tracing::instrument(skip_all)]
pub async fn create_backend(
	State(state): State<AppState>,
	payload: Result<Json<RequestBody>, JsonRejection>,
) -> Result<Json<BackendResponse>, ServerError> {
	let request = parse_request(payload)?;
	let outcome = state.handler()?.create(&request).await?;

	Ok(Json(BackendResponse {
		message: "Backend created successfully",
		data: request,
		output: outcome.output,
	}))
}

/// POST /test - re-run the setup script in an existing backend and report.
#[tracing::instrument(skip_all)]
pub async fn test_backend(
	State(state): State<AppState>,
	payload: Result<Json<RequestBody>, JsonRejection>,
) -> Result<Json<BackendResponse>, ServerError> {
	let request = parse_request(payload)?;
	let outcome = state.handler()?.test(&request).await?;

	Ok(Json(BackendResponse {
		message: "Backend tested successfully",
		data: request,
		output: outcome.output,
	}))
}
