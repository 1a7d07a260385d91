// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};

use super::support::{json_body, send, TestApp};

#[tokio::test]
async fn health_reports_cluster_access() {
	let app = TestApp::new(202, 0).await;
	let response = app.get("/health").await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = json_body(response).await;
	assert_eq!(body["status"], "ok");
	assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
	assert_eq!(body["kubernetes"], true);
}

#[tokio::test]
async fn health_without_cluster() {
	let router = TestApp::without_cluster();
	let response = send(&router, Method::GET, "/health", None).await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await["kubernetes"], false);
}
