// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use axum::{
	body::Body,
	http::{Method, Request},
	response::Response,
	Router,
};
use runway_k8s::MockK8sClient;
use runway_provisioner::{ProvisionerConfig, ReporterConfig, ResultReporter};
use runway_server::{cors_layer, create_router, AppState};
use serde::Serialize;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CALLBACK_PATH: &str = "/api/backend/status";

pub fn request_body() -> Value {
	json!({
		"data": {
			"user_id": 1,
			"git_info": {"repo_url": "https://x/y.git", "commit_id": "abc123"},
			"language": "python",
			"database": "",
			"environment": "dev",
			"project_name": "demo"
		}
	})
}

pub struct TestApp {
	pub router: Router,
	pub client: Arc<MockK8sClient>,
	pub callback: MockServer,
}

impl TestApp {
	/// App backed by a mock cluster and a callback receiver answering
	/// `callback_status`, expected to be hit `expected_reports` times.
	pub async fn new(callback_status: u16, expected_reports: u64) -> Self {
		let callback = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path(CALLBACK_PATH))
			.respond_with(ResponseTemplate::new(callback_status))
			.expect(expected_reports)
			.mount(&callback)
			.await;

		let client = Arc::new(MockK8sClient::new());
		let reporter = ResultReporter::new(&ReporterConfig::new(format!(
			"{}{CALLBACK_PATH}",
			callback.uri()
		)))
		.unwrap();
		let state = AppState::new(client.clone(), ProvisionerConfig::default(), reporter);

		Self {
			router: create_router(state).layer(cors_layer()),
			client,
			callback,
		}
	}

	/// App with no cluster access.
	pub fn without_cluster() -> Router {
		create_router(AppState::without_cluster())
	}

	pub async fn get(&self, uri: &str) -> Response<Body> {
		send(&self.router, Method::GET, uri, None).await
	}

	pub async fn post(&self, uri: &str, body: impl Serialize) -> Response<Body> {
		let body = serde_json::to_string(&body).unwrap();
		send(&self.router, Method::POST, uri, Some(body)).await
	}

	pub async fn post_raw(&self, uri: &str, body: &str) -> Response<Body> {
		send(&self.router, Method::POST, uri, Some(body.to_string())).await
	}
}

pub async fn send(
	router: &Router,
	method: Method,
	uri: &str,
	body: Option<String>,
) -> Response<Body> {
	let mut builder = Request::builder().method(method).uri(uri);
	let request_body = match body {
		Some(b) => {
			builder = builder.header("content-type", "application/json");
			Body::from(b)
		}
		None => Body::empty(),
	};
	router
		.clone()
		.oneshot(builder.body(request_body).unwrap())
		.await
		.unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}
