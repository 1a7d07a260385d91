// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, Request, StatusCode};
use runway_k8s::{MockExec, MockOperation};
use tower::ServiceExt;

use super::support::{json_body, request_body, send, TestApp};

#[tokio::test]
async fn create_provisions_executes_and_reports() {
	let app = TestApp::new(202, 1).await;
	app.client.set_exec(MockExec::success("Done", ""));

	let response = app.post("/create", request_body()).await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = json_body(response).await;
	assert_eq!(body["message"], "Backend created successfully");
	assert_eq!(body["data"]["project_name"], "demo");
	assert_eq!(body["output"]["stdout"], "Done");
	assert_eq!(body["output"]["stderr"], "");

	assert_eq!(
		app.client.calls(),
		vec![
			"create_namespace:demo-1-ns",
			"create_config_map:demo-cfm",
			"create_pod:dev-demo-app",
			"create_service:dev-demo-app-service",
			"exec:dev-demo-app",
		]
	);

	let received = app.callback.received_requests().await.unwrap();
	let report: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
	assert_eq!(
		report,
		serde_json::json!({
			"status": "success",
			"step": "response from k8s",
			"details": "Done",
			"git_info": {"repo_url": "https://x/y.git", "commit_id": "abc123"}
		})
	);
}

#[tokio::test]
async fn create_alias_route_is_served() {
	let app = TestApp::new(202, 1).await;
	app.client.set_exec(MockExec::success("ok", ""));

	let response = app.post("/api/createbackend", request_body()).await;
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn script_config_failure_is_500_without_report() {
	let app = TestApp::new(202, 0).await;
	app.client
		.fail_on(MockOperation::CreateConfigMap, "quota exceeded");

	let response = app.post("/create", request_body()).await;
	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

	let body = json_body(response).await;
	assert_eq!(body["error"], "script_config_failed");
	assert!(body["message"].as_str().unwrap().contains("quota exceeded"));
	assert!(app.client.pods().is_empty());
}

#[tokio::test]
async fn namespace_conflict_is_namespace_failed() {
	let app = TestApp::new(202, 1).await;
	app.client.set_exec(MockExec::success("ok", ""));

	assert_eq!(
		app.post("/create", request_body()).await.status(),
		StatusCode::OK
	);
	let response = app.post("/create", request_body()).await;
	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(json_body(response).await["error"], "namespace_failed");
}

#[tokio::test]
async fn pod_failure_is_deploy_failed() {
	let app = TestApp::new(202, 0).await;
	app.client.fail_on(MockOperation::CreatePod, "forbidden");

	let response = app.post("/create", request_body()).await;
	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(json_body(response).await["error"], "deploy_failed");
}

#[tokio::test]
async fn test_executes_in_existing_workload() {
	let app = TestApp::new(202, 1).await;
	app.client.insert_pod("demo-1-ns", "dev-demo-app");
	app.client.set_exec(MockExec::success("again\n", "warn\n"));

	let response = app.post("/test", request_body()).await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = json_body(response).await;
	assert_eq!(body["message"], "Backend tested successfully");
	assert_eq!(body["output"]["stdout"], "again\n");
	assert_eq!(body["output"]["stderr"], "warn\n");
	assert_eq!(app.client.calls(), vec!["exec:dev-demo-app"]);
}

#[tokio::test]
async fn test_alias_route_is_served() {
	let app = TestApp::new(202, 1).await;
	app.client.insert_pod("demo-1-ns", "dev-demo-app");
	app.client.set_exec(MockExec::success("ok", ""));

	let response = app.post("/api/testbackend", request_body()).await;
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn failed_script_is_500_after_reporting() {
	let app = TestApp::new(202, 1).await;
	app.client.insert_pod("demo-1-ns", "dev-demo-app");
	app.client.set_exec(MockExec::failure("", "npm ERR!\n"));

	let response = app.post("/test", request_body()).await;
	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

	let body = json_body(response).await;
	assert_eq!(body["error"], "execution_failed");
	assert_eq!(body["output"]["stderr"], "npm ERR!\n");
}

#[tokio::test]
async fn rejected_report_is_report_failed() {
	let app = TestApp::new(200, 1).await;
	app.client.insert_pod("demo-1-ns", "dev-demo-app");
	app.client.set_exec(MockExec::success("Done", ""));

	let response = app.post("/test", request_body()).await;
	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

	let body = json_body(response).await;
	assert_eq!(body["error"], "report_failed");
	assert_eq!(
		body["message"],
		"Failed to send response back to the orchestration app"
	);
}

#[tokio::test]
async fn malformed_body_is_400() {
	let app = TestApp::new(202, 0).await;

	let response = app.post_raw("/create", "{not json").await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let body = json_body(response).await;
	assert_eq!(body["error"], "invalid_request");
	assert_eq!(body["message"], "Invalid request body");
	assert!(app.client.calls().is_empty());
}

#[tokio::test]
async fn missing_fields_are_400() {
	let app = TestApp::new(202, 0).await;

	let response = app
		.post("/test", serde_json::json!({"data": {"user_id": 1}}))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_resource_names_are_400() {
	let app = TestApp::new(202, 0).await;
	let mut body = request_body();
	body["data"]["project_name"] = "Not_Valid".into();

	let response = app.post("/create", body).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert!(json_body(response).await["message"]
		.as_str()
		.unwrap()
		.contains("Not_Valid"));
	assert!(app.client.calls().is_empty());
}

#[tokio::test]
async fn missing_cluster_client_is_client_init_failed() {
	let router = TestApp::without_cluster();
	let body = serde_json::to_string(&request_body()).unwrap();

	let response = send(&router, Method::POST, "/create", Some(body)).await;
	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(json_body(response).await["error"], "client_init_failed");
}

#[tokio::test]
async fn cors_preflight_allows_post() {
	let app = TestApp::new(202, 0).await;
	let request = Request::builder()
		.method(Method::OPTIONS)
		.uri("/create")
		.header("origin", "http://ui.example")
		.header("access-control-request-method", "POST")
		.header("access-control-request-headers", "content-type")
		.body(axum::body::Body::empty())
		.unwrap();

	let response = app.router.clone().oneshot(request).await.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		response.headers()["access-control-allow-origin"],
		"*"
	);
}
