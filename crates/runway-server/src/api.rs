// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Router and shared application state.

use std::sync::Arc;

use axum::{
	http::{header, Method},
	routing::{get, post},
	Router,
};
use runway_k8s::{K8sClient, KubeClient};
use runway_provisioner::{ReportError, ReporterConfig, RequestHandler, ResultReporter};
use runway_server_config::ServerConfig;
use tower_http::cors::{Any, CorsLayer};

use crate::error::ServerError;
use crate::routes;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
	/// `None` when no Kubernetes client could be created at startup.
	handler: Option<Arc<RequestHandler>>,
}

impl AppState {
	pub fn new(
		client: Arc<dyn K8sClient>,
		config: runway_provisioner::ProvisionerConfig,
		reporter: ResultReporter,
	) -> Self {
		Self {
			handler: Some(Arc::new(RequestHandler::new(client, config, reporter))),
		}
	}

	/// State for a server running without cluster access; backend requests
	/// fail with `client_init_failed`.
	pub fn without_cluster() -> Self {
		Self { handler: None }
	}

	pub fn kubernetes_configured(&self) -> bool {
		self.handler.is_some()
	}

	pub(crate) fn handler(&self) -> Result<&RequestHandler, ServerError> {
		self.handler.as_deref().ok_or(ServerError::ClientInit)
	}
}

/// Build application state from configuration.
///
/// A Kubernetes client that cannot be created is logged and leaves the
/// server running without cluster access.
pub async fn create_app_state(config: &ServerConfig) -> Result<AppState, ReportError> {
	let reporter = ResultReporter::new(&ReporterConfig {
		callback_url: config.orchestration.callback_url.clone(),
		timeout_secs: config.orchestration.timeout_secs,
	})?;

	let provisioner_config = runway_provisioner::ProvisionerConfig {
		image_tag: config.provisioner.image_tag.clone(),
		exec_timeout_secs: config.provisioner.exec_timeout_secs,
	};

	let client = match &config.k8s.kubeconfig_path {
		Some(path) => KubeClient::from_kubeconfig(path).await,
		None => KubeClient::new().await,
	};

	match client {
		Ok(client) => {
			tracing::info!("Kubernetes client initialized");
			Ok(AppState::new(Arc::new(client), provisioner_config, reporter))
		}
		Err(e) => {
			tracing::warn!(
				error = %e,
				"Failed to initialize K8s client, backend provisioning disabled"
			);
			Ok(AppState::without_cluster())
		}
	}
}

/// Permissive CORS for browser clients of the orchestration UI.
pub fn cors_layer() -> CorsLayer {
	CorsLayer::new()
		.allow_origin(Any)
		.allow_methods([Method::GET, Method::POST])
		.allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/create", post(routes::backend::create_backend))
		.route("/test", post(routes::backend::test_backend))
		.route("/api/createbackend", post(routes::backend::create_backend))
		.route("/api/testbackend", post(routes::backend::test_backend))
		.with_state(state)
}
