// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::Path;

use async_trait::async_trait;
use futures::FutureExt;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Pod, Service};
use kube::{
	api::{Api, AttachParams, PostParams},
	config::{KubeConfigOptions, Kubeconfig},
	Client, Config,
};
use tracing::{debug, instrument};

use crate::client::K8sClient;
use crate::error::K8sError;
use crate::types::{ExecProcess, ExecStatus};

/// Production K8s client implementation using the kube crate.
pub struct KubeClient {
	client: Client,
}

impl KubeClient {
	/// Create a new KubeClient that auto-discovers cluster configuration.
	///
	/// This will attempt to load config from:
	/// 1. In-cluster service account (when running in K8s)
	/// 2. KUBECONFIG environment variable
	/// 3. ~/.kube/config
	pub async fn new() -> Result<Self, K8sError> {
		let client = Client::try_default()
			.await
			.map_err(|e| K8sError::ClientInit {
				message: e.to_string(),
			})?;
		debug!("K8s client initialized");
		Ok(Self { client })
	}

	/// Create a KubeClient from an explicit kubeconfig file.
	pub async fn from_kubeconfig(path: &Path) -> Result<Self, K8sError> {
		let client_init = |message: String| K8sError::ClientInit { message };

		let kubeconfig = Kubeconfig::read_from(path)
			.map_err(|e| client_init(format!("{}: {e}", path.display())))?;
		let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
			.await
			.map_err(|e| client_init(e.to_string()))?;
		let client = Client::try_from(config).map_err(|e| client_init(e.to_string()))?;

		debug!(path = %path.display(), "K8s client initialized from kubeconfig");
		Ok(Self { client })
	}
}

/// Map a create failure, turning HTTP 409 into [`K8sError::AlreadyExists`].
fn create_error(kind: &'static str, name: Option<&String>, err: kube::Error) -> K8sError {
	match err {
		kube::Error::Api(ref resp) if resp.code == 409 => K8sError::AlreadyExists {
			kind,
			name: name.cloned().unwrap_or_default(),
		},
		e => e.into(),
	}
}

#[async_trait]
impl K8sClient for KubeClient {
	#[instrument(skip(self, namespace), fields(name = ?namespace.metadata.name))]
	async fn create_namespace(&self, namespace: Namespace) -> Result<Namespace, K8sError> {
		let namespaces: Api<Namespace> = Api::all(self.client.clone());
		namespaces
			.create(&PostParams::default(), &namespace)
			.await
			.map_err(|e| create_error("Namespace", namespace.metadata.name.as_ref(), e))
	}

	#[instrument(skip(self, config_map), fields(name = ?config_map.metadata.name))]
	async fn create_config_map(
		&self,
		namespace: &str,
		config_map: ConfigMap,
	) -> Result<ConfigMap, K8sError> {
		let config_maps: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
		config_maps
			.create(&PostParams::default(), &config_map)
			.await
			.map_err(|e| create_error("ConfigMap", config_map.metadata.name.as_ref(), e))
	}

	#[instrument(skip(self, pod), fields(name = ?pod.metadata.name))]
	async fn create_pod(&self, namespace: &str, pod: Pod) -> Result<Pod, K8sError> {
		let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
		pods
			.create(&PostParams::default(), &pod)
			.await
			.map_err(|e| create_error("Pod", pod.metadata.name.as_ref(), e))
	}

	#[instrument(skip(self, service), fields(name = ?service.metadata.name))]
	async fn create_service(
		&self,
		namespace: &str,
		service: Service,
	) -> Result<Service, K8sError> {
		let services: Api<Service> = Api::namespaced(self.client.clone(), namespace);
		services
			.create(&PostParams::default(), &service)
			.await
			.map_err(|e| create_error("Service", service.metadata.name.as_ref(), e))
	}

	#[instrument(skip(self, command))]
	async fn exec(
		&self,
		name: &str,
		namespace: &str,
		container: &str,
		command: Vec<String>,
	) -> Result<ExecProcess, K8sError> {
		let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
		let ap = AttachParams {
			container: Some(container.to_string()),
			stdin: false,
			stdout: true,
			stderr: true,
			tty: false,
			..Default::default()
		};

		let mut attached = pods.exec(name, command, &ap).await.map_err(|e| match e {
			kube::Error::Api(ref err) if err.code == 404 => K8sError::NotFound {
				kind: "Pod",
				name: name.into(),
			},
			_ => K8sError::ExecError {
				message: e.to_string(),
			},
		})?;

		let stdout = attached.stdout().ok_or_else(|| K8sError::ExecError {
			message: "stdout not available".into(),
		})?;
		let stderr = attached.stderr().ok_or_else(|| K8sError::ExecError {
			message: "stderr not available".into(),
		})?;
		let status = attached.take_status().ok_or_else(|| K8sError::ExecError {
			message: "exec status not available".into(),
		})?;

		// The attached process owns the websocket task; keep it alive until the
		// remote command reports its status.
		let status = async move {
			let status = status.await;
			drop(attached);
			status.map(ExecStatus::from)
		}
		.boxed();

		debug!("Exec channel opened");
		Ok(ExecProcess {
			stdout: Box::pin(stdout),
			stderr: Box::pin(stderr),
			status,
		})
	}
}
