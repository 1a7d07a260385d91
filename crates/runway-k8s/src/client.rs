// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::K8sError;
use crate::types::{ConfigMap, ExecProcess, Namespace, Pod, Service};

/// Trait for K8s client operations.
///
/// This abstraction allows for easy mocking in tests while providing
/// a clean interface for the K8s operations needed by the backend provisioner.
/// All create operations are plain creates: an existing object with the same
/// name yields [`K8sError::AlreadyExists`].
#[async_trait]
pub trait K8sClient: Send + Sync {
	/// Create a cluster-scoped namespace.
	async fn create_namespace(&self, namespace: Namespace) -> Result<Namespace, K8sError>;

	/// Create a config map in the specified namespace.
	async fn create_config_map(
		&self,
		namespace: &str,
		config_map: ConfigMap,
	) -> Result<ConfigMap, K8sError>;

	/// Create a new pod in the specified namespace.
	async fn create_pod(&self, namespace: &str, pod: Pod) -> Result<Pod, K8sError>;

	/// Create a service in the specified namespace.
	async fn create_service(&self, namespace: &str, service: Service)
		-> Result<Service, K8sError>;

	/// Run a command in a running container, capturing stdout and stderr.
	///
	/// No stdin and no TTY are attached.
	async fn exec(
		&self,
		name: &str,
		namespace: &str,
		container: &str,
		command: Vec<String>,
	) -> Result<ExecProcess, K8sError>;
}
