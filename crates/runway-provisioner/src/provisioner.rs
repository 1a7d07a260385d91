// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cluster resource provisioning for backend requests.

use std::collections::BTreeMap;
use std::sync::Arc;

use runway_k8s::{
	ConfigMap, ConfigMapVolumeSource, Container, ContainerPort, IntOrString, K8sClient, Namespace,
	ObjectMeta, Pod, PodSpec, Service, ServicePort, ServiceSpec, Volume, VolumeMount,
};

use crate::config::ProvisionerConfig;
use crate::error::ProvisionError;
use crate::pipeline::{Stage, StageExt};
use crate::script::{render_setup_script, SCRIPT_KEY, SCRIPT_MOUNT_PATH};
use crate::types::{config_map_name, container_name, namespace_name, service_name, workload_name};

const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";
const MANAGED_BY_VALUE: &str = "runway";
const PROJECT_LABEL: &str = "runway.dev/project";
const USER_ID_LABEL: &str = "runway.dev/user-id";
const APP_LABEL: &str = "app";
const ENV_LABEL: &str = "env";
const PURPOSE_LABEL: &str = "purpose";
const PURPOSE_VALUE: &str = "application";
const SCRIPT_VOLUME: &str = "script-volume";
const SCRIPT_FILE_MODE: i32 = 0o777;
const CONTAINER_PORT: i32 = 8080;
const SERVICE_PORT: i32 = 80;
const SERVICE_TYPE: &str = "ClusterIP";
const MAX_LABEL_LENGTH: usize = 63;

/// Keeps the container alive until the setup script is executed in it.
const PLACEHOLDER_COMMAND: [&str; 3] = ["/bin/sh", "-c", "trap 'exit 0' TERM; sleep infinity & wait"];

/// Sanitize a string to be a valid Kubernetes label value.
fn sanitize_label_value(value: &str) -> String {
	let sanitized: String = value
		.chars()
		.map(|c| {
			if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
				c
			} else {
				'_'
			}
		})
		.collect();

	let trimmed = sanitized
		.trim_start_matches(|c: char| !c.is_ascii_alphanumeric())
		.trim_end_matches(|c: char| !c.is_ascii_alphanumeric());

	if trimmed.len() > MAX_LABEL_LENGTH {
		trimmed[..MAX_LABEL_LENGTH]
			.trim_end_matches(|c: char| !c.is_ascii_alphanumeric())
			.to_string()
	} else {
		trimmed.to_string()
	}
}

fn managed_labels() -> BTreeMap<String, String> {
	BTreeMap::from([(MANAGED_BY_LABEL.to_string(), MANAGED_BY_VALUE.to_string())])
}

fn workload_labels(workload: &str, environment: &str) -> BTreeMap<String, String> {
	let mut labels = managed_labels();
	labels.insert(APP_LABEL.to_string(), workload.to_string());
	labels.insert(ENV_LABEL.to_string(), sanitize_label_value(environment));
	labels.insert(PURPOSE_LABEL.to_string(), PURPOSE_VALUE.to_string());
	labels
}

/// Creates the namespace, script config map and workload for a request.
pub struct ResourceProvisioner {
	client: Arc<dyn K8sClient>,
	config: ProvisionerConfig,
}

impl ResourceProvisioner {
	pub fn new(client: Arc<dyn K8sClient>, config: ProvisionerConfig) -> Self {
		Self { client, config }
	}

	/// Create the per-request namespace and return its name.
	#[tracing::instrument(skip(self))]
	pub async fn create_namespace(
		&self,
		project_name: &str,
		user_id: i64,
	) -> Result<String, ProvisionError> {
		let namespace = build_namespace(project_name, user_id);
		let created = self
			.client
			.create_namespace(namespace)
			.await
			.at_stage(Stage::Namespace)?;
		let name = created
			.metadata
			.name
			.unwrap_or_else(|| namespace_name(project_name, user_id));
		tracing::info!(namespace = %name, "Namespace created");
		Ok(name)
	}

	/// Render the setup script, store it in a config map and return the
	/// config map's name.
	#[tracing::instrument(skip(self))]
	pub async fn create_script_config(
		&self,
		namespace: &str,
		repo_url: &str,
		project_name: &str,
		language: &str,
	) -> Result<String, ProvisionError> {
		let script = render_setup_script(repo_url, language);
		let config_map = build_config_map(namespace, project_name, script);
		let created = self
			.client
			.create_config_map(namespace, config_map)
			.await
			.at_stage(Stage::ScriptConfig)?;
		let name = created
			.metadata
			.name
			.unwrap_or_else(|| config_map_name(project_name));
		tracing::info!(namespace, config_map = %name, "Script config created");
		Ok(name)
	}

	/// Create the workload pod and its service, returning the workload name.
	///
	/// A failure creating either object fails the stage; the pod is not
	/// removed if the service cannot be created.
	#[tracing::instrument(skip(self))]
	pub async fn deploy_workload(
		&self,
		namespace: &str,
		project_name: &str,
		environment: &str,
		language: &str,
		config_map: &str,
	) -> Result<String, ProvisionError> {
		let workload = workload_name(environment, project_name);
		let pod = build_pod(
			namespace,
			&workload,
			environment,
			language,
			config_map,
			&self.config.image_tag,
		);
		let image = pod_image(&pod);

		tracing::info!(namespace, workload = %workload, image = %image, "Creating workload pod");
		self.client
			.create_pod(namespace, pod)
			.await
			.at_stage(Stage::Deploy)?;

		let service = build_service(namespace, &workload);
		self.client
			.create_service(namespace, service)
			.await
			.at_stage(Stage::Deploy)?;

		tracing::info!(namespace, workload = %workload, "Workload deployed");
		Ok(workload)
	}
}

fn pod_image(pod: &Pod) -> String {
	pod.spec
		.as_ref()
		.and_then(|spec| spec.containers.first())
		.and_then(|c| c.image.clone())
		.unwrap_or_default()
}

pub fn build_namespace(project_name: &str, user_id: i64) -> Namespace {
	let mut labels = managed_labels();
	labels.insert(PROJECT_LABEL.to_string(), sanitize_label_value(project_name));
	labels.insert(USER_ID_LABEL.to_string(), user_id.to_string());

	Namespace {
		metadata: ObjectMeta {
			name: Some(namespace_name(project_name, user_id)),
			labels: Some(labels),
			..Default::default()
		},
		..Default::default()
	}
}

pub fn build_config_map(namespace: &str, project_name: &str, script: String) -> ConfigMap {
	ConfigMap {
		metadata: ObjectMeta {
			name: Some(config_map_name(project_name)),
			namespace: Some(namespace.to_string()),
			labels: Some(managed_labels()),
			..Default::default()
		},
		data: Some(BTreeMap::from([(SCRIPT_KEY.to_string(), script)])),
		..Default::default()
	}
}

/// Build the workload pod: one container running `{language}:{image_tag}`
/// with the script config map mounted executable at `/scripts`.
pub fn build_pod(
	namespace: &str,
	workload: &str,
	environment: &str,
	language: &str,
	config_map: &str,
	image_tag: &str,
) -> Pod {
	let container = Container {
		name: container_name(workload),
		image: Some(format!("{}:{image_tag}", language.trim().to_ascii_lowercase())),
		command: Some(PLACEHOLDER_COMMAND.iter().map(|s| s.to_string()).collect()),
		ports: Some(vec![ContainerPort {
			container_port: CONTAINER_PORT,
			..Default::default()
		}]),
		volume_mounts: Some(vec![VolumeMount {
			name: SCRIPT_VOLUME.to_string(),
			mount_path: SCRIPT_MOUNT_PATH.to_string(),
			..Default::default()
		}]),
		..Default::default()
	};

	Pod {
		metadata: ObjectMeta {
			name: Some(workload.to_string()),
			namespace: Some(namespace.to_string()),
			labels: Some(workload_labels(workload, environment)),
			..Default::default()
		},
		spec: Some(PodSpec {
			containers: vec![container],
			volumes: Some(vec![Volume {
				name: SCRIPT_VOLUME.to_string(),
				config_map: Some(ConfigMapVolumeSource {
					name: config_map.to_string(),
					default_mode: Some(SCRIPT_FILE_MODE),
					..Default::default()
				}),
				..Default::default()
			}]),
			..Default::default()
		}),
		..Default::default()
	}
}

/// Build the ClusterIP service exposing port 80 → 8080 on the workload.
pub fn build_service(namespace: &str, workload: &str) -> Service {
	Service {
		metadata: ObjectMeta {
			name: Some(service_name(workload)),
			namespace: Some(namespace.to_string()),
			labels: Some(managed_labels()),
			..Default::default()
		},
		spec: Some(ServiceSpec {
			type_: Some(SERVICE_TYPE.to_string()),
			selector: Some(BTreeMap::from([(
				APP_LABEL.to_string(),
				workload.to_string(),
			)])),
			ports: Some(vec![ServicePort {
				port: SERVICE_PORT,
				target_port: Some(IntOrString::Int(CONTAINER_PORT)),
				..Default::default()
			}]),
			..Default::default()
		}),
		..Default::default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use runway_k8s::{MockK8sClient, MockOperation};

	fn provisioner(client: Arc<MockK8sClient>) -> ResourceProvisioner {
		ResourceProvisioner::new(client, ProvisionerConfig::default())
	}

	#[test]
	fn test_sanitize_label_value() {
		assert_eq!(sanitize_label_value("demo"), "demo");
		assert_eq!(sanitize_label_value("my project!"), "my_project");
		assert_eq!(sanitize_label_value("-dev-"), "dev");
		assert_eq!(sanitize_label_value(&"a".repeat(80)).len(), 63);
	}

	#[test]
	fn namespace_is_named_and_labelled() {
		let ns = build_namespace("demo", 1);
		assert_eq!(ns.metadata.name.as_deref(), Some("demo-1-ns"));
		let labels = ns.metadata.labels.unwrap();
		assert_eq!(labels.get(MANAGED_BY_LABEL).unwrap(), "runway");
		assert_eq!(labels.get(USER_ID_LABEL).unwrap(), "1");
	}

	#[test]
	fn config_map_holds_script_under_key() {
		let cm = build_config_map("demo-1-ns", "demo", "#!/bin/bash\n".to_string());
		assert_eq!(cm.metadata.name.as_deref(), Some("demo-cfm"));
		assert_eq!(cm.metadata.namespace.as_deref(), Some("demo-1-ns"));
		let data = cm.data.unwrap();
		assert_eq!(data.len(), 1);
		assert_eq!(data.get("setup.sh").unwrap(), "#!/bin/bash\n");
	}

	#[test]
	fn pod_runs_language_image_with_script_mounted() {
		let pod = build_pod("demo-1-ns", "dev-demo-app", "dev", "python", "demo-cfm", "latest");
		assert_eq!(pod.metadata.name.as_deref(), Some("dev-demo-app"));

		let labels = pod.metadata.labels.as_ref().unwrap();
		assert_eq!(labels.get("app").unwrap(), "dev-demo-app");
		assert_eq!(labels.get("env").unwrap(), "dev");
		assert_eq!(labels.get("purpose").unwrap(), "application");

		let spec = pod.spec.unwrap();
		assert_eq!(spec.containers.len(), 1);
		let container = &spec.containers[0];
		assert_eq!(container.name, "dev-demo-app-container");
		assert_eq!(container.image.as_deref(), Some("python:latest"));
		assert_eq!(
			container.ports.as_ref().unwrap()[0].container_port,
			CONTAINER_PORT
		);
		let mount = &container.volume_mounts.as_ref().unwrap()[0];
		assert_eq!(mount.name, "script-volume");
		assert_eq!(mount.mount_path, "/scripts");

		let volume = &spec.volumes.unwrap()[0];
		let source = volume.config_map.as_ref().unwrap();
		assert_eq!(source.name, "demo-cfm");
		assert_eq!(source.default_mode, Some(0o777));
	}

	#[test]
	fn pod_uses_configured_image_tag() {
		let pod = build_pod("ns", "dev-demo-app", "dev", "node", "demo-cfm", "20-slim");
		assert_eq!(pod_image(&pod), "node:20-slim");
	}

	#[test]
	fn service_targets_workload() {
		let svc = build_service("demo-1-ns", "dev-demo-app");
		assert_eq!(svc.metadata.name.as_deref(), Some("dev-demo-app-service"));
		let spec = svc.spec.unwrap();
		assert_eq!(spec.type_.as_deref(), Some("ClusterIP"));
		assert_eq!(
			spec.selector.unwrap().get("app").map(String::as_str),
			Some("dev-demo-app")
		);
		let port = &spec.ports.unwrap()[0];
		assert_eq!(port.port, 80);
		assert_eq!(port.target_port, Some(IntOrString::Int(8080)));
	}

	#[tokio::test]
	async fn create_namespace_returns_name() {
		let client = Arc::new(MockK8sClient::new());
		let name = provisioner(client.clone())
			.create_namespace("demo", 1)
			.await
			.unwrap();
		assert_eq!(name, "demo-1-ns");
		let namespaces = client.namespaces();
		assert_eq!(namespaces.len(), 1);
		assert_eq!(namespaces[0].metadata.name.as_deref(), Some("demo-1-ns"));
	}

	#[tokio::test]
	async fn duplicate_namespace_fails_namespace_stage() {
		let client = Arc::new(MockK8sClient::new());
		let p = provisioner(client.clone());
		p.create_namespace("demo", 1).await.unwrap();

		let err = p.create_namespace("demo", 1).await.unwrap_err();
		assert_eq!(err.stage, Stage::Namespace);
		assert!(matches!(
			err.source,
			runway_k8s::K8sError::AlreadyExists { .. }
		));
	}

	#[tokio::test]
	async fn create_script_config_stores_rendered_script() {
		let client = Arc::new(MockK8sClient::new());
		let name = provisioner(client.clone())
			.create_script_config("demo-1-ns", "https://github.com/acme/demo", "demo", "node")
			.await
			.unwrap();
		assert_eq!(name, "demo-cfm");

		let maps = client.config_maps();
		assert_eq!(maps.len(), 1);
		let script = maps[0].data.as_ref().unwrap().get("setup.sh").unwrap();
		assert!(script.contains("npm start"));
	}

	#[tokio::test]
	async fn script_config_failure_is_tagged() {
		let client = Arc::new(MockK8sClient::new());
		client.fail_on(MockOperation::CreateConfigMap, "quota exceeded");
		let err = provisioner(client)
			.create_script_config("demo-1-ns", "r", "demo", "python")
			.await
			.unwrap_err();
		assert_eq!(err.stage, Stage::ScriptConfig);
	}

	#[tokio::test]
	async fn deploy_workload_creates_pod_then_service() {
		let client = Arc::new(MockK8sClient::new());
		let workload = provisioner(client.clone())
			.deploy_workload("demo-1-ns", "demo", "dev", "python", "demo-cfm")
			.await
			.unwrap();
		assert_eq!(workload, "dev-demo-app");
		assert_eq!(
			client.calls(),
			vec![
				"create_pod:dev-demo-app".to_string(),
				"create_service:dev-demo-app-service".to_string(),
			]
		);
	}

	#[tokio::test]
	async fn service_failure_fails_deploy_stage() {
		let client = Arc::new(MockK8sClient::new());
		client.fail_on(MockOperation::CreateService, "forbidden");
		let err = provisioner(client.clone())
			.deploy_workload("demo-1-ns", "demo", "dev", "python", "demo-cfm")
			.await
			.unwrap_err();
		assert_eq!(err.stage, Stage::Deploy);
		assert_eq!(client.pods().len(), 1);
	}
}
