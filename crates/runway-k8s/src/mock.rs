// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-memory K8s client for tests.
//!
//! Records every object it is asked to create, enforces create-only semantics
//! (a second create with the same name fails with `AlreadyExists`), and plays
//! back a configured exec outcome.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures::FutureExt;
use tokio::io::{AsyncWriteExt, DuplexStream};

use crate::client::K8sClient;
use crate::error::K8sError;
use crate::types::{ConfigMap, ExecProcess, ExecStatus, Namespace, Pod, Service};

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
	CreateNamespace,
	CreateConfigMap,
	CreatePod,
	CreateService,
	Exec,
}

/// What an exec call should produce.
#[derive(Debug, Clone)]
pub enum MockExec {
	/// The command runs to completion with the given output and status.
	Complete {
		stdout: String,
		stderr: String,
		status: Option<ExecStatus>,
	},
	/// The command writes the given output and then never exits.
	Hang { stdout: String, stderr: String },
}

impl MockExec {
	/// A command that exits 0 with the given output.
	pub fn success(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
		MockExec::Complete {
			stdout: stdout.into(),
			stderr: stderr.into(),
			status: Some(ExecStatus::success()),
		}
	}

	/// A command that exits non-zero with the given output.
	pub fn failure(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
		MockExec::Complete {
			stdout: stdout.into(),
			stderr: stderr.into(),
			status: Some(ExecStatus::failure(
				"NonZeroExitCode",
				"command terminated with non-zero exit code: 1",
			)),
		}
	}
}

impl Default for MockExec {
	fn default() -> Self {
		MockExec::success("", "")
	}
}

/// A recorded exec invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCall {
	pub pod: String,
	pub namespace: String,
	pub container: String,
	pub command: Vec<String>,
}

#[derive(Default)]
struct MockState {
	namespaces: Vec<Namespace>,
	config_maps: Vec<(String, ConfigMap)>,
	pods: Vec<(String, Pod)>,
	services: Vec<(String, Service)>,
	calls: Vec<String>,
	exec_calls: Vec<ExecCall>,
	failures: HashMap<MockOperation, String>,
	exec: MockExec,
	// Writers for hung exec calls; holding them keeps the readers open.
	held_writers: Vec<DuplexStream>,
}

/// A mock K8s client backed by in-memory state.
#[derive(Default)]
pub struct MockK8sClient {
	state: Mutex<MockState>,
}

impl MockK8sClient {
	/// Create a new, empty mock cluster.
	pub fn new() -> Self {
		Self::default()
	}

	fn state(&self) -> MutexGuard<'_, MockState> {
		self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Configure the outcome of subsequent exec calls.
	pub fn set_exec(&self, exec: MockExec) {
		self.state().exec = exec;
	}

	/// Make an operation fail with an API error carrying `message`.
	pub fn fail_on(&self, operation: MockOperation, message: impl Into<String>) {
		self.state().failures.insert(operation, message.into());
	}

	/// Seed a pod that already exists in the cluster.
	pub fn insert_pod(&self, namespace: &str, name: &str) {
		let mut pod = Pod::default();
		pod.metadata.name = Some(name.to_string());
		pod.metadata.namespace = Some(namespace.to_string());
		self.state().pods.push((namespace.to_string(), pod));
	}

	/// Names of operations performed, in order, formatted as `operation:name`.
	pub fn calls(&self) -> Vec<String> {
		self.state().calls.clone()
	}

	pub fn namespaces(&self) -> Vec<Namespace> {
		self.state().namespaces.clone()
	}

	pub fn config_maps(&self) -> Vec<ConfigMap> {
		self.state().config_maps.iter().map(|(_, c)| c.clone()).collect()
	}

	pub fn pods(&self) -> Vec<Pod> {
		self.state().pods.iter().map(|(_, p)| p.clone()).collect()
	}

	pub fn services(&self) -> Vec<Service> {
		self.state().services.iter().map(|(_, s)| s.clone()).collect()
	}

	pub fn exec_calls(&self) -> Vec<ExecCall> {
		self.state().exec_calls.clone()
	}

	fn check_failure(state: &MockState, operation: MockOperation) -> Result<(), K8sError> {
		match state.failures.get(&operation) {
			Some(message) => Err(K8sError::ApiError {
				message: message.clone(),
			}),
			None => Ok(()),
		}
	}
}

fn object_name(name: &Option<String>) -> String {
	name.clone().unwrap_or_default()
}

async fn reader_with(content: &str, hold_open: Option<&mut Vec<DuplexStream>>) -> DuplexStream {
	let (mut writer, reader) = tokio::io::duplex(64 * 1024);
	// A fresh duplex has room for the whole payload, so this never blocks.
	let _ = writer.write_all(content.as_bytes()).await;
	if let Some(held) = hold_open {
		held.push(writer);
	}
	reader
}

#[async_trait]
impl K8sClient for MockK8sClient {
	async fn create_namespace(&self, namespace: Namespace) -> Result<Namespace, K8sError> {
		let mut state = self.state();
		Self::check_failure(&state, MockOperation::CreateNamespace)?;
		let name = object_name(&namespace.metadata.name);
		if state
			.namespaces
			.iter()
			.any(|ns| ns.metadata.name.as_deref() == Some(name.as_str()))
		{
			return Err(K8sError::AlreadyExists {
				kind: "Namespace",
				name,
			});
		}
		state.calls.push(format!("create_namespace:{name}"));
		state.namespaces.push(namespace.clone());
		Ok(namespace)
	}

	async fn create_config_map(
		&self,
		namespace: &str,
		config_map: ConfigMap,
	) -> Result<ConfigMap, K8sError> {
		let mut state = self.state();
		Self::check_failure(&state, MockOperation::CreateConfigMap)?;
		let name = object_name(&config_map.metadata.name);
		if state
			.config_maps
			.iter()
			.any(|(ns, c)| ns == namespace && c.metadata.name.as_deref() == Some(name.as_str()))
		{
			return Err(K8sError::AlreadyExists {
				kind: "ConfigMap",
				name,
			});
		}
		state.calls.push(format!("create_config_map:{name}"));
		state
			.config_maps
			.push((namespace.to_string(), config_map.clone()));
		Ok(config_map)
	}

	async fn create_pod(&self, namespace: &str, pod: Pod) -> Result<Pod, K8sError> {
		let mut state = self.state();
		Self::check_failure(&state, MockOperation::CreatePod)?;
		let name = object_name(&pod.metadata.name);
		if state
			.pods
			.iter()
			.any(|(ns, p)| ns == namespace && p.metadata.name.as_deref() == Some(name.as_str()))
		{
			return Err(K8sError::AlreadyExists { kind: "Pod", name });
		}
		state.calls.push(format!("create_pod:{name}"));
		state.pods.push((namespace.to_string(), pod.clone()));
		Ok(pod)
	}

	async fn create_service(
		&self,
		namespace: &str,
		service: Service,
	) -> Result<Service, K8sError> {
		let mut state = self.state();
		Self::check_failure(&state, MockOperation::CreateService)?;
		let name = object_name(&service.metadata.name);
		if state
			.services
			.iter()
			.any(|(ns, s)| ns == namespace && s.metadata.name.as_deref() == Some(name.as_str()))
		{
			return Err(K8sError::AlreadyExists {
				kind: "Service",
				name,
			});
		}
		state.calls.push(format!("create_service:{name}"));
		state.services.push((namespace.to_string(), service.clone()));
		Ok(service)
	}

	async fn exec(
		&self,
		name: &str,
		namespace: &str,
		container: &str,
		command: Vec<String>,
	) -> Result<ExecProcess, K8sError> {
		let exec = {
			let mut state = self.state();
			state.exec_calls.push(ExecCall {
				pod: name.to_string(),
				namespace: namespace.to_string(),
				container: container.to_string(),
				command,
			});
			Self::check_failure(&state, MockOperation::Exec)?;
			if !state
				.pods
				.iter()
				.any(|(ns, p)| ns == namespace && p.metadata.name.as_deref() == Some(name))
			{
				return Err(K8sError::NotFound {
					kind: "Pod",
					name: name.to_string(),
				});
			}
			state.calls.push(format!("exec:{name}"));
			state.exec.clone()
		};

		match exec {
			MockExec::Complete {
				stdout,
				stderr,
				status,
			} => Ok(ExecProcess {
				stdout: Box::pin(reader_with(&stdout, None).await),
				stderr: Box::pin(reader_with(&stderr, None).await),
				status: futures::future::ready(status).boxed(),
			}),
			MockExec::Hang { stdout, stderr } => {
				let mut held = Vec::new();
				let stdout = reader_with(&stdout, Some(&mut held)).await;
				let stderr = reader_with(&stderr, Some(&mut held)).await;
				self.state().held_writers.extend(held);
				Ok(ExecProcess {
					stdout: Box::pin(stdout),
					stderr: Box::pin(stderr),
					status: futures::future::pending().boxed(),
				})
			}
		}
	}
}
