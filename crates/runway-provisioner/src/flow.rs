// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The `create` and `test` request flows.
//!
//! `create` runs Namespace → ScriptConfig → Deploy → Execute → Report and
//! stops at the first provisioning failure without reporting. `test` derives
//! the names of an existing workload and runs Execute → Report only. Once
//! execution has been attempted a report is always sent.

use std::sync::Arc;

use runway_k8s::K8sClient;

use crate::config::ProvisionerConfig;
use crate::error::FlowError;
use crate::executor::ScriptExecutor;
use crate::provisioner::ResourceProvisioner;
use crate::reporter::ResultReporter;
use crate::types::{ExecutionOutput, GitInfo, ProvisionRequest, ResourceNames, StatusReport};

/// Outcome of a flow that executed and reported successfully.
#[derive(Debug, Clone)]
pub struct FlowReport {
	pub namespace: String,
	pub workload: String,
	pub output: ExecutionOutput,
	pub report: StatusReport,
}

/// Drives provisioning, execution and reporting for a single request.
pub struct RequestHandler {
	provisioner: ResourceProvisioner,
	executor: ScriptExecutor,
	reporter: ResultReporter,
}

impl RequestHandler {
	pub fn new(
		client: Arc<dyn K8sClient>,
		config: ProvisionerConfig,
		reporter: ResultReporter,
	) -> Self {
		let executor = ScriptExecutor::new(client.clone(), config.exec_timeout());
		Self {
			provisioner: ResourceProvisioner::new(client, config),
			executor,
			reporter,
		}
	}

	/// Provision a fresh environment, run the setup script and report.
	#[tracing::instrument(
		skip_all,
		fields(project = %request.project_name, user_id = request.user_id, environment = %request.environment)
	)]
	pub async fn create(&self, request: &ProvisionRequest) -> Result<FlowReport, FlowError> {
		let namespace = self
			.provisioner
			.create_namespace(&request.project_name, request.user_id)
			.await?;
		let config_map = self
			.provisioner
			.create_script_config(
				&namespace,
				&request.git_info.repo_url,
				&request.project_name,
				&request.language,
			)
			.await?;
		let workload = self
			.provisioner
			.deploy_workload(
				&namespace,
				&request.project_name,
				&request.environment,
				&request.language,
				&config_map,
			)
			.await?;

		self.execute_and_report(namespace, workload, &request.git_info)
			.await
	}

	/// Re-run the setup script in a previously provisioned workload.
	#[tracing::instrument(
		skip_all,
		fields(project = %request.project_name, user_id = request.user_id, environment = %request.environment)
	)]
	pub async fn test(&self, request: &ProvisionRequest) -> Result<FlowReport, FlowError> {
		let names = ResourceNames::derive(request);
		self.execute_and_report(names.namespace, names.workload, &request.git_info)
			.await
	}

	async fn execute_and_report(
		&self,
		namespace: String,
		workload: String,
		git_info: &GitInfo,
	) -> Result<FlowReport, FlowError> {
		let (output, execution_error) = match self.executor.execute(&workload, &namespace).await {
			Ok(output) => (output, None),
			Err(error) => (error.output().clone(), Some(error)),
		};

		let report = match self.reporter.report(&output, git_info).await {
			Ok(report) => report,
			Err(error) => {
				tracing::error!(
					%namespace,
					%workload,
					error = %error,
					execution_failed = execution_error.is_some(),
					"Failed to report execution result"
				);
				return Err(FlowError::Report { error, output });
			}
		};

		if let Some(error) = execution_error {
			return Err(FlowError::Execution { error, report });
		}

		tracing::info!(%namespace, %workload, status = %report.status, "Request completed");
		Ok(FlowReport {
			namespace,
			workload,
			output,
			report,
		})
	}
}
