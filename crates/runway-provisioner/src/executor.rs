// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Setup script execution over the exec channel.

use std::sync::Arc;
use std::time::{Duration, Instant};

use runway_k8s::{ExecProcess, K8sClient};
use tokio::io::AsyncReadExt;

use crate::error::ExecutionError;
use crate::script::exec_command;
use crate::types::{container_name, ExecutionOutput};

/// Runs the mounted setup script inside a workload and captures its output.
pub struct ScriptExecutor {
	client: Arc<dyn K8sClient>,
	timeout: Duration,
}

impl ScriptExecutor {
	pub fn new(client: Arc<dyn K8sClient>, timeout: Duration) -> Self {
		Self { client, timeout }
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	/// Execute the setup script in the workload's container.
	///
	/// Output read before a failure or timeout is kept in the returned error.
	/// On timeout the exec channel is dropped, which closes the stream.
	#[tracing::instrument(skip(self), fields(timeout_secs = self.timeout.as_secs()))]
	pub async fn execute(
		&self,
		workload: &str,
		namespace: &str,
	) -> Result<ExecutionOutput, ExecutionError> {
		let container = container_name(workload);
		tracing::info!(container = %container, "Executing setup script");
		let started = Instant::now();
		let mut stdout = Vec::new();
		let mut stderr = Vec::new();

		let result = tokio::time::timeout(
			self.timeout,
			run_to_completion(
				self.client.as_ref(),
				workload,
				namespace,
				&container,
				&mut stdout,
				&mut stderr,
			),
		)
		.await;

		let output = ExecutionOutput {
			stdout: String::from_utf8_lossy(&stdout).into_owned(),
			stderr: String::from_utf8_lossy(&stderr).into_owned(),
		};
		let elapsed_ms = started.elapsed().as_millis() as u64;

		match result {
			Err(_) => {
				tracing::warn!(elapsed_ms, "Script execution timed out");
				Err(ExecutionError::Timeout {
					timeout: self.timeout,
					output,
				})
			}
			Ok(Err(message)) => {
				tracing::warn!(elapsed_ms, error = %message, "Script execution failed");
				Err(ExecutionError::Failed { message, output })
			}
			Ok(Ok(())) => {
				tracing::info!(
					elapsed_ms,
					stdout_bytes = output.stdout.len(),
					stderr_bytes = output.stderr.len(),
					"Script execution completed"
				);
				Ok(output)
			}
		}
	}
}

/// Open the exec channel, drain both streams and wait for the exit status.
///
/// Bytes are appended to the caller's buffers as they arrive, so they
/// survive cancellation of this future.
async fn run_to_completion(
	client: &dyn K8sClient,
	workload: &str,
	namespace: &str,
	container: &str,
	stdout: &mut Vec<u8>,
	stderr: &mut Vec<u8>,
) -> Result<(), String> {
	let ExecProcess {
		stdout: mut out,
		stderr: mut err,
		status,
	} = client
		.exec(workload, namespace, container, exec_command())
		.await
		.map_err(|e| e.to_string())?;

	let (out_read, err_read, status) = tokio::join!(
		out.read_to_end(stdout),
		err.read_to_end(stderr),
		status
	);
	out_read.map_err(|e| format!("failed to read stdout: {e}"))?;
	err_read.map_err(|e| format!("failed to read stderr: {e}"))?;

	match status {
		Some(status) if status.success => Ok(()),
		Some(status) => Err(status
			.message
			.or(status.reason)
			.unwrap_or_else(|| "command exited with a failure status".to_string())),
		None => Err("exec channel closed without an exit status".to_string()),
	}
}
