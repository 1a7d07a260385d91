// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::pin::Pin;

use futures::future::BoxFuture;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Status;
use tokio::io::AsyncRead;

pub use k8s_openapi::api::core::v1::{
	ConfigMap, ConfigMapVolumeSource, Container, ContainerPort, Namespace, Pod, PodSpec, PodStatus,
	Service, ServicePort, ServiceSpec, Volume, VolumeMount,
};
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
pub use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

/// Terminal status of a command run over the exec channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecStatus {
	pub success: bool,
	/// Machine-readable reason, e.g. `NonZeroExitCode`.
	pub reason: Option<String>,
	pub message: Option<String>,
}

impl ExecStatus {
	/// A status for a command that exited 0.
	pub fn success() -> Self {
		Self {
			success: true,
			reason: None,
			message: None,
		}
	}

	/// A status for a command that failed.
	pub fn failure(reason: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			success: false,
			reason: Some(reason.into()),
			message: Some(message.into()),
		}
	}
}

impl From<Status> for ExecStatus {
	fn from(status: Status) -> Self {
		Self {
			success: status.status.as_deref() == Some("Success"),
			reason: status.reason,
			message: status.message,
		}
	}
}

/// Future resolving to the exec status once the remote command exits.
///
/// Resolves to `None` when the channel closes without reporting a status.
pub type ExecStatusFuture = BoxFuture<'static, Option<ExecStatus>>;

/// Output side of a command started via exec.
///
/// Both readers reach EOF when the remote command exits and the channel closes.
pub struct ExecProcess {
	pub stdout: Pin<Box<dyn AsyncRead + Send>>,
	pub stderr: Pin<Box<dyn AsyncRead + Send>>,
	pub status: ExecStatusFuture,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn success_status_maps_to_success() {
		let status = Status {
			status: Some("Success".to_string()),
			..Default::default()
		};
		assert_eq!(ExecStatus::from(status), ExecStatus::success());
	}

	#[test]
	fn non_zero_exit_maps_to_failure() {
		let status = Status {
			status: Some("Failure".to_string()),
			reason: Some("NonZeroExitCode".to_string()),
			message: Some("command terminated with non-zero exit code".to_string()),
			..Default::default()
		};
		let exec_status = ExecStatus::from(status);
		assert!(!exec_status.success);
		assert_eq!(exec_status.reason.as_deref(), Some("NonZeroExitCode"));
	}

	#[test]
	fn missing_status_field_is_not_success() {
		assert!(!ExecStatus::from(Status::default()).success);
	}
}
