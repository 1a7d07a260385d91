// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stage tagging for the provisioning pipeline.
//!
//! Each cluster call returns `Result<T, K8sError>`. [`StageExt::at_stage`]
//! turns that into `Result<T, ProvisionError>` naming the stage that failed,
//! so flows chain stages with `?` and the first failure wins.

use std::fmt;

use runway_k8s::K8sError;

use crate::error::ProvisionError;

/// A step of the request flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
	Namespace,
	ScriptConfig,
	Deploy,
	Execute,
	Report,
}

impl Stage {
	pub fn as_str(&self) -> &'static str {
		match self {
			Stage::Namespace => "namespace",
			Stage::ScriptConfig => "script_config",
			Stage::Deploy => "deploy",
			Stage::Execute => "execute",
			Stage::Report => "report",
		}
	}
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Tag a cluster result with the stage that produced it.
pub trait StageExt<T> {
	fn at_stage(self, stage: Stage) -> Result<T, ProvisionError>;
}

impl<T> StageExt<T> for Result<T, K8sError> {
	fn at_stage(self, stage: Stage) -> Result<T, ProvisionError> {
		self.map_err(|source| {
			tracing::error!(%stage, error = %source, "Provisioning stage failed");
			ProvisionError { stage, source }
		})
	}
}
