// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Kubernetes client configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Kubernetes client configuration.
///
/// Without an explicit kubeconfig the client falls back to in-cluster
/// credentials, then `KUBECONFIG`, then `~/.kube/config`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct K8sConfig {
	pub kubeconfig_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct K8sConfigLayer {
	#[serde(default)]
	pub kubeconfig_path: Option<PathBuf>,
}

impl K8sConfigLayer {
	pub fn merge(&mut self, other: K8sConfigLayer) {
		if other.kubeconfig_path.is_some() {
			self.kubeconfig_path = other.kubeconfig_path;
		}
	}

	pub fn finalize(self) -> K8sConfig {
		K8sConfig {
			kubeconfig_path: self.kubeconfig_path,
		}
	}
}
