// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provisioning and script execution configuration.

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_EXEC_TIMEOUT_SECS: u64 = 300;
const DEFAULT_IMAGE_TAG: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionerConfig {
	/// Bound on a single setup script execution.
	pub exec_timeout_secs: u64,
	/// Tag used for `{language}:{tag}` workload images.
	pub image_tag: String,
}

impl Default for ProvisionerConfig {
	fn default() -> Self {
		Self {
			exec_timeout_secs: DEFAULT_EXEC_TIMEOUT_SECS,
			image_tag: DEFAULT_IMAGE_TAG.to_string(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvisionerConfigLayer {
	#[serde(default)]
	pub exec_timeout_secs: Option<u64>,
	#[serde(default)]
	pub image_tag: Option<String>,
}

impl ProvisionerConfigLayer {
	pub fn merge(&mut self, other: ProvisionerConfigLayer) {
		if other.exec_timeout_secs.is_some() {
			self.exec_timeout_secs = other.exec_timeout_secs;
		}
		if other.image_tag.is_some() {
			self.image_tag = other.image_tag;
		}
	}

	pub fn finalize(self) -> Result<ProvisionerConfig, ConfigError> {
		let exec_timeout_secs = self.exec_timeout_secs.unwrap_or(DEFAULT_EXEC_TIMEOUT_SECS);
		if exec_timeout_secs == 0 {
			return Err(ConfigError::InvalidValue {
				key: "provisioner.exec_timeout_secs".to_string(),
				message: "must be greater than zero".to_string(),
			});
		}

		Ok(ProvisionerConfig {
			exec_timeout_secs,
			image_tag: self
				.image_tag
				.unwrap_or_else(|| DEFAULT_IMAGE_TAG.to_string()),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = ProvisionerConfigLayer::default().finalize().unwrap();
		assert_eq!(config.exec_timeout_secs, 300);
		assert_eq!(config.image_tag, "latest");
	}

	#[test]
	fn test_zero_timeout_rejected() {
		let layer = ProvisionerConfigLayer {
			exec_timeout_secs: Some(0),
			..Default::default()
		};
		assert!(matches!(
			layer.finalize(),
			Err(ConfigError::InvalidValue { .. })
		));
	}
}
