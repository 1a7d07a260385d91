// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Orchestration callback configuration.

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

/// Environment variable naming the callback endpoint.
pub const ORCHESTRATION_URL_ENV: &str = "ORCHESTRATION_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestrationConfig {
	/// Endpoint receiving status reports.
	pub callback_url: String,
	pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrchestrationConfigLayer {
	#[serde(default)]
	pub callback_url: Option<String>,
	#[serde(default)]
	pub timeout_secs: Option<u64>,
}

impl OrchestrationConfigLayer {
	pub fn merge(&mut self, other: OrchestrationConfigLayer) {
		if other.callback_url.is_some() {
			self.callback_url = other.callback_url;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
	}

	/// Resolve the section. The callback URL is required and must be an
	/// absolute http(s) URL.
	pub fn finalize(self) -> Result<OrchestrationConfig, ConfigError> {
		let callback_url = self
			.callback_url
			.ok_or_else(|| ConfigError::MissingCallbackUrl {
				env: ORCHESTRATION_URL_ENV,
			})?;

		let parsed = Url::parse(&callback_url).map_err(|e| ConfigError::InvalidValue {
			key: ORCHESTRATION_URL_ENV.to_string(),
			message: format!("invalid URL '{callback_url}': {e}"),
		})?;
		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(ConfigError::InvalidValue {
				key: ORCHESTRATION_URL_ENV.to_string(),
				message: format!("unsupported scheme '{}'", parsed.scheme()),
			});
		}

		Ok(OrchestrationConfig {
			callback_url,
			timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_missing_url_is_error() {
		let err = OrchestrationConfigLayer::default().finalize().unwrap_err();
		assert!(matches!(err, ConfigError::MissingCallbackUrl { env } if env == "ORCHESTRATION_URL"));
	}

	#[test]
	fn test_invalid_url_is_error() {
		let layer = OrchestrationConfigLayer {
			callback_url: Some("not a url".to_string()),
			..Default::default()
		};
		assert!(matches!(
			layer.finalize(),
			Err(ConfigError::InvalidValue { .. })
		));
	}

	#[test]
	fn test_non_http_scheme_is_error() {
		let layer = OrchestrationConfigLayer {
			callback_url: Some("ftp://orchestrator/status".to_string()),
			..Default::default()
		};
		assert!(layer.finalize().is_err());
	}

	#[test]
	fn test_valid_url_keeps_default_timeout() {
		let layer = OrchestrationConfigLayer {
			callback_url: Some("http://orchestrator:9000/status".to_string()),
			..Default::default()
		};
		let config = layer.finalize().unwrap();
		assert_eq!(config.callback_url, "http://orchestrator:9000/status");
		assert_eq!(config.timeout_secs, 30);
	}
}
