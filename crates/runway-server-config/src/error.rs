// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

/// Errors raised while loading or finalizing the server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// No source supplied the orchestration callback URL.
	#[error("orchestration callback URL is not configured (set {env} or [orchestration].callback_url)")]
	MissingCallbackUrl { env: &'static str },

	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	#[error("could not read config file {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("could not parse config file {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}
