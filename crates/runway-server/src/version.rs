// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Build information for runway-server.

/// Crate version.
pub fn version() -> &'static str {
	env!("CARGO_PKG_VERSION")
}

/// Target platform as `{os}-{arch}`.
pub fn platform() -> String {
	format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
}

/// Format version info for display.
pub fn format_version_info() -> String {
	format!(
		"runway-server version: {}\n\
         Platform:              {}",
		version(),
		platform(),
	)
}
