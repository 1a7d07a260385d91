// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Setup script rendering.
//!
//! The script is stored in the per-request config map under [`SCRIPT_KEY`],
//! mounted into the workload at [`SCRIPT_MOUNT_PATH`] and run over the exec
//! channel with [`exec_command`].

/// Config map key holding the setup script.
pub const SCRIPT_KEY: &str = "setup.sh";

/// Directory the script volume is mounted at.
pub const SCRIPT_MOUNT_PATH: &str = "/scripts";

/// Directory the repository is cloned into.
pub const APP_DIR: &str = "/app";

/// Runtime toolchain selected by the request's `language`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
	Python,
	Node,
	/// Any other language; the script only fetches the repository.
	Unknown,
}

impl Runtime {
	pub fn from_language(language: &str) -> Self {
		match language.trim().to_ascii_lowercase().as_str() {
			"python" => Runtime::Python,
			"node" => Runtime::Node,
			_ => Runtime::Unknown,
		}
	}

	fn start_commands(&self) -> &'static str {
		match self {
			Runtime::Python => {
				"if [ -f requirements.txt ]; then\n\tpip install -r requirements.txt\nfi\npython main.py\n"
			}
			Runtime::Node => "npm install\nnpm start\n",
			Runtime::Unknown => "echo \"No start command for this language\"\n",
		}
	}
}

/// Render the bash setup script for a repository and language.
///
/// The script installs git, clones the repository into [`APP_DIR`], pulls the
/// latest changes and starts the application with the runtime's toolchain.
pub fn render_setup_script(repo_url: &str, language: &str) -> String {
	let repo = shell_quote(repo_url);
	let runtime = Runtime::from_language(language);

	let mut script = String::from("#!/bin/bash\n\n");
	script.push_str("echo \"Starting setup...\"\n");
	script.push_str("apt-get update && apt-get install -y git\n\n");
	script.push_str(&format!("git clone {repo} {APP_DIR}\n"));
	script.push_str(&format!("cd {APP_DIR}\n"));
	script.push_str("git pull\n\n");
	script.push_str(runtime.start_commands());
	script
}

/// Command run in the workload container to execute the mounted script.
pub fn exec_command() -> Vec<String> {
	vec![
		"/bin/bash".to_string(),
		"-c".to_string(),
		format!("cd {SCRIPT_MOUNT_PATH} && chmod +x {SCRIPT_KEY} 2>/dev/null; ./{SCRIPT_KEY}"),
	]
}

/// Quote a value as a single POSIX shell word.
fn shell_quote(value: &str) -> String {
	format!("'{}'", value.replace('\'', r"'\''"))
}
