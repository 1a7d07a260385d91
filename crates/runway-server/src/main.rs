// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Runway backend provisioning server binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use runway_server::{cors_layer, create_app_state, create_router, version};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Runway server - provisions per-request backends in Kubernetes.
#[derive(Parser, Debug)]
#[command(
	name = "runway-server",
	about = "Runway backend provisioning server",
	version
)]
struct Args {
	/// Path to a TOML config file (defaults to /etc/runway/server.toml)
	#[arg(long, env = "RUNWAY_SERVER_CONFIG")]
	config: Option<PathBuf>,

	/// Subcommands for runway-server (e.g., `version`)
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => runway_server_config::load_config_with_file(path)?,
		None => runway_server_config::load_config()?,
	};

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		callback_url = %config.orchestration.callback_url,
		exec_timeout_secs = config.provisioner.exec_timeout_secs,
		"starting runway-server"
	);

	let state = create_app_state(&config).await?;
	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(cors_layer());

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
