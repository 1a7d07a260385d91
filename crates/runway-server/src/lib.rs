// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Runway backend provisioning server.
//!
//! This crate exposes the `create` and `test` flows of `runway-provisioner`
//! over HTTP.

pub mod api;
pub mod error;
pub mod routes;
pub mod version;

pub use api::{cors_layer, create_app_state, create_router, AppState};
pub use error::{ErrorResponse, ServerError};
pub use runway_server_config::ServerConfig;
