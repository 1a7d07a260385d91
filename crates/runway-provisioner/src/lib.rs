// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backend provisioning business logic for Runway.
//!
//! This crate provisions a per-request execution environment in Kubernetes,
//! runs a generated setup script inside it and reports the outcome to the
//! orchestration service.
//!
//! # Architecture
//!
//! The provisioner layer sits between the HTTP API (runway-server) and the
//! Kubernetes client (runway-k8s), implementing:
//!
//! - Resource provisioning (namespace, script config map, pod, service)
//! - Script execution over the exec channel with a deadline
//! - Status reporting to the orchestration callback
//! - The `create` and `test` request flows

pub mod config;
pub mod error;
pub mod executor;
pub mod flow;
pub mod pipeline;
pub mod provisioner;
pub mod reporter;
pub mod script;
pub mod types;

pub use config::{ProvisionerConfig, ReporterConfig};
pub use error::{ExecutionError, FlowError, ProvisionError, ReportError};
pub use executor::ScriptExecutor;
pub use flow::{FlowReport, RequestHandler};
pub use pipeline::{Stage, StageExt};
pub use provisioner::ResourceProvisioner;
pub use reporter::{build_report, ResultReporter, REPORT_STEP};
pub use types::{
	ExecutionOutput, GitInfo, ProvisionRequest, ReportStatus, RequestBody, RequestError,
	ResourceNames, StatusReport,
};
