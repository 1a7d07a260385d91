// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod http;
mod k8s;
mod logging;
mod orchestration;
mod provisioner;

pub use http::{HttpConfig, HttpConfigLayer};
pub use k8s::{K8sConfig, K8sConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use orchestration::{OrchestrationConfig, OrchestrationConfigLayer, ORCHESTRATION_URL_ENV};
pub use provisioner::{ProvisionerConfig, ProvisionerConfigLayer};
