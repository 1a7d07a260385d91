// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! K8s client abstraction for Runway backend provisioning.
//!
//! This crate provides:
//! - A trait-based K8s client abstraction for testability
//! - Production implementation using the kube crate
//! - Common types for resource creation and remote exec
//! - An in-memory mock client for tests

mod client;
mod error;
mod kube_client;
mod mock;
mod types;

pub use client::K8sClient;
pub use error::{K8sError, K8sResult};
pub use kube_client::KubeClient;
pub use mock::{ExecCall, MockExec, MockK8sClient, MockOperation};
pub use types::{
	ConfigMap, ConfigMapVolumeSource, Container, ContainerPort, ExecProcess, ExecStatus,
	ExecStatusFuture, IntOrString, Namespace, ObjectMeta, Pod, PodSpec, PodStatus, Service,
	ServicePort, ServiceSpec, Volume, VolumeMount,
};
