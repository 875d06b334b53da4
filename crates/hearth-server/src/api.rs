// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::sync::Arc;
use std::time::Duration;

use axum::{
	routing::{get, post},
	Router,
};
use hearth_common_http::RetryConfig;
use hearth_platform::{AuthAdminApi, AuthAdminClient, DataApi, PlatformError, RestClient};
use hearth_server_config::{PlatformConfig, SyncConfig};
use hearth_server_jobs::{JobScheduler, RunHistory};
use hearth_server_provisioning::TenantProvisioner;

use crate::jobs::UserSyncJob;
use crate::routes;

/// Handles to both platform APIs.
#[derive(Clone)]
pub struct PlatformClients {
	pub data: Arc<dyn DataApi>,
	pub auth: Arc<dyn AuthAdminApi>,
}

impl PlatformClients {
	/// Builds HTTP clients for the configured platform.
	///
	/// The data client retries idempotent calls up to `upsert_max_attempts`
	/// times. Account creation and the attach procedure are never retried.
	pub fn connect(config: &PlatformConfig) -> Result<Self, PlatformError> {
		let retry = RetryConfig::default().with_max_attempts(config.upsert_max_attempts);

		let data = RestClient::new(config.rest_url(), config.service_key.clone(), config.timeout)?
			.with_retry_config(retry.clone());
		let auth = AuthAdminClient::new(config.auth_url(), config.service_key.clone(), config.timeout)?
			.with_retry_config(retry);

		tracing::debug!(rest_url = %data.base_url(), auth_url = %auth.base_url(), "Platform clients ready");

		Ok(Self {
			data: Arc::new(data),
			auth: Arc::new(auth),
		})
	}
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub provisioner: TenantProvisioner,
	pub job_scheduler: Arc<JobScheduler>,
}

/// Registers the user sync job: periodic when enabled, otherwise only
/// available on demand.
pub fn create_job_scheduler(clients: &PlatformClients, sync: &SyncConfig) -> JobScheduler {
	let mut scheduler = JobScheduler::new(Arc::new(RunHistory::new()));
	let job = Arc::new(UserSyncJob::new(
		Arc::clone(&clients.data),
		Arc::clone(&clients.auth),
		sync.page_size,
	));

	if sync.enabled {
		scheduler.register_periodic(job, Duration::from_secs(sync.interval_secs));
		tracing::info!(interval_secs = sync.interval_secs, "Registered user sync background job");
	} else {
		scheduler.register_one_shot(job);
		tracing::info!("User sync schedule disabled; job available on demand");
	}

	scheduler
}

pub fn create_app_state(clients: &PlatformClients, job_scheduler: Arc<JobScheduler>) -> AppState {
	AppState {
		provisioner: TenantProvisioner::new(Arc::clone(&clients.data), Arc::clone(&clients.auth)),
		job_scheduler,
	}
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/create-tenant", post(routes::tenants::create_tenant))
		.route("/tenants/{slug}", get(routes::tenants::get_tenant))
		.route("/jobs/{job_id}/run", post(routes::jobs::trigger_job))
		.with_state(state)
}
