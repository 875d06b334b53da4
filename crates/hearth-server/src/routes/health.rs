// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use hearth_server_jobs::{HealthState, JobHealthStatus};
use serde::Serialize;

use crate::api::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: HealthState,
	pub timestamp: String,
	pub version: &'static str,
	pub jobs: Vec<JobHealthStatus>,
}

/// GET /health - Reports background job health.
///
/// Degraded still answers 200; only unhealthy answers 503.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let jobs = state.job_scheduler.health_status().await;

	let response = HealthResponse {
		status: jobs.status,
		timestamp: chrono::Utc::now().to_rfc3339(),
		version: env!("CARGO_PKG_VERSION"),
		jobs: jobs.jobs,
	};

	let http_status = match jobs.status {
		HealthState::Healthy | HealthState::Degraded => StatusCode::OK,
		HealthState::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
	};

	(http_status, Json(response))
}
