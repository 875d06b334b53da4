// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Routes for triggering background jobs.

use axum::{
	extract::{Path, State},
	Json,
};
use hearth_server_jobs::TriggerSource;
use serde::Serialize;

use crate::{api::AppState, error::ServerError};

#[derive(Debug, Serialize)]
pub struct TriggerJobResponse {
	pub run_id: String,
}

/// POST /jobs/{job_id}/run - Start a job now.
///
/// The job runs in the background; its outcome shows up in `/health`.
#[tracing::instrument(skip(state))]
pub async fn trigger_job(
	State(state): State<AppState>,
	Path(job_id): Path<String>,
) -> Result<Json<TriggerJobResponse>, ServerError> {
	let run_id = state
		.job_scheduler
		.spawn_job(&job_id, TriggerSource::Manual)
		.await?;

	tracing::info!(job_id = %job_id, run_id = %run_id, "Manually triggered job");
	Ok(Json(TriggerJobResponse { run_id }))
}
