// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Job health as reported by `GET /health`.

use crate::types::{JobRun, JobStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Consecutive failures at which a job turns unhealthy.
pub const UNHEALTHY_AFTER_FAILURES: u32 = 3;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
	Healthy,
	Degraded,
	Unhealthy,
}

impl HealthState {
	/// Health of a job given its latest run and current failure streak.
	pub fn from_last_run(last_run: Option<&JobRun>, consecutive_failures: u32) -> Self {
		match last_run.map(|run| run.status) {
			Some(JobStatus::Failed) if consecutive_failures >= UNHEALTHY_AFTER_FAILURES => {
				Self::Unhealthy
			}
			Some(JobStatus::Failed) if consecutive_failures > 0 => Self::Degraded,
			_ => Self::Healthy,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct LastRunInfo {
	pub run_id: String,
	pub status: JobStatus,
	pub started_at: DateTime<Utc>,
	pub duration_ms: Option<i64>,
	pub error: Option<String>,
}

impl From<JobRun> for LastRunInfo {
	fn from(run: JobRun) -> Self {
		Self {
			run_id: run.id,
			status: run.status,
			started_at: run.started_at,
			duration_ms: run.duration_ms,
			error: run.error_message,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct JobHealthStatus {
	pub job_id: String,
	pub name: String,
	pub status: HealthState,
	pub last_run: Option<LastRunInfo>,
	pub consecutive_failures: u32,
}

/// Overall status is the worst of the individual jobs.
#[derive(Debug, Clone, Serialize)]
pub struct JobsHealthStatus {
	pub status: HealthState,
	pub jobs: Vec<JobHealthStatus>,
}

impl JobsHealthStatus {
	pub fn from_jobs(jobs: Vec<JobHealthStatus>) -> Self {
		let status = jobs
			.iter()
			.map(|job| job.status)
			.max()
			.unwrap_or(HealthState::Healthy);
		Self { status, jobs }
	}
}
