// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory record of recent job runs.

use crate::types::{JobRun, JobStatus};
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;

const DEFAULT_RUNS_PER_JOB: usize = 20;

/// Most recent runs per job, newest last. Older runs are evicted once a job
/// exceeds the capacity.
pub struct RunHistory {
	runs: RwLock<HashMap<String, VecDeque<JobRun>>>,
	capacity: usize,
}

impl RunHistory {
	pub fn new() -> Self {
		Self::with_capacity(DEFAULT_RUNS_PER_JOB)
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			runs: RwLock::new(HashMap::new()),
			capacity: capacity.max(1),
		}
	}

	pub async fn record_run_start(&self, run: &JobRun) {
		let mut runs = self.runs.write().await;
		let job_runs = runs.entry(run.job_id.clone()).or_default();
		job_runs.push_back(run.clone());
		while job_runs.len() > self.capacity {
			job_runs.pop_front();
		}
	}

	pub async fn record_retry(&self, job_id: &str, run_id: &str, retry_count: u32) {
		let mut runs = self.runs.write().await;
		if let Some(run) = find_run(&mut runs, job_id, run_id) {
			run.retry_count = retry_count;
		}
	}

	pub async fn record_run_complete(
		&self,
		job_id: &str,
		run_id: &str,
		status: JobStatus,
		error_message: Option<String>,
		metadata: Option<serde_json::Value>,
	) {
		let mut runs = self.runs.write().await;
		if let Some(run) = find_run(&mut runs, job_id, run_id) {
			let now = Utc::now();
			run.status = status;
			run.completed_at = Some(now);
			run.duration_ms = Some((now - run.started_at).num_milliseconds());
			run.error_message = error_message;
			run.metadata = metadata;
		}
	}

	pub async fn get_last_run(&self, job_id: &str) -> Option<JobRun> {
		let runs = self.runs.read().await;
		runs.get(job_id).and_then(|r| r.back().cloned())
	}

	pub async fn get_run(&self, job_id: &str, run_id: &str) -> Option<JobRun> {
		let runs = self.runs.read().await;
		runs
			.get(job_id)
			.and_then(|r| r.iter().rev().find(|run| run.id == run_id).cloned())
	}

	/// Failed runs since the last run that did not fail. In-flight runs are
	/// ignored.
	pub async fn count_consecutive_failures(&self, job_id: &str) -> u32 {
		let runs = self.runs.read().await;
		let Some(job_runs) = runs.get(job_id) else {
			return 0;
		};
		job_runs
			.iter()
			.rev()
			.filter(|r| r.status != JobStatus::Running)
			.take_while(|r| r.status == JobStatus::Failed)
			.count() as u32
	}
}

impl Default for RunHistory {
	fn default() -> Self {
		Self::new()
	}
}

fn find_run<'a>(
	runs: &'a mut HashMap<String, VecDeque<JobRun>>,
	job_id: &str,
	run_id: &str,
) -> Option<&'a mut JobRun> {
	runs
		.get_mut(job_id)?
		.iter_mut()
		.rev()
		.find(|r| r.id == run_id)
}
