// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::context::{CancellationToken, JobContext};
use crate::error::{JobError, Result};
use crate::health::{HealthState, JobHealthStatus, JobsHealthStatus, LastRunInfo};
use crate::history::RunHistory;
use crate::job::Job;
use crate::types::{JobRun, JobStatus, JobType, TriggerSource};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

const BASE_RETRY_DELAY_SECS: u64 = 1;
const MAX_RETRY_DELAY_SECS: u64 = 60;
const RETRY_FACTOR: f64 = 2.0;
const MAX_RETRIES: u32 = 3;

struct RegisteredJob {
	job: Arc<dyn Job>,
	job_type: JobType,
	cancellation_token: CancellationToken,
}

pub struct JobScheduler {
	jobs: HashMap<String, RegisteredJob>,
	history: Arc<RunHistory>,
	shutdown_tx: broadcast::Sender<()>,
	handles: Mutex<Vec<JoinHandle<()>>>,
}

impl JobScheduler {
	pub fn new(history: Arc<RunHistory>) -> Self {
		let (shutdown_tx, _) = broadcast::channel(1);
		Self {
			jobs: HashMap::new(),
			history,
			shutdown_tx,
			handles: Mutex::new(Vec::new()),
		}
	}

	pub fn register_periodic(&mut self, job: Arc<dyn Job>, interval: Duration) {
		let id = job.id().to_string();
		self.jobs.insert(
			id,
			RegisteredJob {
				job,
				job_type: JobType::Periodic { interval },
				cancellation_token: CancellationToken::new(),
			},
		);
	}

	pub fn register_one_shot(&mut self, job: Arc<dyn Job>) {
		let id = job.id().to_string();
		self.jobs.insert(
			id,
			RegisteredJob {
				job,
				job_type: JobType::OneShot,
				cancellation_token: CancellationToken::new(),
			},
		);
	}

	/// Spawns a loop per periodic job. The first run happens one interval
	/// after start.
	#[instrument(skip(self))]
	pub async fn start(&self) {
		let mut handles = self.handles.lock().await;

		for (job_id, registered) in &self.jobs {
			if let JobType::Periodic { interval } = registered.job_type {
				let job = Arc::clone(&registered.job);
				let history = Arc::clone(&self.history);
				let mut shutdown_rx = self.shutdown_tx.subscribe();
				let cancellation_token = registered.cancellation_token.clone();
				let job_id = job_id.clone();

				info!(job_id = %job_id, interval_secs = interval.as_secs(), "Scheduling periodic job");

				let handle = tokio::spawn(async move {
					loop {
						tokio::select! {
							_ = tokio::time::sleep(interval) => {
								// Only shutdown cancels the token.
								if cancellation_token.is_cancelled() {
									break;
								}
								let run_id = uuid::Uuid::new_v4().to_string();
								let _ = run_job_with_retry(
									&job,
									&history,
									TriggerSource::Schedule,
									&cancellation_token,
									run_id,
								).await;
							}
							_ = shutdown_rx.recv() => {
								info!(job_id = %job_id, "Shutting down periodic job");
								break;
							}
						}
					}
				});

				handles.push(handle);
			}
		}

		info!(job_count = handles.len(), "Job scheduler started");
	}

	/// Runs a job now and waits for it, retries included.
	#[instrument(skip(self))]
	pub async fn trigger_job(&self, job_id: &str, triggered_by: TriggerSource) -> Result<String> {
		let registered = self
			.jobs
			.get(job_id)
			.ok_or_else(|| JobError::NotFound(job_id.to_string()))?;

		run_job_with_retry(
			&registered.job,
			&self.history,
			triggered_by,
			&registered.cancellation_token,
			uuid::Uuid::new_v4().to_string(),
		)
		.await
	}

	/// Starts a job in the background and returns its run id immediately.
	#[instrument(skip(self))]
	pub async fn spawn_job(&self, job_id: &str, triggered_by: TriggerSource) -> Result<String> {
		let registered = self
			.jobs
			.get(job_id)
			.ok_or_else(|| JobError::NotFound(job_id.to_string()))?;

		let job = Arc::clone(&registered.job);
		let history = Arc::clone(&self.history);
		let cancellation_token = registered.cancellation_token.clone();
		let run_id = uuid::Uuid::new_v4().to_string();
		let task_run_id = run_id.clone();

		let handle = tokio::spawn(async move {
			let _ = run_job_with_retry(
				&job,
				&history,
				triggered_by,
				&cancellation_token,
				task_run_id,
			)
			.await;
		});

		let mut handles = self.handles.lock().await;
		handles.retain(|h| !h.is_finished());
		handles.push(handle);

		info!(job_id = %job_id, run_id = %run_id, "Job started in background");
		Ok(run_id)
	}

	/// Cancels running jobs, stops the periodic loops and waits for them.
	#[instrument(skip(self))]
	pub async fn shutdown(&self) {
		for registered in self.jobs.values() {
			registered.cancellation_token.cancel();
		}
		let _ = self.shutdown_tx.send(());

		let mut handles = self.handles.lock().await;
		for handle in handles.drain(..) {
			let _ = handle.await;
		}

		info!("Job scheduler shut down");
	}

	pub fn job_ids(&self) -> Vec<String> {
		let mut ids: Vec<String> = self.jobs.keys().cloned().collect();
		ids.sort();
		ids
	}

	pub fn history(&self) -> &Arc<RunHistory> {
		&self.history
	}

	#[instrument(skip(self))]
	pub async fn job_status(&self, job_id: &str) -> Option<JobHealthStatus> {
		let registered = self.jobs.get(job_id)?;

		let last_run = self.history.get_last_run(job_id).await;
		let consecutive_failures = self.history.count_consecutive_failures(job_id).await;

		let status = HealthState::from_last_run(last_run.as_ref(), consecutive_failures);

		Some(JobHealthStatus {
			job_id: job_id.to_string(),
			name: registered.job.name().to_string(),
			status,
			last_run: last_run.map(LastRunInfo::from),
			consecutive_failures,
		})
	}

	#[instrument(skip(self))]
	pub async fn health_status(&self) -> JobsHealthStatus {
		let mut jobs = Vec::new();
		for job_id in self.job_ids() {
			if let Some(status) = self.job_status(&job_id).await {
				jobs.push(status);
			}
		}
		JobsHealthStatus::from_jobs(jobs)
	}
}

async fn run_job_with_retry(
	job: &Arc<dyn Job>,
	history: &Arc<RunHistory>,
	triggered_by: TriggerSource,
	cancellation_token: &CancellationToken,
	run_id: String,
) -> Result<String> {
	let mut retry_count = 0u32;

	history
		.record_run_start(&JobRun {
			id: run_id.clone(),
			job_id: job.id().to_string(),
			status: JobStatus::Running,
			started_at: Utc::now(),
			completed_at: None,
			duration_ms: None,
			error_message: None,
			retry_count,
			triggered_by,
			metadata: None,
		})
		.await;

	loop {
		let ctx = JobContext {
			run_id: run_id.clone(),
			triggered_by: if retry_count > 0 {
				TriggerSource::Retry
			} else {
				triggered_by
			},
			cancellation_token: cancellation_token.clone(),
		};

		match job.run(&ctx).await {
			Ok(output) => {
				history
					.record_run_complete(
						job.id(),
						&run_id,
						JobStatus::Succeeded,
						None,
						output.metadata,
					)
					.await;
				info!(job_id = %job.id(), run_id = %run_id, message = %output.message, "Job completed successfully");
				return Ok(run_id);
			}
			Err(JobError::Cancelled) => {
				history
					.record_run_complete(job.id(), &run_id, JobStatus::Cancelled, None, None)
					.await;
				info!(job_id = %job.id(), run_id = %run_id, "Job cancelled");
				return Err(JobError::Cancelled);
			}
			Err(JobError::Failed { message, retryable }) => {
				if retryable && retry_count < MAX_RETRIES && !cancellation_token.is_cancelled() {
					retry_count += 1;
					history.record_retry(job.id(), &run_id, retry_count).await;
					let delay_secs = calculate_backoff_delay(retry_count);
					warn!(
						job_id = %job.id(),
						run_id = %run_id,
						retry_count,
						delay_secs,
						error = %message,
						"Job failed, retrying"
					);
					tokio::time::sleep(Duration::from_secs(delay_secs)).await;
					continue;
				}

				history
					.record_run_complete(
						job.id(),
						&run_id,
						JobStatus::Failed,
						Some(message.clone()),
						None,
					)
					.await;
				warn!(job_id = %job.id(), run_id = %run_id, error = %message, "Job failed");
				return Err(JobError::Failed { message, retryable });
			}
			Err(e) => {
				let message = e.to_string();
				history
					.record_run_complete(job.id(), &run_id, JobStatus::Failed, Some(message.clone()), None)
					.await;
				warn!(job_id = %job.id(), run_id = %run_id, error = %message, "Job failed with error");
				return Err(e);
			}
		}
	}
}

pub(crate) fn calculate_backoff_delay(retry_count: u32) -> u64 {
	let delay = BASE_RETRY_DELAY_SECS as f64 * RETRY_FACTOR.powi(retry_count as i32 - 1);
	(delay as u64).min(MAX_RETRY_DELAY_SECS)
}
