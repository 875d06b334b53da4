// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use async_trait::async_trait;
use hearth_common_http::RetryableError;
use hearth_platform::{AuthAdminApi, DataApi, PlatformError, Profile};
use hearth_server_jobs::{Job, JobContext, JobError, JobOutput};
use tracing::instrument;

pub const USER_SYNC_JOB_ID: &str = "user-sync";

/// Mirrors auth accounts into the `profiles` table.
pub struct UserSyncJob {
	data: Arc<dyn DataApi>,
	auth: Arc<dyn AuthAdminApi>,
	page_size: u32,
}

impl UserSyncJob {
	pub fn new(data: Arc<dyn DataApi>, auth: Arc<dyn AuthAdminApi>, page_size: u32) -> Self {
		Self {
			data,
			auth,
			page_size: page_size.max(1),
		}
	}
}

fn platform_failure(e: PlatformError) -> JobError {
	JobError::Failed {
		retryable: e.is_retryable(),
		message: e.to_string(),
	}
}

#[async_trait]
impl Job for UserSyncJob {
	fn id(&self) -> &str {
		USER_SYNC_JOB_ID
	}

	fn name(&self) -> &str {
		"User Sync"
	}

	fn description(&self) -> &str {
		"Upsert a profile row for every auth user with an email"
	}

	#[instrument(skip(self, ctx), fields(job_id = USER_SYNC_JOB_ID, run_id = %ctx.run_id))]
	async fn run(&self, ctx: &JobContext) -> Result<JobOutput, JobError> {
		let mut synced = 0usize;
		let mut skipped = 0usize;
		let mut pages = 0u32;

		loop {
			if ctx.cancellation_token.is_cancelled() {
				tracing::info!(synced, pages, "User sync cancelled");
				return Err(JobError::Cancelled);
			}

			let page = pages + 1;
			let users = self
				.auth
				.list_users(page, self.page_size)
				.await
				.map_err(platform_failure)?;
			pages = page;

			let profiles: Vec<Profile> = users.iter().filter_map(Profile::from_auth_user).collect();
			skipped += users.len() - profiles.len();

			self
				.data
				.upsert_profiles(&profiles)
				.await
				.map_err(platform_failure)?;
			synced += profiles.len();

			tracing::debug!(page, fetched = users.len(), upserted = profiles.len(), "Synced user page");

			if users.len() < self.page_size as usize {
				break;
			}
		}

		tracing::info!(synced, skipped, pages, "User sync completed");

		Ok(JobOutput {
			message: format!("synced {synced} users"),
			metadata: Some(serde_json::json!({
				"synced": synced,
				"skipped": skipped,
				"pages": pages,
			})),
		})
	}
}
