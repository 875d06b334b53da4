// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum JobError {
	#[error("Job failed: {message}")]
	Failed { message: String, retryable: bool },

	#[error("Job cancelled")]
	Cancelled,

	#[error("Job not found: {0}")]
	NotFound(String),
}

impl JobError {
	pub fn failed(message: impl Into<String>, retryable: bool) -> Self {
		Self::Failed {
			message: message.into(),
			retryable,
		}
	}
}

pub type Result<T> = std::result::Result<T, JobError>;
