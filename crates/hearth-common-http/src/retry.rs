// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Retry with exponential backoff.
//!
//! Only wrap calls that are idempotent on the remote side. A request that
//! timed out may still have been applied.

use reqwest::StatusCode;
use std::time::Duration;
use tracing::warn;

const RETRYABLE_STATUSES: [StatusCode; 6] = [
	StatusCode::TOO_MANY_REQUESTS,
	StatusCode::REQUEST_TIMEOUT,
	StatusCode::INTERNAL_SERVER_ERROR,
	StatusCode::BAD_GATEWAY,
	StatusCode::SERVICE_UNAVAILABLE,
	StatusCode::GATEWAY_TIMEOUT,
];

#[derive(Debug, Clone)]
pub struct RetryConfig {
	/// Total attempts including the first one. `1` disables retrying.
	pub max_attempts: u32,
	pub base_delay: Duration,
	pub max_delay: Duration,
	pub backoff_factor: f64,
	pub jitter: bool,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_attempts: 3,
			base_delay: Duration::from_millis(200),
			max_delay: Duration::from_secs(5),
			backoff_factor: 2.0,
			jitter: true,
		}
	}
}

impl RetryConfig {
	pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
		self.max_attempts = max_attempts.max(1);
		self
	}
}

pub trait RetryableError {
	fn is_retryable(&self) -> bool;
}

/// Whether an HTTP status is worth another attempt.
pub fn is_retryable_status(status: StatusCode) -> bool {
	RETRYABLE_STATUSES.contains(&status)
}

impl RetryableError for reqwest::Error {
	fn is_retryable(&self) -> bool {
		if self.is_timeout() || self.is_connect() {
			return true;
		}
		self.status().is_some_and(is_retryable_status)
	}
}

fn calculate_delay(cfg: &RetryConfig, attempt: u32) -> Duration {
	let exponential = cfg.base_delay.as_secs_f64() * cfg.backoff_factor.powi(attempt as i32);
	let capped = exponential.min(cfg.max_delay.as_secs_f64());

	let delay = if cfg.jitter {
		capped * (0.5 + fastrand::f64())
	} else {
		capped
	};

	Duration::from_secs_f64(delay)
}

pub async fn retry<F, Fut, T, E>(cfg: &RetryConfig, mut f: F) -> Result<T, E>
where
	F: FnMut() -> Fut,
	Fut: std::future::Future<Output = Result<T, E>>,
	E: RetryableError + std::fmt::Debug,
{
	let mut attempt = 0;

	loop {
		let err = match f().await {
			Ok(result) => return Ok(result),
			Err(err) => err,
		};
		attempt += 1;

		if !err.is_retryable() {
			return Err(err);
		}

		if attempt >= cfg.max_attempts {
			if cfg.max_attempts > 1 {
				warn!(
					error = ?err,
					attempt,
					max_attempts = cfg.max_attempts,
					"max retry attempts exhausted"
				);
			}
			return Err(err);
		}

		let delay = calculate_delay(cfg, attempt - 1);
		warn!(
			error = ?err,
			attempt,
			max_attempts = cfg.max_attempts,
			delay_ms = delay.as_millis() as u64,
			"retrying after error"
		);

		tokio::time::sleep(delay).await;
	}
}
