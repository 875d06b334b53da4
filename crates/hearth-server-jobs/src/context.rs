// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::types::TriggerSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct JobContext {
	pub run_id: String,
	pub triggered_by: TriggerSource,
	pub cancellation_token: CancellationToken,
}

impl JobContext {
	/// Context for running a job outside the scheduler.
	pub fn manual() -> Self {
		Self {
			run_id: uuid::Uuid::new_v4().to_string(),
			triggered_by: TriggerSource::Manual,
			cancellation_token: CancellationToken::new(),
		}
	}
}

/// Cooperative cancellation flag; jobs poll it between units of work.
#[derive(Clone, Debug)]
pub struct CancellationToken {
	cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
	pub fn new() -> Self {
		Self {
			cancelled: Arc::new(AtomicBool::new(false)),
		}
	}

	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::SeqCst);
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::SeqCst)
	}
}

impl Default for CancellationToken {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_cancel_is_shared_across_clones() {
		let token = CancellationToken::new();
		let clone = token.clone();
		assert!(!clone.is_cancelled());

		token.cancel();
		assert!(clone.is_cancelled());
	}
}
