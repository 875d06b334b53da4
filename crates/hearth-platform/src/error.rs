// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the platform clients.

use hearth_common_http::{is_retryable_status, RetryableError};
use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the data API and auth admin API clients.
#[derive(Debug, Error)]
pub enum PlatformError {
	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	/// The request exceeded the configured timeout.
	#[error("Request timed out")]
	Timeout,

	/// The service-role key was rejected.
	#[error("Platform rejected the service credentials ({status})")]
	Unauthorized { status: u16 },

	#[error("Rate limit exceeded")]
	RateLimited,

	/// The auth subsystem already has an account for this email.
	#[error("A user with email {email} already exists")]
	UserAlreadyExists { email: String },

	/// Any other non-success response.
	#[error("Platform API error: {status} - {message}")]
	Api { status: u16, message: String },

	/// The response could not be interpreted.
	#[error("Invalid response from platform: {0}")]
	InvalidResponse(String),
}

impl PlatformError {
	pub fn is_user_already_exists(&self) -> bool {
		matches!(self, Self::UserAlreadyExists { .. })
	}
}

impl RetryableError for PlatformError {
	fn is_retryable(&self) -> bool {
		match self {
			Self::Network(e) => e.is_retryable(),
			Self::Timeout | Self::RateLimited => true,
			Self::Api { status, .. } => {
				StatusCode::from_u16(*status).is_ok_and(is_retryable_status)
			}
			Self::Unauthorized { .. } | Self::UserAlreadyExists { .. } | Self::InvalidResponse(_) => {
				false
			}
		}
	}
}
