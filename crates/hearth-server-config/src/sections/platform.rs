// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backing platform (data API + auth admin API) configuration.
//!
//! The service-role key is never read from the TOML file; it only comes from
//! `SERVICE_ROLE_KEY` or `SERVICE_ROLE_KEY_FILE`.

use std::time::Duration;

use hearth_common_config::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_UPSERT_MAX_ATTEMPTS: u32 = 3;

/// Platform configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct PlatformConfig {
	/// Base URL without trailing slash, e.g. `https://abc.supabase.co`.
	pub url: String,
	pub service_key: SecretString,
	/// Total per-request timeout for every call to the platform.
	pub timeout: Duration,
	/// Attempts for the idempotent tenant upsert. Other calls are never retried.
	pub upsert_max_attempts: u32,
}

impl PlatformConfig {
	/// Config with default timeout and retry settings.
	pub fn new(url: impl Into<String>, service_key: SecretString) -> Self {
		Self {
			url: url.into().trim_end_matches('/').to_string(),
			service_key,
			timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
			upsert_max_attempts: DEFAULT_UPSERT_MAX_ATTEMPTS,
		}
	}

	/// `{url}/rest/v1`
	pub fn rest_url(&self) -> String {
		format!("{}/rest/v1", self.url)
	}

	/// `{url}/auth/v1`
	pub fn auth_url(&self) -> String {
		format!("{}/auth/v1", self.url)
	}
}

/// Platform configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub timeout_secs: Option<u64>,
	#[serde(default)]
	pub upsert_max_attempts: Option<u32>,
}

impl PlatformConfigLayer {
	pub fn merge(&mut self, other: PlatformConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
		if other.upsert_max_attempts.is_some() {
			self.upsert_max_attempts = other.upsert_max_attempts;
		}
	}

	pub fn finalize(self, service_key: Option<SecretString>) -> Result<PlatformConfig, ConfigError> {
		let url = self.url.ok_or_else(|| {
			ConfigError::Missing(
				"platform URL (set HEARTH_SERVER_PLATFORM_URL or SUPABASE_URL)".to_string(),
			)
		})?;
		let url = url.trim().trim_end_matches('/').to_string();
		if !(url.starts_with("http://") || url.starts_with("https://")) {
			return Err(ConfigError::InvalidValue {
				key: "platform.url".to_string(),
				message: format!("'{url}' must start with http:// or https://"),
			});
		}

		let service_key = service_key.filter(|k| !k.is_blank()).ok_or_else(|| {
			ConfigError::Missing(
				"service role key (set SERVICE_ROLE_KEY or SERVICE_ROLE_KEY_FILE)".to_string(),
			)
		})?;

		let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
		if timeout_secs == 0 {
			return Err(ConfigError::InvalidValue {
				key: "platform.timeout_secs".to_string(),
				message: "must be greater than zero".to_string(),
			});
		}

		Ok(PlatformConfig {
			url,
			service_key,
			timeout: Duration::from_secs(timeout_secs),
			upsert_max_attempts: self
				.upsert_max_attempts
				.unwrap_or(DEFAULT_UPSERT_MAX_ATTEMPTS)
				.max(1),
		})
	}
}
