// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User sync job configuration.

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_INTERVAL_SECS: u64 = 3600;
const DEFAULT_PAGE_SIZE: u32 = 100;
const MAX_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
	pub enabled: bool,
	pub interval_secs: u64,
	pub page_size: u32,
}

impl Default for SyncConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			interval_secs: DEFAULT_INTERVAL_SECS,
			page_size: DEFAULT_PAGE_SIZE,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncConfigLayer {
	#[serde(default)]
	pub enabled: Option<bool>,
	#[serde(default)]
	pub interval_secs: Option<u64>,
	#[serde(default)]
	pub page_size: Option<u32>,
}

impl SyncConfigLayer {
	pub fn merge(&mut self, other: SyncConfigLayer) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.interval_secs.is_some() {
			self.interval_secs = other.interval_secs;
		}
		if other.page_size.is_some() {
			self.page_size = other.page_size;
		}
	}

	pub fn finalize(self) -> Result<SyncConfig, ConfigError> {
		let defaults = SyncConfig::default();
		let config = SyncConfig {
			enabled: self.enabled.unwrap_or(defaults.enabled),
			interval_secs: self.interval_secs.unwrap_or(defaults.interval_secs),
			page_size: self.page_size.unwrap_or(defaults.page_size),
		};

		if config.interval_secs == 0 {
			return Err(ConfigError::InvalidValue {
				key: "sync.interval_secs".to_string(),
				message: "must be greater than zero".to_string(),
			});
		}
		if config.page_size == 0 || config.page_size > MAX_PAGE_SIZE {
			return Err(ConfigError::InvalidValue {
				key: "sync.page_size".to_string(),
				message: format!("must be between 1 and {MAX_PAGE_SIZE}"),
			});
		}

		Ok(config)
	}
}
