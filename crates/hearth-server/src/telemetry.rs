// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Tracing subscriber setup.

use hearth_server_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over the configured level.
pub fn env_filter(logging: &LoggingConfig) -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
}

/// Installs the global subscriber. Text goes to stdout with the default fmt
/// layout; JSON emits one object per event.
pub fn init(logging: &LoggingConfig) {
	let json = logging.format == LogFormat::Json;

	tracing_subscriber::registry()
		.with(env_filter(logging))
		.with(json.then(|| tracing_subscriber::fmt::layer().json()))
		.with((!json).then(|| tracing_subscriber::fmt::layer()))
		.init();
}
