// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for hearth-server.
//!
//! Layered from defaults, a TOML file and the environment (highest wins). The
//! platform URL and service-role key are required: [`load_config`] fails
//! without them and the server refuses to start.
//!
//! ```ignore
//! let config = hearth_server_config::load_config()?;
//! println!("platform at {}", config.platform.url);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use hearth_common_config::SecretString;
use tracing::{debug, info};

/// Environment variable (or `_FILE` variant) holding the service-role key.
pub const SERVICE_KEY_ENV: &str = "SERVICE_ROLE_KEY";

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub platform: PlatformConfig,
	pub sync: SyncConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration with the system config file (`/etc/hearth/server.toml`).
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	let service_key = hearth_common_config::load_secret_env(SERVICE_KEY_ENV)
		.map_err(|e| ConfigError::Secret(e.to_string()))?;

	finalize(merged, service_key)
}

/// Resolve a merged layer into a validated config.
pub fn finalize(
	layer: ServerConfigLayer,
	service_key: Option<SecretString>,
) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let platform = layer.platform.unwrap_or_default().finalize(service_key)?;
	let sync = layer.sync.unwrap_or_default().finalize()?;
	let logging = layer.logging.unwrap_or_default().finalize();

	info!(
		host = %http.host,
		port = http.port,
		platform_url = %platform.url,
		platform_timeout_secs = platform.timeout.as_secs(),
		user_sync_enabled = sync.enabled,
		user_sync_interval_secs = sync.interval_secs,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		platform,
		sync,
		logging,
	})
}
