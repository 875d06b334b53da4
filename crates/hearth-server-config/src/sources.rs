// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	HttpConfigLayer, LogFormat, LoggingConfigLayer, PlatformConfigLayer, SyncConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/hearth/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `HEARTH_SERVER_<SECTION>_<FIELD>`. `PORT` and `SUPABASE_URL`
/// are honoured as fallbacks so existing deployments keep working.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			platform: Some(load_platform_from_env()?),
			sync: Some(load_sync_from_env()?),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Result<Option<bool>, ConfigError> {
	match env_var(name) {
		Some(v) => parse_bool(&v).map(Some).ok_or_else(|| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid value '{v}' (expected true, false, 1 or 0)"),
		}),
		None => Ok(None),
	}
}

fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"true" | "1" => Some(true),
		"false" | "0" => Some(false),
		_ => None,
	}
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	let port = match env_parse("HEARTH_SERVER_PORT")? {
		Some(port) => Some(port),
		None => env_parse("PORT")?,
	};
	Ok(HttpConfigLayer {
		host: env_var("HEARTH_SERVER_HOST"),
		port,
	})
}

fn load_platform_from_env() -> Result<PlatformConfigLayer, ConfigError> {
	Ok(PlatformConfigLayer {
		url: env_var("HEARTH_SERVER_PLATFORM_URL").or_else(|| env_var("SUPABASE_URL")),
		timeout_secs: env_parse("HEARTH_SERVER_PLATFORM_TIMEOUT_SECS")?,
		upsert_max_attempts: env_parse("HEARTH_SERVER_PLATFORM_UPSERT_MAX_ATTEMPTS")?,
	})
}

fn load_sync_from_env() -> Result<SyncConfigLayer, ConfigError> {
	Ok(SyncConfigLayer {
		enabled: env_bool("HEARTH_SERVER_USER_SYNC_ENABLED")?,
		interval_secs: env_parse("HEARTH_SERVER_USER_SYNC_INTERVAL_SECS")?,
		page_size: env_parse("HEARTH_SERVER_USER_SYNC_PAGE_SIZE")?,
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	let format = match env_var("HEARTH_SERVER_LOG_FORMAT") {
		Some(v) => Some(
			v.parse::<LogFormat>()
				.map_err(|message| ConfigError::InvalidValue {
					key: "HEARTH_SERVER_LOG_FORMAT".to_string(),
					message,
				})?,
		),
		None => None,
	};
	Ok(LoggingConfigLayer {
		level: env_var("HEARTH_SERVER_LOG_LEVEL"),
		format,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let layer = TomlSource::new("/nonexistent/hearth.toml").load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.platform.is_none());
	}

	#[test]
	fn test_toml_source_reads_file() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "[platform]\nurl = \"http://localhost:54321\"").unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(
			layer.platform.unwrap().url.as_deref(),
			Some("http://localhost:54321")
		);
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "[platform\nurl = ").unwrap();

		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_env_parse_rejects_garbage() {
		std::env::set_var("HEARTH_TEST_ENV_PARSE_U64", "ten");
		let result: Result<Option<u64>, _> = env_parse("HEARTH_TEST_ENV_PARSE_U64");
		assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
		std::env::remove_var("HEARTH_TEST_ENV_PARSE_U64");
	}

	#[test]
	fn test_parse_bool_accepts_only_known_spellings() {
		assert_eq!(parse_bool("true"), Some(true));
		assert_eq!(parse_bool("TRUE"), Some(true));
		assert_eq!(parse_bool("1"), Some(true));
		assert_eq!(parse_bool("false"), Some(false));
		assert_eq!(parse_bool(" False "), Some(false));
		assert_eq!(parse_bool("0"), Some(false));
		assert_eq!(parse_bool("yes"), None);
		assert_eq!(parse_bool("off"), None);
	}

	#[test]
	fn test_env_bool_rejects_unknown_values() {
		std::env::set_var("HEARTH_TEST_ENV_BOOL_YES", "yes");
		let result = env_bool("HEARTH_TEST_ENV_BOOL_YES");
		std::env::remove_var("HEARTH_TEST_ENV_BOOL_YES");
		assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

		std::env::set_var("HEARTH_TEST_ENV_BOOL_OFF", "0");
		let result = env_bool("HEARTH_TEST_ENV_BOOL_OFF");
		std::env::remove_var("HEARTH_TEST_ENV_BOOL_OFF");
		assert_eq!(result.unwrap(), Some(false));
	}
}
