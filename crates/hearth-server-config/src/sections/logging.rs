// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logging configuration section.

use serde::Deserialize;

fn default_level() -> String {
	"info,tower_http::trace=debug,reqwest=info".to_string()
}

/// Output format for the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Text,
	Json,
}

impl std::str::FromStr for LogFormat {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"text" | "pretty" => Ok(Self::Text),
			"json" => Ok(Self::Json),
			other => Err(format!("unknown log format '{other}' (expected text or json)")),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LoggingConfigLayer {
	pub level: Option<String>,
	pub format: Option<LogFormat>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.format.is_some() {
			self.format = other.format;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self.level.unwrap_or_else(default_level),
			format: self.format.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
	pub level: String,
	pub format: LogFormat,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		LoggingConfigLayer::default().finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_default_values() {
		let config = LoggingConfig::default();
		assert_eq!(config.level, "info,tower_http::trace=debug,reqwest=info");
		assert_eq!(config.format, LogFormat::Text);
	}

	#[test]
	fn test_deserialize_layer_partial() {
		let layer: LoggingConfigLayer = toml::from_str("format = \"json\"").unwrap();
		assert!(layer.level.is_none());
		assert_eq!(layer.format, Some(LogFormat::Json));
	}

	#[test]
	fn test_format_from_str() {
		assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
		assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
		assert!("xml".parse::<LogFormat>().is_err());
	}

	proptest! {
		#[test]
		fn format_parsing_ignores_case(
			(name, expected) in prop_oneof![
				Just(("json", LogFormat::Json)),
				Just(("text", LogFormat::Text)),
				Just(("pretty", LogFormat::Text)),
			],
			mask in proptest::collection::vec(any::<bool>(), 6),
		) {
			let mixed: String = name
				.chars()
				.zip(mask.iter().cycle())
				.map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
				.collect();
			prop_assert_eq!(mixed.parse::<LogFormat>().unwrap(), expected);
		}

		#[test]
		fn unknown_formats_are_rejected(name in "[a-z]{1,12}") {
			prop_assume!(!matches!(name.as_str(), "json" | "text" | "pretty"));
			prop_assert!(name.parse::<LogFormat>().is_err());
		}
	}
}
