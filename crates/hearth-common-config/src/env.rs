// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Loading secrets from the environment.
//!
//! `{VAR}_FILE` wins over `{VAR}` so that a mounted secret file can override a
//! stale value left in a `.env`.

use std::path::PathBuf;
use std::{env, fs};

use hearth_common_secret::SecretString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load `var` from `{var}_FILE` (one trailing newline stripped) or from `var`.
///
/// Returns `Ok(None)` when neither is set or the direct value is empty.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(path_str);
		let content = fs::read_to_string(&path).map_err(|source| SecretEnvError::Io {
			path: path.clone(),
			source,
		})?;

		let value = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(value)));
	}

	match env::var(var) {
		Ok(value) if !value.is_empty() => Ok(Some(SecretString::new(value))),
		_ => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[test]
	fn unset_is_none() {
		let var = "HEARTH_TEST_UNSET_SECRET";
		env::remove_var(var);
		env::remove_var(format!("{var}_FILE"));

		assert!(load_secret_env(var).unwrap().is_none());
	}

	#[test]
	fn empty_direct_value_is_none() {
		let var = "HEARTH_TEST_EMPTY_SECRET";
		env::set_var(var, "");
		env::remove_var(format!("{var}_FILE"));

		assert!(load_secret_env(var).unwrap().is_none());

		env::remove_var(var);
	}

	#[test]
	fn reads_direct_value() {
		let var = "HEARTH_TEST_DIRECT_SECRET";
		env::set_var(var, "service-role-key");
		env::remove_var(format!("{var}_FILE"));

		let secret = load_secret_env(var).unwrap().unwrap();
		assert_eq!(secret.expose(), "service-role-key");

		env::remove_var(var);
	}

	#[test]
	fn file_wins_and_trailing_newline_is_stripped() {
		let var = "HEARTH_TEST_FILE_SECRET";
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "from-file").unwrap();

		env::set_var(var, "from-env");
		env::set_var(format!("{var}_FILE"), file.path().to_str().unwrap());

		let secret = load_secret_env(var).unwrap().unwrap();
		assert_eq!(secret.expose(), "from-file");

		env::remove_var(var);
		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn missing_file_is_an_error() {
		let var = "HEARTH_TEST_MISSING_FILE_SECRET";
		env::set_var(format!("{var}_FILE"), "/nonexistent/hearth/secret");

		assert!(matches!(
			load_secret_env(var).unwrap_err(),
			SecretEnvError::Io { .. }
		));

		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn empty_file_path_is_an_error() {
		let var = "HEARTH_TEST_EMPTY_PATH_SECRET";
		env::set_var(format!("{var}_FILE"), "");

		assert!(matches!(
			load_secret_env(var).unwrap_err(),
			SecretEnvError::EmptyPath { .. }
		));

		env::remove_var(format!("{var}_FILE"));
	}
}
