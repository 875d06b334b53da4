// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration primitives shared by the Hearth crates.
//!
//! - [`SecretString`] re-exported from [`hearth_common_secret`]
//! - [`load_secret_env`] for the `VAR` / `VAR_FILE`
//!   convention used by Docker and Kubernetes secret mounts

pub mod env;

pub use hearth_common_secret::{Secret, SecretString, REDACTED};

pub use env::{load_secret_env, SecretEnvError};
