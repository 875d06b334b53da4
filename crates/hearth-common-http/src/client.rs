// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP client construction.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Upper bound on establishing a TCP/TLS connection to the platform.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client builder with the Hearth User-Agent and [`CONNECT_TIMEOUT`].
///
/// Callers are expected to add a total request timeout on top.
pub fn builder() -> ClientBuilder {
	Client::builder()
		.user_agent(user_agent())
		.connect_timeout(CONNECT_TIMEOUT)
}

/// Builds a client whose every request gives up after `timeout`.
pub fn new_client_with_timeout(timeout: Duration) -> Result<Client, reqwest::Error> {
	builder().timeout(timeout).build()
}

/// `hearth/{version}`
pub fn user_agent() -> String {
	format!("hearth/{}", env!("CARGO_PKG_VERSION"))
}
