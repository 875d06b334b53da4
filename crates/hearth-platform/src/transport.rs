// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Authenticated HTTP plumbing shared by the REST and auth clients.

use std::time::Duration;

use hearth_common_secret::SecretString;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, trace};

use crate::error::PlatformError;

const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone)]
pub(crate) struct Transport {
	http_client: Client,
	base_url: String,
	service_key: SecretString,
}

impl Transport {
	pub(crate) fn new(
		base_url: impl Into<String>,
		service_key: SecretString,
		timeout: Duration,
	) -> Result<Self, PlatformError> {
		let http_client = hearth_common_http::new_client_with_timeout(timeout)?;
		Ok(Self {
			http_client,
			base_url: base_url.into().trim_end_matches('/').to_string(),
			service_key,
		})
	}

	pub(crate) fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Request carrying the `apikey` and bearer headers the platform gateway expects.
	pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
		let key = self.service_key.expose();
		self
			.http_client
			.request(method, format!("{}{}", self.base_url, path))
			.header("apikey", key)
			.bearer_auth(key)
	}

	/// Sends the request; only transport failures are errors here.
	pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, PlatformError> {
		let response = request.send().await.map_err(|e| {
			if e.is_timeout() {
				error!("Request to platform timed out");
				return PlatformError::Timeout;
			}
			error!(error = %e, "Network error during platform request");
			PlatformError::Network(e)
		})?;
		debug!(status = %response.status(), url = %response.url().path(), "Received platform response");
		Ok(response)
	}

	/// Sends the request and turns any non-success status into an error.
	pub(crate) async fn send_ok(&self, request: RequestBuilder) -> Result<Response, PlatformError> {
		let response = self.send(request).await?;
		if response.status().is_success() {
			return Ok(response);
		}
		let status = response.status();
		let body = response.text().await.unwrap_or_default();
		Err(status_error(status, &body))
	}
}

/// Error envelope fields used by the data API (`message`, `code`) and the
/// auth API (`msg`, `error_code`, `error_description`).
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
	#[serde(default)]
	pub code: Option<serde_json::Value>,
	#[serde(default)]
	pub error_code: Option<String>,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub msg: Option<String>,
	#[serde(default)]
	pub error_description: Option<String>,
	#[serde(default)]
	pub error: Option<String>,
}

impl ErrorBody {
	pub(crate) fn parse(body: &str) -> Self {
		serde_json::from_str(body).unwrap_or_default()
	}

	/// The machine-readable code, whichever field carried it.
	pub(crate) fn code(&self) -> Option<String> {
		self.error_code.clone().or_else(|| match &self.code {
			Some(serde_json::Value::String(s)) => Some(s.clone()),
			_ => None,
		})
	}

	pub(crate) fn message(&self) -> Option<&str> {
		self
			.msg
			.as_deref()
			.or(self.message.as_deref())
			.or(self.error_description.as_deref())
			.or(self.error.as_deref())
	}
}

fn truncate(body: &str) -> String {
	match body.char_indices().nth(MAX_ERROR_BODY) {
		Some((idx, _)) => format!("{}...", &body[..idx]),
		None => body.to_string(),
	}
}

/// Maps a non-success status to an error.
pub(crate) fn status_error(status: StatusCode, body: &str) -> PlatformError {
	let status_code = status.as_u16();
	match status {
		StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
			error!(status = status_code, "Platform rejected service credentials");
			PlatformError::Unauthorized {
				status: status_code,
			}
		}
		StatusCode::TOO_MANY_REQUESTS => {
			error!(status = status_code, "Platform rate limit exceeded");
			PlatformError::RateLimited
		}
		_ => {
			let parsed = ErrorBody::parse(body);
			let message = parsed
				.message()
				.map(str::to_string)
				.unwrap_or_else(|| truncate(body));
			error!(status = status_code, message = %message, "Platform API error");
			PlatformError::Api {
				status: status_code,
				message,
			}
		}
	}
}

/// Reads and decodes a JSON success body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, PlatformError> {
	let body = response.text().await.map_err(|e| {
		error!(error = %e, "Failed to read platform response body");
		PlatformError::Network(e)
	})?;
	trace!(body = %body, "Platform response body");

	serde_json::from_str(&body).map_err(|e| {
		error!(error = %e, "Failed to parse platform response");
		PlatformError::InvalidResponse(format!("JSON parse error: {e}"))
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn error_body_prefers_auth_fields() {
		let body = ErrorBody::parse(
			r#"{"code":422,"error_code":"email_exists","msg":"A user with this email address has already been registered"}"#,
		);
		assert_eq!(body.code().as_deref(), Some("email_exists"));
		assert_eq!(
			body.message(),
			Some("A user with this email address has already been registered")
		);
	}

	#[test]
	fn error_body_reads_rest_envelope() {
		let body = ErrorBody::parse(
			r#"{"code":"23505","details":null,"hint":null,"message":"duplicate key value violates unique constraint"}"#,
		);
		assert_eq!(body.code().as_deref(), Some("23505"));
		assert_eq!(
			body.message(),
			Some("duplicate key value violates unique constraint")
		);
	}

	#[test]
	fn status_error_classifies() {
		assert!(matches!(
			status_error(StatusCode::UNAUTHORIZED, ""),
			PlatformError::Unauthorized { status: 401 }
		));
		assert!(matches!(
			status_error(StatusCode::TOO_MANY_REQUESTS, ""),
			PlatformError::RateLimited
		));
		match status_error(StatusCode::BAD_REQUEST, "not json") {
			PlatformError::Api { status, message } => {
				assert_eq!(status, 400);
				assert_eq!(message, "not json");
			}
			other => panic!("unexpected {other:?}"),
		}
	}

	#[test]
	fn long_bodies_are_truncated() {
		let body = "x".repeat(2000);
		let truncated = truncate(&body);
		assert_eq!(truncated.len(), MAX_ERROR_BODY + 3);
	}
}
