// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Client for the auth subsystem's admin API.

use std::time::Duration;

use async_trait::async_trait;
use hearth_common_http::{retry, RetryConfig};
use hearth_common_secret::SecretString;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::api::AuthAdminApi;
use crate::error::PlatformError;
use crate::transport::{read_json, status_error, ErrorBody, Transport};
use crate::types::AuthUser;

const DUPLICATE_CODES: [&str; 2] = ["email_exists", "user_already_exists"];
const DUPLICATE_PHRASES: [&str; 2] = ["already been registered", "already exists"];

/// Auth admin client rooted at `{platform}/auth/v1`.
///
/// Account creation is never retried; listing is.
#[derive(Debug, Clone)]
pub struct AuthAdminClient {
	transport: Transport,
	retry_config: RetryConfig,
}

#[derive(Serialize)]
struct CreateUserBody<'a> {
	email: &'a str,
	password: &'a str,
	email_confirm: bool,
}

#[derive(Debug, Deserialize)]
struct UserPage {
	#[serde(default)]
	users: Vec<AuthUser>,
}

impl AuthAdminClient {
	pub fn new(
		auth_url: impl Into<String>,
		service_key: SecretString,
		timeout: Duration,
	) -> Result<Self, PlatformError> {
		Ok(Self {
			transport: Transport::new(auth_url, service_key, timeout)?,
			retry_config: RetryConfig::default(),
		})
	}

	/// Sets a custom retry configuration for listing.
	pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
		self.retry_config = config;
		self
	}

	pub fn base_url(&self) -> &str {
		self.transport.base_url()
	}

	async fn list_users_inner(&self, page: u32, per_page: u32) -> Result<Vec<AuthUser>, PlatformError> {
		let request = self
			.transport
			.request(Method::GET, "/admin/users")
			.query(&[("page", page), ("per_page", per_page)]);

		let response = self.transport.send_ok(request).await?;
		let page: UserPage = read_json(response).await?;
		Ok(page.users)
	}
}

/// Whether an error response means the email is already registered.
fn is_duplicate_user(status: StatusCode, body: &ErrorBody) -> bool {
	if !matches!(
		status,
		StatusCode::UNPROCESSABLE_ENTITY | StatusCode::CONFLICT | StatusCode::BAD_REQUEST
	) {
		return false;
	}
	if body
		.code()
		.is_some_and(|code| DUPLICATE_CODES.contains(&code.as_str()))
	{
		return true;
	}
	body.message().is_some_and(|message| {
		let message = message.to_lowercase();
		DUPLICATE_PHRASES.iter().any(|p| message.contains(p))
	})
}

#[async_trait]
impl AuthAdminApi for AuthAdminClient {
	#[instrument(skip(self, password))]
	async fn create_user(
		&self,
		email: &str,
		password: &SecretString,
	) -> Result<AuthUser, PlatformError> {
		let body = CreateUserBody {
			email,
			password: password.expose().as_str(),
			email_confirm: true,
		};
		let request = self
			.transport
			.request(Method::POST, "/admin/users")
			.json(&body);

		let response = self.transport.send(request).await?;
		let status = response.status();
		if !status.is_success() {
			let text = response.text().await.unwrap_or_default();
			if is_duplicate_user(status, &ErrorBody::parse(&text)) {
				warn!(status = status.as_u16(), "Auth user already exists");
				return Err(PlatformError::UserAlreadyExists {
					email: email.to_string(),
				});
			}
			return Err(status_error(status, &text));
		}

		let user: AuthUser = read_json(response).await?;
		info!(user_id = %user.id, "Auth user created");
		Ok(user)
	}

	#[instrument(skip(self))]
	async fn list_users(&self, page: u32, per_page: u32) -> Result<Vec<AuthUser>, PlatformError> {
		let users = retry(&self.retry_config, || self.list_users_inner(page, per_page)).await?;
		debug!(count = users.len(), "Listed auth users");
		Ok(users)
	}
}
