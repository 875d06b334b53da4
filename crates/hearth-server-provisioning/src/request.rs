// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::LazyLock;

use hearth_common_secret::SecretString;
use regex::Regex;

use crate::error::ValidationError;

/// Longest slug accepted, matching a DNS label.
pub const MAX_SLUG_LEN: usize = 63;

static SLUG_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*[a-z0-9]$|^[a-z0-9]$").unwrap());

/// Request to provision a tenant and its admin account.
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
	/// Display name of the tenant.
	pub name: String,

	/// Unique tenant key.
	pub slug: String,

	pub admin_email: String,

	/// Passed to the auth subsystem verbatim; its policy applies.
	pub admin_password: SecretString,
}

impl ProvisionRequest {
	pub fn new(
		name: impl Into<String>,
		slug: impl Into<String>,
		admin_email: impl Into<String>,
		admin_password: impl Into<String>,
	) -> Self {
		Self {
			name: name.into(),
			slug: slug.into(),
			admin_email: admin_email.into(),
			admin_password: SecretString::new(admin_password.into()),
		}
	}

	/// Normalizes the request, or explains why it cannot be provisioned.
	///
	/// Name, slug and email are trimmed and the email lowercased. An empty
	/// field is reported as missing before any format check runs.
	pub fn validate(&self) -> Result<ProvisionRequest, ValidationError> {
		let name = self.name.trim();
		let slug = self.slug.trim();
		let admin_email = sanitize_email(&self.admin_email);

		if name.is_empty()
			|| slug.is_empty()
			|| admin_email.is_empty()
			|| self.admin_password.expose().is_empty()
		{
			return Err(ValidationError::MissingFields);
		}

		if !validate_slug(slug) {
			return Err(ValidationError::InvalidField {
				field: "slug",
				message: format!(
					"must be 1-{MAX_SLUG_LEN} lowercase letters, digits or hyphens, starting and ending with a letter or digit"
				),
			});
		}

		if !validate_email(&admin_email) {
			return Err(ValidationError::InvalidField {
				field: "admin_email",
				message: "must be an email address".to_string(),
			});
		}

		Ok(ProvisionRequest {
			name: name.to_string(),
			slug: slug.to_string(),
			admin_email,
			admin_password: self.admin_password.clone(),
		})
	}
}

/// Slugs start and end with a lowercase letter or digit, with hyphens allowed
/// in between.
pub fn validate_slug(slug: &str) -> bool {
	!slug.is_empty() && slug.len() <= MAX_SLUG_LEN && SLUG_REGEX.is_match(slug)
}

/// Trims whitespace and lowercases.
pub fn sanitize_email(email: &str) -> String {
	email.trim().to_lowercase()
}

fn validate_email(email: &str) -> bool {
	match email.split_once('@') {
		Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
		None => false,
	}
}
