// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Records exchanged with the platform.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role granted to the admin created alongside a tenant.
pub const TENANT_ADMIN_ROLE: &str = "tenant_admin";

/// A row of the `tenants` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
	pub id: Uuid,
	pub name: String,
	pub slug: String,
}

/// Insert-or-update payload for `tenants`, keyed by `slug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTenant {
	pub name: String,
	pub slug: String,
}

/// An account in the auth subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
	pub id: Uuid,
	#[serde(default)]
	pub email: Option<String>,
}

/// A row of the application-visible `profiles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
	pub id: Uuid,
	pub email: String,
}

impl Profile {
	/// Profile mirroring an auth user; `None` when the user has no email.
	pub fn from_auth_user(user: &AuthUser) -> Option<Self> {
		let email = user.email.as_deref().filter(|e| !e.is_empty())?;
		Some(Self {
			id: user.id,
			email: email.to_string(),
		})
	}
}
