// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The two platform surfaces the server depends on.
//!
//! Callers hold these as `Arc<dyn ...>` so tests can substitute in-memory
//! fakes for the HTTP clients.

use async_trait::async_trait;
use hearth_common_secret::SecretString;
use uuid::Uuid;

use crate::error::PlatformError;
use crate::types::{AuthUser, NewTenant, Profile, Tenant};

/// Row-level access to the platform database, performed with service-role
/// privileges.
#[async_trait]
pub trait DataApi: Send + Sync {
	/// Inserts the tenant, or updates the name of the existing row with the
	/// same slug. Returns the stored row.
	async fn upsert_tenant(&self, tenant: &NewTenant) -> Result<Tenant, PlatformError>;

	async fn find_tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, PlatformError>;

	/// Runs the `attach_profile_to_tenant` stored procedure, which links the
	/// user to the tenant with `role` and ensures their profile exists.
	async fn attach_profile_to_tenant(
		&self,
		user_id: Uuid,
		tenant_id: Uuid,
		role: &str,
	) -> Result<(), PlatformError>;

	/// Inserts or merges profile rows keyed by id.
	async fn upsert_profiles(&self, profiles: &[Profile]) -> Result<(), PlatformError>;
}

/// Administrative access to the auth subsystem.
#[async_trait]
pub trait AuthAdminApi: Send + Sync {
	/// Creates a confirmed account. An existing account with this email yields
	/// [`PlatformError::UserAlreadyExists`].
	async fn create_user(
		&self,
		email: &str,
		password: &SecretString,
	) -> Result<AuthUser, PlatformError>;

	/// One page of accounts, 1-based.
	async fn list_users(&self, page: u32, per_page: u32) -> Result<Vec<AuthUser>, PlatformError>;
}
