// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use hearth_platform::{AuthAdminApi, DataApi, NewTenant, Tenant, TENANT_ADMIN_ROLE};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ProvisioningError;
use crate::request::ProvisionRequest;

/// Result type for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisioningError>;

/// Identifiers of a fully provisioned tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProvisionedTenant {
	pub tenant_id: Uuid,
	pub user_id: Uuid,
}

/// Creates tenants together with their first admin account.
///
/// The three steps run sequentially and each starts only after the previous
/// one succeeded. A failed step leaves earlier records in place.
#[derive(Clone)]
pub struct TenantProvisioner {
	data: Arc<dyn DataApi>,
	auth: Arc<dyn AuthAdminApi>,
}

impl TenantProvisioner {
	pub fn new(data: Arc<dyn DataApi>, auth: Arc<dyn AuthAdminApi>) -> Self {
		Self { data, auth }
	}

	/// Provision a tenant and its admin.
	///
	/// Re-provisioning an existing slug updates the tenant name; the admin
	/// step then fails if the email is already registered.
	#[tracing::instrument(skip(self, request), fields(slug = %request.slug))]
	pub async fn provision(&self, request: &ProvisionRequest) -> Result<ProvisionedTenant> {
		let request = request.validate().inspect_err(|e| {
			tracing::warn!(error = %e, "Rejected provisioning request");
		})?;

		let tenant = self
			.data
			.upsert_tenant(&NewTenant {
				name: request.name.clone(),
				slug: request.slug.clone(),
			})
			.await
			.map_err(|e| {
				tracing::error!(error = %e, "Tenant upsert failed");
				ProvisioningError::TenantCreation(e)
			})?;
		tracing::info!(tenant_id = %tenant.id, "tenant upserted");

		let user = self
			.auth
			.create_user(&request.admin_email, &request.admin_password)
			.await
			.map_err(|e| {
				tracing::error!(
					error = %e,
					tenant_id = %tenant.id,
					already_exists = e.is_user_already_exists(),
					"Admin user creation failed; tenant left in place"
				);
				ProvisioningError::UserCreation {
					tenant_id: tenant.id,
					source: e,
				}
			})?;
		tracing::info!(tenant_id = %tenant.id, user_id = %user.id, "admin user created");

		self
			.data
			.attach_profile_to_tenant(user.id, tenant.id, TENANT_ADMIN_ROLE)
			.await
			.map_err(|e| {
				tracing::error!(
					error = %e,
					tenant_id = %tenant.id,
					user_id = %user.id,
					"Attaching admin to tenant failed; tenant and user left in place"
				);
				ProvisioningError::Association {
					tenant_id: tenant.id,
					user_id: user.id,
					source: e,
				}
			})?;
		tracing::info!(tenant_id = %tenant.id, user_id = %user.id, role = TENANT_ADMIN_ROLE, "admin attached to tenant");

		Ok(ProvisionedTenant {
			tenant_id: tenant.id,
			user_id: user.id,
		})
	}

	/// Look up a tenant by slug.
	#[tracing::instrument(skip(self))]
	pub async fn lookup_tenant(&self, slug: &str) -> Result<Option<Tenant>> {
		self
			.data
			.find_tenant_by_slug(slug.trim())
			.await
			.map_err(ProvisioningError::Lookup)
	}
}
