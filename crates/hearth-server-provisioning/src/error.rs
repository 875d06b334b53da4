// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use hearth_platform::PlatformError;
use uuid::Uuid;

/// Rejected input; no remote call has been made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	#[error("missing required fields")]
	MissingFields,

	#[error("invalid {field}: {message}")]
	InvalidField {
		field: &'static str,
		message: String,
	},
}

/// The provisioning step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
	UpsertTenant,
	CreateAdminUser,
	AttachAdmin,
}

impl ProvisionStep {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::UpsertTenant => "upsert_tenant",
			Self::CreateAdminUser => "create_admin_user",
			Self::AttachAdmin => "attach_admin",
		}
	}
}

impl fmt::Display for ProvisionStep {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Errors that can occur during tenant provisioning.
///
/// Later variants carry the identifiers created by the steps that succeeded,
/// since those records are left in place.
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
	#[error(transparent)]
	Validation(#[from] ValidationError),

	#[error("failed to upsert tenant: {0}")]
	TenantCreation(#[source] PlatformError),

	#[error("failed to create admin user for tenant {tenant_id}: {source}")]
	UserCreation {
		tenant_id: Uuid,
		#[source]
		source: PlatformError,
	},

	#[error("failed to attach user {user_id} to tenant {tenant_id}: {source}")]
	Association {
		tenant_id: Uuid,
		user_id: Uuid,
		#[source]
		source: PlatformError,
	},

	#[error("failed to look up tenant: {0}")]
	Lookup(#[source] PlatformError),
}

impl ProvisioningError {
	/// `None` for failures outside the provisioning steps.
	pub fn step(&self) -> Option<ProvisionStep> {
		match self {
			Self::Validation(_) | Self::Lookup(_) => None,
			Self::TenantCreation(_) => Some(ProvisionStep::UpsertTenant),
			Self::UserCreation { .. } => Some(ProvisionStep::CreateAdminUser),
			Self::Association { .. } => Some(ProvisionStep::AttachAdmin),
		}
	}

	pub fn tenant_id(&self) -> Option<Uuid> {
		match self {
			Self::UserCreation { tenant_id, .. } | Self::Association { tenant_id, .. } => {
				Some(*tenant_id)
			}
			_ => None,
		}
	}

	pub fn user_id(&self) -> Option<Uuid> {
		match self {
			Self::Association { user_id, .. } => Some(*user_id),
			_ => None,
		}
	}

	/// The admin email already had an account.
	pub fn is_user_already_exists(&self) -> bool {
		matches!(self, Self::UserCreation { source, .. } if source.is_user_already_exists())
	}
}
