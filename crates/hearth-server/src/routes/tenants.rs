// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Tenant provisioning HTTP handlers.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	Json,
};
use hearth_platform::Tenant;
use hearth_server_provisioning::{ProvisionRequest, ProvisionedTenant, ValidationError};
use serde::Deserialize;

use crate::{api::AppState, error::ServerError};

/// Body of `POST /create-tenant`. Every field is required; absent fields are
/// reported together as missing rather than as a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTenantRequest {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub slug: Option<String>,
	#[serde(default)]
	pub admin_email: Option<String>,
	#[serde(default)]
	pub admin_password: Option<String>,
}

impl TryFrom<CreateTenantRequest> for ProvisionRequest {
	type Error = ValidationError;

	fn try_from(body: CreateTenantRequest) -> Result<Self, Self::Error> {
		match (body.name, body.slug, body.admin_email, body.admin_password) {
			(Some(name), Some(slug), Some(admin_email), Some(admin_password)) => {
				Ok(ProvisionRequest::new(name, slug, admin_email, admin_password))
			}
			_ => Err(ValidationError::MissingFields),
		}
	}
}

/// POST /create-tenant - Create a tenant with its admin account.
#[tracing::instrument(skip(state, payload))]
pub async fn create_tenant(
	State(state): State<AppState>,
	payload: Result<Json<CreateTenantRequest>, JsonRejection>,
) -> Result<Json<ProvisionedTenant>, ServerError> {
	let Json(body) = payload.map_err(|rejection| {
		tracing::debug!(error = %rejection, "Rejected create-tenant body");
		ValidationError::MissingFields
	})?;

	let request = ProvisionRequest::try_from(body)?;
	let provisioned = state.provisioner.provision(&request).await?;

	tracing::info!(
		tenant_id = %provisioned.tenant_id,
		user_id = %provisioned.user_id,
		"Tenant provisioned"
	);
	Ok(Json(provisioned))
}

/// GET /tenants/{slug} - Fetch a tenant by slug.
#[tracing::instrument(skip(state))]
pub async fn get_tenant(
	State(state): State<AppState>,
	Path(slug): Path<String>,
) -> Result<Json<Tenant>, ServerError> {
	state
		.provisioner
		.lookup_tenant(&slug)
		.await?
		.map(Json)
		.ok_or_else(|| ServerError::NotFound("tenant not found".to_string()))
}
