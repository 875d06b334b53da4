// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Client for the platform's REST data API.

use std::time::Duration;

use async_trait::async_trait;
use hearth_common_http::{retry, RetryConfig};
use hearth_common_secret::SecretString;
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::api::DataApi;
use crate::error::PlatformError;
use crate::transport::{read_json, Transport};
use crate::types::{NewTenant, Profile, Tenant};

const UPSERT_PREFER: &str = "resolution=merge-duplicates,return=representation";
const MERGE_PREFER: &str = "resolution=merge-duplicates,return=minimal";

/// Data API client rooted at `{platform}/rest/v1`.
///
/// Upserts and reads are retried per the retry config. The attach procedure
/// is called exactly once.
#[derive(Debug, Clone)]
pub struct RestClient {
	transport: Transport,
	retry_config: RetryConfig,
}

#[derive(Debug, Serialize)]
struct AttachArgs {
	p_user_id: Uuid,
	p_tenant_id: Uuid,
	p_role: String,
}

impl RestClient {
	pub fn new(
		rest_url: impl Into<String>,
		service_key: SecretString,
		timeout: Duration,
	) -> Result<Self, PlatformError> {
		Ok(Self {
			transport: Transport::new(rest_url, service_key, timeout)?,
			retry_config: RetryConfig::default(),
		})
	}

	/// Sets a custom retry configuration.
	pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
		self.retry_config = config;
		self
	}

	pub fn base_url(&self) -> &str {
		self.transport.base_url()
	}

	async fn upsert_tenant_inner(&self, tenant: &NewTenant) -> Result<Tenant, PlatformError> {
		let request = self
			.transport
			.request(Method::POST, "/tenants")
			.query(&[("on_conflict", "slug")])
			.header("Prefer", UPSERT_PREFER)
			.json(&[tenant]);

		let response = self.transport.send_ok(request).await?;
		let rows: Vec<Tenant> = read_json(response).await?;
		rows
			.into_iter()
			.next()
			.ok_or_else(|| PlatformError::InvalidResponse("tenant upsert returned no rows".into()))
	}

	async fn find_tenant_inner(&self, slug: &str) -> Result<Option<Tenant>, PlatformError> {
		let filter = format!("eq.{slug}");
		let request = self
			.transport
			.request(Method::GET, "/tenants")
			.query(&[("slug", filter.as_str()), ("select", "id,name,slug")]);

		let response = self.transport.send_ok(request).await?;
		let rows: Vec<Tenant> = read_json(response).await?;
		Ok(rows.into_iter().next())
	}

	async fn upsert_profiles_inner(&self, profiles: &[Profile]) -> Result<(), PlatformError> {
		let request = self
			.transport
			.request(Method::POST, "/profiles")
			.query(&[("on_conflict", "id")])
			.header("Prefer", MERGE_PREFER)
			.json(profiles);

		self.transport.send_ok(request).await?;
		Ok(())
	}
}

#[async_trait]
impl DataApi for RestClient {
	#[instrument(skip(self, tenant), fields(slug = %tenant.slug))]
	async fn upsert_tenant(&self, tenant: &NewTenant) -> Result<Tenant, PlatformError> {
		let stored = retry(&self.retry_config, || self.upsert_tenant_inner(tenant)).await?;
		info!(tenant_id = %stored.id, "Tenant upserted");
		Ok(stored)
	}

	#[instrument(skip(self))]
	async fn find_tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, PlatformError> {
		let found = retry(&self.retry_config, || self.find_tenant_inner(slug)).await?;
		debug!(found = found.is_some(), "Tenant lookup finished");
		Ok(found)
	}

	#[instrument(skip(self))]
	async fn attach_profile_to_tenant(
		&self,
		user_id: Uuid,
		tenant_id: Uuid,
		role: &str,
	) -> Result<(), PlatformError> {
		let args = AttachArgs {
			p_user_id: user_id,
			p_tenant_id: tenant_id,
			p_role: role.to_string(),
		};
		let request = self
			.transport
			.request(Method::POST, "/rpc/attach_profile_to_tenant")
			.json(&args);

		self.transport.send_ok(request).await?;
		info!("Profile attached to tenant");
		Ok(())
	}

	#[instrument(skip(self, profiles), fields(count = profiles.len()))]
	async fn upsert_profiles(&self, profiles: &[Profile]) -> Result<(), PlatformError> {
		if profiles.is_empty() {
			return Ok(());
		}
		retry(&self.retry_config, || self.upsert_profiles_inner(profiles)).await?;
		debug!("Profiles upserted");
		Ok(())
	}
}
