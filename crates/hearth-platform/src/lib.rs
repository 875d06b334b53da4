// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Clients for the backing platform.
//!
//! The platform exposes a REST data API (tables and stored procedures) and an
//! auth admin API. Both authenticate with the service-role key.
//!
//! # Example
//!
//! ```ignore
//! use hearth_platform::{DataApi, NewTenant, RestClient};
//!
//! let data = RestClient::new(config.rest_url(), config.service_key.clone(), config.timeout)?;
//! let tenant = data
//!     .upsert_tenant(&NewTenant { name: "Acme".into(), slug: "acme".into() })
//!     .await?;
//! ```

mod api;
mod auth;
mod error;
mod rest;
mod transport;
mod types;

pub use api::{AuthAdminApi, DataApi};
pub use auth::AuthAdminClient;
pub use error::PlatformError;
pub use rest::RestClient;
pub use types::{AuthUser, NewTenant, Profile, Tenant, TENANT_ADMIN_ROLE};
