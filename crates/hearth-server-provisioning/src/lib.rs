// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant provisioning service for Hearth.
//!
//! Provisioning a tenant is three forward-only steps against the platform:
//! upsert the tenant row, create its admin account, then attach the admin to
//! the tenant. Nothing is rolled back; a failure reports which step failed
//! together with the identifiers already produced.

mod error;
mod request;
mod service;

pub use error::{ProvisionStep, ProvisioningError, ValidationError};
pub use request::ProvisionRequest;
pub use service::{ProvisionedTenant, TenantProvisioner};
