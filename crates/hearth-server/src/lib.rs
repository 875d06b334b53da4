// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Hearth tenant provisioning server.
//!
//! Exposes `POST /create-tenant`, which creates a tenant, its admin account
//! and the link between them on the backing platform, and runs the user sync
//! job that mirrors auth accounts into profiles.

pub mod api;
pub mod error;
pub mod jobs;
pub mod routes;
pub mod telemetry;

pub use api::{create_app_state, create_job_scheduler, create_router, AppState, PlatformClients};
pub use error::{ErrorResponse, ServerError};
pub use hearth_server_config::ServerConfig;
