// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Router tests against an in-memory platform.
//!
//! Tests cover:
//! - Tenant provisioning success and step-tagged failures
//! - Request validation with no platform calls
//! - Tenant lookup, health and job triggering

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
	body::Body,
	http::{Request, StatusCode},
	Router,
};
use hearth_common_secret::SecretString;
use hearth_platform::{AuthAdminApi, AuthUser, DataApi, NewTenant, PlatformError, Profile, Tenant};
use hearth_server::{create_app_state, create_job_scheduler, create_router, PlatformClients};
use hearth_server_config::SyncConfig;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Default)]
struct FakePlatform {
	tenants: Mutex<HashMap<String, Tenant>>,
	users: Mutex<HashMap<String, AuthUser>>,
	upsert_calls: AtomicU32,
	create_calls: AtomicU32,
	attach_calls: AtomicU32,
	fail_upsert: bool,
	fail_attach: bool,
}

#[async_trait]
impl DataApi for FakePlatform {
	async fn upsert_tenant(&self, tenant: &NewTenant) -> Result<Tenant, PlatformError> {
		self.upsert_calls.fetch_add(1, Ordering::SeqCst);
		if self.fail_upsert {
			return Err(PlatformError::Unauthorized { status: 401 });
		}
		let mut tenants = self.tenants.lock().unwrap();
		let row = tenants
			.entry(tenant.slug.clone())
			.and_modify(|row| row.name = tenant.name.clone())
			.or_insert_with(|| Tenant {
				id: Uuid::new_v4(),
				name: tenant.name.clone(),
				slug: tenant.slug.clone(),
			});
		Ok(row.clone())
	}

	async fn find_tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, PlatformError> {
		Ok(self.tenants.lock().unwrap().get(slug).cloned())
	}

	async fn attach_profile_to_tenant(
		&self,
		_user_id: Uuid,
		_tenant_id: Uuid,
		_role: &str,
	) -> Result<(), PlatformError> {
		self.attach_calls.fetch_add(1, Ordering::SeqCst);
		if self.fail_attach {
			return Err(PlatformError::Api {
				status: 404,
				message: "Could not find the function public.attach_profile_to_tenant".into(),
			});
		}
		Ok(())
	}

	async fn upsert_profiles(&self, _profiles: &[Profile]) -> Result<(), PlatformError> {
		Ok(())
	}
}

#[async_trait]
impl AuthAdminApi for FakePlatform {
	async fn create_user(
		&self,
		email: &str,
		_password: &SecretString,
	) -> Result<AuthUser, PlatformError> {
		self.create_calls.fetch_add(1, Ordering::SeqCst);
		let mut users = self.users.lock().unwrap();
		if users.contains_key(email) {
			return Err(PlatformError::UserAlreadyExists {
				email: email.to_string(),
			});
		}
		let user = AuthUser {
			id: Uuid::new_v4(),
			email: Some(email.to_string()),
		};
		users.insert(email.to_string(), user.clone());
		Ok(user)
	}

	async fn list_users(&self, page: u32, _per_page: u32) -> Result<Vec<AuthUser>, PlatformError> {
		if page > 1 {
			return Ok(Vec::new());
		}
		Ok(self.users.lock().unwrap().values().cloned().collect())
	}
}

fn setup_test_app(platform: &Arc<FakePlatform>) -> Router {
	let clients = PlatformClients {
		data: platform.clone(),
		auth: platform.clone(),
	};
	let scheduler = Arc::new(create_job_scheduler(&clients, &SyncConfig::default()));
	create_router(create_app_state(&clients, scheduler))
}

fn acme_body() -> Value {
	json!({
		"name": "Acme",
		"slug": "acme",
		"admin_email": "admin@acme.test",
		"admin_password": "S3cret!"
	})
}

fn create_tenant_request(body: String) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri("/create-tenant")
		.header("content-type", "application/json")
		.body(Body::from(body))
		.unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
	let response = app.clone().oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	let body = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).unwrap()
	};
	(status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
	send(
		app,
		Request::builder().uri(uri).body(Body::empty()).unwrap(),
	)
	.await
}

fn calls(platform: &FakePlatform) -> (u32, u32, u32) {
	(
		platform.upsert_calls.load(Ordering::SeqCst),
		platform.create_calls.load(Ordering::SeqCst),
		platform.attach_calls.load(Ordering::SeqCst),
	)
}

// ============================================================================
// Provisioning
// ============================================================================

#[tokio::test]
async fn test_create_tenant_then_repeat_is_duplicate() {
	let platform = Arc::new(FakePlatform::default());
	let app = setup_test_app(&platform);

	let (status, body) = send(&app, create_tenant_request(acme_body().to_string())).await;
	assert_eq!(status, StatusCode::OK);
	let tenant_id = body["tenant_id"].as_str().unwrap().to_string();
	let user_id = body["user_id"].as_str().unwrap().to_string();
	assert!(Uuid::parse_str(&tenant_id).is_ok());
	assert!(Uuid::parse_str(&user_id).is_ok());
	assert_ne!(tenant_id, user_id);

	let (status, body) = send(&app, create_tenant_request(acme_body().to_string())).await;
	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body["step"], "create_admin_user");
	assert_eq!(body["code"], "user_already_exists");
	assert_eq!(body["tenant_id"], tenant_id.as_str());

	let (status, body) = get(&app, "/tenants/acme").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["id"], tenant_id.as_str());
	assert_eq!(body["name"], "Acme");
}

#[tokio::test]
async fn test_missing_field_is_rejected_without_platform_calls() {
	let platform = Arc::new(FakePlatform::default());
	let app = setup_test_app(&platform);

	let mut body = acme_body();
	body.as_object_mut().unwrap().remove("admin_password");

	let (status, body) = send(&app, create_tenant_request(body.to_string())).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body, json!({ "error": "missing required fields" }));
	assert_eq!(calls(&platform), (0, 0, 0));
}

#[tokio::test]
async fn test_empty_field_is_missing() {
	let platform = Arc::new(FakePlatform::default());
	let app = setup_test_app(&platform);

	let mut body = acme_body();
	body["name"] = json!("   ");

	let (status, body) = send(&app, create_tenant_request(body.to_string())).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "missing required fields");
}

#[tokio::test]
async fn test_non_object_body_is_missing_fields() {
	let platform = Arc::new(FakePlatform::default());
	let app = setup_test_app(&platform);

	for raw in ["not json", "[1,2,3]", "\"acme\""] {
		let (status, body) = send(&app, create_tenant_request(raw.to_string())).await;
		assert_eq!(status, StatusCode::BAD_REQUEST, "body {raw:?}");
		assert_eq!(body["error"], "missing required fields");
	}
	assert_eq!(calls(&platform), (0, 0, 0));
}

#[tokio::test]
async fn test_invalid_slug_names_field() {
	let platform = Arc::new(FakePlatform::default());
	let app = setup_test_app(&platform);

	let mut body = acme_body();
	body["slug"] = json!("Acme Corp");

	let (status, body) = send(&app, create_tenant_request(body.to_string())).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["field"], "slug");
	assert_eq!(calls(&platform), (0, 0, 0));
}

#[tokio::test]
async fn test_tenant_step_failure_skips_auth() {
	let platform = Arc::new(FakePlatform {
		fail_upsert: true,
		..Default::default()
	});
	let app = setup_test_app(&platform);

	let (status, body) = send(&app, create_tenant_request(acme_body().to_string())).await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body["step"], "upsert_tenant");
	assert!(body.get("tenant_id").is_none());
	assert_eq!(calls(&platform), (1, 0, 0));
}

#[tokio::test]
async fn test_attach_failure_reports_both_ids() {
	let platform = Arc::new(FakePlatform {
		fail_attach: true,
		..Default::default()
	});
	let app = setup_test_app(&platform);

	let (status, body) = send(&app, create_tenant_request(acme_body().to_string())).await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body["step"], "attach_admin");
	assert!(body["tenant_id"].is_string());
	assert!(body["user_id"].is_string());
	assert_eq!(calls(&platform), (1, 1, 1));
}

// ============================================================================
// Lookup, health and jobs
// ============================================================================

#[tokio::test]
async fn test_unknown_tenant_is_not_found() {
	let platform = Arc::new(FakePlatform::default());
	let app = setup_test_app(&platform);

	let (status, body) = get(&app, "/tenants/nobody").await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body, json!({ "error": "tenant not found" }));
}

#[tokio::test]
async fn test_health_lists_user_sync_job() {
	let platform = Arc::new(FakePlatform::default());
	let app = setup_test_app(&platform);

	let (status, body) = get(&app, "/health").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "healthy");
	assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
	assert_eq!(body["jobs"][0]["job_id"], "user-sync");
}

#[tokio::test]
async fn test_trigger_user_sync() {
	let platform = Arc::new(FakePlatform::default());
	let app = setup_test_app(&platform);

	let (status, body) = send(
		&app,
		Request::builder()
			.method("POST")
			.uri("/jobs/user-sync/run")
			.body(Body::empty())
			.unwrap(),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert!(body["run_id"].is_string());
}

#[tokio::test]
async fn test_trigger_unknown_job_is_not_found() {
	let platform = Arc::new(FakePlatform::default());
	let app = setup_test_app(&platform);

	let (status, _) = send(
		&app,
		Request::builder()
			.method("POST")
			.uri("/jobs/unknown/run")
			.body(Body::empty())
			.unwrap(),
	)
	.await;

	assert_eq!(status, StatusCode::NOT_FOUND);
}
