// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use hearth_server_jobs::JobError;
use hearth_server_provisioning::{ProvisioningError, ValidationError};
use serde::Serialize;
use uuid::Uuid;

/// Error code attached when the admin email is already registered.
pub const USER_ALREADY_EXISTS_CODE: &str = "user_already_exists";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error(transparent)]
	Provisioning(#[from] ProvisioningError),

	#[error("{0}")]
	NotFound(String),

	#[error(transparent)]
	Job(#[from] JobError),
}

impl From<ValidationError> for ServerError {
	fn from(e: ValidationError) -> Self {
		Self::Provisioning(ProvisioningError::Validation(e))
	}
}

/// Error response body.
///
/// Provisioning failures name the failed `step` and carry whatever
/// identifiers were already created, so an operator can repair the partial
/// state.
#[derive(Debug, Default, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub step: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub code: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tenant_id: Option<Uuid>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_id: Option<Uuid>,
}

impl ErrorResponse {
	pub fn new(error: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			..Default::default()
		}
	}
}

fn provisioning_response(e: &ProvisioningError) -> (StatusCode, ErrorResponse) {
	if let ProvisioningError::Validation(validation) = e {
		let field = match validation {
			ValidationError::MissingFields => None,
			ValidationError::InvalidField { field, .. } => Some(*field),
		};
		return (
			StatusCode::BAD_REQUEST,
			ErrorResponse {
				field,
				..ErrorResponse::new(validation.to_string())
			},
		);
	}

	let response = ErrorResponse {
		step: e.step().map(|s| s.as_str()),
		code: e
			.is_user_already_exists()
			.then_some(USER_ALREADY_EXISTS_CODE),
		tenant_id: e.tenant_id(),
		user_id: e.user_id(),
		..ErrorResponse::new(e.to_string())
	};
	(StatusCode::INTERNAL_SERVER_ERROR, response)
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, error_response) = match &self {
			ServerError::Provisioning(e) => {
				if e.step().is_some() || matches!(e, ProvisioningError::Lookup(_)) {
					tracing::error!(error = %e, step = ?e.step().map(|s| s.as_str()), "provisioning error");
				}
				provisioning_response(e)
			}
			ServerError::NotFound(message) => {
				(StatusCode::NOT_FOUND, ErrorResponse::new(message.clone()))
			}
			ServerError::Job(JobError::NotFound(id)) => (
				StatusCode::NOT_FOUND,
				ErrorResponse::new(format!("job not found: {id}")),
			),
			ServerError::Job(e) => {
				tracing::error!(error = %e, "job error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new(e.to_string()),
				)
			}
		};

		(status, Json(error_response)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hearth_platform::PlatformError;

	fn body(e: ServerError) -> (StatusCode, serde_json::Value) {
		let (status, response) = match &e {
			ServerError::Provisioning(p) => provisioning_response(p),
			_ => unreachable!(),
		};
		(status, serde_json::to_value(response).unwrap())
	}

	#[test]
	fn test_missing_fields_body() {
		let (status, body) = body(ValidationError::MissingFields.into());
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body, serde_json::json!({ "error": "missing required fields" }));
	}

	#[test]
	fn test_invalid_field_names_field() {
		let (status, body) = body(
			ValidationError::InvalidField {
				field: "slug",
				message: "bad".into(),
			}
			.into(),
		);
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["field"], "slug");
	}

	#[test]
	fn test_duplicate_user_body() {
		let tenant_id = Uuid::new_v4();
		let (status, body) = body(
			ProvisioningError::UserCreation {
				tenant_id,
				source: PlatformError::UserAlreadyExists {
					email: "admin@acme.test".into(),
				},
			}
			.into(),
		);

		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body["step"], "create_admin_user");
		assert_eq!(body["code"], USER_ALREADY_EXISTS_CODE);
		assert_eq!(body["tenant_id"], tenant_id.to_string());
		assert!(body.get("user_id").is_none());
	}

	#[test]
	fn test_tenant_failure_body_has_no_ids() {
		let (_, body) = body(ProvisioningError::TenantCreation(PlatformError::Timeout).into());
		assert_eq!(body["step"], "upsert_tenant");
		assert!(body.get("tenant_id").is_none());
		assert!(body.get("code").is_none());
	}
}
