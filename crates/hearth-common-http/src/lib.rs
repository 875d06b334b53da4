// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Hearth.
//!
//! - A client builder with the Hearth User-Agent and bounded timeouts
//! - Retry with exponential backoff, for calls that are safe to repeat

mod client;
mod retry;

pub use client::{builder, new_client_with_timeout, user_agent, CONNECT_TIMEOUT};
pub use retry::{is_retryable_status, retry, RetryConfig, RetryableError};
