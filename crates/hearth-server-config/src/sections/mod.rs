// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for hearth-server.

pub mod http;
pub mod logging;
pub mod platform;
pub mod sync;

pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use platform::{PlatformConfig, PlatformConfigLayer};
pub use sync::{SyncConfig, SyncConfigLayer};
