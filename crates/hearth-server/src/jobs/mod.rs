// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Background jobs run by the scheduler.

mod user_sync;

pub use user_sync::{UserSyncJob, USER_SYNC_JOB_ID};
