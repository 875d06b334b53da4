// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Background job scheduler for Hearth server.
//!
//! Runs periodic and one-shot background tasks with retry support and health
//! monitoring. Run history is kept in memory and lost on restart.

pub mod context;
pub mod error;
pub mod health;
pub mod history;
pub mod job;
pub mod scheduler;
pub mod types;

pub use context::{CancellationToken, JobContext};
pub use error::{JobError, Result};
pub use health::{HealthState, JobHealthStatus, JobsHealthStatus, LastRunInfo};
pub use history::RunHistory;
pub use job::Job;
pub use scheduler::JobScheduler;
pub use types::{JobOutput, JobRun, JobStatus, JobType, TriggerSource};
