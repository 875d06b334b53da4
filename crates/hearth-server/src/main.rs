// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Hearth tenant provisioning server binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use hearth_server::jobs::USER_SYNC_JOB_ID;
use hearth_server::{create_app_state, create_job_scheduler, create_router, telemetry, PlatformClients};
use hearth_server_config::{LogFormat, ServerConfig};
use hearth_server_jobs::{JobScheduler, TriggerSource};
use tower_http::trace::TraceLayer;

/// Hearth server - tenant provisioning for the hosted backend platform.
#[derive(Parser, Debug)]
#[command(
	name = "hearth-server",
	about = "Hearth tenant provisioning server",
	version
)]
struct Args {
	/// Config file (defaults to /etc/hearth/server.toml)
	#[arg(long, global = true)]
	config: Option<PathBuf>,

	/// Log output format: text or json
	#[arg(long, global = true)]
	log_format: Option<LogFormat>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
	/// Run the HTTP server (default)
	Serve,
	/// Run the user sync job once and exit
	SyncUsers,
	/// Show version information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();
	let command = args.command.unwrap_or(Command::Serve);

	if let Command::Version = command {
		println!("hearth-server {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	// Missing platform URL or service key ends the process here, before binding.
	let mut config = match &args.config {
		Some(path) => hearth_server_config::load_config_with_file(path)?,
		None => hearth_server_config::load_config()?,
	};
	if let Some(format) = args.log_format {
		config.logging.format = format;
	}

	telemetry::init(&config.logging);

	let clients = PlatformClients::connect(&config.platform)?;
	let scheduler = Arc::new(create_job_scheduler(&clients, &config.sync));

	match command {
		Command::SyncUsers => sync_users(&scheduler).await,
		_ => serve(config, &clients, scheduler).await,
	}
}

async fn sync_users(scheduler: &JobScheduler) -> Result<(), Box<dyn std::error::Error>> {
	let run_id = scheduler
		.trigger_job(USER_SYNC_JOB_ID, TriggerSource::Manual)
		.await?;

	if let Some(run) = scheduler.history().get_run(USER_SYNC_JOB_ID, &run_id).await {
		println!("{}", serde_json::to_string_pretty(&run)?);
	}
	Ok(())
}

async fn serve(
	config: ServerConfig,
	clients: &PlatformClients,
	scheduler: Arc<JobScheduler>,
) -> Result<(), Box<dyn std::error::Error>> {
	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		platform_url = %config.platform.url,
		"starting hearth-server"
	);

	let state = create_app_state(clients, Arc::clone(&scheduler));
	scheduler.start().await;

	let app = create_router(state).layer(TraceLayer::new_for_http());

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	// Run server with graceful shutdown
	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
			tracing::info!("Shutting down job scheduler...");
			scheduler.shutdown().await;
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
