// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod config;
mod live;
mod scheduler;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use roleta::{Snapshot, ThreadRngPicker, ViewerSnapshot};
use roleta_api::{
    AddNameRequest, ApiError, Engine, EngineConfig, WriteResponse, WriterConfig,
    handle_add_name_form, parse_list,
};
use roleta_domain::{DrawTrigger, OwnerHandle, Period, SystemClock, WindowPolicy};
use roleta_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::ScheduleConfig;
use crate::live::{SnapshotBroadcaster, live_handler};
use crate::scheduler::spawn_scheduler;

/// Roleta Server - shared signup lists with a twice-daily draw
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    bind: IpAddr,

    /// TOML file with the window schedule. Defaults to the built-in schedule.
    #[arg(short, long)]
    schedule: Option<PathBuf>,

    /// Seconds between scheduler ticks
    #[arg(long, default_value_t = 15)]
    tick_seconds: u64,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single owner of the roster.
    pub engine: Arc<Engine>,
    /// Fan-out of published snapshots to live connections.
    pub broadcaster: SnapshotBroadcaster,
}

/// Query string carrying a viewer's handle.
#[derive(Debug, Deserialize)]
struct ViewerQuery {
    token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotOwner { .. } | ApiError::NotFound { .. } => StatusCode::FORBIDDEN,
            ApiError::WindowClosed { .. }
            | ApiError::DuplicateName { .. }
            | ApiError::DrawNotDue { .. }
            | ApiError::SelectionClosed { .. }
            | ApiError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ApiError::EmptyLedger { .. } | ApiError::NotInDraw { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::StorageUnavailable { .. } | ApiError::Internal { .. } => {
                error!(error = %err, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.user_message(),
        }
    }
}

/// Returns the current state as the given viewer sees it.
async fn handle_get_state(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ViewerQuery>,
) -> Json<ViewerSnapshot> {
    let engine: &Engine = &app_state.engine;
    engine.check_and_reset_if_new_day(engine.now()).await;

    let viewer: Option<OwnerHandle> = query
        .token
        .as_deref()
        .and_then(|token| OwnerHandle::parse(token).ok());
    let snapshot: Arc<Snapshot> = engine.snapshot().await;
    Json(snapshot.for_viewer(viewer.as_ref()))
}

/// Signs a name up on behalf of a live connection.
async fn handle_add_name(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AddNameRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    handle_add_name_form(&app_state.engine, &req).await?;
    Ok(Json(WriteResponse {
        success: true,
        message: None,
    }))
}

/// Draws a list immediately.
async fn handle_manual_draw(
    AxumState(app_state): AxumState<AppState>,
    Path(list): Path<String>,
) -> Result<Json<WriteResponse>, HttpError> {
    let period: Period = parse_list(&list)?;
    info!(period = %period, "Manual draw requested over HTTP");
    app_state.engine.run_draw(period, DrawTrigger::Manual).await?;
    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("The {period} list was drawn")),
    }))
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/state", get(handle_get_state))
        .route("/add-name", post(handle_add_name))
        .route("/draw/{list}", post(handle_manual_draw))
        .route("/health", get(handle_health))
        .route("/live", get(live_handler))
        .with_state(app_state)
}

/// Reads the schedule file, or falls back to the built-in schedule.
fn load_engine_config(
    path: Option<&std::path::Path>,
) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        info!("Using the built-in schedule");
        return Ok(EngineConfig::new(WindowPolicy::canonical()));
    };
    info!(path = %path.display(), "Loading schedule");
    let schedule: ScheduleConfig = ScheduleConfig::from_file(path)?;
    Ok(schedule.into_engine_config(WriterConfig::default())?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Roleta Server");

    let config: EngineConfig = load_engine_config(args.schedule.as_deref())?;

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let broadcaster: SnapshotBroadcaster = SnapshotBroadcaster::new();
    let engine: Arc<Engine> = Arc::new(Engine::initialize(
        config,
        Box::new(persistence),
        Arc::new(SystemClock),
        Arc::new(broadcaster.clone()),
        Box::new(ThreadRngPicker),
    )?);

    let scheduler = spawn_scheduler(
        Arc::clone(&engine),
        Duration::from_secs(args.tick_seconds.max(1)),
    );

    let app: Router = build_router(AppState {
        engine: Arc::clone(&engine),
        broadcaster,
    });

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.abort();
    engine.flush().await;
    info!("Pending writes flushed; exiting");

    Ok(())
}
