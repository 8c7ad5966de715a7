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

mod identity;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use clap::Parser;
use pitchbook_api::{
    AllocationInfo, ApiError, ApplyStatusRequest, ApplyStatusResponse, AuthError,
    AuthorizationService, ConfirmAttendanceRequest, ConfirmAttendanceResponse,
    CreateFixtureRequest, CreateFixtureResponse, CreatePitchRequest, CreatePitchResponse,
    CreateRacecourseRequest, CreateRacecourseResponse, DeleteFixtureResponse,
    GetAttendanceResponse, ListBookmakerPitchesResponse, ListFixtureAllocationsResponse,
    ListFixturesResponse, ListTransfersResponse, RegisterBookmakerRequest, RegisterBookmakerResponse,
    ReplaceAttendanceRequest, ReplaceAttendanceResponse, SetAreaRequest, SetAreaResponse,
    TransferPitchRequest, TransferPitchResponse, UpdateAreaAvailabilityRequest,
    UpdateAreaAvailabilityResponse, apply_status, confirm_attendance, create_fixture,
    create_pitch, create_racecourse, delete_fixture, get_allocation, get_attendance,
    list_bookmaker_pitches, list_fixture_allocations, list_transfers, list_upcoming_fixtures,
    register_bookmaker,
    replace_attendance, set_area, transfer_pitch, update_area_availability,
};
use pitchbook_domain::{AllocationFilter, AllocationPolicy, DEFAULT_TIMEZONE, Track, local_date};
use pitchbook_persistence::{Persistence, PersistenceError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::identity::Identity;

/// Pitchbook Server - HTTP server for racecourse pitch allocation
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
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// IANA timezone in which fixture-day deadlines are read
    #[arg(short, long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,
}

/// Errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("Unknown racing timezone '{0}'")]
    InvalidTimezone(String),
    #[error("Invalid bind address: {0}")]
    InvalidAddress(#[from] std::net::AddrParseError),
    #[error("Failed to open database: {0}")]
    Storage(#[from] PersistenceError),
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state shared across handlers.
///
/// The persistence layer owns a single connection and is wrapped in a
/// Mutex so that requests take turns using it.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Track constants and the racing timezone.
    policy: Arc<AllocationPolicy>,
}

impl AppState {
    fn new(persistence: Persistence, policy: AllocationPolicy) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            policy: Arc::new(policy),
        }
    }

    /// Returns today's date in the racing timezone.
    fn today(&self, now: OffsetDateTime) -> Result<Date, HttpError> {
        local_date(now, self.policy.timezone()).map_err(|e| HttpError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        })
    }
}

/// Query parameters selecting a track.
#[derive(Debug, Clone, Deserialize)]
struct TrackQuery {
    track: Track,
}

/// Query parameters selecting a fixture roster.
#[derive(Debug, Clone, Deserialize)]
struct AttendanceQuery {
    track: Track,
    fixture_id: i64,
}

/// Query parameters selecting one allocation record.
#[derive(Debug, Clone, Deserialize)]
struct AllocationQuery {
    track: Track,
    fixture_id: i64,
    pitch_id: i64,
}

/// Query parameters selecting a fixture-level allocation view.
#[derive(Debug, Clone, Deserialize)]
struct FixtureAllocationsQuery {
    track: Track,
    #[serde(default)]
    filter: AllocationFilter,
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
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. }
            | ApiError::TooLateToApply { .. }
            | ApiError::TooLateToWithdraw { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::StorageFailure { .. } => {
                error!(error = %err, "Storage failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<AuthError> for HttpError {
    fn from(err: AuthError) -> Self {
        Self::from(ApiError::from(err))
    }
}

// ============================================================================
// Bookmaker routes
// ============================================================================

/// Handler for POST `/status` endpoint.
///
/// Applies for, or withdraws from, a pitch at a fixture.
async fn handle_apply_status(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Json(req): Json<ApplyStatusRequest>,
) -> Result<Json<ApplyStatusResponse>, HttpError> {
    info!(
        actor = %actor.identity,
        track = %req.track,
        fixture_id = req.fixture_id,
        pitch_id = req.pitch_id,
        "Handling apply_status request"
    );
    AuthorizationService::authorize_apply_status(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ApplyStatusResponse = apply_status(
        &mut persistence,
        &req,
        &actor,
        &app_state.policy,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/pitches/mine` endpoint.
///
/// Lists the caller's pitches at upcoming fixtures on one track.
async fn handle_list_my_pitches(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Query(query): Query<TrackQuery>,
) -> Result<Json<ListBookmakerPitchesResponse>, HttpError> {
    info!(actor = %actor.identity, track = %query.track, "Handling list_my_pitches request");
    AuthorizationService::authorize_list_own_pitches(&actor)?;

    let today: Date = app_state.today(OffsetDateTime::now_utc())?;
    let mut persistence = app_state.persistence.lock().await;
    let response: ListBookmakerPitchesResponse = list_bookmaker_pitches(
        &mut persistence,
        &actor,
        query.track,
        &app_state.policy,
        today,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/fixtures` endpoint.
///
/// Lists fixtures from today onwards. Open to every authenticated caller.
async fn handle_list_fixtures(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
) -> Result<Json<ListFixturesResponse>, HttpError> {
    info!(actor = %actor.identity, "Handling list_fixtures request");

    let today: Date = app_state.today(OffsetDateTime::now_utc())?;
    let mut persistence = app_state.persistence.lock().await;
    let response: ListFixturesResponse = list_upcoming_fixtures(&mut persistence, today)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Official routes
// ============================================================================

/// Handler for POST `/attendance/confirm` endpoint.
async fn handle_confirm_attendance(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Json(req): Json<ConfirmAttendanceRequest>,
) -> Result<Json<ConfirmAttendanceResponse>, HttpError> {
    info!(
        actor = %actor.identity,
        track = %req.track,
        fixture_id = req.fixture_id,
        pitch_id = req.pitch_id,
        "Handling confirm_attendance request"
    );
    AuthorizationService::authorize_record_attendance(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ConfirmAttendanceResponse = confirm_attendance(&mut persistence, &req, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/attendance` endpoint.
///
/// Replaces the roster of a fixture on one track.
async fn handle_replace_attendance(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Json(req): Json<ReplaceAttendanceRequest>,
) -> Result<Json<ReplaceAttendanceResponse>, HttpError> {
    info!(
        actor = %actor.identity,
        track = %req.track,
        fixture_id = req.fixture_id,
        attendees = req.attendees.len(),
        "Handling replace_attendance request"
    );
    AuthorizationService::authorize_record_attendance(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ReplaceAttendanceResponse =
        replace_attendance(&mut persistence, &req, &actor, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/attendance` endpoint.
async fn handle_get_attendance(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<GetAttendanceResponse>, HttpError> {
    info!(
        actor = %actor.identity,
        track = %query.track,
        fixture_id = query.fixture_id,
        "Handling get_attendance request"
    );
    AuthorizationService::authorize_record_attendance(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: GetAttendanceResponse =
        get_attendance(&mut persistence, query.track, query.fixture_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/allocations` endpoint.
async fn handle_get_allocation(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Query(query): Query<AllocationQuery>,
) -> Result<Json<AllocationInfo>, HttpError> {
    info!(
        actor = %actor.identity,
        track = %query.track,
        fixture_id = query.fixture_id,
        pitch_id = query.pitch_id,
        "Handling get_allocation request"
    );
    AuthorizationService::authorize_inspect_allocations(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: AllocationInfo = get_allocation(
        &mut persistence,
        query.track,
        query.fixture_id,
        query.pitch_id,
        &app_state.policy,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/fixtures/{fixture_id}/allocations` endpoint.
///
/// Lists every pitch at the fixture on one track, optionally narrowed to
/// applicants, awarded pitches or attended pitches.
async fn handle_list_fixture_allocations(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(fixture_id): Path<i64>,
    Query(query): Query<FixtureAllocationsQuery>,
) -> Result<Json<ListFixtureAllocationsResponse>, HttpError> {
    info!(
        actor = %actor.identity,
        track = %query.track,
        fixture_id,
        filter = query.filter.as_str(),
        "Handling list_fixture_allocations request"
    );
    AuthorizationService::authorize_inspect_allocations(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ListFixtureAllocationsResponse = list_fixture_allocations(
        &mut persistence,
        query.track,
        fixture_id,
        query.filter,
        &app_state.policy,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/pitches/{pitch_id}/transfers` endpoint.
async fn handle_list_transfers(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(pitch_id): Path<i64>,
) -> Result<Json<ListTransfersResponse>, HttpError> {
    info!(actor = %actor.identity, pitch_id, "Handling list_transfers request");
    AuthorizationService::authorize_inspect_allocations(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ListTransfersResponse = list_transfers(&mut persistence, pitch_id)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Admin routes
// ============================================================================

/// Handler for POST `/area` endpoint.
///
/// Places a pitch in the main ring or the track's special area.
async fn handle_set_area(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Json(req): Json<SetAreaRequest>,
) -> Result<Json<SetAreaResponse>, HttpError> {
    info!(
        actor = %actor.identity,
        track = %req.track,
        fixture_id = req.fixture_id,
        pitch_id = req.pitch_id,
        "Handling set_area request"
    );
    AuthorizationService::authorize_set_area(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: SetAreaResponse = set_area(&mut persistence, &req, &actor, &app_state.policy)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/transfers` endpoint.
async fn handle_transfer_pitch(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Json(req): Json<TransferPitchRequest>,
) -> Result<Json<TransferPitchResponse>, HttpError> {
    info!(actor = %actor.identity, pitch_id = req.pitch_id, "Handling transfer_pitch request");
    AuthorizationService::authorize_transfer_pitch(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: TransferPitchResponse =
        transfer_pitch(&mut persistence, &req, &actor, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/racecourses` endpoint.
async fn handle_create_racecourse(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Json(req): Json<CreateRacecourseRequest>,
) -> Result<Json<CreateRacecourseResponse>, HttpError> {
    info!(actor = %actor.identity, name = %req.name, "Handling create_racecourse request");
    AuthorizationService::authorize_manage_catalog(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateRacecourseResponse = create_racecourse(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/bookmakers` endpoint.
async fn handle_register_bookmaker(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Json(req): Json<RegisterBookmakerRequest>,
) -> Result<Json<RegisterBookmakerResponse>, HttpError> {
    info!(actor = %actor.identity, permit_no = %req.permit_no, "Handling register_bookmaker request");
    AuthorizationService::authorize_manage_catalog(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterBookmakerResponse = register_bookmaker(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/pitches` endpoint.
async fn handle_create_pitch(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Json(req): Json<CreatePitchRequest>,
) -> Result<Json<CreatePitchResponse>, HttpError> {
    info!(
        actor = %actor.identity,
        racecourse_id = req.racecourse_id,
        owner = %req.owner_permit_no,
        "Handling create_pitch request"
    );
    AuthorizationService::authorize_manage_catalog(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: CreatePitchResponse = create_pitch(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/fixtures` endpoint.
async fn handle_create_fixture(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Json(req): Json<CreateFixtureRequest>,
) -> Result<Json<CreateFixtureResponse>, HttpError> {
    info!(
        actor = %actor.identity,
        racecourse_id = req.racecourse_id,
        fixture_date = %req.fixture_date,
        "Handling create_fixture request"
    );
    AuthorizationService::authorize_manage_catalog(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateFixtureResponse = create_fixture(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/fixtures/{fixture_id}` endpoint.
async fn handle_delete_fixture(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(fixture_id): Path<i64>,
) -> Result<Json<DeleteFixtureResponse>, HttpError> {
    info!(actor = %actor.identity, fixture_id, "Handling delete_fixture request");
    AuthorizationService::authorize_manage_catalog(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteFixtureResponse = delete_fixture(&mut persistence, fixture_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PATCH `/fixtures/areas` endpoint.
async fn handle_update_area_availability(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Json(req): Json<UpdateAreaAvailabilityRequest>,
) -> Result<Json<UpdateAreaAvailabilityResponse>, HttpError> {
    info!(
        actor = %actor.identity,
        fixture_id = req.fixture_id,
        area = req.area.label(),
        "Handling update_area_availability request"
    );
    AuthorizationService::authorize_manage_catalog(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: UpdateAreaAvailabilityResponse =
        update_area_availability(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/status", post(handle_apply_status))
        .route("/pitches/mine", get(handle_list_my_pitches))
        .route("/fixtures", get(handle_list_fixtures))
        .route("/fixtures", post(handle_create_fixture))
        .route("/fixtures/areas", patch(handle_update_area_availability))
        .route("/fixtures/{fixture_id}", delete(handle_delete_fixture))
        .route(
            "/fixtures/{fixture_id}/allocations",
            get(handle_list_fixture_allocations),
        )
        .route("/attendance/confirm", post(handle_confirm_attendance))
        .route("/attendance", put(handle_replace_attendance))
        .route("/attendance", get(handle_get_attendance))
        .route("/allocations", get(handle_get_allocation))
        .route("/area", post(handle_set_area))
        .route("/transfers", post(handle_transfer_pitch))
        .route("/pitches/{pitch_id}/transfers", get(handle_list_transfers))
        .route("/pitches", post(handle_create_pitch))
        .route("/racecourses", post(handle_create_racecourse))
        .route("/bookmakers", post(handle_register_bookmaker))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Pitchbook Server");

    let policy: AllocationPolicy = AllocationPolicy::new(&args.timezone)
        .map_err(|_| StartupError::InvalidTimezone(args.timezone.clone()))?;
    info!(timezone = %args.timezone, "Using racing timezone");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app: Router = build_router(AppState::new(persistence, policy));

    // Bind to address
    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
