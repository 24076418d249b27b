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

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono_tz::Tz;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use leavedesk_api::{
    ApiError, ApiResult, AuthenticatedRequester, DecideStageRequest, DurationResponse,
    FieldError, LeaveRequestResponse, ListLeaveRequestsResponse, StaticDirectory,
    SubmitLeaveRequest, compute_duration, decide, get_request, list_pending_for_approver,
    list_requests_for_requester, submit,
};
use leavedesk_audit::Cause;
use leavedesk_domain::institutional_today;
use leavedesk_persistence::Persistence;

/// Leave Desk Server - HTTP server for leave requests and approvals
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Path to the reference directory JSON (sections, mentors, HODs)
    #[arg(long)]
    directory: Option<String>,

    /// IANA time zone that defines the institution's calendar day
    #[arg(long, default_value = "Asia/Kolkata")]
    timezone: String,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for leave requests and audit events.
    persistence: Arc<Mutex<Persistence>>,
    /// Read-only organizational reference data.
    directory: Arc<StaticDirectory>,
    /// The institution's time zone.
    timezone: Tz,
}

/// API request for filing leave.
///
/// The requester identity is supplied by the upstream session layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitLeaveApiRequest {
    /// The verified requester.
    requester: AuthenticatedRequester,
    /// The cause ID for this action.
    #[serde(default)]
    cause_id: Option<String>,
    /// The leave form.
    #[serde(flatten)]
    form: SubmitLeaveRequest,
}

/// API request for deciding a stage.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct DecideStageApiRequest {
    /// The cause ID for this action.
    #[serde(default)]
    cause_id: Option<String>,
    /// The decision.
    #[serde(flatten)]
    decision: DecideStageRequest,
}

/// Query for a requester's own requests.
#[derive(Debug, Deserialize)]
struct RequesterQuery {
    requester_id: String,
}

/// Query for an approver's inbox.
#[derive(Debug, Deserialize)]
struct ApproverQuery {
    approver_id: String,
}

/// Query for a duration preview.
#[derive(Debug, Deserialize)]
struct DurationQuery {
    from: String,
    to: Option<String>,
    half_day: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
    /// Field-level failures, for validation errors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
    /// Field-level failures.
    errors: Vec<FieldError>,
}

impl HttpError {
    const fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            errors: Vec::new(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
            errors: self.errors,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let message: String = err.to_string();
        match err {
            ApiError::ValidationFailed { errors } => Self {
                status: StatusCode::BAD_REQUEST,
                message,
                errors,
            },
            ApiError::InvalidInput { .. } => Self::new(StatusCode::BAD_REQUEST, message),
            ApiError::DuplicatePeriod { .. } | ApiError::Conflict { .. } => {
                Self::new(StatusCode::CONFLICT, message)
            }
            ApiError::DomainRuleViolation { .. } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
            }
            ApiError::ResourceNotFound { .. } => Self::new(StatusCode::NOT_FOUND, message),
            ApiError::Forbidden { .. } => Self::new(StatusCode::FORBIDDEN, message),
            ApiError::Internal { .. } => {
                error!(error = %message, "Internal error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}

fn http_cause(cause_id: Option<String>, description: &str) -> Cause {
    Cause::new(
        cause_id.unwrap_or_else(|| String::from("http")),
        String::from(description),
    )
}

/// Today's date at the institution.
fn institution_today(app_state: &AppState, now: OffsetDateTime) -> Result<Date, HttpError> {
    institutional_today(now, app_state.timezone).map_err(|e| {
        error!(error = %e, "Failed to compute the institutional date");
        HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

async fn handle_submit(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SubmitLeaveApiRequest>,
) -> Result<(StatusCode, Json<LeaveRequestResponse>), HttpError> {
    info!(requester_id = %req.requester.id, "Handling leave submission");

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let today: Date = institution_today(&app_state, now)?;
    let cause: Cause = http_cause(req.cause_id, "POST /leave-requests");

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<LeaveRequestResponse> = submit(
        &mut persistence,
        app_state.directory.as_ref(),
        &req.requester,
        &req.form,
        cause,
        now,
        today,
    )?;
    drop(persistence);

    info!(
        request_id = result.response.request_id,
        event_id = ?result.audit_event.event_id,
        "Leave request created"
    );

    Ok((StatusCode::CREATED, Json(result.response)))
}

async fn handle_decide(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<i64>,
    Json(req): Json<DecideStageApiRequest>,
) -> Result<Json<LeaveRequestResponse>, HttpError> {
    info!(
        request_id,
        stage = %req.decision.stage,
        approver_id = %req.decision.approver_id,
        "Handling stage decision"
    );

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let cause: Cause = http_cause(req.cause_id, "POST /leave-requests/{id}/decisions");

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<LeaveRequestResponse> =
        decide(&mut persistence, request_id, &req.decision, cause, now)?;
    drop(persistence);

    Ok(Json(result.response))
}

async fn handle_get_request(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<i64>,
) -> Result<Json<LeaveRequestResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: LeaveRequestResponse = get_request(&mut persistence, request_id)?;
    Ok(Json(response))
}

async fn handle_list_requests(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<RequesterQuery>,
) -> Result<Json<ListLeaveRequestsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListLeaveRequestsResponse =
        list_requests_for_requester(&mut persistence, &query.requester_id)?;
    Ok(Json(response))
}

async fn handle_list_pending(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ApproverQuery>,
) -> Result<Json<ListLeaveRequestsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListLeaveRequestsResponse =
        list_pending_for_approver(&mut persistence, &query.approver_id)?;
    Ok(Json(response))
}

async fn handle_duration(
    Query(query): Query<DurationQuery>,
) -> Result<Json<DurationResponse>, HttpError> {
    let response: DurationResponse = compute_duration(
        &query.from,
        query.to.as_deref(),
        query.half_day.as_deref(),
    )?;
    Ok(Json(response))
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/leave-requests",
            post(handle_submit).get(handle_list_requests),
        )
        .route("/leave-requests/{id}", get(handle_get_request))
        .route("/leave-requests/{id}/decisions", post(handle_decide))
        .route("/approvals/pending", get(handle_list_pending))
        .route("/duration", get(handle_duration))
        .with_state(app_state)
}

/// Loads the reference directory, or an empty one when no file is given.
fn load_directory(path: Option<&str>) -> Result<StaticDirectory, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        warn!("No reference directory given; approval chains will not resolve");
        return Ok(StaticDirectory::default());
    };

    info!("Loading reference directory from: {}", path);
    let json: String = std::fs::read_to_string(path)?;
    Ok(StaticDirectory::from_json(&json)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Leave Desk Server");

    let timezone: Tz = args
        .timezone
        .parse::<Tz>()
        .map_err(|e| format!("Invalid time zone '{}': {e}", args.timezone))?;
    info!(timezone = %timezone, "Institutional time zone");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        directory: Arc::new(load_directory(args.directory.as_deref())?),
        timezone,
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// Helper to create a test app state with an in-memory database.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        let directory: StaticDirectory = StaticDirectory::from_json(
            r#"{
                "sections": {
                    "cse-a": { "class_incharge": "ci-1", "mentors": ["mentor-1"] }
                },
                "departments": {
                    "CSE": { "hod": "hod-1" }
                }
            }"#,
        )
        .expect("Failed to parse directory");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            directory: Arc::new(directory),
            timezone: chrono_tz::Asia::Kolkata,
        }
    }

    fn student_identity() -> Value {
        json!({
            "id": "stu-1",
            "name": "Asha",
            "kind": "Student",
            "department": "CSE",
            "batch": "2022-2026",
            "section": "cse-a",
            "rollNo": "22CS001",
            "mentorId": "mentor-1"
        })
    }

    fn submit_body(from: &str, to: &str) -> Value {
        json!({
            "requester": student_identity(),
            "causeId": "req-1",
            "fromDate": from,
            "toDate": to,
            "reason": "Family function"
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&Value>) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request: Request<Body> = match body {
            Some(json) => builder
                .body(Body::from(serde_json::to_string(json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn submit_ok(app: &Router, from: &str, to: &str) -> i64 {
        let response: Response =
            send(app, "POST", "/leave-requests", Some(&submit_body(from, to))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["requestId"].as_i64().unwrap()
    }

    fn decision_body(stage: &str, approver: &str, decision: &str) -> Value {
        json!({ "stage": stage, "approverId": approver, "decision": decision })
    }

    #[tokio::test]
    async fn test_submit_returns_created_with_pending_chain() {
        let app: Router = build_router(create_test_app_state());

        let response: Response = send(
            &app,
            "POST",
            "/leave-requests",
            Some(&submit_body("2099-06-10", "2099-06-12")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = body_json(response).await;
        assert_eq!(body["overallStatus"], "pending");
        assert_eq!(body["chargeableDays"], 3);
        assert_eq!(body["approvals"].as_array().unwrap().len(), 3);
        assert_eq!(body["approvals"][0]["stage"], "mentor");
        assert_eq!(body["approvals"][0]["approverId"], "mentor-1");
    }

    #[tokio::test]
    async fn test_submit_with_missing_fields_returns_field_errors() {
        let app: Router = build_router(create_test_app_state());
        let body: Value = json!({ "requester": student_identity() });

        let response: Response = send(&app, "POST", "/leave-requests", Some(&body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: Value = body_json(response).await;
        assert_eq!(error["error"], true);
        let fields: Vec<&str> = error["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"fromDate"));
        assert!(fields.contains(&"reason"));
    }

    #[tokio::test]
    async fn test_overlapping_submission_returns_conflict() {
        let app: Router = build_router(create_test_app_state());
        submit_ok(&app, "2099-06-10", "2099-06-12").await;

        let response: Response = send(
            &app,
            "POST",
            "/leave-requests",
            Some(&submit_body("2099-06-12", "2099-06-15")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_full_approval_walk() {
        let app: Router = build_router(create_test_app_state());
        let id: i64 = submit_ok(&app, "2099-06-10", "2099-06-12").await;
        let uri: String = format!("/leave-requests/{id}/decisions");

        for (stage, approver) in [
            ("mentor", "mentor-1"),
            ("class_incharge", "ci-1"),
            ("hod", "hod-1"),
        ] {
            let response: Response = send(
                &app,
                "POST",
                &uri,
                Some(&decision_body(stage, approver, "approve")),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response: Response = send(&app, "GET", &format!("/leave-requests/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = body_json(response).await;
        assert_eq!(body["overallStatus"], "approved");
        assert_eq!(body["version"], 4);
    }

    #[tokio::test]
    async fn test_decision_by_wrong_approver_is_forbidden() {
        let app: Router = build_router(create_test_app_state());
        let id: i64 = submit_ok(&app, "2099-06-10", "2099-06-12").await;

        let response: Response = send(
            &app,
            "POST",
            &format!("/leave-requests/{id}/decisions"),
            Some(&decision_body("hod", "mentor-1", "approve")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_deciding_a_stage_twice_is_a_conflict() {
        let app: Router = build_router(create_test_app_state());
        let id: i64 = submit_ok(&app, "2099-06-10", "2099-06-12").await;
        let uri: String = format!("/leave-requests/{id}/decisions");

        let first: Response = send(
            &app,
            "POST",
            &uri,
            Some(&decision_body("mentor", "mentor-1", "reject")),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(body_json(first).await["overallStatus"], "rejected");

        let second: Response = send(
            &app,
            "POST",
            &uri,
            Some(&decision_body("mentor", "mentor-1", "approve")),
        )
        .await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_unknown_request_is_not_found() {
        let app: Router = build_router(create_test_app_state());

        let response: Response = send(&app, "GET", "/leave-requests/999", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_listing_by_requester_and_approver() {
        let app: Router = build_router(create_test_app_state());
        let id: i64 = submit_ok(&app, "2099-06-10", "2099-06-12").await;

        let mine: Value = body_json(
            send(&app, "GET", "/leave-requests?requester_id=stu-1", None).await,
        )
        .await;
        assert_eq!(mine["requests"][0]["requestId"], id);

        let inbox: Response = send(&app, "GET", "/approvals/pending?approver_id=ci-1", None).await;
        assert_eq!(inbox.status(), StatusCode::OK);
        let inbox: Value = body_json(inbox).await;
        assert_eq!(inbox["requests"].as_array().unwrap().len(), 1);

        let empty: Value = body_json(
            send(&app, "GET", "/approvals/pending?approver_id=nobody", None).await,
        )
        .await;
        assert!(empty["requests"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duration_skips_second_saturday_and_sunday() {
        let app: Router = build_router(create_test_app_state());

        let response: Response =
            send(&app, "GET", "/duration?from=2099-06-12&to=2099-06-15", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = body_json(response).await;
        assert_eq!(body["chargeableDays"], 2);
        assert_eq!(body["calendarSpanDays"], 4);
    }

    #[tokio::test]
    async fn test_duration_with_end_before_start_is_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let response: Response =
            send(&app, "GET", "/duration?from=2099-06-12&to=2099-06-10", None).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
