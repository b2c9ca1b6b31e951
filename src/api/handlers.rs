//! HTTP request handlers for the attendance API.
//!
//! This module contains the handler functions for all API endpoints. Every
//! handler locks the shared store once, so a mutation and the notifications
//! it triggers complete before the next request touches the store.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{YearMonth, parse_date_key};
use crate::models::{
    AttendanceRecord, AttendanceSummary, ScheduleEvent, ScheduleEventPatch, ScheduleSummary,
    TodayAttendanceState,
};
use crate::store::StoreSnapshot;

use super::request::{
    ClockRequest, DateQuery, EventQuery, EventRequest, MonthQuery, StatusUpdateRequest,
};
use super::response::{ApiError, ApiErrorResponse, MonthGridResponse, WeekGridResponse};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/attendance", get(list_attendance))
        .route("/attendance/today", get(today_attendance))
        .route("/attendance/clock-in", post(clock_in))
        .route("/attendance/clock-out", post(clock_out))
        .route(
            "/attendance/:date",
            get(get_attendance_record).put(update_attendance_status),
        )
        .route("/schedule", get(list_schedule).post(add_schedule_event))
        .route(
            "/schedule/:id",
            patch(update_schedule_event).delete(delete_schedule_event),
        )
        .route("/schedule/date/:date", get(events_for_date))
        .route("/calendar/month", get(month_grid))
        .route("/calendar/week", get(week_grid))
        .route("/stats/attendance", get(attendance_stats))
        .route("/stats/schedule", get(schedule_stats))
        .route("/snapshot", get(snapshot))
        .with_state(state)
}

/// Maps a JSON body rejection to a 400 response.
fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

/// Parses a `YYYY-MM-DD` path segment.
fn path_date(correlation_id: Uuid, raw: &str) -> ApiResult<NaiveDate> {
    parse_date_key(raw).map_err(|err| {
        warn!(correlation_id = %correlation_id, error = %err, "Rejected date path");
        err.into()
    })
}

/// Clock bodies are optional: no body at all means "now".
fn clock_body(
    correlation_id: Uuid,
    payload: Result<Json<ClockRequest>, JsonRejection>,
) -> ApiResult<ClockRequest> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(ClockRequest::default()),
        Err(rejection) => Err(json_rejection(correlation_id, rejection)),
    }
}

// ==========================================================================
// Attendance
// ==========================================================================

/// Handler for GET /attendance/today.
async fn today_attendance(State(state): State<AppState>) -> Json<TodayAttendanceState> {
    Json(state.store().get_today_attendance())
}

/// Handler for GET /attendance.
async fn list_attendance(
    State(state): State<AppState>,
) -> Json<BTreeMap<NaiveDate, AttendanceRecord>> {
    Json(state.store().get_all_attendance_data())
}

/// Handler for GET /attendance/:date.
async fn get_attendance_record(
    State(state): State<AppState>,
    Path(raw_date): Path<String>,
) -> ApiResult<Json<AttendanceRecord>> {
    let correlation_id = Uuid::new_v4();
    let date = path_date(correlation_id, &raw_date)?;

    state
        .store()
        .get_attendance_record(date)
        .map(Json)
        .ok_or_else(|| ApiErrorResponse::not_found(format!("No attendance record for {}", date)))
}

/// Handler for PUT /attendance/:date.
async fn update_attendance_status(
    State(state): State<AppState>,
    Path(raw_date): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> ApiResult<Json<AttendanceRecord>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, date = %raw_date, "Processing status update");

    let date = path_date(correlation_id, &raw_date)?;
    let Json(request) = payload.map_err(|rejection| json_rejection(correlation_id, rejection))?;

    let start_time = Instant::now();
    let mut store = state.store();
    if store.get_attendance_record(date).is_none() {
        warn!(correlation_id = %correlation_id, date = %date, "Attendance record not found");
        return Err(ApiErrorResponse::not_found(format!(
            "No attendance record for {}",
            date
        )));
    }

    if !store.update_attendance_status(date, request.status, request.patch) {
        warn!(correlation_id = %correlation_id, date = %date, "Status update rejected");
        return Err(ApiErrorResponse::conflict(format!(
            "Clock readings for {} describe an invalid span",
            date
        )));
    }

    info!(
        correlation_id = %correlation_id,
        date = %date,
        status = ?request.status,
        duration_us = start_time.elapsed().as_micros(),
        "Status update completed"
    );
    store
        .get_attendance_record(date)
        .map(Json)
        .ok_or_else(|| ApiErrorResponse::not_found(format!("No attendance record for {}", date)))
}

/// Handler for POST /attendance/clock-in.
async fn clock_in(
    State(state): State<AppState>,
    payload: Result<Json<ClockRequest>, JsonRejection>,
) -> ApiResult<Json<TodayAttendanceState>> {
    let correlation_id = Uuid::new_v4();
    let request = clock_body(correlation_id, payload)?;

    let start_time = Instant::now();
    let mut store = state.store();
    store.clock_in(request.time);
    let today = store.get_today_attendance();

    info!(
        correlation_id = %correlation_id,
        date = %today.date,
        clock_in = ?today.clock_in.map(|t| t.to_string()),
        duration_us = start_time.elapsed().as_micros(),
        "Clock-in recorded"
    );
    Ok(Json(today))
}

/// Handler for POST /attendance/clock-out.
async fn clock_out(
    State(state): State<AppState>,
    payload: Result<Json<ClockRequest>, JsonRejection>,
) -> ApiResult<Json<TodayAttendanceState>> {
    let correlation_id = Uuid::new_v4();
    let request = clock_body(correlation_id, payload)?;

    let start_time = Instant::now();
    let mut store = state.store();
    if !store.clock_out(request.time) {
        warn!(correlation_id = %correlation_id, "Clock-out rejected");
        return Err(ApiErrorResponse::conflict(
            "Clock-out requires an open clock-in on the same day",
        ));
    }
    let today = store.get_today_attendance();

    info!(
        correlation_id = %correlation_id,
        date = %today.date,
        working_hours = ?today.working_hours.map(|h| h.to_string()),
        duration_us = start_time.elapsed().as_micros(),
        "Clock-out recorded"
    );
    Ok(Json(today))
}

// ==========================================================================
// Schedule
// ==========================================================================

/// Handler for GET /schedule.
async fn list_schedule(State(state): State<AppState>) -> Json<Vec<ScheduleEvent>> {
    Json(state.store().get_schedule_data())
}

/// Handler for POST /schedule.
async fn add_schedule_event(
    State(state): State<AppState>,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let Json(request) = payload.map_err(|rejection| json_rejection(correlation_id, rejection))?;

    let event: ScheduleEvent = request.into();
    info!(
        correlation_id = %correlation_id,
        event_id = %event.id,
        event_type = %event.event_type,
        "Adding schedule event"
    );

    state.store().add_schedule_event(event.clone());
    Ok((StatusCode::CREATED, Json(event)))
}

/// Handler for PATCH /schedule/:id.
async fn update_schedule_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ScheduleEventPatch>, JsonRejection>,
) -> ApiResult<Json<ScheduleEvent>> {
    let correlation_id = Uuid::new_v4();
    let Json(patch) = payload.map_err(|rejection| json_rejection(correlation_id, rejection))?;

    let mut store = state.store();
    if !store.update_schedule_event(&id, patch) {
        warn!(correlation_id = %correlation_id, event_id = %id, "Schedule event not found");
        return Err(ApiErrorResponse::not_found(format!("No schedule event '{}'", id)));
    }

    info!(correlation_id = %correlation_id, event_id = %id, "Schedule event updated");
    store
        .get_schedule_event(&id)
        .map(Json)
        .ok_or_else(|| ApiErrorResponse::not_found(format!("No schedule event '{}'", id)))
}

/// Handler for DELETE /schedule/:id.
async fn delete_schedule_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();

    if !state.store().delete_schedule_event(&id) {
        warn!(correlation_id = %correlation_id, event_id = %id, "Schedule event not found");
        return Err(ApiErrorResponse::not_found(format!("No schedule event '{}'", id)));
    }

    info!(correlation_id = %correlation_id, event_id = %id, "Schedule event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /schedule/date/:date.
async fn events_for_date(
    State(state): State<AppState>,
    Path(raw_date): Path<String>,
    Query(query): Query<EventQuery>,
) -> ApiResult<Json<Vec<ScheduleEvent>>> {
    let correlation_id = Uuid::new_v4();
    let date = path_date(correlation_id, &raw_date)?;
    let filter = query
        .into_filter()
        .map_err(|message| ApiErrorResponse::bad_request(ApiError::validation_error(message)))?;

    Ok(Json(state.store().events_for(date, &filter)))
}

// ==========================================================================
// Calendar and statistics
// ==========================================================================

/// Handler for GET /calendar/month.
async fn month_grid(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<MonthGridResponse>> {
    let store = state.store();
    let anchor = query.date.unwrap_or_else(|| store.current_date());
    let calendar = store.calendar();

    Ok(Json(MonthGridResponse {
        month: YearMonth::of(anchor).to_string(),
        week_start: calendar.week_start(),
        cells: calendar.build_month_grid(anchor)?,
    }))
}

/// Handler for GET /calendar/week.
async fn week_grid(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<WeekGridResponse>> {
    let store = state.store();
    let anchor = query.date.unwrap_or_else(|| store.current_date());
    let calendar = store.calendar();

    Ok(Json(WeekGridResponse {
        week_start: calendar.week_start(),
        days: calendar.build_week_grid(anchor)?.to_vec(),
    }))
}

/// Handler for GET /stats/attendance.
async fn attendance_stats(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<AttendanceSummary>> {
    let month = YearMonth::new(query.year, query.month)?;
    Ok(Json(state.store().monthly_attendance_summary(month)))
}

/// Handler for GET /stats/schedule.
async fn schedule_stats(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
    Query(filter): Query<EventQuery>,
) -> ApiResult<Json<ScheduleSummary>> {
    let month = YearMonth::new(query.year, query.month)?;
    let filter = filter
        .into_filter()
        .map_err(|message| ApiErrorResponse::bad_request(ApiError::validation_error(message)))?;

    Ok(Json(state.store().monthly_schedule_summary(month, &filter)))
}

/// Handler for GET /snapshot.
async fn snapshot(State(state): State<AppState>) -> Json<StoreSnapshot> {
    Json(state.store().snapshot())
}
