//! HTTP API module for the attendance store.
//!
//! This module exposes the store's accessors, mutations and rollups as a
//! small JSON REST API for dashboard clients.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{ClockRequest, DateQuery, EventQuery, EventRequest, MonthQuery, StatusUpdateRequest};
pub use response::{ApiError, ApiErrorResponse, MonthGridResponse, WeekGridResponse};
pub use state::AppState;
