//! Application state for the attendance API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::store::AttendanceStore;

/// Shared application state.
///
/// Wraps the single [`AttendanceStore`] behind a mutex so each request's
/// mutation and the notifications it triggers run without interleaving.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<AttendanceStore>>,
}

impl AppState {
    /// Creates a new application state owning `store`.
    pub fn new(store: AttendanceStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Locks the store for the duration of a request.
    pub fn store(&self) -> MutexGuard<'_, AttendanceStore> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
