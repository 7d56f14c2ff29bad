//! Application state for the web layer.

use std::sync::Arc;

use crate::service::ScheduleService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Schedule resolution service (owns the cache)
    pub schedules: Arc<ScheduleService>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(schedules: ScheduleService) -> Self {
        Self {
            schedules: Arc::new(schedules),
        }
    }
}
