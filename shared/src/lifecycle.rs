//! App lifecycle tracking for `app_open` analytics
//!
//! A client reports its lifecycle state changes here and gets back the event
//! it should send, if any: one on initialization and one each time the app
//! returns to the foreground.

use crate::models::{AnalyticsEvent, AppOpenSource};
use serde::{Deserialize, Serialize};

/// Lifecycle state reported by the mobile runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    Active,
    Background,
    Inactive,
}

impl AppState {
    fn is_away(&self) -> bool {
        matches!(self, AppState::Background | AppState::Inactive)
    }
}

/// Remembers the last reported state
#[derive(Debug, Clone, Default)]
pub struct AppLifecycle {
    current: Option<AppState>,
}

impl AppLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last state seen, `None` before initialization
    pub fn current(&self) -> Option<AppState> {
        self.current
    }

    /// Record the initial state; always yields a launch `app_open`
    pub fn initialize(&mut self, initial: AppState) -> AnalyticsEvent {
        self.current = Some(initial);
        AnalyticsEvent::app_open(AppOpenSource::Launch)
    }

    /// Record a state change, yielding `app_open` only when moving from
    /// background or inactive to active
    pub fn transition(&mut self, next: AppState) -> Option<AnalyticsEvent> {
        let previous = self.current.replace(next);
        match previous {
            Some(prev) if prev.is_away() && next == AppState::Active => {
                Some(AnalyticsEvent::app_open(AppOpenSource::Foreground))
            }
            _ => None,
        }
    }
}
