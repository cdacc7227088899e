//! Domain models shared by the backend and clients

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Which generated plan a regeneration applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Workout,
    Diet,
    Both,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Workout => "workout",
            PlanType::Diet => "diet",
            PlanType::Both => "both",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the event logged whenever the app comes to the foreground
pub const APP_OPEN_EVENT: &str = "app_open";

/// Why an `app_open` event was emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppOpenSource {
    /// First launch of this app process
    Launch,
    /// Returned from background or inactive
    Foreground,
}

/// An analytics event ready for a sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: String,
    #[serde(default)]
    pub params: HashMap<String, serde_json::Value>,
}

impl AnalyticsEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn app_open(source: AppOpenSource) -> Self {
        let source = match source {
            AppOpenSource::Launch => "launch",
            AppOpenSource::Foreground => "foreground",
        };
        Self::new(APP_OPEN_EVENT).with_param("source", source)
    }
}
