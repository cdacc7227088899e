//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! Every field is an `Arc` or Arc-backed handle, so cloning the state for
//! each request is O(1), and nothing in it changes after startup.

use crate::config::AppConfig;
use crate::repositories::RegenerationStore;
use crate::services::{AnalyticsService, RegenerationLimiter};
use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Regeneration cooldown enforcement
    pub limiter: RegenerationLimiter,
    /// Fire-and-forget analytics dispatch
    pub analytics: AnalyticsService,
    /// Renders `/metrics`; absent when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Fails when the rate limit configuration is out of range.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn RegenerationStore>,
        analytics: AnalyticsService,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self> {
        let limiter = RegenerationLimiter::from_config(store, &config.rate_limit)?;

        Ok(Self {
            config: Arc::new(config),
            limiter,
            analytics,
            metrics,
        })
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the regeneration limiter
    #[inline]
    pub fn limiter(&self) -> &RegenerationLimiter {
        &self.limiter
    }

    /// Get a reference to the analytics service
    #[inline]
    pub fn analytics(&self) -> &AnalyticsService {
        &self.analytics
    }
}
