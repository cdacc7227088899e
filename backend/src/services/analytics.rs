//! Analytics event dispatch
//!
//! Events are handed to an [`AnalyticsSink`] on a background task. Delivery
//! failures are logged and dropped; callers never see them.

use crate::config::{AnalyticsConfig, AnalyticsSinkKind};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use coach_shared::AnalyticsEvent;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Header carrying the collector's API secret
pub const API_SECRET_HEADER: &str = "x-api-secret";

/// Destination for analytics events
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn send(&self, event: &AnalyticsEvent) -> Result<()>;

    fn name(&self) -> &'static str;
}

/// Writes events to the log
pub struct TracingSink;

#[async_trait]
impl AnalyticsSink for TracingSink {
    async fn send(&self, event: &AnalyticsEvent) -> Result<()> {
        let params = serde_json::to_string(&event.params)?;
        info!(target: "analytics", event = %event.name, %params, "Analytics event");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}

/// Discards every event
pub struct NoopSink;

#[async_trait]
impl AnalyticsSink for NoopSink {
    async fn send(&self, _event: &AnalyticsEvent) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// Posts events as JSON to a collector
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: String,
    api_secret: Option<SecretString>,
}

impl HttpSink {
    pub fn new(endpoint: impl Into<String>, api_secret: Option<SecretString>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build analytics HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_secret,
        })
    }
}

#[async_trait]
impl AnalyticsSink for HttpSink {
    async fn send(&self, event: &AnalyticsEvent) -> Result<()> {
        let body = serde_json::json!({
            "name": event.name,
            "params": event.params,
            "sent_at": Utc::now(),
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(secret) = &self.api_secret {
            request = request.header(API_SECRET_HEADER, secret.expose_secret().as_str());
        }

        request
            .send()
            .await
            .context("Analytics collector unreachable")?
            .error_for_status()
            .context("Analytics collector rejected event")?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Fire-and-forget front end over a sink
#[derive(Clone)]
pub struct AnalyticsService {
    sink: Arc<dyn AnalyticsSink>,
}

impl AnalyticsService {
    pub fn new(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self { sink }
    }

    /// Build the sink named in the configuration
    pub fn from_config(config: &AnalyticsConfig) -> Result<Self> {
        let sink: Arc<dyn AnalyticsSink> = match config.sink {
            AnalyticsSinkKind::Tracing => Arc::new(TracingSink),
            AnalyticsSinkKind::Noop => Arc::new(NoopSink),
            AnalyticsSinkKind::Http => {
                let endpoint = config
                    .endpoint
                    .clone()
                    .context("analytics.endpoint is required for the http sink")?;
                Arc::new(HttpSink::new(
                    endpoint,
                    config.api_secret.clone(),
                    Duration::from_secs(config.timeout_secs),
                )?)
            }
        };
        Ok(Self::new(sink))
    }

    pub fn sink_name(&self) -> &'static str {
        self.sink.name()
    }

    /// Send an event in the background
    ///
    /// The returned handle may be dropped; the task runs to completion
    /// either way and never panics on delivery failure.
    pub fn track(&self, event: AnalyticsEvent) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            match sink.send(&event).await {
                Ok(()) => {
                    metrics::counter!("analytics_events_total", "outcome" => "sent").increment(1);
                    debug!(event = %event.name, sink = sink.name(), "Analytics event sent");
                }
                Err(err) => {
                    metrics::counter!("analytics_events_total", "outcome" => "failed").increment(1);
                    warn!(event = %event.name, sink = sink.name(), error = %err, "Failed to send analytics event");
                }
            }
        })
    }
}
