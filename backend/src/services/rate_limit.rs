//! Plan regeneration rate limiting
//!
//! A user may regenerate each plan type once per cooldown window (24 hours by
//! default). The window is measured from the stored `last_regenerated_at`.
//!
//! # Store failures
//!
//! What happens when the store cannot be read is decided by
//! [`StoreFailurePolicy`], set from `rate_limit.fail_open`. Failing open lets
//! the regeneration through; failing closed rejects the request with 503.

use crate::config::RateLimitConfig;
use crate::error::ApiError;
use crate::repositories::RegenerationStore;
use chrono::{DateTime, Duration, Utc};
use coach_shared::{PlanType, RegenerationStatus};
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// How to answer a check when the store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFailurePolicy {
    /// Treat the failure as permission granted
    FailOpen,
    /// Surface the failure to the caller
    FailClosed,
}

impl StoreFailurePolicy {
    pub fn from_fail_open(fail_open: bool) -> Self {
        if fail_open {
            StoreFailurePolicy::FailOpen
        } else {
            StoreFailurePolicy::FailClosed
        }
    }
}

/// Enforces the per-plan regeneration cooldown
#[derive(Clone)]
pub struct RegenerationLimiter {
    store: Arc<dyn RegenerationStore>,
    cooldown: Duration,
    policy: StoreFailurePolicy,
}

impl RegenerationLimiter {
    pub fn new(store: Arc<dyn RegenerationStore>, cooldown: Duration, policy: StoreFailurePolicy) -> Self {
        Self {
            store,
            cooldown,
            policy,
        }
    }

    pub fn from_config(store: Arc<dyn RegenerationStore>, config: &RateLimitConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            store,
            config.cooldown()?,
            StoreFailurePolicy::from_fail_open(config.fail_open),
        ))
    }

    pub fn policy(&self) -> StoreFailurePolicy {
        self.policy
    }

    pub fn store(&self) -> &Arc<dyn RegenerationStore> {
        &self.store
    }

    /// Check whether the user may regenerate the plan now
    pub async fn check(&self, user_id: Uuid, plan_type: PlanType) -> Result<RegenerationStatus, ApiError> {
        self.check_at(user_id, plan_type, Utc::now()).await
    }

    /// Check against an explicit clock reading
    pub async fn check_at(
        &self,
        user_id: Uuid,
        plan_type: PlanType,
        now: DateTime<Utc>,
    ) -> Result<RegenerationStatus, ApiError> {
        match self.store.last_regenerated_at(user_id, plan_type).await {
            Ok(last) => {
                let status = self.evaluate(plan_type, last, now);
                let outcome = if status.can_regenerate { "allowed" } else { "limited" };
                metrics::counter!("regeneration_checks_total", "outcome" => outcome).increment(1);
                debug!(%user_id, plan = %plan_type, can_regenerate = status.can_regenerate, "Regeneration checked");
                Ok(status)
            }
            Err(err) => match self.policy {
                StoreFailurePolicy::FailOpen => {
                    metrics::counter!("regeneration_checks_total", "outcome" => "fail_open")
                        .increment(1);
                    warn!(%user_id, plan = %plan_type, error = %err, "Regeneration store failed, allowing regeneration");
                    Ok(RegenerationStatus::allowed())
                }
                StoreFailurePolicy::FailClosed => {
                    metrics::counter!("regeneration_checks_total", "outcome" => "unavailable")
                        .increment(1);
                    error!(%user_id, plan = %plan_type, error = %err, "Regeneration store failed");
                    Err(ApiError::Unavailable(
                        "Unable to check regeneration limit, please try again later".to_string(),
                    ))
                }
            },
        }
    }

    /// Decide the status from the last regeneration time
    pub fn evaluate(
        &self,
        plan_type: PlanType,
        last_regenerated_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> RegenerationStatus {
        let Some(last) = last_regenerated_at else {
            return RegenerationStatus::allowed();
        };

        let next_available_at = last + self.cooldown;
        if now >= next_available_at {
            return RegenerationStatus::allowed();
        }

        let remaining_ms = (next_available_at - now).num_milliseconds();
        let hours_remaining = (remaining_ms + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR;

        RegenerationStatus {
            can_regenerate: false,
            next_available_at: Some(next_available_at),
            hours_remaining: Some(hours_remaining),
            message: Some(format!(
                "You can regenerate your {} again in {} hour{}.",
                plan_label(plan_type),
                hours_remaining,
                if hours_remaining == 1 { "" } else { "s" }
            )),
        }
    }

    /// Store a regeneration that happened now
    pub async fn record(&self, user_id: Uuid, plan_type: PlanType) -> Result<(), ApiError> {
        self.record_at(user_id, plan_type, Utc::now()).await
    }

    pub async fn record_at(
        &self,
        user_id: Uuid,
        plan_type: PlanType,
        at: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        self.store.record(user_id, plan_type, at).await.map_err(|err| {
            error!(%user_id, plan = %plan_type, error = %err, "Failed to record regeneration");
            ApiError::Unavailable("Unable to record plan regeneration".to_string())
        })
    }
}

fn plan_label(plan_type: PlanType) -> &'static str {
    match plan_type {
        PlanType::Workout => "workout plan",
        PlanType::Diet => "diet plan",
        PlanType::Both => "workout and diet plans",
    }
}
