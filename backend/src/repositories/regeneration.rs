//! Plan regeneration timestamps
//!
//! One row per `(user_id, plan_type)` holding the last time that plan was
//! regenerated.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coach_shared::PlanType;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Storage for regeneration timestamps
#[async_trait]
pub trait RegenerationStore: Send + Sync {
    /// When the user last regenerated this plan, if ever
    async fn last_regenerated_at(
        &self,
        user_id: Uuid,
        plan_type: PlanType,
    ) -> Result<Option<DateTime<Utc>>>;

    /// Store `at` as the latest regeneration, replacing any previous value
    async fn record(&self, user_id: Uuid, plan_type: PlanType, at: DateTime<Utc>) -> Result<()>;

    /// Check the store is reachable
    async fn health_check(&self) -> Result<()>;
}

/// Postgres-backed store using the `plan_regenerations` table
#[derive(Clone)]
pub struct PgRegenerationStore {
    pool: PgPool,
}

impl PgRegenerationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegenerationStore for PgRegenerationStore {
    async fn last_regenerated_at(
        &self,
        user_id: Uuid,
        plan_type: PlanType,
    ) -> Result<Option<DateTime<Utc>>> {
        let last = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            SELECT last_regenerated_at
            FROM plan_regenerations
            WHERE user_id = $1 AND plan_type = $2
            "#,
        )
        .bind(user_id)
        .bind(plan_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(last)
    }

    async fn record(&self, user_id: Uuid, plan_type: PlanType, at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO plan_regenerations (user_id, plan_type, last_regenerated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, plan_type)
            DO UPDATE SET last_regenerated_at = EXCLUDED.last_regenerated_at
            "#,
        )
        .bind(user_id)
        .bind(plan_type.as_str())
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        crate::db::health_check(&self.pool).await
    }
}

/// Process-local store, used in development and tests
#[derive(Default)]
pub struct InMemoryRegenerationStore {
    entries: RwLock<HashMap<(Uuid, PlanType), DateTime<Utc>>>,
}

impl InMemoryRegenerationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegenerationStore for InMemoryRegenerationStore {
    async fn last_regenerated_at(
        &self,
        user_id: Uuid,
        plan_type: PlanType,
    ) -> Result<Option<DateTime<Utc>>> {
        Ok(self.entries.read().await.get(&(user_id, plan_type)).copied())
    }

    async fn record(&self, user_id: Uuid, plan_type: PlanType, at: DateTime<Utc>) -> Result<()> {
        self.entries.write().await.insert((user_id, plan_type), at);
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
