use super::codec;
use async_trait::async_trait;
use junction_dns_application::ports::RouteStore;
use junction_dns_domain::{DomainError, RoutePolicy};
use sqlx::{Row, SqlitePool};
use tracing::warn;

/// Route policies persisted in a single SQLite table, keyed by
/// canonical domain name. The query path only reads; writes come from
/// the configuration API.
pub struct SqliteRouteStore {
    pool: SqlitePool,
}

impl SqliteRouteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RouteStore for SqliteRouteStore {
    async fn get(&self, key: &str) -> Result<Option<RoutePolicy>, DomainError> {
        let row = sqlx::query("SELECT policy FROM routes WHERE domain = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let blob: Vec<u8> = row.get("policy");
        match codec::decode(&blob) {
            Ok(policy) => Ok(Some(policy)),
            Err(e) => {
                // Unreadable records read as absent so resolution can
                // continue up the hierarchy.
                warn!(domain = %key, error = %e, "stored route record is unreadable");
                Ok(None)
            }
        }
    }

    async fn put(&self, policy: &RoutePolicy) -> Result<(), DomainError> {
        let blob = codec::encode(policy)?;
        sqlx::query(
            "INSERT INTO routes (domain, policy) VALUES (?, ?)
             ON CONFLICT(domain) DO UPDATE SET policy = excluded.policy",
        )
        .bind(&policy.domain)
        .bind(&blob)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<RoutePolicy>, DomainError> {
        let rows = sqlx::query("SELECT domain, policy FROM routes ORDER BY domain")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;

        let mut policies = Vec::with_capacity(rows.len());
        for row in rows {
            let domain: String = row.get("domain");
            let blob: Vec<u8> = row.get("policy");
            match codec::decode(&blob) {
                Ok(policy) => policies.push(policy),
                Err(e) => warn!(domain = %domain, error = %e, "skipping unreadable route record"),
            }
        }
        Ok(policies)
    }
}
