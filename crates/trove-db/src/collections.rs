//! Collection registry implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row, Transaction};
use uuid::Uuid;

use trove_core::{Collection, CollectionRepository, Error, Result};

/// Validate a collection or tag name: non-empty after trimming.
pub(crate) fn validate_name(name: &str, what: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} name required", what)));
    }
    Ok(())
}

/// PostgreSQL implementation of CollectionRepository.
pub struct PgCollectionRepository {
    pool: Pool<Postgres>,
}

impl PgCollectionRepository {
    /// Create a new PgCollectionRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollectionRepository for PgCollectionRepository {
    async fn list(&self, owner: Uuid) -> Result<Vec<Collection>> {
        let rows =
            sqlx::query("SELECT id, name FROM collection WHERE user_id = $1 ORDER BY name")
                .bind(owner)
                .fetch_all(&self.pool)
                .await
                .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| Collection {
                id: r.get("id"),
                name: r.get("name"),
            })
            .collect())
    }

    async fn create(&self, owner: Uuid, name: &str) -> Result<Collection> {
        validate_name(name, "Collection")?;

        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO collection (id, user_id, name, created_at_utc) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(owner)
        .bind(name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Collection {
            id,
            name: name.to_string(),
        })
    }

    async fn get_or_create(&self, owner: Uuid, name: &str) -> Result<Collection> {
        validate_name(name, "Collection")?;

        let existing =
            sqlx::query("SELECT id, name FROM collection WHERE user_id = $1 AND name = $2")
                .bind(owner)
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(Error::Database)?;

        if let Some(row) = existing {
            return Ok(Collection {
                id: row.get("id"),
                name: row.get("name"),
            });
        }

        // Lookup and insert are two statements: a concurrent identical call
        // can insert its own row in between, leaving two collections with
        // the same name.
        self.create(owner, name).await
    }
}

impl PgCollectionRepository {
    /// Get-or-create within an existing transaction.
    pub async fn get_or_create_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: Uuid,
        name: &str,
    ) -> Result<Collection> {
        validate_name(name, "Collection")?;

        let existing =
            sqlx::query("SELECT id, name FROM collection WHERE user_id = $1 AND name = $2")
                .bind(owner)
                .bind(name)
                .fetch_optional(&mut **tx)
                .await
                .map_err(Error::Database)?;

        if let Some(row) = existing {
            return Ok(Collection {
                id: row.get("id"),
                name: row.get("name"),
            });
        }

        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO collection (id, user_id, name, created_at_utc) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(owner)
        .bind(name)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        Ok(Collection {
            id,
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_rejects_empty() {
        assert!(validate_name("", "Collection").is_err());
        assert!(validate_name("   ", "Collection").is_err());
        assert!(validate_name("Work", "Collection").is_ok());
    }

    #[test]
    fn test_validate_name_error_mentions_entity() {
        let err = validate_name("", "Tag").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Tag name required");
    }
}
