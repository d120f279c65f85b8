//! Tag registry implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row, Transaction};
use uuid::Uuid;

use trove_core::{Error, Result, Tag, TagRepository};

use crate::collections::validate_name;

/// PostgreSQL implementation of TagRepository.
pub struct PgTagRepository {
    pool: Pool<Postgres>,
}

impl PgTagRepository {
    /// Create a new PgTagRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn list(&self, owner: Uuid) -> Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name FROM tag WHERE user_id = $1 ORDER BY name")
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| Tag {
                id: r.get("id"),
                name: r.get("name"),
            })
            .collect())
    }

    async fn create(&self, owner: Uuid, name: &str) -> Result<(Tag, bool)> {
        validate_name(name, "Tag")?;

        let existing = sqlx::query("SELECT id, name FROM tag WHERE user_id = $1 AND name = $2")
            .bind(owner)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        if let Some(row) = existing {
            return Ok((
                Tag {
                    id: row.get("id"),
                    name: row.get("name"),
                },
                false,
            ));
        }

        let id = Uuid::now_v7();
        sqlx::query("INSERT INTO tag (id, user_id, name, created_at_utc) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(owner)
            .bind(name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok((
            Tag {
                id,
                name: name.to_string(),
            },
            true,
        ))
    }

    async fn get_or_create(&self, owner: Uuid, name: &str) -> Result<Tag> {
        let (tag, _) = self.create(owner, name).await?;
        Ok(tag)
    }
}

impl PgTagRepository {
    /// Get-or-create within an existing transaction. Used while linking tags
    /// during item creation so the lookup, insert, and association all
    /// commit together.
    pub async fn get_or_create_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: Uuid,
        name: &str,
    ) -> Result<Tag> {
        validate_name(name, "Tag")?;

        let existing = sqlx::query("SELECT id, name FROM tag WHERE user_id = $1 AND name = $2")
            .bind(owner)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
            .map_err(Error::Database)?;

        if let Some(row) = existing {
            return Ok(Tag {
                id: row.get("id"),
                name: row.get("name"),
            });
        }

        let id = Uuid::now_v7();
        sqlx::query("INSERT INTO tag (id, user_id, name, created_at_utc) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(owner)
            .bind(name)
            .bind(Utc::now())
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

        Ok(Tag {
            id,
            name: name.to_string(),
        })
    }
}
