//! Item catalog repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use trove_core::{
    file_size_display, matches_tag_filter, text_size_display, Error, ItemFilter, ItemKind,
    ItemPayload, ItemRepository, ItemView, NewItem, Result, LINK_SIZE_DISPLAY,
};

use crate::collections::PgCollectionRepository;
use crate::escape_like;
use crate::tags::PgTagRepository;

/// URL prefix under which blobs are served read-only.
const PUBLIC_BLOB_PREFIX: &str = "/uploads";

/// Public URL path for a backend-relative blob path.
fn public_blob_path(path: &str) -> String {
    format!("{}/{}", PUBLIC_BLOB_PREFIX, path)
}

/// PostgreSQL implementation of ItemRepository.
///
/// Owns registry handles so collection/tag resolution during item creation
/// can run inside the item's transaction.
pub struct PgItemRepository {
    pool: Pool<Postgres>,
    collections: PgCollectionRepository,
    tags: PgTagRepository,
}

impl PgItemRepository {
    /// Create a new PgItemRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            collections: PgCollectionRepository::new(pool.clone()),
            tags: PgTagRepository::new(pool.clone()),
            pool,
        }
    }
}

fn item_view_from_row(row: &sqlx::postgres::PgRow) -> Result<ItemView> {
    let kind: String = row.get("kind");
    let kind = ItemKind::parse(&kind)
        .ok_or_else(|| Error::Internal(format!("unknown item kind in database: {}", kind)))?;
    let file_path: Option<String> = row.get("file_path");

    Ok(ItemView {
        id: row.get("id"),
        name: row.get("name"),
        kind,
        content: row.get("content"),
        url: row.get("url"),
        file_path: file_path.as_deref().map(public_blob_path),
        size_display: row.get("size_display"),
        collection: row.get("collection_name"),
        tags: row.get("tags"),
        created_at: row.get("created_at_utc"),
    })
}

fn validate(item: &NewItem) -> Result<()> {
    if item.name.trim().is_empty() {
        return Err(Error::InvalidInput("Name and type required".to_string()));
    }
    match &item.payload {
        ItemPayload::Text { content } if content.is_empty() => {
            Err(Error::InvalidInput("Content required for text items".to_string()))
        }
        ItemPayload::Link { url } if url.trim().is_empty() => {
            Err(Error::InvalidInput("URL required for link items".to_string()))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn list(&self, owner: Uuid, filter: ItemFilter) -> Result<Vec<ItemView>> {
        let mut query = String::from(
            r#"
            SELECT
                i.id, i.name, i.kind, i.content, i.url, i.file_path,
                i.size_display, i.created_at_utc,
                c.name AS collection_name,
                COALESCE(
                    (SELECT array_agg(t.name ORDER BY t.name)
                     FROM item_tag it
                     JOIN tag t ON t.id = it.tag_id
                     WHERE it.item_id = i.id),
                    ARRAY[]::text[]
                ) AS tags
            FROM item i
            LEFT JOIN collection c ON c.id = i.collection_id
            WHERE i.user_id = $1
            "#,
        );

        let mut param_idx = 2;
        if filter.search.is_some() {
            query.push_str(&format!(
                " AND (i.name ILIKE ${p} OR i.content ILIKE ${p})",
                p = param_idx
            ));
            param_idx += 1;
        }
        if filter.collection.is_some() {
            query.push_str(&format!(" AND c.name = ${}", param_idx));
        }
        query.push_str(" ORDER BY i.created_at_utc DESC");

        let mut q = sqlx::query(&query).bind(owner);
        if let Some(search) = &filter.search {
            q = q.bind(format!("%{}%", escape_like(search)));
        }
        if let Some(collection) = &filter.collection {
            q = q.bind(collection);
        }

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;

        // Tag filtering is a single superset-match stage over each row's
        // aggregated tag list.
        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let view = item_view_from_row(row)?;
            if matches_tag_filter(&view.tags, &filter.tags) {
                items.push(view);
            }
        }
        Ok(items)
    }

    async fn create(&self, owner: Uuid, item: NewItem) -> Result<ItemView> {
        validate(&item)?;

        let kind = item.payload.kind();
        let (content, url, file_path, size_display) = match &item.payload {
            ItemPayload::Text { content } => (
                Some(content.clone()),
                None,
                None,
                text_size_display(content),
            ),
            ItemPayload::Link { url } => {
                (None, Some(url.clone()), None, LINK_SIZE_DISPLAY.to_string())
            }
            ItemPayload::File(blob) => (
                None,
                None,
                Some(blob.path.clone()),
                file_size_display(blob.size_bytes),
            ),
        };

        let id = Uuid::now_v7();
        let now = Utc::now();

        // Item insert, collection/tag resolution, and tag links commit
        // together.
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let collection = match &item.collection {
            Some(name) => Some(self.collections.get_or_create_tx(&mut tx, owner, name).await?),
            None => None,
        };

        sqlx::query(
            "INSERT INTO item
                 (id, user_id, name, kind, content, url, file_path, size_display,
                  collection_id, created_at_utc)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(id)
        .bind(owner)
        .bind(&item.name)
        .bind(kind.as_str())
        .bind(&content)
        .bind(&url)
        .bind(&file_path)
        .bind(&size_display)
        .bind(collection.as_ref().map(|c| c.id))
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let mut tag_names: Vec<String> = Vec::with_capacity(item.tags.len());
        for name in &item.tags {
            let tag = self.tags.get_or_create_tx(&mut tx, owner, name).await?;

            sqlx::query(
                "INSERT INTO item_tag (item_id, tag_id) VALUES ($1, $2)
                 ON CONFLICT (item_id, tag_id) DO NOTHING",
            )
            .bind(id)
            .bind(tag.id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

            if !tag_names.contains(&tag.name) {
                tag_names.push(tag.name);
            }
        }
        tag_names.sort();

        tx.commit().await.map_err(Error::Database)?;

        Ok(ItemView {
            id,
            name: item.name,
            kind,
            content,
            url,
            file_path: file_path.as_deref().map(public_blob_path),
            size_display,
            collection: collection.map(|c| c.name),
            tags: tag_names,
            created_at: now,
        })
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<Option<String>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Ownership check first: a foreign id reads the same as a missing
        // one.
        let row = sqlx::query("SELECT file_path FROM item WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let Some(row) = row else {
            return Err(Error::NotFound("Item not found".to_string()));
        };
        let file_path: Option<String> = row.get("file_path");

        sqlx::query("DELETE FROM item_tag WHERE item_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        sqlx::query("DELETE FROM item WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        Ok(file_path)
    }

    async fn find_file(&self, owner: Uuid, id: Uuid) -> Result<(String, String)> {
        let row = sqlx::query("SELECT name, file_path FROM item WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        let row = row.ok_or_else(|| Error::NotFound("File not found".to_string()))?;
        let file_path: Option<String> = row.get("file_path");
        // Text and link items are never downloadable.
        let file_path = file_path.ok_or_else(|| Error::NotFound("File not found".to_string()))?;

        Ok((row.get("name"), file_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trove_core::StoredBlob;

    fn text_item(name: &str, content: &str) -> NewItem {
        NewItem {
            name: name.to_string(),
            payload: ItemPayload::Text {
                content: content.to_string(),
            },
            collection: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        assert!(validate(&text_item(" ", "body")).is_err());
        assert!(validate(&text_item("Todo", "body")).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_payload() {
        assert!(validate(&text_item("Todo", "")).is_err());

        let link = NewItem {
            name: "Docs".to_string(),
            payload: ItemPayload::Link {
                url: "  ".to_string(),
            },
            collection: None,
            tags: Vec::new(),
        };
        assert!(validate(&link).is_err());
    }

    #[test]
    fn test_validate_accepts_file_payload() {
        let file = NewItem {
            name: "report.pdf".to_string(),
            payload: ItemPayload::File(StoredBlob {
                path: "abc.pdf".to_string(),
                original_name: "report.pdf".to_string(),
                size_bytes: 1024,
            }),
            collection: None,
            tags: Vec::new(),
        };
        assert!(validate(&file).is_ok());
    }

    #[test]
    fn test_public_blob_path() {
        assert_eq!(public_blob_path("abc.pdf"), "/uploads/abc.pdf");
    }
}
