//! Core data models for trove.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the collection provisioned for every new user at registration.
pub const DEFAULT_COLLECTION_NAME: &str = "Personal";

/// A registered user, as stored. The password hash never leaves the
/// database/auth layers; API responses use [`PublicUser`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at_utc: DateTime<Utc>,
}

impl User {
    /// The externally visible projection of this user.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// User record exposed over the API (no credential material).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A named grouping of items. Each item belongs to at most one collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
}

/// A named label, many-to-many with items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

/// Content variant of an item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Text,
    Link,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::File => "file",
            ItemKind::Text => "text",
            ItemKind::Link => "link",
        }
    }

    pub fn parse(s: &str) -> Option<ItemKind> {
        match s {
            "file" => Some(ItemKind::File),
            "text" => Some(ItemKind::Text),
            "link" => Some(ItemKind::Link),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item as returned by list/create operations: row fields joined with the
/// collection name and the aggregated tag names, in the wire casing the
/// client expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub content: Option<String>,
    pub url: Option<String>,
    /// Public path of the backing blob (file items only), e.g.
    /// `/uploads/<blob>.pdf`.
    pub file_path: Option<String>,
    #[serde(rename = "size")]
    pub size_display: String,
    /// Collection name, if the item is placed in one.
    pub collection: Option<String>,
    /// Tag names, ordered by name.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Kind-specific payload for item creation. Exactly one variant's data ends
/// up populated on the row; the others stay NULL.
#[derive(Debug, Clone)]
pub enum ItemPayload {
    Text { content: String },
    Link { url: String },
    File(StoredBlob),
}

impl ItemPayload {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemPayload::Text { .. } => ItemKind::Text,
            ItemPayload::Link { .. } => ItemKind::Link,
            ItemPayload::File(_) => ItemKind::File,
        }
    }
}

/// Result of persisting an uploaded blob to storage, consumed by file-item
/// creation.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    /// Backend-relative storage path of the written blob.
    pub path: String,
    /// Original filename supplied by the uploader.
    pub original_name: String,
    pub size_bytes: u64,
}

/// Validated request to create one item, any variant.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub payload: ItemPayload,
    /// Collection to place the item in, resolved get-or-create.
    pub collection: Option<String>,
    /// Tag names to attach, each resolved get-or-create.
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_kind_round_trip() {
        for kind in [ItemKind::File, ItemKind::Text, ItemKind::Link] {
            assert_eq!(ItemKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ItemKind::parse("note"), None);
    }

    #[test]
    fn test_item_view_wire_casing() {
        let view = ItemView {
            id: Uuid::nil(),
            name: "report.pdf".to_string(),
            kind: ItemKind::File,
            content: None,
            url: None,
            file_path: Some("/uploads/x.pdf".to_string()),
            size_display: "1.50 MB".to_string(),
            collection: Some("Work".to_string()),
            tags: vec!["q1".to_string()],
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["filePath"], "/uploads/x.pdf");
        assert_eq!(json["size"], "1.50 MB");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("size_display").is_none());
    }

    #[test]
    fn test_public_user_hides_credentials() {
        let user = User {
            id: Uuid::nil(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$2b$10$abcdef".to_string(),
            created_at_utc: Utc::now(),
        };
        let json = serde_json::to_value(user.public()).unwrap();
        assert_eq!(json["email"], "ada@example.com");
        assert!(json.get("password_hash").is_none());
    }
}
