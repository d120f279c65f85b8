//! Core traits for trove abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::filter::ItemFilter;
use crate::models::*;

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user together with their default collection, in one
    /// transaction. Returns `Error::Conflict` when the email is taken.
    async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User>;

    /// Look up a user by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Repository for per-user collections.
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// All collections owned by `owner`, ordered by name ascending.
    async fn list(&self, owner: Uuid) -> Result<Vec<Collection>>;

    /// Insert a collection. No duplicate-name check: creating the same name
    /// twice yields two rows.
    async fn create(&self, owner: Uuid, name: &str) -> Result<Collection>;

    /// Return the collection with this exact name, inserting it first when
    /// absent. Not atomic against concurrent identical calls.
    async fn get_or_create(&self, owner: Uuid, name: &str) -> Result<Collection>;
}

/// Repository for per-user tags.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// All tags owned by `owner`, ordered by name ascending.
    async fn list(&self, owner: Uuid) -> Result<Vec<Tag>>;

    /// Idempotent creation: returns the existing row when the name is
    /// already present. The boolean is true when a new row was inserted.
    async fn create(&self, owner: Uuid, name: &str) -> Result<(Tag, bool)>;

    /// Return the tag with this exact name, inserting it first when absent.
    async fn get_or_create(&self, owner: Uuid, name: &str) -> Result<Tag>;
}

/// Repository for the item catalog.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Items owned by `owner` matching `filter`, joined with collection name
    /// and tag names, newest first.
    async fn list(&self, owner: Uuid, filter: ItemFilter) -> Result<Vec<ItemView>>;

    /// Insert an item plus its collection/tag resolution and tag links, all
    /// in one transaction.
    async fn create(&self, owner: Uuid, item: NewItem) -> Result<ItemView>;

    /// Delete an item and its tag associations. Returns the backing blob
    /// path when the item was a file, so the caller can clean it up.
    /// `Error::NotFound` when no item matches (id, owner).
    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<Option<String>>;

    /// Resolve a file item to `(display name, blob path)` for download.
    /// `Error::NotFound` when the item is absent, foreign, or not a file.
    async fn find_file(&self, owner: Uuid, id: Uuid) -> Result<(String, String)>;
}
