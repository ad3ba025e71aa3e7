//! Repositories for record and user storage
//!
//! Two capability views sit over the same store: the owner-scoped view
//! (`list_owned`) backs lists, exports, and mutations, while `list_all`
//! feeds the organization-wide statistics.

use anyhow::Result;
use async_trait::async_trait;
use reporting::{
    filter::{Pagination, Predicate},
    models::{OwnedRecord, User},
};
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod password;
pub mod postgres;

/// Returned by [`UserRepository::create`] when the email is already taken
#[derive(Debug, Error)]
#[error("User with email {0} already exists")]
pub struct DuplicateEmail(pub String);

/// Storage for one kind of owned record
#[async_trait]
pub trait RecordRepository<R: OwnedRecord>: Send + Sync {
    /// Display ID of the most recently created record
    async fn latest_display_id(&self) -> Result<Option<String>>;

    async fn insert(&self, record: &R) -> Result<R>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<R>>;

    /// Full replace of a stored record; `None` when it no longer exists
    async fn update(&self, record: &R) -> Result<Option<R>>;

    /// Returns whether a record was removed
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// An owner's records matching every predicate, newest first, with the
    /// total match count. `None` returns every match.
    async fn list_owned(
        &self,
        owner: Uuid,
        predicates: &[Predicate],
        page: Option<Pagination>,
    ) -> Result<(Vec<R>, i64)>;

    /// Every record regardless of owner
    async fn list_all(&self) -> Result<Vec<R>>;
}

/// Storage for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User>;

    /// Case-insensitive lookup
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
}
