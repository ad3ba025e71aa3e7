//! In-memory repositories
//!
//! Records live in insertion order behind a `tokio` read-write lock and
//! are filtered with the same predicates the SQL store compiles.

use anyhow::Result;
use async_trait::async_trait;
use reporting::{
    filter::{Pagination, Predicate},
    models::{OwnedRecord, User},
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DuplicateEmail, RecordRepository, UserRepository};

/// Record repository holding everything in process memory
pub struct MemoryRecordRepository<R> {
    records: RwLock<Vec<R>>,
}

impl<R> MemoryRecordRepository<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<R> Default for MemoryRecordRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first<R: OwnedRecord + Clone>(records: &[R]) -> Vec<R> {
    let mut sorted: Vec<R> = records.iter().rev().cloned().collect();
    sorted.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    sorted
}

#[async_trait]
impl<R> RecordRepository<R> for MemoryRecordRepository<R>
where
    R: OwnedRecord + Clone + Send + Sync + 'static,
{
    async fn latest_display_id(&self) -> Result<Option<String>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .max_by_key(|r| r.created_at())
            .map(|r| r.display_id().to_string()))
    }

    async fn insert(&self, record: &R) -> Result<R> {
        self.records.write().await.push(record.clone());
        Ok(record.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<R>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn update(&self, record: &R) -> Result<Option<R>> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => {
                *slot = record.clone();
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() < before)
    }

    async fn list_owned(
        &self,
        owner: Uuid,
        predicates: &[Predicate],
        page: Option<Pagination>,
    ) -> Result<(Vec<R>, i64)> {
        let records = self.records.read().await;
        let matching: Vec<R> = newest_first(&records)
            .into_iter()
            .filter(|r| r.created_by() == owner && predicates.iter().all(|p| p.matches(r)))
            .collect();

        let total = matching.len() as i64;
        let window = match page {
            Some(page) => page.window(&matching),
            None => matching,
        };

        Ok((window, total))
    }

    async fn list_all(&self) -> Result<Vec<R>> {
        Ok(self.records.read().await.clone())
    }
}

/// User repository holding accounts in process memory
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(DuplicateEmail(user.email.clone()).into());
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = reporting::models::normalize_email(email);
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}
