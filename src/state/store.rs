//! Process-wide document store.
//!
//! Collections live in one [`Database`] behind a tokio `RwLock`. Every write
//! goes through [`Store::transaction`], which applies the mutation to a
//! working copy, persists it and only then swaps it in, so a failed step
//! leaves neither memory nor disk partially updated.
//!
//! Each write clones the whole database. That is linear in the data size,
//! which is acceptable for a single JSON file; a larger deployment would
//! want a real database behind this API instead.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::info;

use super::database::Database;
use crate::error::{AppError, Result};

pub struct Store {
    db: Arc<RwLock<Database>>,
    path: Option<PathBuf>,
}

pub type SharedStore = Arc<Store>;

impl Store {
    /// Open the database file at `path`, creating an empty database if missing
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let db = Database::load(&path.to_string_lossy()).await?;
        info!(
            "Loaded database from {} ({} classes, {} users)",
            path.display(),
            db.classes.len(),
            db.users.len()
        );

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            path: Some(path),
        })
    }

    /// Store without persistence
    pub fn in_memory() -> Self {
        Self {
            db: Arc::new(RwLock::new(Database::new())),
            path: None,
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Database> {
        self.db.read().await
    }

    /// Run `f` as a single all-or-nothing write.
    ///
    /// Save and swap run on their own task holding the write lock, so a
    /// caller dropped mid-write (client disconnect, timeout) cannot leave
    /// disk ahead of memory.
    pub async fn transaction<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Database) -> Result<R>,
    {
        let mut guard = self.db.clone().write_owned().await;
        let mut working = guard.clone();

        let output = f(&mut working)?;
        working.touch();

        let path = self.path.clone();
        let commit = tokio::spawn(async move {
            if let Some(path) = path {
                working.save(&path.to_string_lossy()).await?;
            }
            *guard = working;
            Ok::<(), AppError>(())
        });

        commit.await.map_err(|e| AppError::Internal {
            message: format!("store commit task failed: {}", e),
        })??;

        Ok(output)
    }
}

pub fn create_shared_store(store: Store) -> SharedStore {
    Arc::new(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{new_id, User};

    fn user(email: &str) -> User {
        User {
            id: new_id(),
            name: None,
            email: email.to_string(),
            photo: None,
            role: None,
        }
    }

    #[tokio::test]
    async fn test_failed_transaction_leaves_no_trace() {
        let store = Store::in_memory();

        let result: Result<()> = store
            .transaction(|db| {
                db.insert_user(user("a@x.com"));
                Err(AppError::Internal {
                    message: "step failed".to_string(),
                })
            })
            .await;

        assert!(result.is_err());
        assert!(store.read().await.users.is_empty());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enrollment_db.json");

        let store = Store::open(&path).await.unwrap();
        store
            .transaction(|db| Ok(db.insert_user(user("a@x.com"))))
            .await
            .unwrap();
        drop(store);

        let reopened = Store::open(&path).await.unwrap();
        let db = reopened.read().await;
        assert_eq!(db.users.len(), 1);
        assert_eq!(db.users[0].email, "a@x.com");
    }

    #[tokio::test]
    async fn test_cancelled_writes_keep_memory_and_disk_in_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enrollment_db.json");
        let store = Store::open(&path).await.unwrap();

        for i in 0..200u64 {
            let email = format!("u{}@x.com", i);
            let _ = tokio::time::timeout(
                std::time::Duration::from_micros(i % 400),
                store.transaction(move |db| Ok(db.insert_user(user(&email)))),
            )
            .await;

            // Waits for any commit still running after the caller gave up
            let in_memory = store.read().await.users.len();
            let on_disk = Database::load(&path.to_string_lossy())
                .await
                .unwrap()
                .users
                .len();
            assert_eq!(in_memory, on_disk, "diverged after write {}", i);
        }
    }

    #[tokio::test]
    async fn test_failed_save_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("state");
        std::fs::create_dir(&data_dir).unwrap();
        let store = Store::open(data_dir.join("enrollment_db.json")).await.unwrap();

        std::fs::remove_dir_all(&data_dir).unwrap();
        let result = store
            .transaction(|db| Ok(db.insert_user(user("a@x.com"))))
            .await;

        assert!(matches!(result, Err(AppError::StateSave { .. })));
        assert!(store.read().await.users.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enrollment_db.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let result = Store::open(&path).await;
        assert!(matches!(result, Err(AppError::StateParse { .. })));
    }
}
