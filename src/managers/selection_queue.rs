use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::models::{DeleteResult, InsertResult, NewSelection, Selection};
use crate::state::SharedStore;

/// Pending (unpaid) class selections
#[derive(Clone)]
pub struct SelectionQueue {
    store: SharedStore,
}

impl SelectionQueue {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list_for_user(&self, email: &str) -> Vec<Selection> {
        self.store
            .read()
            .await
            .selections
            .iter()
            .filter(|s| s.user_email == email)
            .cloned()
            .collect()
    }

    /// At most one selection per (class, user); checked inside the write transaction
    pub async fn add(&self, req: NewSelection) -> Result<InsertResult> {
        let selection = Selection::from(req);
        let (class_id, email) = (selection.class_id.clone(), selection.user_email.clone());

        match self.store.transaction(|db| db.insert_selection(selection)).await {
            Ok(result) => {
                info!("{} selected class {}", email, class_id);
                Ok(result)
            }
            Err(AppError::DuplicateSelection) => {
                warn!("{} already selected class {}", email, class_id);
                Err(AppError::DuplicateSelection)
            }
            Err(e) => Err(e),
        }
    }

    /// Delete by id without an ownership check
    pub async fn remove(&self, selection_id: &str) -> Result<DeleteResult> {
        self.store
            .transaction(|db| Ok(db.delete_selection(selection_id)))
            .await
    }
}
