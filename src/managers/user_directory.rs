use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{InsertResult, NewUser, Role, UpdateResult, User};
use crate::state::SharedStore;

/// User records and roles
#[derive(Clone)]
pub struct UserDirectory {
    store: SharedStore,
}

impl UserDirectory {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<User> {
        self.store.read().await.users.clone()
    }

    /// Insert a user; emails are not checked for uniqueness
    pub async fn create(&self, req: NewUser) -> Result<InsertResult> {
        let user = User::from(req);
        let email = user.email.clone();
        let result = self.store.transaction(|db| Ok(db.insert_user(user))).await?;
        info!("Created user {} ({})", result.inserted_id, email);
        Ok(result)
    }

    pub async fn set_role(&self, user_id: &str, role: Role) -> Result<UpdateResult> {
        let result = self
            .store
            .transaction(|db| db.set_user_role(user_id, role).ok_or_else(AppError::user_not_found))
            .await?;
        info!("Set role of user {} to {:?}", user_id, role);
        Ok(result)
    }

    /// Whether the first user with `email` holds `role`
    pub async fn has_role(&self, email: &str, role: Role) -> bool {
        let db = self.store.read().await;
        db.find_user_by_email(email)
            .map(|u| u.role == Some(role))
            .unwrap_or(false)
    }
}
