use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{ClassOffering, ClassStatus, InsertResult, NewClass, UpdateClassRequest, UpdateResult};
use crate::state::SharedStore;

pub const POPULAR_LIMIT: usize = 6;

/// Class offerings created by instructors and moderated by admins
#[derive(Clone)]
pub struct ClassCatalog {
    store: SharedStore,
}

impl ClassCatalog {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Vec<ClassOffering> {
        self.store.read().await.classes.clone()
    }

    pub async fn list_approved(&self) -> Vec<ClassOffering> {
        self.store
            .read()
            .await
            .classes
            .iter()
            .filter(|c| c.status == ClassStatus::Approved)
            .cloned()
            .collect()
    }

    pub async fn list_by_instructor(&self, email: &str) -> Vec<ClassOffering> {
        self.store
            .read()
            .await
            .classes
            .iter()
            .filter(|c| c.instructor_email == email)
            .cloned()
            .collect()
    }

    /// Approved classes with the most enrollments first
    pub async fn list_popular(&self, limit: usize) -> Vec<ClassOffering> {
        let mut classes = self.list_approved().await;
        classes.sort_by(|a, b| b.enroll.cmp(&a.enroll));
        classes.truncate(limit);
        classes
    }

    pub async fn get(&self, class_id: &str) -> Result<ClassOffering> {
        self.store
            .read()
            .await
            .find_class(class_id)
            .cloned()
            .ok_or_else(AppError::class_not_found)
    }

    pub async fn create(&self, req: NewClass) -> Result<InsertResult> {
        let offering = ClassOffering::from(req);
        let name = offering.class_name.clone();
        let result = self.store.transaction(|db| Ok(db.insert_class(offering))).await?;
        info!("Created class '{}' ({})", name, result.inserted_id);
        Ok(result)
    }

    pub async fn update(&self, class_id: &str, update: UpdateClassRequest) -> Result<UpdateResult> {
        self.store
            .transaction(|db| {
                db.update_class(class_id, &update)
                    .ok_or_else(AppError::class_not_found)
            })
            .await
    }

    pub async fn set_status(&self, class_id: &str, status: ClassStatus) -> Result<UpdateResult> {
        let result = self
            .store
            .transaction(|db| {
                db.set_class_status(class_id, status)
                    .ok_or_else(AppError::class_not_found)
            })
            .await?;
        info!("Class {} is now {:?}", class_id, status);
        Ok(result)
    }

    pub async fn set_feedback(&self, class_id: &str, feedback: &str) -> Result<UpdateResult> {
        self.store
            .transaction(|db| {
                db.set_class_feedback(class_id, feedback)
                    .ok_or_else(AppError::class_not_found)
            })
            .await
    }

    pub async fn increment_enroll(&self, class_id: &str, delta: i64) -> Result<UpdateResult> {
        self.store
            .transaction(|db| Ok(db.increment_enroll(class_id, delta)))
            .await
    }

    pub async fn adjust_seats(&self, class_id: &str, delta: i64) -> Result<UpdateResult> {
        self.store
            .transaction(|db| Ok(db.adjust_seats(class_id, delta)))
            .await
    }
}
