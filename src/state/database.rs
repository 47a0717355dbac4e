use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AppError, Result};
use crate::models::{
    ClassOffering, ClassStatus, DeleteResult, Enrollment, InsertResult, Payment, Role, Selection,
    UpdateClassRequest, UpdateResult, User,
};

const SCHEMA_VERSION: u32 = 1;

/// All collections of the enrollment platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    /// Schema version for migrations
    pub version: u32,

    /// Last update timestamp
    pub last_updated: u64,

    #[serde(default)]
    pub users: Vec<User>,

    #[serde(default)]
    pub classes: Vec<ClassOffering>,

    #[serde(default)]
    pub selections: Vec<Selection>,

    #[serde(default)]
    pub payments: Vec<Payment>,

    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            last_updated: current_timestamp(),
            users: Vec::new(),
            classes: Vec::new(),
            selections: Vec::new(),
            payments: Vec::new(),
            enrollments: Vec::new(),
        }
    }
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file, or create new if not exists
    pub async fn load(path: &str) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|e| AppError::StateParse {
                path: path.to_string(),
                source: e,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(AppError::StateLoad {
                path: path.to_string(),
                source: e,
            }),
        }
    }

    /// Save to a JSON file atomically
    pub async fn save(&self, path: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;

        // Write to temp file first, then rename for atomicity
        let temp_path = format!("{}.tmp", path);
        tokio::fs::write(&temp_path, &content)
            .await
            .map_err(|e| AppError::StateSave {
                path: path.to_string(),
                source: e,
            })?;

        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(|e| AppError::StateSave {
                path: path.to_string(),
                source: e,
            })?;

        Ok(())
    }

    pub fn touch(&mut self) {
        self.last_updated = current_timestamp();
    }

    // ----- users -----

    pub fn insert_user(&mut self, user: User) -> InsertResult {
        let result = InsertResult::new(&user.id);
        self.users.push(user);
        result
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn set_user_role(&mut self, user_id: &str, role: Role) -> Option<UpdateResult> {
        let user = self.users.iter_mut().find(|u| u.id == user_id)?;
        let modified = user.role != Some(role);
        user.role = Some(role);
        Some(UpdateResult::matched(true, modified))
    }

    // ----- classes -----

    pub fn insert_class(&mut self, offering: ClassOffering) -> InsertResult {
        let result = InsertResult::new(&offering.id);
        self.classes.push(offering);
        result
    }

    pub fn find_class(&self, class_id: &str) -> Option<&ClassOffering> {
        self.classes.iter().find(|c| c.id == class_id)
    }

    fn find_class_mut(&mut self, class_id: &str) -> Option<&mut ClassOffering> {
        self.classes.iter_mut().find(|c| c.id == class_id)
    }

    pub fn update_class(&mut self, class_id: &str, update: &UpdateClassRequest) -> Option<UpdateResult> {
        let class = self.find_class_mut(class_id)?;
        let modified = class.class_name != update.class_name
            || class.available_seats != update.available_seats
            || class.price != update.price;
        class.class_name = update.class_name.clone();
        class.available_seats = update.available_seats;
        class.price = update.price;
        Some(UpdateResult::matched(true, modified))
    }

    pub fn set_class_status(&mut self, class_id: &str, status: ClassStatus) -> Option<UpdateResult> {
        let class = self.find_class_mut(class_id)?;
        let modified = class.status != status;
        class.status = status;
        Some(UpdateResult::matched(true, modified))
    }

    pub fn set_class_feedback(&mut self, class_id: &str, feedback: &str) -> Option<UpdateResult> {
        let class = self.find_class_mut(class_id)?;
        let modified = class.feedback.as_deref() != Some(feedback);
        class.feedback = Some(feedback.to_string());
        Some(UpdateResult::matched(true, modified))
    }

    /// Unconditional increment of the enrollment counter
    pub fn increment_enroll(&mut self, class_id: &str, delta: i64) -> UpdateResult {
        match self.find_class_mut(class_id) {
            Some(class) => {
                class.enroll += delta;
                UpdateResult::matched(true, delta != 0)
            }
            None => UpdateResult::matched(false, false),
        }
    }

    /// Unconditional seat adjustment; seats may go negative
    pub fn adjust_seats(&mut self, class_id: &str, delta: i64) -> UpdateResult {
        match self.find_class_mut(class_id) {
            Some(class) => {
                class.available_seats += delta;
                UpdateResult::matched(true, delta != 0)
            }
            None => UpdateResult::matched(false, false),
        }
    }

    // ----- selections -----

    /// Insert a selection, rejecting a second one for the same (class, user) pair
    pub fn insert_selection(&mut self, selection: Selection) -> Result<InsertResult> {
        let exists = self
            .selections
            .iter()
            .any(|s| s.class_id == selection.class_id && s.user_email == selection.user_email);
        if exists {
            return Err(AppError::DuplicateSelection);
        }

        let result = InsertResult::new(&selection.id);
        self.selections.push(selection);
        Ok(result)
    }

    pub fn delete_selection(&mut self, selection_id: &str) -> DeleteResult {
        let before = self.selections.len();
        self.selections.retain(|s| s.id != selection_id);
        DeleteResult::new((before - self.selections.len()) as u64)
    }

    // ----- payments & enrollments -----

    pub fn insert_payment(&mut self, payment: Payment) -> InsertResult {
        let result = InsertResult::new(&payment.id);
        self.payments.push(payment);
        result
    }

    pub fn insert_enrollment(&mut self, enrollment: Enrollment) -> InsertResult {
        let result = InsertResult::new(&enrollment.id);
        self.enrollments.push(enrollment);
        result
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
