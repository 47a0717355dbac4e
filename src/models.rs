// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

// ========== USER ==========
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// None until an admin assigns a role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl From<NewUser> for User {
    fn from(req: NewUser) -> Self {
        Self {
            id: new_id(),
            name: req.name,
            email: req.email,
            photo: req.photo,
            role: req.role,
        }
    }
}

// ========== CLASS ==========
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassOffering {
    #[serde(rename = "_id")]
    pub id: String,
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_name: Option<String>,
    pub instructor_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub price: f64,
    /// Not floored at zero
    pub available_seats: i64,
    #[serde(default)]
    pub enroll: i64,
    #[serde(default)]
    pub status: ClassStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClass {
    pub class_name: String,
    #[serde(default)]
    pub instructor_name: Option<String>,
    pub instructor_email: String,
    #[serde(default)]
    pub image: Option<String>,
    pub price: f64,
    pub available_seats: i64,
}

impl From<NewClass> for ClassOffering {
    fn from(req: NewClass) -> Self {
        Self {
            id: new_id(),
            class_name: req.class_name,
            instructor_name: req.instructor_name,
            instructor_email: req.instructor_email,
            image: req.image,
            price: req.price,
            available_seats: req.available_seats,
            enroll: 0,
            status: ClassStatus::Pending,
            feedback: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassRequest {
    pub class_name: String,
    pub available_seats: i64,
    pub price: f64,
}

// ========== SELECTION ==========
/// Class fields copied onto selections, payments and enrollments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassSnapshot {
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(rename = "_id")]
    pub id: String,
    pub class_id: String,
    pub user_email: String,
    #[serde(flatten)]
    pub class: ClassSnapshot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSelection {
    pub class_id: String,
    pub user_email: String,
    #[serde(flatten)]
    pub class: ClassSnapshot,
}

impl From<NewSelection> for Selection {
    fn from(req: NewSelection) -> Self {
        Self {
            id: new_id(),
            class_id: req.class_id,
            user_email: req.user_email,
            class: req.class,
        }
    }
}

// ========== PAYMENT ==========
/// The purchased selection as submitted by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassItem {
    /// Selection id
    #[serde(rename = "_id")]
    pub id: String,
    /// Offering id
    pub class_id: String,
    #[serde(flatten)]
    pub class: ClassSnapshot,
    /// Any other fields the client sent with the item, kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub user_email: String,
    pub price: f64,
    pub transaction_id: String,
    pub class_item: ClassItem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_email: String,
    pub price: f64,
    pub transaction_id: String,
    pub class_item: ClassItem,
    pub date: DateTime<Utc>,
}

// ========== ENROLLMENT ==========
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_email: String,
    pub class_id: String,
    pub selection_id: String,
    pub payment_id: String,
    #[serde(flatten)]
    pub class: ClassSnapshot,
    pub enrolled_at: DateTime<Utc>,
}

// ========== WRITE RESULTS ==========
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertResult {
    pub fn new(inserted_id: impl Into<String>) -> Self {
        Self {
            acknowledged: true,
            inserted_id: inserted_id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateResult {
    pub fn matched(matched: bool, modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: matched as u64,
            modified_count: modified as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}
