use crate::models::Enrollment;
use crate::state::SharedStore;

/// Finalized enrollments; written only by the payment workflow
#[derive(Clone)]
pub struct EnrollmentLedger {
    store: SharedStore,
}

impl EnrollmentLedger {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list_for_user(&self, email: &str) -> Vec<Enrollment> {
        self.store
            .read()
            .await
            .enrollments
            .iter()
            .filter(|e| e.user_email == email)
            .cloned()
            .collect()
    }
}
