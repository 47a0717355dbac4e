use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::gateway::{amount_in_cents, PaymentGateway, PaymentIntent};
use crate::models::{new_id, DeleteResult, Enrollment, InsertResult, Payment, PaymentDetails};
use crate::state::SharedStore;

/// Outcome of the payment, enrollment and selection-removal steps
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub payment_result: InsertResult,
    pub enrollment_result: InsertResult,
    pub delete_result: DeleteResult,
}

/// Turns a paid selection into an enrollment
#[derive(Clone)]
pub struct PaymentWorkflow {
    store: SharedStore,
    gateway: Option<Arc<dyn PaymentGateway>>,
}

impl PaymentWorkflow {
    pub fn new(store: SharedStore, gateway: Option<Arc<dyn PaymentGateway>>) -> Self {
        Self { store, gateway }
    }

    pub async fn create_payment_intent(&self, price: f64) -> Result<PaymentIntent> {
        let amount = amount_in_cents(price)?;
        let gateway = self.gateway.as_ref().ok_or_else(|| AppError::Gateway {
            message: "payment gateway not configured".to_string(),
        })?;
        gateway.create_payment_intent(amount).await
    }

    /// Record the payment and move the selection into the enrollment ledger.
    ///
    /// All steps run in one store transaction. The class id is not checked:
    /// for an unknown class the counter updates match nothing while the
    /// payment and enrollment are still recorded.
    pub async fn complete(&self, details: PaymentDetails) -> Result<PaymentOutcome> {
        let now = chrono::Utc::now();
        let class_id = details.class_item.class_id.clone();
        let selection_id = details.class_item.id.clone();
        let email = details.user_email.clone();

        let payment = Payment {
            id: new_id(),
            user_email: details.user_email.clone(),
            price: details.price,
            transaction_id: details.transaction_id.clone(),
            class_item: details.class_item.clone(),
            date: now,
        };
        let enrollment = Enrollment {
            id: new_id(),
            user_email: details.user_email,
            class_id: class_id.clone(),
            selection_id: selection_id.clone(),
            payment_id: payment.id.clone(),
            class: details.class_item.class,
            enrolled_at: now,
        };

        let (outcome, matched) = self
            .store
            .transaction(|db| {
                let payment_result = db.insert_payment(payment);
                let enrolled = db.increment_enroll(&class_id, 1);
                let enrollment_result = db.insert_enrollment(enrollment);
                db.adjust_seats(&class_id, -1);
                let delete_result = db.delete_selection(&selection_id);

                Ok((
                    PaymentOutcome {
                        payment_result,
                        enrollment_result,
                        delete_result,
                    },
                    enrolled.matched_count,
                ))
            })
            .await?;

        if matched == 0 {
            warn!("Payment by {} references unknown class {}", email, class_id);
        }
        if outcome.delete_result.deleted_count == 0 {
            warn!("Payment by {} found no selection {}", email, selection_id);
        }
        info!(
            "{} paid for class {} (payment {})",
            email, class_id, outcome.payment_result.inserted_id
        );

        Ok(outcome)
    }

    /// The caller's payments, newest first
    pub async fn history(&self, email: &str) -> Vec<Payment> {
        let mut payments: Vec<Payment> = self
            .store
            .read()
            .await
            .payments
            .iter()
            .filter(|p| p.user_email == email)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.date.cmp(&a.date));
        payments
    }
}
