use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::{info, warn};

use super::extract::{ApiJson, AuthUser};
use super::server::AppState;
use crate::error::Result;
use crate::gateway::PaymentIntent;
use crate::managers::PaymentOutcome;
use crate::models::{Enrollment, Payment, PaymentDetails};

#[derive(Deserialize)]
pub struct IntentRequest {
    pub price: f64,
}

/// POST /create-payment-intent
pub async fn create_payment_intent(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(req): ApiJson<IntentRequest>,
) -> Result<Json<PaymentIntent>> {
    info!("{} requested a payment intent for {}", caller.email(), req.price);
    Ok(Json(state.payments.create_payment_intent(req.price).await?))
}

/// POST /payments - Record a completed payment and enroll
pub async fn complete_payment(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(details): ApiJson<PaymentDetails>,
) -> Result<Json<PaymentOutcome>> {
    if caller.email() != details.user_email {
        warn!(
            "{} submitted a payment on behalf of {}",
            caller.email(),
            details.user_email
        );
    }
    Ok(Json(state.payments.complete(details).await?))
}

/// GET /payments - The caller's payment history
pub async fn list_payments(State(state): State<AppState>, caller: AuthUser) -> Json<Vec<Payment>> {
    Json(state.payments.history(caller.email()).await)
}

/// GET /enrolled-classes
pub async fn list_enrolled(State(state): State<AppState>, caller: AuthUser) -> Json<Vec<Enrollment>> {
    Json(state.enrollments.list_for_user(caller.email()).await)
}
