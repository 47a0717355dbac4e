//! Payment gateway client (Stripe-compatible payment intents)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{AppError, Result};

/// Client secret the frontend uses to confirm the card payment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub client_secret: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for `amount_cents` (USD)
    async fn create_payment_intent(&self, amount_cents: i64) -> Result<PaymentIntent>;
}

/// Largest amount the gateway accepts for a single intent ($999,999.99)
pub const MAX_AMOUNT_CENTS: i64 = 99_999_999;

/// Convert a price in dollars to the gateway's integer amount
pub fn amount_in_cents(price: f64) -> Result<i64> {
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::BadRequest {
            message: format!("invalid price: {}", price),
        });
    }

    let cents = (price * 100.0).round();
    if cents > MAX_AMOUNT_CENTS as f64 {
        return Err(AppError::BadRequest {
            message: format!("price {} exceeds the maximum charge", price),
        });
    }
    Ok(cents as i64)
}

/// Gateway configuration
#[derive(Clone)]
pub struct StripeGateway {
    pub secret_key: String,
    pub api_base: String,
    pub http_client: reqwest::Client,
}

/// Stripe's intent response (only the field we need)
#[derive(Deserialize)]
struct IntentResponse {
    client_secret: String,
}

impl StripeGateway {
    pub fn new(secret_key: String, api_base: String) -> Self {
        Self {
            secret_key,
            api_base,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Option<Self> {
        let secret_key = std::env::var("PAYMENT_SECRET_KEY").ok()?;
        let api_base = std::env::var("PAYMENT_API_BASE")
            .unwrap_or_else(|_| "https://api.stripe.com".to_string());

        Some(Self::new(secret_key, api_base))
    }

    fn intents_url(&self) -> String {
        format!("{}/v1/payment_intents", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(&self, amount_cents: i64) -> Result<PaymentIntent> {
        let amount = amount_cents.to_string();
        let response = self
            .http_client
            .post(self.intents_url())
            .bearer_auth(&self.secret_key)
            .form(&[
                ("amount", amount.as_str()),
                ("currency", "usd"),
                ("payment_method_types[]", "card"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Payment intent creation failed: {} - {}", status, error_text);
            return Err(AppError::Gateway {
                message: format!("gateway responded with {}", status),
            });
        }

        let intent: IntentResponse = response.json().await?;
        info!("Created payment intent for {} cents", amount_cents);

        Ok(PaymentIntent {
            client_secret: intent.client_secret,
        })
    }
}
