//! Session token issuance

use axum::extract::State;
use serde::Deserialize;
use tracing::info;

use super::extract::ApiJson;
use super::server::AppState;
use crate::error::Result;

#[derive(Deserialize)]
pub struct TokenRequest {
    pub email: String,
}

/// POST /jwt - Sign a token for the submitted email, returned as plain text
pub async fn issue_token(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TokenRequest>,
) -> Result<String> {
    let token = state.tokens.issue(&req.email)?;
    info!("Issued token for {}", req.email);
    Ok(token)
}
