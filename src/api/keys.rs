//! API key management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::api_key::{classify, is_well_formed, ApiKeyPatch, ApiKeyRecord, KeyType};
use crate::domain::DomainError;

/// Request to create a new API key
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: String,
    pub value: String,
}

/// Request to update an API key, absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApiKeyRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl From<UpdateApiKeyRequest> for ApiKeyPatch {
    fn from(req: UpdateApiKeyRequest) -> Self {
        Self {
            name: req.name,
            value: req.value,
        }
    }
}

/// API key as rendered by the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyResponse {
    pub id: String,
    pub name: String,
    pub value: String,
    pub key_type: KeyType,
    pub masked_value: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ApiKeyRecord> for ApiKeyResponse {
    fn from(record: &ApiKeyRecord) -> Self {
        Self {
            id: record.id().to_string(),
            name: record.name().to_string(),
            value: record.value().to_string(),
            key_type: record.key_type(),
            masked_value: record.masked_value(),
            created_at: record.created_at().to_rfc3339(),
            updated_at: record.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListApiKeysResponse {
    pub api_keys: Vec<ApiKeyResponse>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteApiKeyResponse {
    pub deleted: bool,
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateKeyRequest {
    pub key: String,
}

/// Pattern check result; says nothing about whether the key is issued
#[derive(Debug, Clone, Serialize)]
pub struct ValidateKeyResponse {
    pub valid: bool,
    pub key_type: KeyType,
}

/// Routes mounted under `/api`
pub fn create_keys_router() -> Router<AppState> {
    Router::new()
        .route("/keys", get(list_api_keys).post(create_api_key))
        .route(
            "/keys/{key_id}",
            get(get_api_key).put(update_api_key).delete(delete_api_key),
        )
        .route("/validate-key", post(validate_key))
}

fn key_not_found(key_id: &str) -> ApiError {
    DomainError::not_found(format!("API key '{}' not found", key_id)).into()
}

/// GET /api/keys
pub async fn list_api_keys(State(state): State<AppState>) -> Json<ListApiKeysResponse> {
    debug!("Listing API keys");

    let records = state.key_store.list_all().await;
    let api_keys: Vec<ApiKeyResponse> = records.iter().map(ApiKeyResponse::from).collect();
    let total = api_keys.len();

    Json(ListApiKeysResponse { api_keys, total })
}

/// POST /api/keys
pub async fn create_api_key(
    State(state): State<AppState>,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<ApiKeyResponse>), ApiError> {
    debug!(name = %request.name, "Creating API key");

    let created = state.key_store.create(request.name, request.value).await?;

    Ok((StatusCode::CREATED, Json(ApiKeyResponse::from(&created))))
}

/// GET /api/keys/{key_id}
pub async fn get_api_key(
    State(state): State<AppState>,
    Path(key_id): Path<String>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    debug!(key_id = %key_id, "Getting API key");

    let record = state
        .key_store
        .get_by_id(&key_id)
        .await?
        .ok_or_else(|| key_not_found(&key_id))?;

    Ok(Json(ApiKeyResponse::from(&record)))
}

/// PUT /api/keys/{key_id}
pub async fn update_api_key(
    State(state): State<AppState>,
    Path(key_id): Path<String>,
    Json(request): Json<UpdateApiKeyRequest>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    debug!(key_id = %key_id, "Updating API key");

    let record = state
        .key_store
        .update(&key_id, request.into())
        .await?
        .ok_or_else(|| key_not_found(&key_id))?;

    Ok(Json(ApiKeyResponse::from(&record)))
}

/// DELETE /api/keys/{key_id}
pub async fn delete_api_key(
    State(state): State<AppState>,
    Path(key_id): Path<String>,
) -> Result<Json<DeleteApiKeyResponse>, ApiError> {
    debug!(key_id = %key_id, "Deleting API key");

    if !state.key_store.delete(&key_id).await? {
        return Err(key_not_found(&key_id));
    }

    Ok(Json(DeleteApiKeyResponse {
        deleted: true,
        id: key_id,
    }))
}

/// POST /api/validate-key
pub async fn validate_key(Json(request): Json<ValidateKeyRequest>) -> Json<ValidateKeyResponse> {
    Json(ValidateKeyResponse {
        valid: is_well_formed(&request.key),
        key_type: classify(&request.key),
    })
}
