//! Admin panel route handlers: login, catalog management, credentials.
//!
//! Only the login endpoint checks credentials; the remaining admin endpoints
//! are unauthenticated. Request bodies use the camelCase field names the
//! admin pages send.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use webshop_core::{ProductId, Username};

use crate::db::{CredentialRepository, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::models::product::{NewProduct, Product, ProductUpdate};
use crate::services::auth;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Login form; both fields are checked for presence by the handler so a
/// missing one yields a validation error, not a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Generic `{ success, message }` envelope.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Envelope for mutations that return the product.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

/// The stored admin username (the password never leaves the server).
#[derive(Debug, Serialize)]
pub struct CredentialsResponse {
    pub username: Username,
}

/// Body for changing the admin username.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUsernameRequest {
    pub new_username: Option<String>,
}

/// Body for changing the admin password.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

// =============================================================================
// Authentication
// =============================================================================

/// Check admin credentials.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<MessageResponse>> {
    let (Some(username), Some(password)) = (body.username, body.password) else {
        return Err(AppError::Validation(
            "Username and password are required".to_owned(),
        ));
    };

    let identity = CredentialRepository::new(state.pool())
        .verify(&username, &auth::hash_password(&password))
        .await?;

    // Same response whether the username or the password was wrong
    if identity.is_none() {
        return Err(AppError::Unauthorized("Invalid credentials".to_owned()));
    }

    Ok(Json(MessageResponse {
        success: true,
        message: "Login successful".to_owned(),
    }))
}

// =============================================================================
// Catalog Management
// =============================================================================

/// Create a product.
#[instrument(skip(state, body))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<NewProduct>,
) -> Result<Json<ProductResponse>> {
    let product = ProductRepository::new(state.pool()).create(&body).await?;
    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

/// Update an arbitrary subset of a product's fields.
#[instrument(skip(state, body))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductUpdate>,
) -> Result<Json<ProductResponse>> {
    if body.is_empty() {
        return Err(AppError::Validation("No fields to update".to_owned()));
    }

    let product = ProductRepository::new(state.pool())
        .update(id, &body)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product not found".to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<MessageResponse>> {
    let deleted = ProductRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Product not found".to_owned()));
    }

    Ok(Json(MessageResponse {
        success: true,
        message: "Product deleted successfully".to_owned(),
    }))
}

// =============================================================================
// Credential Management
// =============================================================================

/// Return the stored admin username.
#[instrument(skip(state))]
pub async fn credentials(State(state): State<AppState>) -> Result<Json<CredentialsResponse>> {
    let username = CredentialRepository::new(state.pool())
        .get_username()
        .await?
        .ok_or_else(|| AppError::NotFound("Admin credentials not found".to_owned()))?;

    Ok(Json(CredentialsResponse { username }))
}

/// Change the admin username.
#[instrument(skip(state, body))]
pub async fn update_username(
    State(state): State<AppState>,
    Json(body): Json<UpdateUsernameRequest>,
) -> Result<Json<MessageResponse>> {
    let Some(new_username) = body.new_username else {
        return Err(AppError::Validation("New username is required".to_owned()));
    };
    let username =
        Username::parse(&new_username).map_err(|e| AppError::Validation(e.to_string()))?;

    CredentialRepository::new(state.pool())
        .update_username(&username)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound("Admin credentials not found".to_owned())
            }
            other => AppError::Database(other),
        })?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Username updated successfully".to_owned(),
    }))
}

/// Change the admin password; the current password must be resupplied and
/// match before the new one is accepted.
#[instrument(skip(state, body))]
pub async fn update_password(
    State(state): State<AppState>,
    Json(body): Json<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let (Some(current), Some(new)) = (body.current_password, body.new_password) else {
        return Err(AppError::Validation(
            "Current password and new password are required".to_owned(),
        ));
    };
    auth::validate_new_password(&new).map_err(|e| AppError::Validation(e.to_string()))?;

    let repo = CredentialRepository::new(state.pool());
    let Some(id) = repo.verify_password(&auth::hash_password(&current)).await? else {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_owned(),
        ));
    };

    repo.update_password(id, &auth::hash_password(&new))
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound("Admin credentials not found".to_owned())
            }
            other => AppError::Database(other),
        })?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Password updated successfully".to_owned(),
    }))
}
