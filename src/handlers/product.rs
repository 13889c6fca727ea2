//! Product handlers: list, list own, read, create, update, delete.

use crate::error::AppError;
use crate::extractors::{Caller, Payload};
use crate::handlers::ensure_owner;
use crate::models::{CreateProductRequest, UpdateProductRequest};
use crate::response::{created, ok};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

#[tracing::instrument(name = "get_all_products", skip_all)]
pub async fn get_all_products(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = state.repo.list_products().await?;
    Ok(ok(products))
}

#[tracing::instrument(name = "get_my_products", skip_all)]
pub async fn get_my_products(
    State(state): State<AppState>,
    Caller(user_id): Caller,
) -> Result<impl IntoResponse, AppError> {
    let products = state.repo.products_by_user(&user_id).await?;
    Ok(ok(products))
}

#[tracing::instrument(name = "get_product_by_id", skip(state))]
pub async fn get_product_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = state
        .repo
        .product_detail(&id)
        .await?
        .ok_or(AppError::NotFound("Product"))?;
    Ok(ok(product))
}

#[tracing::instrument(name = "create_product", skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Payload(body): Payload<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_product = body.into_new_product(user_id).ok_or_else(AppError::missing_fields)?;
    let product = state.repo.create_product(new_product).await?;
    tracing::info!(product_id = %product.id, user_id = %product.user_id, "product created");
    Ok(created(product))
}

#[tracing::instrument(name = "update_product", skip(state, user_id, body))]
pub async fn update_product(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(id): Path<String>,
    Payload(body): Payload<UpdateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    let existing = state.repo.product_by_id(&id).await?.ok_or(AppError::NotFound("Product"))?;
    ensure_owner(&existing.user_id, &user_id)?;
    let product = state
        .repo
        .update_product(&id, body.into_changes())
        .await?
        .ok_or(AppError::NotFound("Product"))?;
    Ok(ok(product))
}

#[tracing::instrument(name = "delete_product", skip(state, user_id))]
pub async fn delete_product(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let existing = state.repo.product_by_id(&id).await?.ok_or(AppError::NotFound("Product"))?;
    ensure_owner(&existing.user_id, &user_id)?;
    let product = state.repo.delete_product(&id).await?.ok_or(AppError::NotFound("Product"))?;
    tracing::info!(product_id = %product.id, "product deleted");
    Ok(ok(product))
}
