//! /api/products routes.

use crate::handlers::product::{
    create_product, delete_product, get_all_products, get_my_products, get_product_by_id, update_product,
};
use crate::routes::authed;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_products).merge(authed(post(create_product))))
        .route("/my", authed(get(get_my_products)))
        .route(
            "/:id",
            get(get_product_by_id)
                .merge(authed(put(update_product)))
                .merge(authed(delete(delete_product))),
        )
}
