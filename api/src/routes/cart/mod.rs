//! Cart and purchase routes. Everything here is authenticated; the auth gate
//! resolves the caller before any handler runs.

pub mod get;
pub mod post;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;
use get::get_cart;
use post::{add_to_cart, purchase, remove_from_cart};

/// Builds the cart/purchase route group.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(get_cart))
        .route("/cart/add", post(add_to_cart))
        .route("/cart/remove", post(remove_from_cart))
        .route("/purchase", post(purchase))
}
