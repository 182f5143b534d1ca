//! Merchandise catalog, cart and shop checkout endpoints

use std::sync::Arc;

use alumni_database::{CartItem, CartLine, Product, ShopOrder};
use alumni_shop::{
    cents_to_decimal, AddToCartRequest, Cart, CartTotals, CreateProductRequest,
    ShopCheckoutRequest, ShopCheckoutResponse,
};
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ErrorResponse, GatewayResult};
use crate::rest::health::MessageResponse;
use crate::state::GatewayState;

/// A catalog product with its price in currency units.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub price: Decimal,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            price: cents_to_decimal(product.price_cents),
            product,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartLineResponse {
    #[serde(flatten)]
    pub line: CartLine,
    pub product_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub session_id: String,
    pub items: Vec<CartLineResponse>,
    #[serde(flatten)]
    pub totals: CartTotals,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            session_id: cart.session_id,
            items: cart
                .items
                .into_iter()
                .map(|line| CartLineResponse {
                    product_price: cents_to_decimal(line.product_price_cents),
                    line_total: cents_to_decimal(line.line_total_cents()),
                    line,
                })
                .collect(),
            totals: cart.totals,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartItemAdded {
    pub message: String,
    pub item: CartItem,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartCleared {
    pub message: String,
    pub removed: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductListQuery {
    /// `apparel`, `accessories` or `other`.
    pub category: Option<String>,
}

pub fn create_shop_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/:product_id", get(get_product))
        .route("/api/cart/add", post(add_to_cart))
        .route("/api/cart/:session_id", get(get_cart).delete(clear_cart))
        .route("/api/cart/:session_id/item/:item_id", delete(remove_cart_item))
        .route("/api/shop/checkout", post(shop_checkout))
        .route("/api/shop/orders", get(list_orders))
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Shop",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Active products ordered by name"),
        (status = 400, description = "Unknown category", body = ErrorResponse)
    )
)]
pub async fn list_products(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<ProductListQuery>,
) -> GatewayResult<Json<Vec<ProductResponse>>> {
    let products = state
        .catalog_service
        .list_products(query.category.as_deref())
        .await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Shop",
    responses(
        (status = 200, description = "Product created"),
        (status = 400, description = "Invalid product", body = ErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<CreateProductRequest>,
) -> GatewayResult<Json<ProductResponse>> {
    let product = state.catalog_service.create_product(payload).await?;
    Ok(Json(product.into()))
}

#[utoipa::path(
    get,
    path = "/api/products/{product_id}",
    tag = "Shop",
    params(("product_id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product details"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<Arc<GatewayState>>,
    Path(product_id): Path<String>,
) -> GatewayResult<Json<ProductResponse>> {
    let product = state.catalog_service.get_product(&product_id).await?;
    Ok(Json(product.into()))
}

#[utoipa::path(
    post,
    path = "/api/cart/add",
    tag = "Shop",
    responses(
        (status = 200, description = "Line added or merged into an identical line"),
        (status = 400, description = "Invalid quantity or variant", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn add_to_cart(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<AddToCartRequest>,
) -> GatewayResult<Json<CartItemAdded>> {
    let item = state.cart_service.add_item(payload).await?;
    Ok(Json(CartItemAdded {
        message: "Item added to cart".to_string(),
        item,
    }))
}

#[utoipa::path(
    get,
    path = "/api/cart/{session_id}",
    tag = "Shop",
    params(("session_id" = String, Path, description = "Browser cart session")),
    responses((status = 200, description = "Cart lines with subtotal, shipping and total"))
)]
pub async fn get_cart(
    State(state): State<Arc<GatewayState>>,
    Path(session_id): Path<String>,
) -> GatewayResult<Json<CartResponse>> {
    let cart = state.cart_service.get_cart(&session_id).await?;
    Ok(Json(cart.into()))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{session_id}/item/{item_id}",
    tag = "Shop",
    params(
        ("session_id" = String, Path, description = "Browser cart session"),
        ("item_id" = String, Path, description = "Cart line id")
    ),
    responses(
        (status = 200, description = "Line removed", body = MessageResponse),
        (status = 404, description = "Line not in this cart", body = ErrorResponse)
    )
)]
pub async fn remove_cart_item(
    State(state): State<Arc<GatewayState>>,
    Path((session_id, item_id)): Path<(String, String)>,
) -> GatewayResult<Json<MessageResponse>> {
    state.cart_service.remove_item(&session_id, &item_id).await?;
    Ok(Json(MessageResponse::new("Item removed from cart")))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{session_id}",
    tag = "Shop",
    params(("session_id" = String, Path, description = "Browser cart session")),
    responses((status = 200, description = "Cart emptied", body = CartCleared))
)]
pub async fn clear_cart(
    State(state): State<Arc<GatewayState>>,
    Path(session_id): Path<String>,
) -> GatewayResult<Json<CartCleared>> {
    let removed = state.cart_service.clear(&session_id).await?;
    Ok(Json(CartCleared {
        message: "Cart cleared".to_string(),
        removed,
    }))
}

#[utoipa::path(
    post,
    path = "/api/shop/checkout",
    tag = "Shop",
    responses(
        (status = 200, description = "Hosted checkout URL for the order"),
        (status = 400, description = "Invalid customer, empty cart or invalid line", body = ErrorResponse),
        (status = 502, description = "Payment provider failed", body = ErrorResponse),
        (status = 503, description = "Payments not configured", body = ErrorResponse)
    )
)]
pub async fn shop_checkout(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<ShopCheckoutRequest>,
) -> GatewayResult<Json<ShopCheckoutResponse>> {
    let response = state.checkout_service.checkout(payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/shop/orders",
    tag = "Shop",
    responses((status = 200, description = "Recorded shop orders, newest first"))
)]
pub async fn list_orders(
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<ShopOrder>>> {
    Ok(Json(state.checkout_service.list_orders().await?))
}
