//! # Alumni Shop Crate
//!
//! Merchandise catalog, carts keyed by an anonymous client session id, cart
//! totals with the shipping rule, and the handoff of an order to hosted checkout.

pub mod pricing;
pub mod services;
pub mod types;

pub use pricing::{cents_to_decimal, decimal_to_cents, CartTotals};
pub use services::{CartService, CatalogService, CheckoutService};
pub use types::{
    AddToCartRequest, Cart, CheckoutItem, CreateProductRequest, ShopCheckoutRequest,
    ShopCheckoutResponse, ShopError, ShopResult,
};
