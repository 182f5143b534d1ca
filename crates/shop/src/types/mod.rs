pub mod errors;
pub mod requests;

pub use errors::{ShopError, ShopResult};
pub use requests::{
    AddToCartRequest, Cart, CheckoutItem, CreateProductRequest, ShopCheckoutRequest,
    ShopCheckoutResponse,
};
