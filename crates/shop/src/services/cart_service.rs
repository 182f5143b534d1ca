//! Carts keyed by an anonymous client session id.

use alumni_config::ShopConfig;
use alumni_database::{
    non_blank, CartItem, CartRepository, DatabaseError, NewCartItem, Product, ProductRepository,
};
use sqlx::SqlitePool;
use tracing::info;

use crate::pricing::CartTotals;
use crate::types::{AddToCartRequest, Cart, ShopError, ShopResult};

pub const MAX_LINE_QUANTITY: i64 = 99;

#[derive(Clone)]
pub struct CartService {
    carts: CartRepository,
    products: ProductRepository,
    config: ShopConfig,
}

impl CartService {
    pub fn new(pool: SqlitePool, config: ShopConfig) -> Self {
        Self {
            carts: CartRepository::new(pool.clone()),
            products: ProductRepository::new(pool),
            config,
        }
    }

    pub async fn add_item(&self, request: AddToCartRequest) -> ShopResult<CartItem> {
        let session_id = require_session(&request.session_id)?;
        let product = self
            .products
            .find_by_id(&request.product_id)
            .await?
            .ok_or_else(|| ShopError::ProductNotFound {
                id: request.product_id.clone(),
            })?;

        let size = request.size.as_deref().and_then(non_blank);
        let color = request.color.as_deref().and_then(non_blank);
        validate_line(&product, request.quantity, size.as_deref(), color.as_deref())?;

        let item = self
            .carts
            .add(
                &NewCartItem {
                    session_id,
                    product_id: product.id,
                    quantity: request.quantity,
                    size,
                    color,
                },
                MAX_LINE_QUANTITY,
            )
            .await
            .map_err(|error| match error {
                DatabaseError::Conflict(_) => ShopError::validation(format!(
                    "A cart line cannot hold more than {MAX_LINE_QUANTITY} units"
                )),
                other => other.into(),
            })?;

        info!(session_id = %item.session_id, product_id = %item.product_id, quantity = item.quantity, "cart updated");
        Ok(item)
    }

    pub async fn get_cart(&self, session_id: &str) -> ShopResult<Cart> {
        let session_id = require_session(session_id)?;
        let items = self.carts.lines(&session_id).await?;
        let totals = CartTotals::compute(
            items
                .iter()
                .map(|line| (line.product_price_cents, line.quantity)),
            &self.config,
        )?;
        Ok(Cart {
            session_id,
            items,
            totals,
        })
    }

    pub async fn remove_item(&self, session_id: &str, item_id: &str) -> ShopResult<()> {
        match self.carts.remove(session_id, item_id).await {
            Ok(()) => Ok(()),
            Err(DatabaseError::NotFound(_)) => Err(ShopError::CartItemNotFound {
                id: item_id.to_string(),
            }),
            Err(other) => Err(other.into()),
        }
    }

    pub async fn clear(&self, session_id: &str) -> ShopResult<u64> {
        let session_id = require_session(session_id)?;
        Ok(self.carts.clear(&session_id).await?)
    }
}

fn require_session(session_id: &str) -> ShopResult<String> {
    non_blank(session_id).ok_or_else(|| ShopError::validation("Session id is required"))
}

/// Quantity bounds plus variant checks. A product that offers sizes or colours
/// requires one of them to be chosen.
pub(crate) fn validate_line(
    product: &Product,
    quantity: i64,
    size: Option<&str>,
    color: Option<&str>,
) -> ShopResult<()> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(ShopError::validation(format!(
            "Quantity must be between 1 and {MAX_LINE_QUANTITY}"
        )));
    }
    if size.is_none() && !product.sizes_available.is_empty() {
        return Err(ShopError::validation("Please select a size"));
    }
    if !product.offers_size(size) {
        return Err(ShopError::validation(format!(
            "Size {} is not available for {}",
            size.unwrap_or_default(),
            product.name
        )));
    }
    if color.is_none() && !product.colors_available.is_empty() {
        return Err(ShopError::validation("Please select a color"));
    }
    if !product.offers_color(color) {
        return Err(ShopError::validation(format!(
            "Color {} is not available for {}",
            color.unwrap_or_default(),
            product.name
        )));
    }
    Ok(())
}
