//! Shop checkout: price the order from the catalog and hand off to hosted checkout.

use std::collections::BTreeMap;
use std::sync::Arc;

use alumni_config::{PaymentsConfig, ShopConfig};
use alumni_database::{
    non_blank, normalize_email, CartRepository, NewShopOrder, OrderLine, OrderRepository,
    ProductRepository, ShopOrder,
};
use alumni_payments::{CheckoutLineItem, CheckoutRequest, PaymentProvider};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::pricing::CartTotals;
use crate::services::cart_service::validate_line;
use crate::types::{
    CheckoutItem, ShopCheckoutRequest, ShopCheckoutResponse, ShopError, ShopResult,
};

pub struct CheckoutService {
    products: ProductRepository,
    carts: CartRepository,
    orders: OrderRepository,
    provider: Arc<dyn PaymentProvider>,
    payments: PaymentsConfig,
    shop: ShopConfig,
}

impl CheckoutService {
    pub fn new(
        pool: SqlitePool,
        provider: Arc<dyn PaymentProvider>,
        payments: PaymentsConfig,
        shop: ShopConfig,
    ) -> Self {
        Self {
            products: ProductRepository::new(pool.clone()),
            carts: CartRepository::new(pool.clone()),
            orders: OrderRepository::new(pool),
            provider,
            payments,
            shop,
        }
    }

    pub async fn checkout(&self, request: ShopCheckoutRequest) -> ShopResult<ShopCheckoutResponse> {
        let customer_name = non_blank(&request.customer_name)
            .ok_or_else(|| ShopError::validation("Name is required"))?;
        let customer_email = normalize_email(&request.customer_email)
            .ok_or_else(|| ShopError::validation("Invalid email format"))?;
        let cart_session = request.session_id.as_deref().and_then(non_blank);

        let items = if request.items.is_empty() {
            match &cart_session {
                Some(session_id) => self.cart_items(session_id).await?,
                None => Vec::new(),
            }
        } else {
            request.items
        };
        if items.is_empty() {
            return Err(ShopError::EmptyCart);
        }

        let lines = self.price_lines(items).await?;
        let totals = CartTotals::compute(
            lines.iter().map(|line| (line.unit_price_cents, line.quantity)),
            &self.shop,
        )?;

        let mut line_items: Vec<CheckoutLineItem> = lines
            .iter()
            .map(|line| CheckoutLineItem {
                name: describe(line),
                unit_amount_cents: line.unit_price_cents,
                quantity: line.quantity,
            })
            .collect();
        if totals.shipping_cents() > 0 {
            line_items.push(CheckoutLineItem {
                name: "Shipping".to_string(),
                unit_amount_cents: totals.shipping_cents(),
                quantity: 1,
            });
        }

        let base = self.payments.public_base_url.trim_end_matches('/');
        let mut metadata = BTreeMap::new();
        metadata.insert("order_type".to_string(), "shop".to_string());
        metadata.insert("customer_email".to_string(), customer_email.clone());

        let session = self
            .provider
            .create_checkout_session(CheckoutRequest {
                line_items,
                currency: self.payments.currency.clone(),
                success_url: format!("{base}/shop/success?session_id={{CHECKOUT_SESSION_ID}}"),
                cancel_url: format!("{base}/cart"),
                customer_email: Some(customer_email.clone()),
                metadata,
            })
            .await?;

        let order = self
            .orders
            .create(&NewShopOrder {
                session_id: session.session_id.clone(),
                customer_name,
                customer_email,
                customer_address: request.customer_address.trim().to_string(),
                items: lines,
                subtotal_cents: totals.subtotal_cents(),
                shipping_cents: totals.shipping_cents(),
                total_cents: totals.total_cents(),
            })
            .await?;

        if let Some(session_id) = &cart_session {
            if let Err(error) = self.carts.clear(session_id).await {
                warn!(session_id = %session_id, error = %error, "failed to clear cart after checkout");
            }
        }

        info!(
            order_id = %order.id,
            checkout_session = %session.session_id,
            total_cents = order.total_cents,
            "shop checkout started"
        );

        Ok(ShopCheckoutResponse {
            checkout_url: session.url,
            session_id: session.session_id,
            order_id: order.id,
            totals,
        })
    }

    pub async fn list_orders(&self) -> ShopResult<Vec<ShopOrder>> {
        Ok(self.orders.list().await?)
    }

    async fn cart_items(&self, session_id: &str) -> ShopResult<Vec<CheckoutItem>> {
        let lines = self.carts.lines(session_id).await?;
        Ok(lines
            .into_iter()
            .map(|line| CheckoutItem {
                product_id: line.product_id,
                quantity: line.quantity,
                size: line.size,
                color: line.color,
            })
            .collect())
    }

    async fn price_lines(&self, items: Vec<CheckoutItem>) -> ShopResult<Vec<OrderLine>> {
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let product = self
                .products
                .find_by_id(&item.product_id)
                .await?
                .ok_or_else(|| ShopError::ProductNotFound {
                    id: item.product_id.clone(),
                })?;
            let size = item.size.as_deref().and_then(non_blank);
            let color = item.color.as_deref().and_then(non_blank);
            validate_line(&product, item.quantity, size.as_deref(), color.as_deref())?;

            lines.push(OrderLine {
                product_id: product.id,
                product_name: product.name,
                unit_price_cents: product.price_cents,
                quantity: item.quantity,
                size,
                color,
            });
        }
        Ok(lines)
    }
}

fn describe(line: &OrderLine) -> String {
    let variant: Vec<&str> = [line.size.as_deref(), line.color.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if variant.is_empty() {
        line.product_name.clone()
    } else {
        format!("{} ({})", line.product_name, variant.join(", "))
    }
}
