//! Catalog, cart and checkout flows against a throwaway database.

use std::str::FromStr;
use std::sync::Arc;

use alumni_config::{DatabaseConfig, PaymentsConfig, ShopConfig};
use alumni_database::{initialize_database, OrderRepository, Product, TransactionStatus};
use alumni_payments::test_support::RecordingProvider;
use alumni_shop::{
    AddToCartRequest, CartService, CatalogService, CheckoutItem, CheckoutService,
    CreateProductRequest, ShopCheckoutRequest, ShopError,
};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn create_test_pool() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}", temp_dir.path().join("shop.db").display()),
        max_connections: 4,
        busy_timeout_ms: 5_000,
    };
    (initialize_database(&config).await.unwrap(), temp_dir)
}

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

async fn create_product(pool: &SqlitePool, name: &str, price: &str, sizes: &[&str]) -> Product {
    CatalogService::new(pool.clone())
        .create_product(CreateProductRequest {
            name: name.to_string(),
            description: String::new(),
            category: "apparel".to_string(),
            price: dec(price),
            image_url: None,
            sizes_available: sizes.iter().map(|s| s.to_string()).collect(),
            colors_available: vec![],
            stock_quantity: 10,
            printful_url: None,
        })
        .await
        .unwrap()
}

fn add(session: &str, product: &Product, quantity: i64, size: Option<&str>) -> AddToCartRequest {
    AddToCartRequest {
        session_id: session.to_string(),
        product_id: product.id.clone(),
        quantity,
        size: size.map(str::to_string),
        color: None,
    }
}

#[tokio::test]
async fn catalog_filters_by_category_and_rejects_unknown_ones() {
    let (pool, _dir) = create_test_pool().await;
    let tee = create_product(&pool, "Alumni Tee", "25.00", &["S", "M"]).await;
    assert_eq!(tee.price_cents, 2_500);

    let catalog = CatalogService::new(pool);
    assert_eq!(catalog.list_products(Some("apparel")).await.unwrap().len(), 1);
    assert!(catalog.list_products(Some("accessories")).await.unwrap().is_empty());
    assert!(matches!(
        catalog.list_products(Some("furniture")).await,
        Err(ShopError::Validation { .. })
    ));
    assert!(matches!(
        catalog.get_product("missing").await,
        Err(ShopError::ProductNotFound { .. })
    ));
}

#[tokio::test]
async fn identical_lines_merge_and_totals_follow_the_shipping_rule() {
    let (pool, _dir) = create_test_pool().await;
    let cap = create_product(&pool, "Alumni Cap", "30.00", &[]).await;
    let carts = CartService::new(pool, ShopConfig::default());

    carts.add_item(add("sess-1", &cap, 1, None)).await.unwrap();
    let merged = carts.add_item(add("sess-1", &cap, 1, None)).await.unwrap();
    assert_eq!(merged.quantity, 2);

    let cart = carts.get_cart("sess-1").await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.totals.subtotal, dec("60.00"));
    assert_eq!(cart.totals.shipping, Decimal::ZERO);
    assert_eq!(cart.totals.total, dec("60.00"));

    let other = carts.get_cart("sess-2").await.unwrap();
    assert!(other.items.is_empty());
}

#[tokio::test]
async fn small_carts_pay_flat_shipping() {
    let (pool, _dir) = create_test_pool().await;
    let tee = create_product(&pool, "Alumni Tee", "25.00", &["M"]).await;
    let carts = CartService::new(pool, ShopConfig::default());

    carts.add_item(add("sess", &tee, 1, Some("M"))).await.unwrap();
    let cart = carts.get_cart("sess").await.unwrap();
    assert_eq!(cart.totals.shipping, dec("8.99"));
    assert_eq!(cart.totals.total, dec("33.99"));
}

#[tokio::test]
async fn merged_lines_stay_within_the_quantity_limit() {
    let (pool, _dir) = create_test_pool().await;
    let tee = create_product(&pool, "Alumni Tee", "25.00", &["M"]).await;
    let carts = CartService::new(pool.clone(), ShopConfig::default());

    carts.add_item(add("sess", &tee, 60, Some("M"))).await.unwrap();
    let refused = carts.add_item(add("sess", &tee, 60, Some("M"))).await;
    assert!(matches!(refused, Err(ShopError::Validation { .. })));

    let cart = carts.get_cart("sess").await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 60);

    let checkout = CheckoutService::new(
        pool,
        Arc::new(RecordingProvider::new()),
        PaymentsConfig::default(),
        ShopConfig::default(),
    );
    let response = checkout
        .checkout(ShopCheckoutRequest {
            customer_name: "Grace".to_string(),
            customer_email: "grace@alumni.test".to_string(),
            customer_address: "Chicago".to_string(),
            items: vec![],
            session_id: Some("sess".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(response.totals.subtotal, dec("1500.00"));
}

#[tokio::test]
async fn prices_above_the_catalog_ceiling_are_rejected() {
    let (pool, _dir) = create_test_pool().await;
    let catalog = CatalogService::new(pool.clone());
    let request = |price: &str| CreateProductRequest {
        name: "Gold Tee".to_string(),
        description: String::new(),
        category: "apparel".to_string(),
        price: dec(price),
        image_url: None,
        sizes_available: vec![],
        colors_available: vec![],
        stock_quantity: 1,
        printful_url: None,
    };

    assert!(matches!(
        catalog.create_product(request("90000000000000000")).await,
        Err(ShopError::Validation { .. })
    ));
    assert!(matches!(
        catalog.create_product(request("1000000.01")).await,
        Err(ShopError::Validation { .. })
    ));
    let priciest = catalog.create_product(request("1000000.00")).await.unwrap();

    let carts = CartService::new(pool, ShopConfig::default());
    carts.add_item(add("sess", &priciest, 99, None)).await.unwrap();
    let cart = carts.get_cart("sess").await.unwrap();
    assert_eq!(cart.totals.subtotal, dec("99000000.00"));
}

#[tokio::test]
async fn empty_carts_quote_flat_shipping() {
    let (pool, _dir) = create_test_pool().await;
    let carts = CartService::new(pool, ShopConfig::default());

    let cart = carts.get_cart("fresh").await.unwrap();
    assert!(cart.items.is_empty());
    assert_eq!(cart.totals.subtotal, Decimal::ZERO);
    assert_eq!(cart.totals.shipping, dec("8.99"));
    assert_eq!(cart.totals.total, dec("8.99"));
}

#[tokio::test]
async fn variants_and_quantities_are_validated() {
    let (pool, _dir) = create_test_pool().await;
    let tee = create_product(&pool, "Alumni Tee", "25.00", &["S", "M"]).await;
    let carts = CartService::new(pool, ShopConfig::default());

    for request in [
        add("sess", &tee, 1, Some("XXL")),
        add("sess", &tee, 1, None),
        add("sess", &tee, 0, Some("S")),
    ] {
        assert!(matches!(
            carts.add_item(request).await,
            Err(ShopError::Validation { .. })
        ));
    }

    let mut missing = add("sess", &tee, 1, Some("S"));
    missing.product_id = "nope".to_string();
    assert!(matches!(
        carts.add_item(missing).await,
        Err(ShopError::ProductNotFound { .. })
    ));
}

#[tokio::test]
async fn items_can_be_removed_and_carts_cleared() {
    let (pool, _dir) = create_test_pool().await;
    let tee = create_product(&pool, "Alumni Tee", "25.00", &["S", "M"]).await;
    let carts = CartService::new(pool, ShopConfig::default());

    let small = carts.add_item(add("sess", &tee, 1, Some("S"))).await.unwrap();
    carts.add_item(add("sess", &tee, 1, Some("M"))).await.unwrap();

    carts.remove_item("sess", &small.id).await.unwrap();
    assert!(matches!(
        carts.remove_item("sess", &small.id).await,
        Err(ShopError::CartItemNotFound { .. })
    ));
    assert_eq!(carts.clear("sess").await.unwrap(), 1);
    assert!(carts.get_cart("sess").await.unwrap().items.is_empty());
}

#[tokio::test]
async fn checkout_prices_from_catalog_records_order_and_clears_cart() {
    let (pool, _dir) = create_test_pool().await;
    let tee = create_product(&pool, "Alumni Tee", "25.00", &["M"]).await;
    let carts = CartService::new(pool.clone(), ShopConfig::default());
    carts.add_item(add("sess", &tee, 1, Some("M"))).await.unwrap();

    let provider = Arc::new(RecordingProvider::new());
    let config = PaymentsConfig {
        public_base_url: "https://icaa.test".to_string(),
        ..PaymentsConfig::default()
    };
    let checkout = CheckoutService::new(pool.clone(), provider.clone(), config, ShopConfig::default());

    let response = checkout
        .checkout(ShopCheckoutRequest {
            customer_name: "Grace".to_string(),
            customer_email: "Grace@Alumni.Test".to_string(),
            customer_address: "1 Loop Rd, Chicago".to_string(),
            items: vec![],
            session_id: Some("sess".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(response.session_id, "cs_test_1");
    assert_eq!(response.checkout_url, "https://checkout.test/pay/cs_test_1");
    assert_eq!(response.totals.total, dec("33.99"));

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].total_cents(), Some(3_399));
    assert_eq!(requests[0].line_items[0].name, "Alumni Tee (M)");
    assert_eq!(requests[0].line_items[1].name, "Shipping");
    assert_eq!(
        requests[0].success_url,
        "https://icaa.test/shop/success?session_id={CHECKOUT_SESSION_ID}"
    );

    let order = OrderRepository::new(pool)
        .find_by_session("cs_test_1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.customer_email, "grace@alumni.test");
    assert_eq!(order.total_cents, 3_399);
    assert_eq!(order.payment_status, TransactionStatus::Initiated);

    assert!(carts.get_cart("sess").await.unwrap().items.is_empty());
}

#[tokio::test]
async fn checkout_ignores_client_prices_and_rejects_empty_orders() {
    let (pool, _dir) = create_test_pool().await;
    let cap = create_product(&pool, "Alumni Cap", "30.00", &[]).await;
    let provider = Arc::new(RecordingProvider::new());
    let checkout = CheckoutService::new(
        pool,
        provider.clone(),
        PaymentsConfig::default(),
        ShopConfig::default(),
    );

    let body = serde_json::json!({
        "customer_name": "Grace",
        "customer_email": "grace@alumni.test",
        "customer_address": "Chicago",
        "items": [{"product_id": cap.id, "quantity": 2, "price": 0.01, "product_name": "Free cap"}]
    });
    let request: ShopCheckoutRequest = serde_json::from_value(body).unwrap();
    let response = checkout.checkout(request).await.unwrap();
    assert_eq!(response.totals.total, dec("60.00"));
    assert_eq!(provider.requests()[0].line_items.len(), 1);

    let empty = checkout
        .checkout(ShopCheckoutRequest {
            customer_name: "Grace".to_string(),
            customer_email: "grace@alumni.test".to_string(),
            customer_address: String::new(),
            items: Vec::<CheckoutItem>::new(),
            session_id: None,
        })
        .await;
    assert!(matches!(empty, Err(ShopError::EmptyCart)));
}
