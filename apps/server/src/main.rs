use anyhow::Context;
use alumni_chats::CreateRoomRequest;
use alumni_config::{load as load_config, AppConfig};
use alumni_content::{CreateDocumentRequest, CreateNewsPostRequest, CreateNewsletterRequest};
use alumni_database::EventType;
use alumni_events::{CreateEventRequest, EventListQuery};
use alumni_gateway::{create_router, GatewayState};
use alumni_runtime::{telemetry, BackendServices};
use alumni_shop::{cents_to_decimal, CreateProductRequest};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "alumni-backend")]
#[command(about = "Alumni association backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Seed an empty database with sample events, products, rooms and content
    SeedData,
    /// Print row counts and the main catalog tables
    DumpData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing().context("failed to initialise tracing")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::SeedData => seed_data().await,
        Commands::DumpData => dump_data().await,
    }
}

async fn bootstrap() -> anyhow::Result<(AppConfig, GatewayState)> {
    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = GatewayState::new(
        services.db_pool.clone(),
        config.clone(),
        services.payment_provider.clone(),
    );
    Ok((config, state))
}

async fn run_server() -> anyhow::Result<()> {
    info!("starting alumni backend");

    let (config, state) = bootstrap().await?;
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(alumni_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn seed_data() -> anyhow::Result<()> {
    let (_, state) = bootstrap().await?;

    let existing = state
        .event_service
        .list_events(&EventListQuery::default())
        .await
        .context("failed to list events")?;
    if !existing.is_empty() {
        println!("Database already holds {} events; nothing seeded", existing.len());
        return Ok(());
    }

    info!("seeding database with sample data");
    let now = Utc::now();

    let events = [
        ("Third Thursday Mixer", EventType::ThirdThursday, 14, Some(40), "Downtown Chicago"),
        ("Career Panel: Life After the Program", EventType::ProfessionalDevelopment, 30, Some(120), "Main Campus Auditorium"),
        ("Alumni Summer Picnic", EventType::Social, 60, None, "Lincoln Park"),
    ];
    for (title, event_type, days_ahead, capacity, location) in events {
        state
            .event_service
            .create_event(CreateEventRequest {
                title: title.to_string(),
                description: format!("{title} for ICAA alumni and friends."),
                event_type,
                date: now + Duration::days(days_ahead),
                location: location.to_string(),
                capacity,
                created_by: None,
            })
            .await
            .with_context(|| format!("failed to seed event {title}"))?;
    }

    let products = [
        ("ICAA Classic Tee", "apparel", 2_500_i64, vec!["S", "M", "L", "XL"], vec!["Navy", "White"]),
        ("Alumni Hoodie", "apparel", 4_500, vec!["S", "M", "L", "XL"], vec!["Heather Grey"]),
        ("Enamel Mug", "accessories", 1_800, vec![], vec![]),
    ];
    let product_count = products.len();
    for (name, category, price_cents, sizes, colors) in products {
        state
            .catalog_service
            .create_product(CreateProductRequest {
                name: name.to_string(),
                description: format!("Official {name}."),
                category: category.to_string(),
                price: cents_to_decimal(price_cents),
                image_url: None,
                sizes_available: sizes.into_iter().map(str::to_string).collect(),
                colors_available: colors.into_iter().map(str::to_string).collect(),
                stock_quantity: 100,
                printful_url: None,
            })
            .await
            .with_context(|| format!("failed to seed product {name}"))?;
    }

    let rooms = [
        ("General", "general", None),
        ("Class of 2019", "cohort", Some("2019")),
        ("Class of 2020", "cohort", Some("2020")),
        ("Software Engineering", "program_track", Some("Software Engineering")),
    ];
    for (name, room_type, scope_value) in rooms {
        state
            .chat_service
            .create_room(CreateRoomRequest {
                name: name.to_string(),
                description: None,
                room_type: room_type.to_string(),
                scope_value: scope_value.map(str::to_string),
            })
            .await
            .with_context(|| format!("failed to seed chat room {name}"))?;
    }

    state
        .news_service
        .create_post(CreateNewsPostRequest {
            title: "Welcome to the new alumni portal".to_string(),
            content: "Register for events, chat with your cohort and pick up new merch, all in one place.".to_string(),
            excerpt: None,
            author: "ICAA Admin".to_string(),
        })
        .await
        .context("failed to seed news post")?;

    state
        .newsletter_service
        .create_newsletter(CreateNewsletterRequest {
            title: format!("{} Newsletter", now.format("%B %Y")),
            description: "Highlights from the association this month.".to_string(),
            month: now.format("%Y-%m").to_string(),
        })
        .await
        .context("failed to seed newsletter")?;

    state
        .document_service
        .create_document(CreateDocumentRequest {
            title: "ICAA Bylaws".to_string(),
            description: "Governing bylaws of the association.".to_string(),
            category: "bylaws".to_string(),
            version: "1.0".to_string(),
        })
        .await
        .context("failed to seed document")?;

    println!("Database seeded with sample data:");
    println!("- {} events", events.len());
    println!("- {product_count} products");
    println!("- {} chat rooms", rooms.len());
    println!("- 1 news post, 1 newsletter, 1 document");
    println!("Run 'dump-data' to see the inserted data");

    Ok(())
}

const DUMPED_TABLES: &[&str] = &[
    "users",
    "events",
    "event_registrations",
    "products",
    "cart_items",
    "shop_orders",
    "payment_transactions",
    "chat_rooms",
    "chat_messages",
    "news_posts",
    "newsletters",
    "documents",
    "contact_submissions",
    "newsletter_subscribers",
];

async fn dump_data() -> anyhow::Result<()> {
    let (_, state) = bootstrap().await?;

    println!("=== TABLES ===");
    for table in DUMPED_TABLES {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&state.pool)
            .await
            .with_context(|| format!("failed to count {table}"))?;
        println!("{table:<25} {count}");
    }

    println!("\n=== EVENTS ===");
    let events = state
        .event_service
        .list_events(&EventListQuery::default())
        .await
        .context("failed to list events")?;
    if events.is_empty() {
        println!("No events found in database");
    } else {
        println!(
            "{:<26} {:<40} {:<18} {:<25} {:<10} {:<10}",
            "ID", "Title", "Type", "Date", "Seats", "Waitlist"
        );
        println!("{}", "-".repeat(134));
        for event in events {
            let seats = match event.capacity {
                Some(capacity) => format!("{}/{}", event.current_registrations, capacity),
                None => event.current_registrations.to_string(),
            };
            println!(
                "{:<26} {:<40} {:<18} {:<25} {:<10} {:<10}",
                event.id,
                event.title,
                event.event_type.as_str(),
                event.date.to_rfc3339(),
                seats,
                event.waitlist_count
            );
        }
    }

    println!("\n=== PRODUCTS ===");
    let products = state
        .catalog_service
        .list_products(None)
        .await
        .context("failed to list products")?;
    if products.is_empty() {
        println!("No products found in database");
    } else {
        println!("{:<26} {:<30} {:<12} {:>10}", "ID", "Name", "Category", "Price");
        println!("{}", "-".repeat(81));
        for product in products {
            let price: Decimal = cents_to_decimal(product.price_cents);
            println!(
                "{:<26} {:<30} {:<12} {:>10}",
                product.id,
                product.name,
                product.category.as_str(),
                price
            );
        }
    }

    println!("\n=== CHAT ROOMS ===");
    let rooms = state
        .chat_service
        .list_rooms()
        .await
        .context("failed to list chat rooms")?;
    if rooms.is_empty() {
        println!("No chat rooms found in database");
    } else {
        for room in rooms {
            println!(
                "  {}: {} ({}{})",
                room.id,
                room.name,
                room.room_type,
                room.scope_value
                    .map(|scope| format!(" {scope}"))
                    .unwrap_or_default()
            );
        }
    }

    Ok(())
}
