//! Content services against a throwaway database and upload directory.

use alumni_config::{DatabaseConfig, UploadsConfig};
use alumni_content::{
    ContactService, ContentError, CreateContactRequest, CreateDocumentRequest,
    CreateNewsPostRequest, CreateNewsletterRequest, DocumentQuery, DocumentService, NewsQuery,
    NewsService, NewsletterService, SubscriberService, UploadStore,
};
use alumni_database::initialize_database;
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn create_test_env() -> (SqlitePool, UploadStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}", temp_dir.path().join("content.db").display()),
        max_connections: 4,
        busy_timeout_ms: 5_000,
    };
    let pool = initialize_database(&config).await.unwrap();
    let store = UploadStore::new(&UploadsConfig {
        directory: temp_dir.path().join("uploads").display().to_string(),
        ..UploadsConfig::default()
    });
    (pool, store, temp_dir)
}

fn newsletter(month: &str) -> CreateNewsletterRequest {
    CreateNewsletterRequest {
        title: format!("Issue {month}"),
        description: String::new(),
        month: month.to_string(),
    }
}

#[tokio::test]
async fn news_posts_default_author_and_excerpt() {
    let (pool, _store, _dir) = create_test_env().await;
    let news = NewsService::new(pool);

    let post = news
        .create_post(CreateNewsPostRequest {
            title: "Gala recap".to_string(),
            content: "A wonderful evening.".to_string(),
            excerpt: None,
            author: String::new(),
        })
        .await
        .unwrap();
    assert_eq!(post.author, "ICAA Admin");
    assert_eq!(post.excerpt, "A wonderful evening.");

    assert_eq!(news.get_post(&post.id).await.unwrap().title, "Gala recap");
    assert_eq!(news.list_posts(&NewsQuery::default()).await.unwrap().len(), 1);
    assert!(matches!(
        news.get_post("missing").await,
        Err(ContentError::NotFound { .. })
    ));
}

#[tokio::test]
async fn newsletters_list_by_month_and_accept_only_pdfs() {
    let (pool, store, _dir) = create_test_env().await;
    let newsletters = NewsletterService::new(pool, store);

    let january = newsletters.create_newsletter(newsletter("2025-01")).await.unwrap();
    newsletters.create_newsletter(newsletter("2025-03")).await.unwrap();
    assert!(matches!(
        newsletters.create_newsletter(newsletter("March")).await,
        Err(ContentError::Validation { .. })
    ));

    let months: Vec<String> = newsletters
        .list_newsletters()
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.month)
        .collect();
    assert_eq!(months, vec!["2025-03".to_string(), "2025-01".to_string()]);

    assert!(matches!(
        newsletters.upload_pdf(&january.id, "issue.docx", b"doc").await,
        Err(ContentError::Validation { .. })
    ));
    assert!(matches!(
        newsletters.pdf(&january.id).await,
        Err(ContentError::FileNotFound)
    ));

    let receipt = newsletters
        .upload_pdf(&january.id, "Issue.PDF", b"%PDF-1.4")
        .await
        .unwrap();
    assert_eq!(receipt.pdf_url, format!("/api/newsletters/{}/pdf", january.id));

    let stored = newsletters.get_newsletter(&january.id).await.unwrap();
    let file_name = stored.pdf_filename.unwrap();
    assert!(file_name.starts_with(&format!("{}_", january.id)));
    assert!(file_name.ends_with(".pdf"));

    let download = newsletters.pdf(&january.id).await.unwrap();
    assert_eq!(download.bytes, b"%PDF-1.4");
    assert_eq!(download.download_name, "Issue 2025-01.pdf");
}

#[tokio::test]
async fn documents_filter_and_serve_uploaded_files() {
    let (pool, store, _dir) = create_test_env().await;
    let documents = DocumentService::new(pool, store);

    let bylaws = documents
        .create_document(CreateDocumentRequest {
            title: "Association Bylaws".to_string(),
            description: "Governing rules".to_string(),
            category: "bylaws".to_string(),
            version: "2.1".to_string(),
        })
        .await
        .unwrap();
    documents
        .create_document(CreateDocumentRequest {
            title: "Annual Report".to_string(),
            description: String::new(),
            category: "reports".to_string(),
            version: String::new(),
        })
        .await
        .unwrap();

    let filtered = documents
        .list_documents(&DocumentQuery {
            category: Some("bylaws".to_string()),
            search: None,
        })
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);

    let searched = documents
        .list_documents(&DocumentQuery {
            category: Some("all".to_string()),
            search: Some("REPORT".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(searched[0].title, "Annual Report");
    assert_eq!(searched[0].version, "1.0");

    let updated = documents
        .upload_file(&bylaws.id, "bylaws v2.pdf", b"%PDF")
        .await
        .unwrap();
    assert_eq!(updated.file_size, Some(4));

    let download = documents.file(&bylaws.id).await.unwrap();
    assert_eq!(download.download_name, "bylaws_v2.pdf");
    assert_eq!(download.content_type, "application/pdf");
}

#[tokio::test]
async fn contact_and_subscriptions() {
    let (pool, _store, _dir) = create_test_env().await;
    let contact = ContactService::new(pool.clone());
    let subscribers = SubscriberService::new(pool);

    let receipt = contact
        .submit(CreateContactRequest {
            name: "Lin".to_string(),
            email: "lin@alumni.test".to_string(),
            subject: "Volunteering".to_string(),
            message: "How can I help?".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(receipt.message, "Contact form submitted successfully");
    assert_eq!(contact.list().await.unwrap().len(), 1);

    let first = subscribers.subscribe("Lin@Alumni.Test").await.unwrap();
    assert_eq!(first.message, "Successfully subscribed to newsletter");
    let second = subscribers.subscribe("lin@alumni.test").await.unwrap();
    assert_eq!(second.message, "Already subscribed to newsletter");
    assert!(second.id.is_none());
    assert_eq!(subscribers.list_active().await.unwrap().len(), 1);

    assert!(subscribers.subscribe("not-an-email").await.is_err());
}
