use alumni_database::{
    non_blank, normalize_email, ContactRepository, ContactSubmission, NewContactSubmission,
};
use sqlx::SqlitePool;

use crate::types::{ContactReceipt, ContentError, ContentResult, CreateContactRequest};

const MAX_MESSAGE_CHARS: usize = 5_000;

#[derive(Clone)]
pub struct ContactService {
    submissions: ContactRepository,
}

impl ContactService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            submissions: ContactRepository::new(pool),
        }
    }

    pub async fn submit(&self, request: CreateContactRequest) -> ContentResult<ContactReceipt> {
        let name = non_blank(&request.name)
            .ok_or_else(|| ContentError::validation("Name is required"))?;
        let email = normalize_email(&request.email)
            .ok_or_else(|| ContentError::validation("Invalid email format"))?;
        let message = non_blank(&request.message)
            .ok_or_else(|| ContentError::validation("Message is required"))?;
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ContentError::validation(format!(
                "Message must be at most {MAX_MESSAGE_CHARS} characters"
            )));
        }

        let submission = self
            .submissions
            .create(&NewContactSubmission {
                name,
                email,
                subject: request.subject.trim().to_string(),
                message,
            })
            .await?;
        Ok(ContactReceipt {
            message: "Contact form submitted successfully".to_string(),
            id: submission.id,
        })
    }

    pub async fn list(&self) -> ContentResult<Vec<ContactSubmission>> {
        Ok(self.submissions.list().await?)
    }
}
