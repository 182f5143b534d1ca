//! Membership payment transaction repository

use crate::entities::payment::{NewPaymentTransaction, PaymentTransaction, TransactionStatus};
use crate::types::{DatabaseError, DatabaseResult};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

const TRANSACTION_COLUMNS: &str = "id, session_id, user_email, user_name, membership_tier, \
     amount_cents, currency, payment_status, created_at, updated_at";

#[derive(Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a freshly opened checkout session in the `initiated` state.
    pub async fn create(&self, transaction: &NewPaymentTransaction) -> DatabaseResult<PaymentTransaction> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO payment_transactions (id, session_id, user_email, user_name, membership_tier, \
             amount_cents, currency, payment_status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&transaction.session_id)
        .bind(&transaction.user_email)
        .bind(&transaction.user_name)
        .bind(transaction.membership_tier)
        .bind(transaction.amount_cents)
        .bind(&transaction.currency)
        .bind(TransactionStatus::Initiated)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!(transaction_id = %id, session_id = %transaction.session_id, "payment transaction recorded");

        self.find_by_session(&transaction.session_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("payment transaction", &id))
    }

    pub async fn find_by_session(&self, session_id: &str) -> DatabaseResult<Option<PaymentTransaction>> {
        let query =
            format!("SELECT {TRANSACTION_COLUMNS} FROM payment_transactions WHERE session_id = ?");
        let transaction = sqlx::query_as::<_, PaymentTransaction>(&query)
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(transaction)
    }

    /// Store the polled status. Returns the previous status so callers can act on transitions.
    pub async fn update_status(
        &self,
        session_id: &str,
        status: TransactionStatus,
    ) -> DatabaseResult<TransactionStatus> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE payment_transactions SET updated_at = ? WHERE session_id = ?",
        )
        .bind(Utc::now())
        .bind(session_id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(DatabaseError::not_found("payment transaction", session_id));
        }

        let (previous,): (TransactionStatus,) = sqlx::query_as(
            "SELECT payment_status FROM payment_transactions WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE payment_transactions SET payment_status = ? WHERE session_id = ?")
            .bind(status)
            .bind(session_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        if previous != status {
            info!(session_id = %session_id, from = %previous, to = %status, "payment status changed");
        }
        Ok(previous)
    }
}
