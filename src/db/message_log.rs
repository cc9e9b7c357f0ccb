use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, SqliteConnection};
use tracing::warn;

use crate::error::Error;

/// One outbound message log row, created by the sending path and enriched
/// with delivery status as provider callbacks arrive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MessageLog {
    pub id: i64,
    pub message_id: String,
    pub checkout_id: Option<String>,
    pub recipient_id: Option<String>,
    pub status: Option<String>,
    pub formatted_time: Option<String>,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
    pub error_details: Option<String>,
}

/// Field bundle for a status update. `checkout_id` must be carried over from
/// the located row, never taken from the inbound event.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub message_id: String,
    pub checkout_id: Option<String>,
    pub recipient_id: Option<String>,
    pub status: Option<String>,
    pub formatted_time: String,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
    pub error_details: Option<String>,
}

impl MessageLog {
    pub async fn insert(
        db: &mut SqliteConnection,
        message_id: impl AsRef<str>,
        checkout_id: Option<&str>,
        status: impl AsRef<str>,
    ) -> Result<i64, Error> {
        let id = sqlx::query_scalar(
            "INSERT INTO message_logs (message_id, checkout_id, status) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(message_id.as_ref())
        .bind(checkout_id)
        .bind(status.as_ref())
        .fetch_one(&mut *db)
        .await?;

        Ok(id)
    }

    /// Equality lookup on the external message id. The id is logically
    /// unique; if the table disagrees, the first row wins and the mismatch
    /// is flagged for diagnosis.
    pub async fn find_by_message_id(
        db: &mut SqliteConnection,
        message_id: impl AsRef<str>,
    ) -> Result<Option<MessageLog>, Error> {
        let rows: Vec<MessageLog> =
            sqlx::query_as("SELECT * FROM message_logs WHERE message_id = $1")
                .bind(message_id.as_ref())
                .fetch_all(&mut *db)
                .await?;

        if rows.len() > 1 {
            warn!(
                message_id = message_id.as_ref(),
                matches = rows.len(),
                "multiple message logs share one message id"
            );
        }

        Ok(rows.into_iter().next())
    }

    /// Overwrites the status fields of one row, leaving everything else
    /// untouched. Absent error fields clear their columns to NULL.
    pub async fn apply_status(
        db: &mut SqliteConnection,
        id: i64,
        update: &StatusUpdate,
    ) -> Result<(), Error> {
        sqlx::query(
            "UPDATE message_logs SET
                message_id = $1,
                checkout_id = $2,
                recipient_id = $3,
                status = $4,
                formatted_time = $5,
                error_code = $6,
                error_message = $7,
                error_details = $8
            WHERE id = $9",
        )
        .bind(&update.message_id)
        .bind(&update.checkout_id)
        .bind(&update.recipient_id)
        .bind(&update.status)
        .bind(&update.formatted_time)
        .bind(update.error_code)
        .bind(&update.error_message)
        .bind(&update.error_details)
        .bind(id)
        .execute(&mut *db)
        .await?;

        Ok(())
    }
}
