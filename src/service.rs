use secrecy::ExposeSecret;
use serde_json::Value;
use sqlx::{
    sqlite::{
        SqliteAutoVacuum, SqliteConnectOptions, SqliteJournalMode, SqliteLockingMode,
        SqlitePoolOptions,
    },
    Acquire, SqlitePool,
};
use tracing::{info, warn};

use crate::{
    config::Config,
    db::message_log::{MessageLog, StatusUpdate},
    error::Error,
    event::{Extraction, StatusEvent},
    utils::clock_time,
};

/// Transport-level outcome of reconciling one inbound payload.
///
/// Everything except `Malformed` acknowledges the delivery with a 2xx so the
/// provider does not retry; infrastructure failures surface separately as
/// `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Processed,
    NoEvent,
    NotFound,
    Malformed,
}

pub struct Service {
    db: SqlitePool,
    config: Config,
}

impl Service {
    pub async fn connect() -> eyre::Result<Self> {
        Self::connect_with(Config::default()).await
    }

    pub async fn connect_with(config: Config) -> eyre::Result<Self> {
        let opts = if let Some(path) = &config.db_path {
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
        } else {
            SqliteConnectOptions::new().in_memory(true)
        }
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .locking_mode(SqliteLockingMode::Normal)
        .optimize_on_close(true, None)
        .auto_vacuum(SqliteAutoVacuum::Full);

        // An in-memory database exists per-connection; a wider pool would
        // hand out empty databases.
        let pool_opts = match &config.db_path {
            Some(_) => SqlitePoolOptions::new(),
            None => SqlitePoolOptions::new().max_connections(1),
        };

        let pool = pool_opts.connect_with(opts).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { db: pool, config })
    }

    pub fn db(&self) -> &SqlitePool {
        &self.db
    }

    /// One-time GET verification exchange. Constant inputs, no state.
    pub fn verify_handshake(&self, mode: &str, token: &str) -> bool {
        mode == "subscribe" && token == self.config.verify_token.expose_secret()
    }

    /// Reconciles one raw webhook payload against the message logs:
    /// parse -> locate -> merge -> update. Single attempt; the provider's
    /// own retry policy handles infrastructure failures.
    pub async fn reconcile(&self, payload: &Value) -> Result<Outcome, Error> {
        let event = match StatusEvent::extract(payload) {
            Extraction::Malformed => return Ok(Outcome::Malformed),
            Extraction::NoEvent => return Ok(Outcome::NoEvent),
            Extraction::Event(event) => event,
        };

        let Some(message_id) = event.id.clone() else {
            warn!("status event carries no message id");
            return Ok(Outcome::NotFound);
        };

        let mut tx = self.db.begin().await?;

        let Some(record) =
            MessageLog::find_by_message_id(tx.acquire().await?, &message_id).await?
        else {
            warn!(%message_id, "no message log found for status event");
            return Ok(Outcome::NotFound);
        };

        let formatted_time = clock_time(event.timestamp_secs()?)?;

        let error = event.errors.first();

        let update = StatusUpdate {
            message_id,
            checkout_id: record.checkout_id.clone(),
            recipient_id: event.recipient_id,
            status: event.status,
            formatted_time,
            error_code: error.and_then(|e| e.code),
            error_message: error.and_then(|e| e.message.clone()),
            error_details: error
                .and_then(|e| e.error_data.as_ref())
                .and_then(|data| data.details.clone()),
        };

        MessageLog::apply_status(tx.acquire().await?, record.id, &update).await?;

        tx.commit().await?;

        info!(
            message_id = %update.message_id,
            status = ?update.status,
            checkout_id = ?update.checkout_id,
            "updated message log from status event"
        );

        Ok(Outcome::Processed)
    }
}
