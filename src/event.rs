use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

/// One delivery-state transition reported by the provider for a previously
/// sent message. Extracted from the first `statuses` element of a webhook
/// payload; all fields beyond the correlation id are read permissively.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusEvent {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub recipient_id: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    // Arrives as a JSON string on the wire, but some providers send a bare
    // number. Kept raw until the reconciler needs seconds.
    #[serde(default, deserialize_with = "de_timestamp")]
    pub timestamp: Option<String>,

    #[serde(default)]
    pub errors: Vec<ProviderError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderError {
    #[serde(default)]
    pub code: Option<i64>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub error_data: Option<ErrorData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorData {
    #[serde(default)]
    pub details: Option<String>,
}

/// Result of scanning a raw webhook payload for a status event.
///
/// `Malformed` is reserved for a missing (or null) top-level `entry`
/// container; a path that runs out anywhere past that is `NoEvent`, since
/// providers deliver many payload shapes that carry no status at all.
#[derive(Debug)]
pub enum Extraction {
    Malformed,
    NoEvent,
    Event(StatusEvent),
}

impl StatusEvent {
    /// Navigates `entry[0].changes[0].value.statuses[0]` without ever
    /// failing on absent keys.
    pub fn extract(payload: &Value) -> Extraction {
        let entry = match payload.get("entry") {
            None | Some(Value::Null) => return Extraction::Malformed,
            Some(entry) => entry,
        };

        let status = entry
            .get(0)
            .and_then(|entry| entry.get("changes"))
            .and_then(|changes| changes.get(0))
            .and_then(|change| change.get("value"))
            .and_then(|value| value.get("statuses"))
            .and_then(|statuses| statuses.get(0));

        match status {
            None => Extraction::NoEvent,
            Some(status) => match serde_json::from_value(status.clone()) {
                Ok(event) => Extraction::Event(event),
                // A non-object status entry carries nothing to reconcile.
                Err(_) => Extraction::NoEvent,
            },
        }
    }

    pub fn timestamp_secs(&self) -> Result<i64, Error> {
        let raw = self
            .timestamp
            .as_deref()
            .ok_or_else(|| Error::InvalidTimestamp {
                value: "<missing>".to_owned(),
            })?;

        raw.parse().map_err(|_| Error::InvalidTimestamp {
            value: raw.to_owned(),
        })
    }
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value.and_then(|value| match value {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }))
}
