//! Rider update records and the owned view of consumed messages.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;

/// A rider's current state, as published on the rider updates topic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderUpdate {
    pub rider_id: u64,
    pub rider_name: String,
    pub rider_location: String,
    pub rider_status: String,
}

impl RiderUpdate {
    /// The record published by the producer binary.
    pub fn sample() -> Self {
        Self {
            rider_id: 1,
            rider_name: "John Doe".into(),
            rider_location: "New York".into(),
            rider_status: "active".into(),
        }
    }

    /// The message key for this update.
    pub fn key(&self) -> String {
        self.rider_id.to_string()
    }
}

/// A message received from a topic partition.
///
/// This is an owned copy of the record handed out by the consumer, so it can outlive the
/// consumer's internal buffers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<Bytes>,
    /// The creation or log-append time of the record, when the broker provides one.
    pub timestamp: Option<DateTime<Utc>>,
    /// An empty payload and a missing payload are not distinguished.
    pub payload: Bytes,
}

impl ReceivedMessage {
    /// Copy the interesting parts out of a message handed out by the client library.
    pub fn from_kafka<M: rdkafka::message::Message>(msg: &M) -> Self {
        Self {
            topic: msg.topic().to_string(),
            partition: msg.partition(),
            offset: msg.offset(),
            key: msg.key().map(Bytes::copy_from_slice),
            timestamp: msg.timestamp().to_millis().and_then(DateTime::<Utc>::from_timestamp_millis),
            payload: msg.payload().map(Bytes::copy_from_slice).unwrap_or_default(),
        }
    }

    /// Decode the payload as a rider update.
    pub fn rider_update(&self) -> ClientResult<RiderUpdate> {
        Ok(serde_json::from_slice(&self.payload)?)
    }

    /// The payload as text, with invalid UTF-8 replaced.
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }

    /// The key as text, with invalid UTF-8 replaced.
    pub fn key_text(&self) -> Option<String> {
        self.key.as_ref().map(|key| String::from_utf8_lossy(key).into_owned())
    }
}
