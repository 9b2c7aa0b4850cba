//! Publishing JSON-encoded messages.

use std::time::Duration;

use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use serde::Serialize;

use crate::config::Config;
use crate::error::ClientResult;

/// The location of a published message, as assigned by the cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub partition: i32,
    pub offset: i64,
}

/// A producer connection to a Kafka cluster.
pub struct Publisher {
    producer: FutureProducer,
    /// How long a message may wait in the local queue before delivery is abandoned.
    timeout: Duration,
}

impl Publisher {
    /// Establish a producer connection.
    pub fn connect(config: &Config) -> ClientResult<Self> {
        tracing::info!(brokers = %config.bootstrap_servers(), "connecting producer");
        let producer: FutureProducer = config.client_config().create()?;
        tracing::info!("producer connected");
        Ok(Self { producer, timeout: config.timeout })
    }

    /// Serialize `value` as JSON and send it as a single message to `topic`.
    ///
    /// The message is sent once with the client library's default acknowledgement settings.
    pub async fn publish<T: Serialize>(&self, topic: &str, key: Option<&str>, value: &T) -> ClientResult<Delivery> {
        let payload = encode_payload(value)?;
        let mut record = FutureRecord::<str, [u8]>::to(topic).payload(&payload);
        if let Some(key) = key {
            record = record.key(key);
        }

        let (partition, offset) = self.producer.send(record, self.timeout).await.map_err(|(err, _msg)| err)?;
        tracing::info!(%topic, partition, offset, "message sent");
        Ok(Delivery { partition, offset })
    }

    /// Flush any queued messages and release the connection.
    pub fn close(self) -> ClientResult<()> {
        self.producer.flush(self.timeout)?;
        tracing::info!("producer disconnected");
        Ok(())
    }
}

/// Encode a message payload as JSON.
pub fn encode_payload<T: Serialize>(value: &T) -> ClientResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}
