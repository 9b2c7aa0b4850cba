//! The subscriber task which drives consumption of a topic as a member of a consumer group.
//!
//! Partition assignment and rebalancing are owned entirely by the client library and the
//! cluster. The subscriber always uses a group subscription and never pins itself to a partition,
//! so several subscribers sharing a group split the topic's partitions between them.

use futures::StreamExt;
use rdkafka::consumer::{Consumer, StreamConsumer};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::ClientResult;
use crate::message::ReceivedMessage;

/// A consumer group member reading from the earliest available offset.
pub struct Subscriber {
    /// The group this subscriber joins.
    group_id: String,
    /// The underlying consumer.
    consumer: StreamConsumer,
}

impl Subscriber {
    /// Establish a consumer connection under the configured group.
    ///
    /// Partitions without a committed offset for the group are read from the beginning.
    pub fn connect(config: &Config) -> ClientResult<Self> {
        tracing::info!(brokers = %config.bootstrap_servers(), group_id = %config.group_id, "consumer connecting");
        let consumer: StreamConsumer = config
            .client_config()
            .set("group.id", &config.group_id)
            .set("auto.offset.reset", "earliest")
            .set("enable.auto.commit", "true")
            .create()?;
        Ok(Self { group_id: config.group_id.clone(), consumer })
    }

    /// The group this subscriber belongs to.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Subscribe to the given topic as a member of the consumer group.
    pub fn subscribe(&self, topic: &str) -> ClientResult<()> {
        self.consumer.subscribe(&[topic])?;
        tracing::info!(%topic, group_id = %self.group_id, "consumer subscribed");
        Ok(())
    }

    /// Hand every received message to `handler` until `shutdown` is cancelled.
    ///
    /// Returns the number of messages handled. Any error from the consumer is returned straightaway.
    pub async fn run<F>(self, shutdown: CancellationToken, mut handler: F) -> ClientResult<u64>
    where
        F: FnMut(ReceivedMessage),
    {
        tracing::debug!(group_id = %self.group_id, "subscriber started");
        let mut handled = 0u64;
        {
            let mut stream = self.consumer.stream();
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => break,
                    next = stream.next() => match next {
                        Some(Ok(msg)) => {
                            handler(ReceivedMessage::from_kafka(&msg));
                            handled += 1;
                        }
                        Some(Err(err)) => return Err(err.into()),
                        None => break,
                    },
                }
            }
        }

        self.consumer.unsubscribe();
        tracing::debug!(handled, "subscriber has shutdown");
        Ok(handled)
    }
}

/// Log a received message along with its decoded rider update.
///
/// Payloads which are not rider updates are logged as text.
pub fn log_message(msg: &ReceivedMessage) {
    let key = msg.key_text();
    let timestamp = msg.timestamp.map(|ts| ts.to_rfc3339());
    match msg.rider_update() {
        Ok(update) => tracing::info!(
            topic = %msg.topic,
            partition = msg.partition,
            offset = msg.offset,
            key = ?key,
            timestamp = ?timestamp,
            rider_id = update.rider_id,
            rider_name = %update.rider_name,
            rider_location = %update.rider_location,
            rider_status = %update.rider_status,
            "rider update received",
        ),
        Err(err) => tracing::info!(
            topic = %msg.topic,
            partition = msg.partition,
            offset = msg.offset,
            key = ?key,
            timestamp = ?timestamp,
            payload = %msg.payload_text(),
            decode_error = %err,
            "message received",
        ),
    }
}
