//! Administrative client used to declare topics.
//!
//! Topic creation is one-shot: no retries are made, and the admin connection is always released
//! once the request completes, whatever its outcome.

use std::sync::Arc;
use std::time::Duration;

use rdkafka::admin::{AdminClient, AdminOptions, TopicResult};
use rdkafka::client::DefaultClientContext;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::metadata::Metadata;

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::topic::{TopicMetadata, TopicSpec};

/// Exit status of a successful admin run.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status of an admin run which hit an error.
pub const EXIT_FAILURE: u8 = 1;

/// An administrative connection able to create topics.
#[allow(async_fn_in_trait)]
pub trait TopicAdmin {
    /// Request creation of the given topic.
    async fn create_topic(&self, spec: &TopicSpec) -> ClientResult<()>;

    /// Release the administrative connection.
    async fn close(self) -> ClientResult<()>;
}

/// Create the given topic, then release the admin connection regardless of the outcome.
///
/// A failure to release the connection is logged and discarded; the returned result is that of
/// topic creation.
pub async fn bootstrap_topic<A: TopicAdmin>(admin: A, spec: &TopicSpec) -> ClientResult<()> {
    let res = async {
        spec.validate()?;
        admin.create_topic(spec).await
    }
    .await;

    match admin.close().await {
        Ok(()) => tracing::info!("admin disconnected"),
        Err(err) => tracing::debug!(error = ?err, "error releasing admin connection"),
    }
    res
}

/// The process exit status for the outcome of an admin run.
pub fn exit_status<T>(res: &ClientResult<T>) -> u8 {
    match res {
        Ok(_) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}

/// An admin connection to a Kafka cluster.
pub struct KafkaAdmin {
    client: Arc<AdminClient<DefaultClientContext>>,
    timeout: Duration,
}

impl KafkaAdmin {
    /// Establish an admin connection.
    pub fn connect(config: &Config) -> ClientResult<Self> {
        tracing::info!(brokers = %config.bootstrap_servers(), "admin connecting");
        let client: AdminClient<DefaultClientContext> = config.client_config().create()?;
        tracing::info!("admin connection established");
        Ok(Self { client: Arc::new(client), timeout: config.timeout })
    }

    /// Delete a topic and all of its data.
    pub async fn delete_topic(&self, name: &str) -> ClientResult<()> {
        let opts = AdminOptions::new().operation_timeout(Some(self.timeout));
        let results = self.client.delete_topics(&[name], &opts).await?;
        for result in results {
            if let Err((topic, code)) = result {
                tracing::debug!(%topic, ?code, "error deleting topic");
                return Err(KafkaError::AdminOp(code).into());
            }
        }
        tracing::info!(topic = %name, "topic deleted");
        Ok(())
    }

    /// Fetch cluster metadata for a single topic.
    ///
    /// The metadata request blocks for at most the configured timeout, so it runs on Tokio's
    /// blocking pool.
    pub async fn describe_topic(&self, name: &str) -> ClientResult<TopicMetadata> {
        let (client, name, timeout) = (self.client.clone(), name.to_string(), self.timeout);
        tokio::task::spawn_blocking(move || {
            let metadata = client.inner().fetch_metadata(Some(&name), timeout)?;
            find_topic(&metadata, &name)
        })
        .await?
    }
}

/// Pick the named topic out of a metadata response.
fn find_topic(metadata: &Metadata, name: &str) -> ClientResult<TopicMetadata> {
    let topic = metadata
        .topics()
        .iter()
        .find(|topic| topic.name() == name)
        .ok_or_else(|| ClientError::UnknownTopic(name.to_string()))?;
    match topic.error().map(RDKafkaErrorCode::from) {
        None => Ok(TopicMetadata::from(topic)),
        Some(RDKafkaErrorCode::UnknownTopicOrPartition) => Err(ClientError::UnknownTopic(name.to_string())),
        Some(code) => Err(KafkaError::MetadataFetch(code).into()),
    }
}

impl TopicAdmin for KafkaAdmin {
    async fn create_topic(&self, spec: &TopicSpec) -> ClientResult<()> {
        let opts = AdminOptions::new().operation_timeout(Some(self.timeout));
        let results = self.client.create_topics(&[spec.as_new_topic()], &opts).await?;
        check_topic_results(results)?;
        tracing::info!(topic = %spec.name, partitions = spec.partitions, replication = spec.replication, "topic created");

        match self.describe_topic(&spec.name).await {
            Ok(meta) => tracing::debug!(?meta, "topic metadata"),
            Err(err) => tracing::debug!(error = ?err, topic = %spec.name, "error fetching metadata of new topic"),
        }
        Ok(())
    }

    async fn close(self) -> ClientResult<()> {
        // The client's background thread is stopped and joined once the last handle is dropped.
        drop(self.client);
        Ok(())
    }
}

/// Convert per-topic results of a create request into an error on the first rejected topic.
fn check_topic_results(results: Vec<TopicResult>) -> ClientResult<()> {
    for result in results {
        match result {
            Ok(topic) => tracing::debug!(%topic, "topic accepted by cluster"),
            Err((topic, code)) => return Err(ClientError::TopicCreation { topic, code }),
        }
    }
    Ok(())
}
