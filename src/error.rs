//! Client error types.

use rdkafka::error::{KafkaError, RDKafkaErrorCode};

/// Client results.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Client errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An error from the underlying Kafka client.
    #[error("kafka client error: {0}")]
    Kafka(#[from] KafkaError),
    /// The broker rejected the creation of a topic.
    #[error("error creating topic {topic}: {code}")]
    TopicCreation { topic: String, code: RDKafkaErrorCode },
    /// A topic descriptor failed local validation.
    #[error("invalid topic descriptor: {0}")]
    InvalidTopic(String),
    /// The broker has no metadata for the given topic.
    #[error("topic {0} is not known to the cluster")]
    UnknownTopic(String),
    /// A message payload could not be encoded or decoded as JSON.
    #[error("error serializing message payload: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A blocking client call panicked or was cancelled.
    #[error("error joining blocking client task: {0}")]
    Join(#[from] tokio::task::JoinError),
    /// The client configuration is invalid.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Check if this error indicates that the topic being created already exists.
    pub fn is_topic_already_exists(&self) -> bool {
        matches!(self, Self::TopicCreation { code: RDKafkaErrorCode::TopicAlreadyExists, .. })
    }
}
