//! Topic descriptors and broker-reported topic metadata.

use rdkafka::admin::{NewTopic, TopicReplication};
use rdkafka::metadata::MetadataTopic;

use crate::config::DEFAULT_TOPIC;
use crate::error::{ClientError, ClientResult};

/// The number of partitions of the rider updates topic.
pub const RIDER_UPDATES_PARTITIONS: i32 = 2;
/// The replication factor of the rider updates topic.
pub const RIDER_UPDATES_REPLICATION: i32 = 1;

/// A description of a topic to be created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicSpec {
    pub name: String,
    pub partitions: i32,
    pub replication: i32,
}

impl TopicSpec {
    /// Construct a new instance.
    pub fn new(name: impl Into<String>, partitions: i32, replication: i32) -> Self {
        Self { name: name.into(), partitions, replication }
    }

    /// The rider updates topic: 2 partitions, replication factor 1.
    pub fn rider_updates() -> Self {
        Self::named(DEFAULT_TOPIC)
    }

    /// A topic with the rider updates layout under a different name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, RIDER_UPDATES_PARTITIONS, RIDER_UPDATES_REPLICATION)
    }

    /// Ensure the descriptor is acceptable before it is sent to the cluster.
    pub fn validate(&self) -> ClientResult<()> {
        if self.name.trim().is_empty() {
            return Err(ClientError::InvalidTopic("topic name must not be empty".into()));
        }
        if self.partitions < 1 {
            return Err(ClientError::InvalidTopic(format!("topic {} must have at least 1 partition, got {}", self.name, self.partitions)));
        }
        if self.replication < 1 {
            return Err(ClientError::InvalidTopic(format!("topic {} must have a replication factor of at least 1, got {}", self.name, self.replication)));
        }
        Ok(())
    }

    /// The admin request payload for this topic.
    pub(crate) fn as_new_topic(&self) -> NewTopic<'_> {
        NewTopic::new(&self.name, self.partitions, TopicReplication::Fixed(self.replication))
    }
}

/// Metadata on a topic as reported by the cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicMetadata {
    pub name: String,
    /// Partitions ordered by ID.
    pub partitions: Vec<PartitionMetadata>,
}

/// Metadata on a topic partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionMetadata {
    pub id: i32,
    /// The broker ID of the partition's leader.
    pub leader: i32,
    /// The number of brokers holding a replica of the partition.
    pub replicas: usize,
}

impl TopicMetadata {
    /// The replication factor of the topic, taken from its first partition.
    pub fn replication(&self) -> usize {
        self.partitions.first().map(|ptn| ptn.replicas).unwrap_or(0)
    }
}

impl From<&MetadataTopic> for TopicMetadata {
    fn from(topic: &MetadataTopic) -> Self {
        let mut partitions: Vec<PartitionMetadata> = topic
            .partitions()
            .iter()
            .map(|ptn| PartitionMetadata {
                id: ptn.id(),
                leader: ptn.leader(),
                replicas: ptn.replicas().len(),
            })
            .collect();
        partitions.sort_by_key(|ptn| ptn.id);
        Self { name: topic.name().to_string(), partitions }
    }
}
