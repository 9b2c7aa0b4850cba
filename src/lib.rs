//! Topic bootstrap, publishing and group consumption for the `rider-updates` Kafka topic.
//!
//! Each of the `rider-admin`, `rider-producer` and `rider-consumer` binaries is a thin wrapper
//! around one module of this crate. All of them are built from an explicit [`Config`].

pub mod admin;
pub mod config;
pub mod consumer;
pub mod error;
pub mod message;
pub mod producer;
pub mod telemetry;
pub mod topic;

pub use admin::{bootstrap_topic, KafkaAdmin, TopicAdmin};
pub use config::{Config, DEFAULT_GROUP_ID, DEFAULT_TOPIC};
pub use consumer::{log_message, Subscriber};
pub use error::{ClientError, ClientResult};
pub use message::{ReceivedMessage, RiderUpdate};
pub use producer::{Delivery, Publisher};
pub use topic::{TopicMetadata, TopicSpec};
pub use tokio_util::sync::CancellationToken;
