//! Client configuration shared by the admin, producer and consumer.
//!
//! Every component is constructed from an explicit [`Config`] value. Binaries build one from the
//! process environment with [`Config::from_env`].

use std::time::Duration;

use rdkafka::ClientConfig;

use crate::error::{ClientError, ClientResult};

/// The topic all rider updates are published to.
pub const DEFAULT_TOPIC: &str = "rider-updates";
/// The consumer group used by subscribers.
pub const DEFAULT_GROUP_ID: &str = "user-updates";
/// The client id prefix used when none is configured.
pub const DEFAULT_CLIENT_ID: &str = "rider-updates";
/// The broker used when neither `KAFKA_BROKERS` nor `HOST`/`PORT` are given.
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 9092;
/// Default admin operation and producer queue timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection configuration for a Kafka cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The bootstrap brokers, as `host:port` pairs.
    ///
    /// The list is only used to establish initial connections. After the first metadata response,
    /// the client library connects to the brokers described by the cluster itself.
    pub brokers: Vec<String>,
    /// The client id reported to the brokers.
    pub client_id: String,
    /// The topic to create, publish to and subscribe to.
    pub topic: String,
    /// The consumer group subscribers join.
    pub group_id: String,
    /// Timeout applied to admin operations and to queueing produced messages.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            brokers: vec![format!("{}:{}", DEFAULT_HOST, DEFAULT_PORT)],
            client_id: DEFAULT_CLIENT_ID.into(),
            topic: DEFAULT_TOPIC.into(),
            group_id: DEFAULT_GROUP_ID.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Build a config from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `KAFKA_BROKERS` | unset, falls back to `HOST`/`PORT` |
    /// | `HOST` / `PORT` | `localhost` / `9092` |
    /// | `KAFKA_CLIENT_ID` | `rider-updates` |
    /// | `TOPIC` | `rider-updates` |
    /// | `GROUP_ID` | `user-updates` |
    /// | `KAFKA_TIMEOUT_MS` | `30000` |
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from the given variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|val| val.trim().to_string()).filter(|val| !val.is_empty());
        let defaults = Self::default();

        let brokers = match get("KAFKA_BROKERS") {
            Some(list) => {
                let brokers: Vec<String> = list.split(',').map(str::trim).filter(|host| !host.is_empty()).map(String::from).collect();
                if brokers.is_empty() {
                    return Err(ClientError::Config("KAFKA_BROKERS contains no broker addresses".into()));
                }
                brokers
            }
            None => {
                let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.into());
                let port = match get("PORT") {
                    Some(port) => port.parse::<u16>().map_err(|err| ClientError::Config(format!("invalid PORT {:?}: {}", port, err)))?,
                    None => DEFAULT_PORT,
                };
                vec![format!("{}:{}", host, port)]
            }
        };

        // librdkafka takes timeouts as an `i32` count of milliseconds.
        let timeout = match get("KAFKA_TIMEOUT_MS") {
            Some(ms) => ms
                .parse::<i32>()
                .ok()
                .filter(|ms| *ms >= 0)
                .map(|ms| Duration::from_millis(ms as u64))
                .ok_or_else(|| ClientError::Config(format!("invalid KAFKA_TIMEOUT_MS {:?}: expected 0 to {} milliseconds", ms, i32::MAX)))?,
            None => defaults.timeout,
        };

        Ok(Self {
            brokers,
            client_id: get("KAFKA_CLIENT_ID").unwrap_or(defaults.client_id),
            topic: get("TOPIC").unwrap_or(defaults.topic),
            group_id: get("GROUP_ID").unwrap_or(defaults.group_id),
            timeout,
        })
    }

    /// The bootstrap list in the comma-separated form expected by librdkafka.
    pub fn bootstrap_servers(&self) -> String {
        self.brokers.join(",")
    }

    /// Render the settings common to every client kind.
    ///
    /// The client id is suffixed with a fresh UUID so that concurrently running processes can be
    /// told apart in broker logs.
    pub fn client_config(&self) -> ClientConfig {
        let mut cfg = ClientConfig::new();
        cfg.set("bootstrap.servers", self.bootstrap_servers())
            .set("client.id", format!("{}-{}", self.client_id, uuid::Uuid::new_v4()));
        cfg
    }
}
