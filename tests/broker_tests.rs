//! Tests against a live broker, `localhost:9092` unless `KAFKA_BROKERS` or `HOST`/`PORT` are set.
//!
//! Run with `cargo test -- --ignored` once a broker is up.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rider_updates::admin::{exit_status, EXIT_FAILURE, EXIT_SUCCESS};
use rider_updates::{bootstrap_topic, CancellationToken, Config, KafkaAdmin, Publisher, ReceivedMessage, RiderUpdate, Subscriber, TopicSpec};

const TEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Creates a config for a test-specific topic and consumer group.
///
/// Brokers are taken from the environment, as for the binaries.
fn get_config(name: &str) -> Config {
    let suffix = uuid::Uuid::new_v4();
    Config {
        topic: format!("test-{}-{}", name, suffix),
        group_id: format!("test-group-{}", suffix),
        ..Config::from_env().unwrap()
    }
}

async fn setup_topic(cfg: &Config) {
    let admin = KafkaAdmin::connect(cfg).unwrap();
    bootstrap_topic(admin, &TopicSpec::named(&cfg.topic)).await.unwrap();
}

async fn teardown_topic(cfg: &Config) {
    let admin = KafkaAdmin::connect(cfg).unwrap();
    let _ = admin.delete_topic(&cfg.topic).await;
}

/// Consume with the given subscribers until `count` distinct messages have been seen.
///
/// Each message is returned along with the index of the subscriber which received it.
async fn consume(subscribers: Vec<Subscriber>, count: usize) -> Vec<(usize, ReceivedMessage)> {
    let seen = Arc::new(Mutex::new(Vec::<(usize, ReceivedMessage)>::new()));
    let shutdown = CancellationToken::new();

    let runs = subscribers.into_iter().enumerate().map(|(idx, sub)| {
        let (seen, shutdown) = (seen.clone(), shutdown.clone());
        sub.run(shutdown.clone(), move |msg| {
            let mut seen = seen.lock().unwrap();
            seen.push((idx, msg));
            let distinct: BTreeSet<(i32, i64)> = seen.iter().map(|(_, msg)| (msg.partition, msg.offset)).collect();
            if distinct.len() >= count {
                shutdown.cancel();
            }
        })
    });
    let res = tokio::time::timeout(TEST_TIMEOUT, futures::future::join_all(runs)).await.expect("timed out waiting for messages");
    for run in res {
        run.unwrap();
    }

    let seen = seen.lock().unwrap().clone();
    seen
}

#[tokio::test]
#[ignore = "requires a running Kafka broker"]
async fn create_topic() {
    // Assemble.
    let cfg = get_config("create");
    let admin = KafkaAdmin::connect(&cfg).unwrap();

    // Action.
    let res = bootstrap_topic(admin, &TopicSpec::named(&cfg.topic)).await;

    // Assert.
    assert_eq!(exit_status(&res), EXIT_SUCCESS);
    let meta = KafkaAdmin::connect(&cfg).unwrap().describe_topic(&cfg.topic).await.unwrap();
    assert_eq!(meta.partitions.len(), 2);
    assert_eq!(meta.replication(), 1);
    teardown_topic(&cfg).await;
}

#[tokio::test]
#[ignore = "requires a running Kafka broker"]
async fn create_existing_topic_fails() {
    // Assemble.
    let cfg = get_config("exists");
    setup_topic(&cfg).await;
    let admin = KafkaAdmin::connect(&cfg).unwrap();

    // Action.
    let res = bootstrap_topic(admin, &TopicSpec::named(&cfg.topic)).await;

    // Assert.
    assert!(res.as_ref().unwrap_err().is_topic_already_exists());
    assert_eq!(exit_status(&res), EXIT_FAILURE);
    teardown_topic(&cfg).await;
}

#[tokio::test]
#[ignore = "requires a running Kafka broker"]
async fn published_messages_are_appended_and_consumed_in_order() {
    // Assemble.
    let cfg = get_config("publish");
    setup_topic(&cfg).await;
    let publisher = Publisher::connect(&cfg).unwrap();
    let update = RiderUpdate::sample();

    // Action.
    let first = publisher.publish(&cfg.topic, Some(&update.key()), &update).await.unwrap();
    let second = publisher.publish(&cfg.topic, Some(&update.key()), &update).await.unwrap();
    publisher.close().unwrap();

    let subscriber = Subscriber::connect(&cfg).unwrap();
    subscriber.subscribe(&cfg.topic).unwrap();
    let received: Vec<ReceivedMessage> = consume(vec![subscriber], 2).await.into_iter().map(|(_, msg)| msg).collect();

    // Assert.
    assert_eq!(first.partition, second.partition);
    assert!(second.offset > first.offset);
    let offsets: Vec<i64> = received.iter().map(|msg| msg.offset).collect();
    assert_eq!(offsets, vec![first.offset, second.offset]);
    for msg in &received {
        assert_eq!(msg.topic, cfg.topic);
        assert_eq!(msg.rider_update().unwrap(), update);
        let payload: serde_json::Value = serde_json::from_slice(&msg.payload).unwrap();
        assert_eq!(payload, serde_json::json!({"riderId": 1, "riderName": "John Doe", "riderLocation": "New York", "riderStatus": "active"}));
    }
    teardown_topic(&cfg).await;
}

#[tokio::test]
#[ignore = "requires a running Kafka broker"]
async fn group_members_share_all_partitions() {
    // Assemble.
    let cfg = get_config("group");
    setup_topic(&cfg).await;
    let publisher = Publisher::connect(&cfg).unwrap();
    let mut delivered = BTreeSet::new();
    for rider_id in 0..20u64 {
        let update = RiderUpdate { rider_id, ..RiderUpdate::sample() };
        let delivery = publisher.publish(&cfg.topic, Some(&update.key()), &update).await.unwrap();
        delivered.insert((delivery.partition, delivery.offset));
    }
    publisher.close().unwrap();

    let subscribers = vec![Subscriber::connect(&cfg).unwrap(), Subscriber::connect(&cfg).unwrap()];
    for sub in &subscribers {
        sub.subscribe(&cfg.topic).unwrap();
    }

    // Action.
    let received = consume(subscribers, delivered.len()).await;

    // Assert.
    let all_partitions: BTreeSet<i32> = (0..TopicSpec::named(&cfg.topic).partitions).collect();
    let delivered_partitions: BTreeSet<i32> = delivered.iter().map(|(ptn, _)| *ptn).collect();
    assert_eq!(delivered_partitions, all_partitions, "keys should spread over every partition");

    let mut partitions_by_member: BTreeMap<usize, BTreeSet<i32>> = BTreeMap::new();
    for (idx, msg) in &received {
        partitions_by_member.entry(*idx).or_default().insert(msg.partition);
    }
    let consumed_partitions: BTreeSet<i32> = partitions_by_member.values().flatten().copied().collect();
    assert_eq!(consumed_partitions, all_partitions, "members should consume every partition: {:?}", partitions_by_member);

    let received: BTreeSet<(i32, i64)> = received.iter().map(|(_, msg)| (msg.partition, msg.offset)).collect();
    assert_eq!(received, delivered);
    teardown_topic(&cfg).await;
}
