use std::process::ExitCode;

use anyhow::{Context, Result};
use rider_updates::admin::exit_status;
use rider_updates::{bootstrap_topic, telemetry, Config, KafkaAdmin, TopicSpec};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    telemetry::init("error,rider_admin=info,rider_updates=info").context("error initializing tracing")?;

    let res = async {
        let config = Config::from_env()?;
        let spec = TopicSpec::named(&config.topic);
        let admin = KafkaAdmin::connect(&config)?;
        bootstrap_topic(admin, &spec).await
    }
    .await;

    if let Err(err) = &res {
        tracing::error!(error = %err, "admin error");
    }
    Ok(ExitCode::from(exit_status(&res)))
}
