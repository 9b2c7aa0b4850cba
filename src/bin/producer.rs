use anyhow::{Context, Result};
use rider_updates::{telemetry, Config, Publisher, RiderUpdate};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    telemetry::init("error,rider_producer=info,rider_updates=info").context("error initializing tracing")?;

    let config = Config::from_env().context("error reading configuration")?;
    let publisher = Publisher::connect(&config).context("error connecting producer")?;

    let update = RiderUpdate::sample();
    let key = update.key();
    publisher.publish(&config.topic, Some(&key), &update).await.context("error sending message")?;

    publisher.close().context("error disconnecting producer")?;
    Ok(())
}
