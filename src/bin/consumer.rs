use anyhow::{Context, Result};
use rider_updates::{log_message, telemetry, CancellationToken, Config, Subscriber};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    telemetry::init("error,rider_consumer=info,rider_updates=info").context("error initializing tracing")?;

    let config = Config::from_env().context("error reading configuration")?;
    let subscriber = Subscriber::connect(&config).context("error connecting consumer")?;
    subscriber.subscribe(&config.topic).context("error subscribing to topic")?;

    // Stop consuming on Ctrl-C.
    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("interrupt received, shutting down");
                signal.cancel();
            }
            // Without a signal handler the subscriber runs until the process is killed.
            Err(err) => tracing::error!(error = ?err, "error listening for interrupt"),
        }
    });

    let handled = subscriber.run(shutdown, |msg| log_message(&msg)).await.context("error consuming messages")?;
    tracing::info!(handled, "consumer stopped");
    Ok(())
}
