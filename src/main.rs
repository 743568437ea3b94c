use dotenv::dotenv;
use food_delivery::config::configuration::Settings;
use food_delivery::startup::Application;
use food_delivery::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    let subscriber = get_subscriber("food_delivery".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let settings = Settings::new().map_err(|err| {
        tracing::error!(error = %err, "Failed to load configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;

    let application = Application::build(settings).await?;
    application.run_until_stopped().await?;
    Ok(())
}
