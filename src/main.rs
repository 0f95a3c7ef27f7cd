use anyhow::Result;
use orientall_core::{AppError, Config};
use orientall_weather::WeatherService;

#[tokio::main]
async fn main() -> Result<()> {
    orientall_core::init()?;

    if let Err(err) = run().await {
        tracing::error!(error = %err, "{}", err.user_message());
        return Err(err.into());
    }

    tracing::info!("OrientAll stopped");
    Ok(())
}

async fn run() -> Result<(), AppError> {
    let (config, _validation) = Config::load_validated().map_err(AppError::from_anyhow)?;
    let service = WeatherService::from_config(config.ai.clone())?;
    orientall_server::serve(&config.server, service).await
}
