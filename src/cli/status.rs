use anyhow::Result;

use crate::backend::HttpBackend;
use crate::core::AppConfig;

pub async fn run(config: AppConfig) -> Result<()> {
    let backend = HttpBackend::new(&config.api_url);
    let health = backend.health().await?;
    println!("{} ({}): {}", backend.api_url(), health.status, health.message);
    Ok(())
}
