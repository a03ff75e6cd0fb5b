use storefront_mock::{ADMIN_TOKEN, CUSTOMER_TOKEN, MockConfig, MockState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("storefront_mock=info,tower_http=info")),
        )
        .with_target(false)
        .init();

    let config = MockConfig::from_env();
    let state = MockState::seeded();

    tracing::info!(admin = ADMIN_TOKEN, customer = CUSTOMER_TOKEN, "seeded bearer tokens");

    storefront_mock::serve(&config, state).await?;
    Ok(())
}
