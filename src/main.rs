use fare_engine::config::{self, AppConfig};
use fare_engine::{app, AppState};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    init_tracing(&config::log_filter_from_env());

    let config = AppConfig::from_env()?;
    let markup = &config.pricing.markup;
    tracing::info!(
        "Pricing: {}% markup, {}-{} {}, routing threshold {}, quote TTL {}s",
        markup.percentage * rust_decimal::Decimal::ONE_HUNDRED,
        markup.minimum_amount,
        markup.maximum_amount,
        markup.currency,
        config.pricing.routing.price_threshold,
        config.quote_ttl.as_secs()
    );

    let state = AppState::new(&config)?;
    let router = app(state);

    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
