use std::{net::TcpListener, time::Duration};

use anyhow::Context;
use env_logger::Env;
use leadscout::{configuration::get_configuration, services::Droid, startup::run};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;

    let pool_options = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(15 * 60)); // 15 minutes

    let connection_pool = pool_options.connect_lazy_with(configuration.database.with_db());
    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)
        .with_context(|| format!("Failed to bind {}", address))?;
    log::info!("Listening on {}", address);

    let droid = Droid::new(configuration.browser);

    run(listener, connection_pool, droid, configuration.scraper)?.await?;
    Ok(())
}
