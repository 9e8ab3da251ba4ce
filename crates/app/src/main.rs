use std::{sync::Arc, time::Duration};

use advisor::{Advisor, OpenAiConfig, OpenAiProvider};
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "grova={level},server={level},engine={level},advisor={level}",
            level = settings.app.level
        ))
        .init();

    let Some(server) = settings.server else {
        tracing::error!("no [server] section configured, nothing to run");
        return Ok(());
    };

    let advisor = match settings.advisor {
        Some(config) => {
            tracing::info!("Found advisor settings, using model {}", config.model);
            let provider = OpenAiProvider::new(OpenAiConfig {
                api_key: config.api_key,
                model: config.model,
                base_url: config.base_url,
                timeout: Duration::from_secs(config.timeout_secs),
            })?;
            Advisor::new(Arc::new(provider))
        }
        None => {
            tracing::info!("No advisor settings, coaching serves built-in answers");
            Advisor::offline()
        }
    };

    let db = parse_database(&server.database).await?;
    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await?;

    let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, db, advisor, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
