use anyhow::Result;
use qr_invoice::config::{AppConfig, MongoConfig};
use qr_invoice::core::InvoiceStore;
use qr_invoice::server::ServerBuilder;
use qr_invoice::storage::InMemoryInvoiceStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Read .env before the subscriber so RUST_LOG from the file applies
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("qr_invoice=info,tower_http=info")),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let config = AppConfig::from_env()?;

    let store: Arc<dyn InvoiceStore> = match &config.mongo {
        Some(mongo) => connect_mongo(mongo).await?,
        None => {
            tracing::warn!("MONGODB_URI is not set, invoices are kept in memory and lost on restart");
            Arc::new(InMemoryInvoiceStore::new())
        }
    };

    ServerBuilder::new()
        .with_config(config)
        .with_shared_store(store)
        .serve()
        .await
}

#[cfg(feature = "mongodb_backend")]
async fn connect_mongo(mongo: &MongoConfig) -> Result<Arc<dyn InvoiceStore>> {
    use qr_invoice::storage::MongoInvoiceStore;

    let store = MongoInvoiceStore::connect(&mongo.uri, &mongo.database, &mongo.collection).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "mongodb_backend"))]
async fn connect_mongo(_mongo: &MongoConfig) -> Result<Arc<dyn InvoiceStore>> {
    anyhow::bail!("MONGODB_URI is set but this build does not include the mongodb_backend feature")
}
