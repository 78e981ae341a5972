//! Place directory server
//!
//! Configuration comes from the environment (see `DirectoryConfig`):
//!   DATABASE_URL         - Postgres store; takes precedence over the seed
//!   DIRECTORY_SEED_PATH  - YAML seed for the in-memory store
//!   NARRATIVE_URL        - narrative generator endpoint (optional)

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use place_directory::config::mask_database_url;
use place_directory::store::postgres::PgEntityStore;
use place_directory::{
    server, ContentSynthesizer, DirectoryConfig, DisabledNarrativeGenerator, EntityStore,
    HttpNarrativeGenerator, InMemoryEntityStore, NarrativeGenerator, PageAssembler,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal in deployed environments
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "place_directory=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DirectoryConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        bind = %config.bind_addr,
        base_url = %config.base_url,
        "Starting place directory"
    );

    let store = build_store(&config).await?;
    let generator = build_generator(&config)?;

    let synthesizer = ContentSynthesizer::new(generator).with_timeout(config.narrative_timeout);
    let assembler = PageAssembler::new(store, synthesizer, config.base_url.clone())
        .with_related_limit(config.related_places_limit);

    server::serve(config.bind_addr, Arc::new(assembler)).await?;
    Ok(())
}

async fn build_store(config: &DirectoryConfig) -> anyhow::Result<Arc<dyn EntityStore>> {
    if let Some(url) = &config.database_url {
        tracing::info!(url = %mask_database_url(url), "Using Postgres entity store");
        let store = PgEntityStore::connect(url, config.database_pool_size)
            .await
            .context("failed to connect to database")?;
        return Ok(Arc::new(store));
    }

    if let Some(path) = &config.seed_path {
        let store = InMemoryEntityStore::from_seed_file(path)
            .with_context(|| format!("failed to load seed file {}", path.display()))?;
        return Ok(Arc::new(store));
    }

    tracing::warn!("No DATABASE_URL or DIRECTORY_SEED_PATH set, serving an empty directory");
    Ok(Arc::new(InMemoryEntityStore::new()))
}

fn build_generator(config: &DirectoryConfig) -> anyhow::Result<Arc<dyn NarrativeGenerator>> {
    match &config.narrative_url {
        Some(url) => {
            tracing::info!(endpoint = %url, timeout = ?config.narrative_timeout, "Narrative generation enabled");
            let generator = HttpNarrativeGenerator::new(url.clone(), config.narrative_timeout)
                .context("failed to build narrative client")?;
            Ok(Arc::new(generator))
        }
        None => {
            tracing::info!("NARRATIVE_URL not set, pages use fallback content");
            Ok(Arc::new(DisabledNarrativeGenerator))
        }
    }
}
