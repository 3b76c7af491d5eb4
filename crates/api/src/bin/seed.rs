//! Load the Star Wars sample catalog into the configured database.
//!
//! Applies pending migrations first. Does nothing if characters already exist.

use holocron_db::seed::{seed_star_wars, SeedOutcome};
use holocron_db::store::PgStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "holocron_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = holocron_db::create_pool(&database_url, 2)
        .await
        .expect("Failed to connect to database");

    holocron_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let store = PgStore::new(pool.clone());
    match seed_star_wars(&store).await.expect("Seeding failed") {
        SeedOutcome::Seeded { movies, characters } => {
            tracing::info!(movies, characters, "Seed complete");
        }
        SeedOutcome::Skipped => {
            tracing::info!("Database already contains characters, nothing to do");
        }
    }

    pool.close().await;
}
