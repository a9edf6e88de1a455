use services_seeder::{config::SeederConfig, error::SeedError, seeder};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), SeedError> {
    // Logs go to stderr so stdout only carries the confirmation line.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SeederConfig::from_env();
    let documents = config.load_documents()?;
    let provider = config.credential_provider();

    tracing::info!(
        credentials = %provider.path().display(),
        collection = %config.collection,
        "Seeding services lists"
    );

    seeder::run(&provider, &config.collection, &documents).await?;

    println!(
        "{}",
        seeder::confirmation_line(&config.collection, documents.ids())
    );

    Ok(())
}
