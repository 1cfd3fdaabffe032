use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use pantry::{
    completion::HttpCompletionClient, database::RedisStore, products::ProductClient,
    storage::open_object_store,
};
use process::{SAMPLE_BARCODE, SEEDED, config::Config};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask for recipes using the items about to expire
    Digest,

    /// Upload a local file to the object store
    Upload { path: PathBuf },

    /// Load a JSON array of inventory items from the object store into the table
    Seed { key: String },

    /// Look up a barcode in the product database
    Lookup {
        #[arg(default_value = SAMPLE_BARCODE)]
        barcode: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let config = Config::load()?;
    let http = reqwest::Client::new();

    match args.command {
        Command::Digest => {
            let store = RedisStore::connect(&config.redis_url).await?;
            let completion = HttpCompletionClient::new(
                http,
                config.completion_url.clone(),
                config.completion_key.clone(),
            );

            match process::run_digest(&store, &completion, &config.application_id, Utc::now())
                .await?
            {
                Some(suggestion) => println!("Recipe suggestions:\n{suggestion}"),
                None => println!("No soon-to-expire items found."),
            }
        }
        Command::Upload { path } => {
            let objects = open_object_store(&config.object_store, http);
            let location = process::upload_file(objects.as_ref(), &path).await?;

            println!("File uploaded successfully. {location}");
        }
        Command::Seed { key } => {
            let objects = open_object_store(&config.object_store, http);
            let store = RedisStore::connect(&config.redis_url).await?;
            let written = process::seed_inventory(objects.as_ref(), &store, &key).await?;

            println!("{SEEDED}");
            info!("{written} items written");
        }
        Command::Lookup { barcode } => {
            let products = ProductClient::new(http, config.product_api.clone());
            let lookup = process::simulate_scan(&products, &barcode).await;

            println!("{}", serde_json::to_string_pretty(&lookup)?);
        }
    }

    Ok(())
}
