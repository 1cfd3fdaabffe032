use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fridge::{Alert, FridgeClient, ImageCapture, Submission};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "FRIDGE_API", default_value = "http://127.0.0.1:1111")]
    api: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a barcode photo and an expiration label photo
    Submit {
        barcode_image: Option<PathBuf>,
        expiration_image: Option<PathBuf>,
    },

    /// List the inventory
    Inventory,

    /// Look up a barcode through the backend
    Product { barcode: String },
}

fn show(alert: &Alert) {
    println!("{}: {}", alert.title, alert.message);
}

fn pick(path: Option<PathBuf>) -> Option<ImageCapture> {
    let path = path?;

    ImageCapture::from_path(&path)
        .map_err(|e| {
            show(&e.alert());
            warn!("{e}");
        })
        .ok()
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let client = FridgeClient::new(reqwest::Client::new(), args.api);

    match args.command {
        Command::Submit {
            barcode_image,
            expiration_image,
        } => {
            let mut submission = Submission {
                barcode_image: pick(barcode_image),
                expiration_image: pick(expiration_image),
            };

            match client.submit(&mut submission).await {
                Ok(ack) => {
                    show(&Alert::success());
                    println!("{ack}");
                }
                Err(e) => show(&e.alert()),
            }
        }
        Command::Inventory => match client.inventory().await {
            Ok(rows) if rows.is_empty() => println!("Inventory is empty"),
            Ok(rows) => {
                for row in rows {
                    println!("{:<40} {}", row.food_name, row.expiration_date);
                }
            }
            Err(e) => show(&e.alert()),
        },
        Command::Product { barcode } => {
            let lookup = client.product(&barcode).await?;
            println!("{lookup:#?}");
        }
    }

    Ok(())
}
