//! Command-line interface for point-stress
//!
//! ```bash
//! # Run with a YAML config, overriding the worker count
//! point-stress generate --config stress.yaml --workers 8
//!
//! # Print the run summary as JSON
//! point-stress generate --series-count 1000 --json
//!
//! # Write series keys and a field map for the file-backed builder
//! point-stress expand --series-key "cpu,host=server" --output series.txt
//! ```

use clap::{Parser, Subcommand};
use point_stress::{run_expand, run_generate, ExpandArgs, GenerateArgs};

#[derive(Parser)]
#[command(name = "point-stress")]
#[command(about = "A synthetic time-series point generator for write load testing")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a batch of points and run update cycles over it
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },
    /// Expand a series-key template into series-key and field-map files
    Expand {
        #[command(flatten)]
        args: ExpandArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { args } => {
            let config = args.resolve()?;
            tracing::debug!("Resolved config: {:?}", config);

            let summary = run_generate(&config).await?;
            if args.json {
                println!("{}", serde_json::to_string(&summary)?);
            }
        }
        Commands::Expand { args } => {
            run_expand(&args)?;
        }
    }

    Ok(())
}
