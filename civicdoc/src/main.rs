use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use civicdoc::config::Config;
use civicdoc::models::SUPPORTED_EXTENSIONS;
use civicdoc::processing::DocumentNormalizer;
use civicdoc::services::IngestService;

#[derive(Parser)]
#[command(name = "civicdoc")]
#[command(about = "Normalize civic documents into text and metadata for ingestion")]
struct Args {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a single file and print its text and metadata as JSON
    Parse {
        path: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Parse every supported file in a directory
    Ingest {
        dir: PathBuf,
        /// Only look at files directly inside DIR
        #[arg(long)]
        no_recursive: bool,
        /// Files parsed in parallel (defaults to CIVICDOC_INGEST_CONCURRENCY)
        #[arg(long)]
        concurrency: Option<usize>,
        #[arg(long)]
        pretty: bool,
    },
    /// List supported file extensions
    Formats,
}

#[derive(Serialize)]
struct ParseOutput<'a> {
    text: &'a str,
    metadata: &'a civicdoc::Metadata,
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "civicdoc=info".into());
    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let config = Config::from_env();

    match args.command {
        Command::Parse { path, pretty } => {
            let normalizer = DocumentNormalizer::new(config.normalizer.clone());
            let doc = normalizer.parse(&path)?;
            tracing::info!(
                "Parsed {} as {} ({} words)",
                path.display(),
                doc.format,
                doc.word_count()
            );
            print_json(
                &ParseOutput {
                    text: &doc.text,
                    metadata: &doc.metadata,
                },
                pretty,
            )?;
        }
        Command::Ingest {
            dir,
            no_recursive,
            concurrency,
            pretty,
        } => {
            let mut service = IngestService::new(&config);
            if no_recursive {
                service = service.with_recursive(false);
            }
            if let Some(concurrency) = concurrency {
                service = service.with_concurrency(concurrency);
            }
            let report = service.ingest_directory(&dir).await?;
            print_json(&report, pretty)?;
        }
        Command::Formats => {
            for ext in SUPPORTED_EXTENSIONS {
                println!(".{ext}");
            }
        }
    }

    Ok(())
}
