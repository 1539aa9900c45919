use clap::{Parser, Subcommand};
use ductquote::application::catalog::PricingCatalog;
use ductquote::application::job_request::{JobRequest, JobSubmission};
use ductquote::application::quoting::QuoteService;
use ductquote::domain::config::{AddOnService, PricingRates};
use ductquote::domain::money::Money;
use ductquote::domain::ports::{
    ConfigSourceBox, ServiceStoreBox, VersionStoreBox, ZipcodeStoreBox,
};
use ductquote::domain::quote::Zipcode;
use ductquote::infrastructure::file::FileConfigSource;
use ductquote::infrastructure::in_memory::{
    InMemoryServiceStore, InMemoryVersionStore, InMemoryZipcodeStore,
};
use ductquote::interfaces::csv::quote_reader::QuoteReader;
use ductquote::interfaces::csv::quote_writer::QuoteWriter;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent catalog storage (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Price every request in a CSV file and print the breakdowns as CSV
    Quote {
        /// Input CSV: square_footage, additional_hvac_systems, zipcode[, services]
        input: PathBuf,

        /// JSON pricing config; when absent the stored catalog and standard rates are used
        #[arg(long, env = "DUCTQUOTE_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Price a JSON job request and print the submission payload
    Job {
        input: PathBuf,

        #[arg(long, env = "DUCTQUOTE_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Manage zipcode surcharges
    Zipcode {
        #[command(subcommand)]
        action: ZipcodeAction,
    },
    /// Manage add-on services
    Service {
        #[command(subcommand)]
        action: ServiceAction,
    },
}

#[derive(Subcommand)]
enum ZipcodeAction {
    Set { zipcode: String, charge: Decimal },
    Remove { zipcode: String },
    List,
}

#[derive(Subcommand)]
enum ServiceAction {
    Set {
        key: String,
        price: Decimal,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        hidden: bool,
    },
    Remove {
        key: String,
    },
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = open_catalog(cli.db_path)?;

    match cli.command {
        Command::Quote { input, config } => {
            let service = QuoteService::new(config_source(config, catalog));

            let file = File::open(input).into_diagnostic()?;
            let mut requests = Vec::new();
            for request in QuoteReader::new(file).requests() {
                match request {
                    Ok(request) => requests.push(request),
                    Err(e) => tracing::error!("Error reading quote request: {}", e),
                }
            }

            let quotes = service.quote_all(requests).await.into_diagnostic()?;
            let stdout = io::stdout();
            let mut writer = QuoteWriter::new(stdout.lock());
            writer.write_quotes(&quotes).into_diagnostic()?;
        }
        Command::Job { input, config } => {
            let service = QuoteService::new(config_source(config, catalog));

            let bytes = std::fs::read(input).into_diagnostic()?;
            let job: JobRequest = serde_json::from_slice(&bytes).into_diagnostic()?;

            let quote = service.quote(job.quote.clone()).await.into_diagnostic()?;
            let submission = JobSubmission::build(job, quote).into_diagnostic()?;
            println!("{}", submission.to_json().into_diagnostic()?);
        }
        Command::Zipcode { action } => match action {
            ZipcodeAction::Set { zipcode, charge } => {
                let zipcode = Zipcode::parse(&zipcode).into_diagnostic()?;
                let charge = Money::new(charge).into_diagnostic()?;
                catalog
                    .set_zipcode_charge(zipcode, charge)
                    .await
                    .into_diagnostic()?;
            }
            ZipcodeAction::Remove { zipcode } => {
                let zipcode = Zipcode::parse(&zipcode).into_diagnostic()?;
                if !catalog.remove_zipcode(&zipcode).await.into_diagnostic()? {
                    tracing::warn!(%zipcode, "zipcode has no surcharge to remove");
                }
            }
            ZipcodeAction::List => {
                let mut out = io::stdout().lock();
                writeln!(out, "zipcode,charge").into_diagnostic()?;
                for (zipcode, charge) in catalog.zipcode_charges().await.into_diagnostic()? {
                    writeln!(out, "{},{}", zipcode, charge.rounded()).into_diagnostic()?;
                }
            }
        },
        Command::Service { action } => match action {
            ServiceAction::Set {
                key,
                price,
                description,
                hidden,
            } => {
                let mut service =
                    AddOnService::new(key, Money::new(price).into_diagnostic()?, description);
                service.hidden = hidden;
                catalog.upsert_service(service).await.into_diagnostic()?;
            }
            ServiceAction::Remove { key } => {
                if !catalog.remove_service(&key).await.into_diagnostic()? {
                    tracing::warn!(key = %key, "no such add-on service");
                }
            }
            ServiceAction::List => {
                let mut out = io::stdout().lock();
                writeln!(out, "key,price,hidden,description").into_diagnostic()?;
                for service in catalog.services().await.into_diagnostic()? {
                    writeln!(
                        out,
                        "{},{},{},{}",
                        service.key,
                        service.price.rounded(),
                        service.hidden,
                        service.description
                    )
                    .into_diagnostic()?;
                }
            }
        },
    }

    Ok(())
}

fn open_catalog(db_path: Option<PathBuf>) -> Result<PricingCatalog> {
    let rates = PricingRates::standard().into_diagnostic()?;
    let (zipcodes, services, versions) = open_stores(db_path)?;
    Ok(PricingCatalog::new(rates, zipcodes, services, versions))
}

type Stores = (ZipcodeStoreBox, ServiceStoreBox, VersionStoreBox);

#[cfg(feature = "storage-rocksdb")]
fn open_stores(db_path: Option<PathBuf>) -> Result<Stores> {
    use ductquote::infrastructure::rocksdb::RocksDBStore;

    if let Some(db_path) = db_path {
        let store = RocksDBStore::open(db_path).into_diagnostic()?;
        return Ok((
            Box::new(store.clone()),
            Box::new(store.clone()),
            Box::new(store),
        ));
    }
    Ok(in_memory_stores())
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(db_path: Option<PathBuf>) -> Result<Stores> {
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_stores())
}

fn in_memory_stores() -> Stores {
    (
        Box::new(InMemoryZipcodeStore::new()),
        Box::new(InMemoryServiceStore::new()),
        Box::new(InMemoryVersionStore::new()),
    )
}

fn config_source(config: Option<PathBuf>, catalog: PricingCatalog) -> ConfigSourceBox {
    match config {
        Some(path) => Box::new(FileConfigSource::new(path)),
        None => Box::new(catalog),
    }
}
