//! spaceq CLI: queue bulk operations against a content space.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use spaceq::collection::Collection;
use spaceq::config::{ClientOptions, Config};
use spaceq::localize::localize_value;
use spaceq::remote::{EntityAction, HttpConnector, Listing, SpaceCommand};
use spaceq::telemetry::{TelemetryConfig, init_telemetry};
use spaceq::{Client, Error};

#[derive(Parser)]
#[command(name = "spaceq", about = "Batching and retry queue for content-management APIs")]
struct Cli {
    /// TOML file with client options (locale, retry_options, queue_options)
    #[arg(long, global = true)]
    options: Option<PathBuf>,
    /// Disable progress reporting
    #[arg(long, global = true)]
    no_progress: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Wrap flat field maps in the localization envelope
    Localize {
        /// Locale tag (overrides the options file)
        #[arg(long)]
        locale: Option<String>,
        /// JSON file with an object or array of objects; stdin when omitted
        file: Option<PathBuf>,
    },
    #[command(flatten)]
    Remote(RemoteCommand),
}

#[derive(Subcommand)]
enum RemoteCommand {
    /// Print a collection from the space
    List {
        /// entries | assets | contentTypes
        listing: String,
    },
    /// Run a space command once per item
    Queue {
        /// Command name, e.g. createEntry
        command: String,
        /// Content type id for entry creation
        #[arg(long)]
        content_type: Option<String>,
        /// Localize each item before sending
        #[arg(long)]
        localize: bool,
        /// JSON file with an array or paged collection of items
        file: PathBuf,
    },
    /// Run an entity action (publish, unpublish, delete, ...) once per item
    Entities {
        action: String,
        /// JSON file with an array or paged collection of entities
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut options = match cli.options {
        Some(ref path) => ClientOptions::from_file(path)?,
        None => ClientOptions::default(),
    };
    if cli.no_progress {
        options.progress = false;
    }

    match cli.command {
        Command::Localize { locale, file } => {
            let locale = locale.unwrap_or(options.locale);
            let input = read_json(file.as_deref())?;
            let output = localize_value(input, &locale)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Command::Remote(command) => {
            let config = Config::from_env()?;
            let _guard = init_telemetry(TelemetryConfig {
                endpoint: config.otel_endpoint.clone(),
                service_name: "spaceq".to_string(),
                log_level: config.log_level.clone(),
            })?;
            let client = Client::new(HttpConnector::new(&config)?, options);
            run_remote(&client, command).await
        }
    }
}

async fn run_remote(client: &Client<HttpConnector>, command: RemoteCommand) -> anyhow::Result<()> {
    match command {
        RemoteCommand::List { listing } => {
            let listing: Listing = listing.parse()?;
            let collection = client
                .with_space(|space| async move { space.list(listing).await })
                .await?;
            let items = collection.into_items();
            println!("{}", serde_json::to_string_pretty(&items)?);
            eprintln!("{} item(s)", items.len());
        }
        RemoteCommand::Queue {
            command,
            content_type,
            localize,
            file,
        } => {
            let command = SpaceCommand::parse(&command, content_type.as_deref())?;
            let mut items = Collection::from_value(read_json(Some(&file))?)?.into_items();
            if localize {
                let locale = client.options().locale.clone();
                items = items
                    .into_iter()
                    .map(|item| localize_value(item, &locale))
                    .collect::<spaceq::Result<Vec<_>>>()?;
            }
            let results = client
                .with_space(|space| async move { space.queue(&command, &items).await })
                .await
                .map_err(report_failure)?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        RemoteCommand::Entities { action, file } => {
            let action: EntityAction = action.parse()?;
            let collection = Collection::from_value(read_json(Some(&file))?)?;
            let results = client
                .queue_over_collection(action, collection)
                .await
                .map_err(report_failure)?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }
    Ok(())
}

fn read_json(path: Option<&Path>) -> anyhow::Result<serde_json::Value> {
    let content = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&content)?)
}

/// Print how far a rejected job got before passing the error on.
fn report_failure(err: Error) -> anyhow::Error {
    if let Error::Job(ref job) = err {
        eprintln!(
            "job rejected at item {} ({} of {} settled)",
            job.index, job.progress.completed, job.progress.total
        );
    }
    err.into()
}
