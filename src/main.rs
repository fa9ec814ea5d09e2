use clap::Parser;
use imgsearch::application::ingest::IngestOptions;
use imgsearch::application::query::ImageQueryStrategy;
use imgsearch::cli::commands::{Cli, Commands};
use imgsearch::cli::gallery::{print_gallery, save_gallery};
use imgsearch::cli::interactive::run_interactive;
use imgsearch::config::Settings;
use imgsearch::domain::entities::entry::NewEntry;
use imgsearch::domain::error::DomainError;
use imgsearch::domain::values::collection_name::CollectionName;
use imgsearch::domain::values::distance::DistanceMetric;
use imgsearch::domain::values::include::{Include, IncludeField};
use imgsearch::Session;
use tokio::io::BufReader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = match Settings::from_env() {
        Ok(s) => Settings {
            db_path: cli.db_path.clone(),
            ..s
        },
        Err(e) => {
            eprintln!("Error reading configuration: {e}");
            std::process::exit(1);
        }
    };

    let session = match Session::open(&settings) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error opening database: {e}");
            std::process::exit(1);
        }
    };

    let result = run_command(&session, cli.command).await;
    session.close();
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(session: &Session, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Ingest {
            image_directory,
            collection,
            batch_size,
            with_metadata,
        } => {
            let name = CollectionName::new(collection.collection_name)?;
            let options = IngestOptions {
                batch_size,
                record_metadata: with_metadata,
            };
            let report = match session.ingest(&name, &image_directory, options).await {
                Ok(report) => report,
                Err(e @ DomainError::InvalidInput(_)) => {
                    println!("Error: {e}");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
            println!(
                "Discovered {} images, attempted {}, added {}, {} batches failed.",
                report.discovered,
                report.attempted,
                report.added,
                report.failed_batches.len()
            );
            for failure in &report.failed_batches {
                println!("  {}", failure.to_error());
            }
            let count = session.open_collection(&name)?.count()?;
            println!("Collection '{name}' now has {count} items.");
        }
        Commands::Create { collection, distance } => {
            let name = CollectionName::new(collection.collection_name)?;
            let distance: DistanceMetric = distance.parse().map_err(|e: String| e)?;
            let handle = session.create_collection(&name, distance)?;
            println!("{}", serde_json::to_string_pretty(handle.info())?);
        }
        Commands::Delete { collection } => {
            let name = CollectionName::new(collection.collection_name)?;
            session.delete_collection(&name)?;
            println!("Deleted collection '{name}'");
        }
        Commands::List => {
            let collections = session.list_collections()?;
            println!("{}", serde_json::to_string_pretty(&collections)?);
        }
        Commands::Count { collection } => {
            let name = CollectionName::new(collection.collection_name)?;
            let count = session.open_collection(&name)?.count()?;
            println!("Collection '{name}' has {count} items.");
        }
        Commands::Peek { collection, limit } => {
            let name = CollectionName::new(collection.collection_name)?;
            let include = Include::from_fields(&[
                IncludeField::Documents,
                IncludeField::Uris,
                IncludeField::Metadatas,
            ]);
            let results = session.open_collection(&name)?.peek(limit, &include)?;
            println!("{}", serde_json::to_string_pretty(&results.rows())?);
        }
        Commands::Add {
            collection,
            uris,
            ids,
        } => {
            let name = CollectionName::new(collection.collection_name)?;
            if !ids.is_empty() && ids.len() != uris.len() {
                return Err(format!("Got {} ids for {} uris", ids.len(), uris.len()).into());
            }
            let entries: Vec<NewEntry> = uris
                .into_iter()
                .enumerate()
                .map(|(i, uri)| {
                    let id = ids
                        .get(i)
                        .cloned()
                        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
                    NewEntry::from_uri(id, uri)
                })
                .collect();
            let handle = session.get_or_create_collection(&name, DistanceMetric::default())?;
            let added = handle.add(entries).await?;
            println!("Added {added} images. Collection '{name}' now has {} items.", handle.count()?);
        }
        Commands::Query {
            collection,
            text,
            image,
            n,
            include,
            strategy,
            gallery_dir,
        } => {
            let name = CollectionName::new(collection.collection_name)?;
            let fields = include
                .iter()
                .map(|f| f.parse::<IncludeField>())
                .collect::<Result<Vec<_>, _>>()?;
            let include = Include::from_fields(&fields);
            let strategy: ImageQueryStrategy = strategy.parse().map_err(|e: String| e)?;
            let service = session.query_service(session.open_collection(&name)?, strategy);

            let results = match (text, image) {
                (Some(text), None) => service.query_by_text(&text, n, include).await?,
                (None, Some(path)) => service.query_by_image(path, n, include).await?,
                _ => return Err("Provide exactly one of --text or --image".into()),
            };
            println!("{}", serde_json::to_string_pretty(&results.rows())?);

            if let Some(dir) = gallery_dir {
                let items = session.presenter().present(&results);
                let paths = save_gallery(&items, &dir)?;
                print_gallery(&mut std::io::stderr(), &items)?;
                eprintln!("Saved {} images to {}", paths.len(), dir.display());
            }
        }
        Commands::Interactive {
            collection,
            gallery_dir,
        } => {
            let name = CollectionName::new(collection.collection_name)?;
            let service = session.query_service(session.open_collection(&name)?, Default::default());
            let presenter = session.presenter();
            let stdin = BufReader::new(tokio::io::stdin());
            run_interactive(
                &service,
                &presenter,
                stdin,
                &mut std::io::stdout(),
                gallery_dir.as_deref(),
            )
            .await?;
        }
    }
    Ok(())
}
