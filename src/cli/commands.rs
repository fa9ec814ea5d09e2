use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imgsearch", about = "Store image embeddings and search them by text or image")]
pub struct Cli {
    /// Database directory
    #[arg(long, alias = "db_path", global = true, env = "IMGSEARCH_DB", default_value = "my_vectordb")]
    pub db_path: PathBuf,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CollectionArg {
    /// Name of the collection
    #[arg(long, alias = "collection_name", default_value = "multimodal_collection")]
    pub collection_name: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add every image in a directory to a collection
    Ingest {
        /// Path to the directory containing the images
        image_directory: PathBuf,
        #[command(flatten)]
        collection: CollectionArg,
        /// Images submitted per batch
        #[arg(long, alias = "batch_size", default_value = "10")]
        batch_size: usize,
        /// Record file name and source directory as entry metadata
        #[arg(long)]
        with_metadata: bool,
    },
    /// Create an empty collection
    Create {
        #[command(flatten)]
        collection: CollectionArg,
        /// Distance metric (l2, cosine)
        #[arg(long, default_value = "l2")]
        distance: String,
    },
    /// Delete a collection and all of its entries
    Delete {
        #[command(flatten)]
        collection: CollectionArg,
    },
    /// List collections
    List,
    /// Show how many entries a collection holds
    Count {
        #[command(flatten)]
        collection: CollectionArg,
    },
    /// Show the first entries of a collection
    Peek {
        #[command(flatten)]
        collection: CollectionArg,
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Add specific images, optionally with explicit ids
    Add {
        #[command(flatten)]
        collection: CollectionArg,
        /// Image path (repeatable)
        #[arg(long = "uri", required = true)]
        uris: Vec<String>,
        /// Entry id (repeatable, one per --uri; random UUIDs when omitted)
        #[arg(long = "id")]
        ids: Vec<String>,
    },
    /// Search a collection by text or by image
    Query {
        #[command(flatten)]
        collection: CollectionArg,
        /// Text to search for
        #[arg(long, conflicts_with = "image", required_unless_present = "image")]
        text: Option<String>,
        /// Image file to search with
        #[arg(long)]
        image: Option<PathBuf>,
        /// Number of results
        #[arg(short, long, default_value = "2")]
        n: usize,
        /// Fields to return (distances, documents, uris, metadatas, data)
        #[arg(long, value_delimiter = ',', default_value = "distances,uris")]
        include: Vec<String>,
        /// How image queries are sent (embedding, image)
        #[arg(long, default_value = "embedding")]
        strategy: String,
        /// Write presented results as PNG files into this directory
        #[arg(long)]
        gallery_dir: Option<PathBuf>,
    },
    /// Interactive search prompt
    Interactive {
        #[command(flatten)]
        collection: CollectionArg,
        /// Write presented results as PNG files into this directory
        #[arg(long)]
        gallery_dir: Option<PathBuf>,
    },
}
