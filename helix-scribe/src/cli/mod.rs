use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::RwLock;

use helix_scribe::adapters::create_embedder;
use helix_scribe::config::Config;
use helix_scribe::ports::EmbeddingGenerator;
use helix_scribe::services::DocumentStore;
use helix_scribe::{Result, StyleMode};

mod add;
mod generate;
mod import;
mod search;
mod status;

#[derive(Parser)]
#[command(name = "helix-scribe")]
#[command(about = "Retrieve reference articles and use them as exemplars for generation")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output as JSON")]
    pub json: bool,

    #[arg(long, global = true, help = "Store snapshot path (overrides config)")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Add a reference document")]
    Add {
        #[arg(
            required_unless_present = "file",
            conflicts_with = "file",
            help = "Document content"
        )]
        content: Option<String>,

        #[arg(long, help = "Read content from a file")]
        file: Option<PathBuf>,

        #[arg(long, default_value = "Untitled", help = "Document title")]
        title: String,

        #[arg(long, default_value = "Unknown", help = "Publication or origin")]
        source: String,

        #[arg(long, help = "Original URL")]
        url: Option<String>,
    },

    #[command(about = "Import a JSON array of captured articles")]
    Import {
        #[arg(help = "Path to a JSON file of {title, content, source, url} records")]
        path: PathBuf,
    },

    #[command(about = "Rank stored documents against a query")]
    Search {
        #[arg(help = "Search query")]
        query: String,

        #[arg(long, help = "Maximum results to return (defaults to retrieval.top_k)")]
        limit: Option<usize>,
    },

    #[command(about = "Answer a question with one generation request")]
    Generate {
        #[arg(help = "Question to answer")]
        question: String,

        #[arg(long, default_value = "baseline", help = "Style mode: baseline, evasion")]
        mode: StyleMode,

        #[arg(long, help = "Maximum tokens to generate")]
        max_tokens: Option<u32>,
    },

    #[command(about = "Answer a question with a draft followed by a rewrite")]
    Rewrite {
        #[arg(help = "Question to answer")]
        question: String,

        #[arg(long, help = "Maximum tokens per request")]
        max_tokens: Option<u32>,
    },

    #[command(about = "Show store statistics")]
    Status,
}

/// Loaded configuration plus the store it points at.
pub struct Session {
    pub config: Config,
    pub store_path: PathBuf,
    pub embedder: Arc<dyn EmbeddingGenerator>,
    pub store: Arc<RwLock<DocumentStore<dyn EmbeddingGenerator>>>,
    pub json: bool,
}

impl Session {
    fn open(store_override: Option<PathBuf>, json: bool) -> Result<Self> {
        let config = Config::load()?;
        let store_path = store_override.unwrap_or_else(|| config.store_path.clone());
        let embedder = create_embedder(&config)?;

        let mut store = DocumentStore::new(Arc::clone(&embedder));
        store.load(&store_path)?;

        Ok(Self {
            config,
            store_path,
            embedder,
            store: Arc::new(RwLock::new(store)),
            json,
        })
    }

    async fn save(&self) -> Result<()> {
        self.store.read().await.save(&self.store_path)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let session = Session::open(cli.store, cli.json)?;

    match cli.command {
        Commands::Add {
            content,
            file,
            title,
            source,
            url,
        } => add::run(&session, content, file, &title, &source, url).await,
        Commands::Import { path } => import::run(&session, &path).await,
        Commands::Search { query, limit } => search::run(&session, &query, limit).await,
        Commands::Generate {
            question,
            mode,
            max_tokens,
        } => generate::run_single(&session, &question, mode, max_tokens).await,
        Commands::Rewrite {
            question,
            max_tokens,
        } => generate::run_two_stage(&session, &question, max_tokens).await,
        Commands::Status => status::run(&session).await,
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
