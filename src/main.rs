//! newsharvest CLI entry point

use clap::{Parser, Subcommand};
use newsharvest::{
    commands::{
        cmd_backup, cmd_crawl, cmd_query, cmd_status, print_articles, print_session_report,
        print_status,
    },
    config::Config,
    error::Result,
    store::{ArticleQuery, NewsDb},
};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "newsharvest")]
#[command(version, about = "News article collector for sentiment research", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// With no subcommand, a full collection session runs
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a collection session over all configured sources (the default)
    Crawl {
        /// Override the per-source article target
        #[arg(short, long)]
        target: Option<usize>,
    },

    /// Show database status and per-source statistics
    Status,

    /// Write an on-demand backup snapshot
    Backup {
        /// Label appended to the snapshot file name
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Fetch stored articles mentioning an entity
    Query {
        /// Entity to search for in titles and content
        entity: String,

        /// Source name pattern (case-insensitive substring)
        #[arg(short, long, default_value = "")]
        source: String,

        /// Minimum article word count
        #[arg(long, default_value = "200")]
        min_words: i64,

        /// Maximum article word count
        #[arg(long, default_value = "1500")]
        max_words: i64,

        /// Maximum number of results
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Crawl { target: None }) {
        Commands::Crawl { target } => {
            let outcome = cmd_crawl(config, target).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_session_report(&outcome);
            }
        }

        Commands::Status => {
            let db = NewsDb::connect(&config.db_file).await?;
            let status = cmd_status(&config, &db).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
        }

        Commands::Backup { label } => {
            let db = NewsDb::connect(&config.db_file).await?;
            let path = cmd_backup(&config, &db, label.as_deref()).await?;
            println!("Snapshot written: {}", path.display());
        }

        Commands::Query {
            entity,
            source,
            min_words,
            max_words,
            limit,
        } => {
            let db = NewsDb::connect(&config.db_file).await?;
            let mut query = ArticleQuery::new(source, entity);
            query.min_word_count = min_words;
            query.max_word_count = max_words;
            query.limit = limit;

            let articles = cmd_query(&db, &query).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&articles)?);
            } else {
                print_articles(&articles);
            }
        }
    }

    Ok(())
}
