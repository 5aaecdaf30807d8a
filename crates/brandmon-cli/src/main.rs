mod pipeline;
mod query;

use anyhow::Context;
use brandmon_db::MentionStore;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "brandmon")]
#[command(about = "Brand mention monitor: fetch, classify, and report on Reddit mentions")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// List every brand with stored mentions
    Brands,
    /// Search channels for new mentions of a brand
    Fetch {
        /// Brand name used as the search query
        #[arg(long)]
        brand: String,

        /// Comma-separated subreddit names, e.g. `acme,looneytunes`
        #[arg(long, value_delimiter = ',', required = true)]
        channels: Vec<String>,

        /// Reddit app client id (overrides `REDDIT_CLIENT_ID`)
        #[arg(long)]
        client_id: Option<String>,

        /// Reddit app client secret (overrides `REDDIT_CLIENT_SECRET`)
        #[arg(long)]
        client_secret: Option<String>,
    },
    /// Classify every pending mention of a brand
    Enrich {
        #[arg(long)]
        brand: String,

        /// Mentions classified at once (defaults to `BRANDMON_ENRICH_CONCURRENCY`)
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        concurrency: Option<u16>,
    },
    /// List stored mentions of a brand, newest first
    Mentions {
        #[arg(long)]
        brand: String,

        /// Only analyzed mentions with this sentiment
        #[arg(long)]
        sentiment: Option<String>,
    },
    /// Sentiment distribution, topic frequency, and pending count for a brand
    Report {
        #[arg(long)]
        brand: String,
    },
    /// Generate a free-text summary of one sentiment cohort
    Summarize {
        #[arg(long)]
        brand: String,

        /// positive, negative, or suggestion
        #[arg(long)]
        kind: brandmon_monitor::SummaryKind,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("brandmon ready; run `brandmon --help` for commands");
        return Ok(());
    };

    let config = brandmon_core::load_app_config().context("failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let pool_config = brandmon_db::PoolConfig::from_app_config(&config);
    let pool = brandmon_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("failed to connect to database")?;

    if !matches!(command, Commands::Db { .. }) {
        pool.initialize()
            .await
            .context("failed to initialize mention store")?;
    }

    run_command(&pool, &config, command).await
}

async fn run_db(pool: &sqlx::PgPool, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            brandmon_db::health_check(pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = brandmon_db::run_migrations(pool).await?;
            println!("migrations applied: {applied}");
        }
    }
    Ok(())
}

async fn run_command(
    pool: &sqlx::PgPool,
    config: &brandmon_core::AppConfig,
    command: Commands,
) -> anyhow::Result<()> {
    match command {
        Commands::Db { command } => run_db(pool, command).await,
        Commands::Brands => query::run_brands(pool).await,
        Commands::Fetch {
            brand,
            channels,
            client_id,
            client_secret,
        } => {
            let credentials =
                pipeline::resolve_credentials(config, client_id, client_secret)?;
            pipeline::run_fetch(pool, config, credentials, &brand, &channels).await
        }
        Commands::Enrich { brand, concurrency } => {
            let concurrency = concurrency.map_or(config.enrich_concurrency, usize::from);
            pipeline::run_enrich(pool, config, &brand, concurrency).await
        }
        Commands::Mentions { brand, sentiment } => {
            query::run_mentions(pool, &brand, sentiment.as_deref()).await
        }
        Commands::Report { brand } => query::run_report(pool, &brand).await,
        Commands::Summarize { brand, kind } => {
            query::run_summarize(pool, config, &brand, kind).await
        }
    }
}
