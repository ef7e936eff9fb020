use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autoblog::{
    config::Config,
    generation::GenerationClient,
    jobs::{JobRunner, RunOutcome},
    models::{Article, ArticleId},
    repositories::{ArticleStore, JsonArticleStore},
};

#[derive(Parser)]
#[command(name = "autoblog")]
#[command(version = "0.1.0")]
#[command(about = "Scheduled article generation backed by a hosted language model")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Articles file (overrides config file)
    #[arg(short = 'a', long, value_name = "PATH")]
    articles_path: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the generation schedule until interrupted
    Serve,
    /// Generate and store one article now
    Generate,
    /// Pre-populate an empty store
    Seed {
        /// Number of articles (defaults to seed.count)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// List stored articles, newest first
    List,
    /// Show one article by id or slug
    Show { key: String },
    /// Delete an article by id
    Delete { id: ArticleId },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output on stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("autoblog={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    std::env::set_var("CONFIG_FILE", &cli.config);
    let mut config = Config::load()?;
    info!("Configuration loaded from: {}", cli.config);

    if let Some(path) = cli.articles_path {
        config.storage.articles_path = path.into();
    }
    config.validate()?;

    let store: Arc<dyn ArticleStore> =
        Arc::new(JsonArticleStore::open(&config.storage.articles_path).await?);
    let generator = Arc::new(GenerationClient::new(config.generation.clone())?);
    let runner = JobRunner::new(store.clone(), generator);

    match cli.command {
        Command::Serve => serve(&config, &runner).await?,
        Command::Generate => {
            let envelope = match runner.trigger_manual().await {
                RunOutcome::Created(article) => success(&article),
                RunOutcome::Skipped => failure("Article generation already in progress"),
                RunOutcome::Failed(reason) => failure(&reason),
            };
            print_envelope(&envelope)?;
        }
        Command::Seed { count } => {
            let count = count.unwrap_or(config.seed.count);
            let report = runner.seed_if_empty(count, config.seed.delay).await;
            print_envelope(&success(&report))?;
        }
        Command::List => {
            let articles = store.list_all().await;
            let envelope = json!({
                "success": true,
                "count": articles.len(),
                "data": articles,
            });
            print_envelope(&envelope)?;
        }
        Command::Show { key } => {
            let envelope = match find_article(store.as_ref(), &key).await {
                Ok(Some(article)) => success(&article),
                Ok(None) => failure("Article not found"),
                Err(e) => failure(&e.to_string()),
            };
            print_envelope(&envelope)?;
        }
        Command::Delete { id } => {
            let envelope = match store.delete(id).await {
                Ok(true) => json!({ "success": true, "message": "Article deleted" }),
                Ok(false) => failure("Article not found"),
                Err(e) => failure(&e.to_string()),
            };
            print_envelope(&envelope)?;
        }
    }

    Ok(())
}

async fn serve(config: &Config, runner: &JobRunner) -> Result<()> {
    info!("Starting autoblog v{}", env!("CARGO_PKG_VERSION"));

    if config.seed.on_startup {
        let report = runner
            .seed_if_empty(config.seed.count, config.seed.delay)
            .await;
        if report.failed > 0 {
            warn!("{} seed articles failed", report.failed);
        }
    }

    runner.start_schedule(config.schedule.to_spec()?)?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for shutdown signal: {}", e);
    }

    info!("Shutdown requested, waiting for in-flight generation");
    runner.stop_and_wait().await;
    Ok(())
}

/// Numeric keys are tried as ids first, then everything is tried as a slug
async fn find_article(store: &dyn ArticleStore, key: &str) -> Result<Option<Article>> {
    if let Ok(id) = key.parse::<ArticleId>() {
        if let Some(article) = store.get_by_id(id).await? {
            return Ok(Some(article));
        }
    }
    Ok(store.get_by_slug(key).await?)
}

fn success<T: Serialize>(data: &T) -> Value {
    json!({ "success": true, "data": data })
}

fn failure(message: &str) -> Value {
    json!({ "success": false, "error": message })
}

fn print_envelope(envelope: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(())
}
