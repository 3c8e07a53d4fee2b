use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use streamcat_server::artists::TrackedArtists;
use streamcat_server::background_jobs::jobs::CatalogIngestionJob;
use streamcat_server::background_jobs::{JobContext, JobScheduler};
use streamcat_server::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_INGESTION_INTERVAL_HOURS,
    DEFAULT_PROVIDER_TIMEOUT_SEC, DEFAULT_RECOMMENDATIONS_COUNT, DEFAULT_UPSTREAM_TIMEOUT_SEC,
};
use streamcat_server::provider::{HttpMusicProvider, MusicProvider};
use streamcat_server::recommendation::{RecommendationEngine, RecommendationSources};
use streamcat_server::server::{self, run_metrics_server, run_server, ServerConfig};
use streamcat_server::{
    CatalogStore, IngestionManager, RequestsLoggingLevel, ServerState, StreamProxy,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values found there win over command line flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding the catalog, the artist list, user activity and the pools.
    #[clap(long, value_parser = parse_path)]
    pub data_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Base URL of the metadata provider.
    #[clap(long)]
    pub provider_url: Option<String>,

    /// Timeout for metadata provider requests, in seconds.
    #[clap(long, default_value_t = DEFAULT_PROVIDER_TIMEOUT_SEC)]
    pub provider_timeout_sec: u64,

    /// Time allowed to reach a media host and get its response headers, in seconds.
    #[clap(long, default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SEC)]
    pub upstream_timeout_sec: u64,

    /// Hours between catalog ingestion runs.
    #[clap(long, default_value_t = DEFAULT_INGESTION_INTERVAL_HOURS)]
    pub ingestion_interval_hours: u64,

    /// Number of songs returned by a recommendation request without `count`.
    #[clap(long, default_value_t = DEFAULT_RECOMMENDATIONS_COUNT)]
    pub recommendations_count: usize,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            data_dir: self.data_dir.clone(),
            port: self.port,
            metrics_port: self.metrics_port,
            logging_level: self.logging_level.clone(),
            frontend_dir_path: self.frontend_dir_path.clone(),
            provider_url: self.provider_url.clone(),
            provider_timeout_sec: self.provider_timeout_sec,
            upstream_timeout_sec: self.upstream_timeout_sec,
            ingestion_interval_hours: self.ingestion_interval_hours,
            recommendations_count: self.recommendations_count,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}...", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening catalog at {:?}...", config.paths.catalog_file);
    let catalog_store = Arc::new(CatalogStore::open(config.paths.catalog_file.clone()));
    let catalog = catalog_store.snapshot();
    info!(
        "Catalog has {} artists and {} songs",
        catalog.artists_count(),
        catalog.songs_count()
    );

    info!("Initializing metrics...");
    server::metrics::init_metrics();
    server::metrics::set_catalog_size(catalog.artists_count(), catalog.songs_count());
    drop(catalog);

    info!("Metadata provider configured at {}", config.provider_url);
    let provider: Arc<dyn MusicProvider> = Arc::new(HttpMusicProvider::new(
        config.provider_url.clone(),
        config.provider_timeout_sec,
    )?);

    let ingestion_manager = Arc::new(IngestionManager::new(
        provider.clone(),
        catalog_store.clone(),
        TrackedArtists::new(config.paths.artists_file.clone()),
    ));
    let stream_proxy = Arc::new(StreamProxy::new(
        catalog_store.clone(),
        provider,
        config.upstream_timeout_sec,
    )?);
    let recommendation_engine = Arc::new(RecommendationEngine::new(
        RecommendationSources::new(
            config.paths.users_dir.clone(),
            config.paths.popular_file.clone(),
            config.paths.chart_file.clone(),
        ),
        config.recommendations_count,
    ));

    let shutdown = CancellationToken::new();

    let job_context = JobContext::new(
        shutdown.child_token(),
        tokio::runtime::Handle::current(),
        ingestion_manager,
    );
    let mut scheduler = JobScheduler::new(shutdown.clone(), job_context);
    scheduler.register_job(Arc::new(CatalogIngestionJob::new(
        config.ingestion_interval_hours,
    )));
    info!(
        "Catalog ingestion scheduled every {} hours",
        config.ingestion_interval_hours
    );
    let scheduler_task = tokio::spawn(async move { scheduler.run().await });

    let metrics_shutdown = shutdown.clone();
    let metrics_port = config.metrics_port;
    tokio::spawn(async move {
        if let Err(e) = run_metrics_server(metrics_port, metrics_shutdown).await {
            error!("Metrics server stopped: {:#}", e);
        }
    });

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested");
                signal_shutdown.cancel();
            }
            Err(e) => error!("Could not listen for shutdown signal: {}", e),
        }
    });

    let state = ServerState::new(
        ServerConfig {
            requests_logging_level: config.logging_level.clone(),
            port: config.port,
            frontend_dir_path: config.frontend_dir_path.clone(),
        },
        catalog_store,
        stream_proxy,
        recommendation_engine,
    );

    info!("Ready to serve at port {}!", config.port);
    let result = run_server(state, shutdown.clone()).await;

    shutdown.cancel();
    if let Err(e) = scheduler_task.await {
        error!("Job scheduler task failed: {}", e);
    }
    info!("Bye");
    result
}
