// # dyndnsd - Dynamic DNS Update Daemon
//
// The dyndnsd daemon is a thin integration layer. It is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building the S3/file config store and the Route 53 client
// 4. Serving inbound events over HTTP until SIGTERM/SIGINT
//
// All request logic lives in dyndns-core.
//
// ## Configuration
//
// ### Config document
// - `DYNDNS_CONFIG_SOURCE`: Where to read it from (s3, file). Default: s3
// - `DYNDNS_CONFIG_BUCKET`: Bucket name (required)
// - `DYNDNS_CONFIG_KEY`: Object key. Default: DynDNSConf.txt
// - `DYNDNS_CONFIG_REGION`: Bucket region. Default: eu-west-1
// - `DYNDNS_CONFIG_ROOT`: Local directory holding `<bucket>/<key>` (for file)
//
// ### Zone API
// - `DYNDNS_ZONE_REGION`: Route 53 signing region. Default: us-east-1
// - `DYNDNS_ON_RECORD_ERROR`: continue or abort on a failed change. Default: continue
// - `DYNDNS_MODE`: Set to `dry-run` to log changes instead of sending them
//
// ### Credentials
// - `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN` (optional)
//
// ### Server
// - `DYNDNS_LISTEN_ADDR`: Default: 0.0.0.0:8080
// - `DYNDNS_LOG_LEVEL`: trace, debug, info, warn, error. Default: info
//
// ## Example
//
// ```bash
// export DYNDNS_CONFIG_BUCKET=my-dyndns-config
// export AWS_ACCESS_KEY_ID=...
// export AWS_SECRET_ACCESS_KEY=...
//
// dyndnsd
// ```

mod config;
mod server;

use anyhow::Result;
use dyndns_aws::{Route53Client, S3ObjectStore};
use dyndns_core::traits::{ObjectStore, ZoneApi};
use dyndns_core::{FileObjectStore, RequestHandler};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::config::{Config, ConfigSource};
use crate::server::{AppState, router};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// How long in-flight requests may run after a shutdown signal
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DyndnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DyndnsExitCode> for ExitCode {
    fn from(code: DyndnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DyndnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DyndnsExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DyndnsExitCode::ConfigError.into();
    }

    info!("Starting dyndnsd daemon");
    info!(
        "Config document: {:?} {}/{}",
        config.config_source, config.config_bucket, config.config_key
    );

    let handler = match build_handler(&config) {
        Ok(handler) => handler,
        Err(e) => {
            error!("Failed to initialize collaborators: {}", e);
            return DyndnsExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DyndnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(&config, handler).await {
            error!("Daemon error: {}", e);
            DyndnsExitCode::RuntimeError
        } else {
            DyndnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Wire the configured collaborators into a request handler
fn build_handler(config: &Config) -> Result<RequestHandler> {
    let object_store: Arc<dyn ObjectStore> = match config.config_source {
        ConfigSource::S3 => Arc::new(S3ObjectStore::new(
            config.credentials.clone(),
            config.config_region.clone(),
        )?),
        ConfigSource::File(ref root) => Arc::new(FileObjectStore::new(root.clone())),
    };

    if config.dry_run {
        warn!("Route 53 client running in DRY-RUN mode - no changes will be made");
    }
    let zone_api = Arc::new(Route53Client::new(
        config.credentials.clone(),
        config.zone_region.clone(),
        config.dry_run,
    )?);

    info!(
        "Using {} config store and {} zone API",
        object_store.store_name(),
        zone_api.api_name()
    );

    Ok(RequestHandler::new(
        object_store,
        zone_api,
        config.resolver_settings(),
        config.reconcile_options()?,
    ))
}

/// Serve requests until a shutdown signal arrives
async fn run_daemon(config: &Config, handler: RequestHandler) -> Result<()> {
    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

    info!("Listening on {}", addr);

    let app = router(AppState::new(handler));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    let mut server = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .await
    });

    let received = tokio::select! {
        result = &mut server => {
            return match result {
                Ok(Ok(())) => Err(anyhow::anyhow!("Server stopped unexpectedly")),
                Ok(Err(e)) => Err(anyhow::anyhow!("Server error: {}", e)),
                Err(e) => Err(anyhow::anyhow!("Server task failed: {}", e)),
            };
        }
        name = wait_for_shutdown() => name?,
    };

    info!("Received shutdown signal: {}", received);
    info!("Draining in-flight requests");
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(SHUTDOWN_GRACE, server).await {
        Ok(Ok(Ok(()))) => {
            info!("Shutting down daemon");
            Ok(())
        }
        Ok(Ok(Err(e))) => Err(anyhow::anyhow!("Server error: {}", e)),
        Ok(Err(e)) => Err(anyhow::anyhow!("Server task failed: {}", e)),
        Err(_) => Err(anyhow::anyhow!("Shutdown timeout after {:?}", SHUTDOWN_GRACE)),
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
