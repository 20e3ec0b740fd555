//! argus-server: object detection serving over HTTP and gRPC
//!
//! Loads the detection model once at startup, then serves the same
//! operation set on both transports through one shared service. A failed
//! model load aborts the process; there is no degraded mode without it.

use anyhow::Context;
use argus_core::ServerConfig;
use argus_server::{create_router, ApiState, InstanceDetectorService, Metrics, PredictionService};
use argus_vision::{builtin_categories, load_categories, Detector, Device, ImageFetcher, OnnxBackend};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "argus-server", version, about = "Object detection serving over HTTP and gRPC")]
struct Args {
    /// Path to a JSON or TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP listen port (overrides config)
    #[arg(long)]
    http_port: Option<u16>,

    /// gRPC listen port (overrides config)
    #[arg(long)]
    grpc_port: Option<u16>,

    /// Path to the exported detection model (overrides config)
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Newline-delimited category list overriding the built-in table
    #[arg(long)]
    labels_path: Option<PathBuf>,

    /// Inference device, "cpu" or "cuda" (overrides config)
    #[arg(long)]
    device: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    // Precedence: defaults < ARGUS_* environment < config file < flags.
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ServerConfig::from_env(),
    };
    apply_overrides(&mut config, &args);
    config.validate().context("invalid configuration")?;

    let categories = match &config.detector.labels_path {
        Some(path) => load_categories(path)
            .with_context(|| format!("failed to load categories from {}", path.display()))?,
        None => builtin_categories(),
    };
    info!("category table has {} entries", categories.len());

    // The model loads before either listener binds, so a process that
    // answers health checks at all has finished initializing.
    let device: Device = config.detector.device.parse()?;
    let backend = OnnxBackend::load(&config.detector.model_path, device)?;
    let detector = Detector::new(
        Box::new(backend),
        categories,
        config.detector.max_image_pixels,
    );
    let fetcher = ImageFetcher::new(&config.fetcher);
    let service = Arc::new(PredictionService::new(detector, fetcher, Metrics::new()));

    let http_addr: SocketAddr = format!("{}:{}", config.http.bind_address, config.http.port)
        .parse()
        .context("invalid HTTP bind address")?;
    let grpc_addr: SocketAddr = format!("{}:{}", config.grpc.bind_address, config.grpc.port)
        .parse()
        .context("invalid gRPC bind address")?;

    let router = create_router(ApiState {
        service: service.clone(),
    });
    let listener = tokio::net::TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", http_addr))?;
    info!("HTTP server listening on http://{}", http_addr);
    let mut http_task = tokio::spawn(async move { axum::serve(listener, router).await });

    let grpc_service = InstanceDetectorService::new(service).into_server();
    info!("gRPC server listening on {} (plaintext)", grpc_addr);
    let mut grpc_task = tokio::spawn(
        tonic::transport::Server::builder()
            .add_service(grpc_service)
            .serve(grpc_addr),
    );

    tokio::select! {
        _ = wait_for_shutdown() => {
            info!("shutdown signal received");
        }
        result = &mut http_task => {
            result.context("HTTP server task panicked")?
                .context("HTTP server failed")?;
        }
        result = &mut grpc_task => {
            result.context("gRPC server task panicked")?
                .context("gRPC server failed")?;
        }
    }

    http_task.abort();
    grpc_task.abort();
    info!("argus-server stopped");
    Ok(())
}

fn apply_overrides(config: &mut ServerConfig, args: &Args) {
    if let Some(port) = args.http_port {
        config.http.port = port;
    }
    if let Some(port) = args.grpc_port {
        config.grpc.port = port;
    }
    if let Some(path) = &args.model_path {
        config.detector.model_path = path.clone();
    }
    if let Some(path) = &args.labels_path {
        config.detector.labels_path = Some(path.clone());
    }
    if let Some(device) = &args.device {
        config.detector.device = device.clone();
    }
}

/// Wait for shutdown signal
async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
