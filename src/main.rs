//! HTTP entry point for the school feedback service.
//!
//! Serves the two-endpoint feedback API over a CSV-backed store. The
//! schema variant, data file, and bind address are chosen on the command
//! line.

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use anyhow::Result;
use clap::Parser;
use school_feedback::model::SchemaVariant;
use school_feedback::services;
use school_feedback::store::FeedbackStore;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "school_feedback")]
#[command(about = "A feedback collection API for schools and teachers", long_about = None)]
struct Cli {
    /// Record schema to serve
    #[arg(short, long, value_enum, default_value = "school-teacher")]
    variant: SchemaVariant,

    /// CSV file holding feedback records
    #[arg(short, long, default_value = "feedback.csv")]
    data_file: String,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    port: u16,
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/school_feedback.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("school_feedback.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let store = web::Data::new(FeedbackStore::open(&cli.data_file, cli.variant)?);
    info!(
        path = %cli.data_file,
        variant = ?cli.variant,
        "Feedback store ready"
    );

    info!(host = %cli.host, port = cli.port, "Server starting");

    HttpServer::new(move || {
        // Browser clients are served from arbitrary origins.
        App::new()
            .wrap(Cors::permissive())
            .app_data(store.clone())
            .service(services::feedback::configure_routes())
    })
    .bind((cli.host.as_str(), cli.port))?
    .run()
    .await?;

    Ok(())
}
