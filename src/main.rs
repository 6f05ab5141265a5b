use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use scholarship_intake::config::AppConfig;
use scholarship_intake::error::AppError;
use scholarship_intake::telemetry;
use scholarship_intake::workflows::intake::{
    intake_router, BatchSummary, IntakeService, LoggingNotifier, MemoryStore, ScholarshipRule,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Scholarship Intake Service",
    about = "Run the scholarship application intake service or an offline bulk ingestion",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a CSV batch offline against a seeded in-memory store
    Ingest(IngestArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// JSON file of scholarship rules to seed the in-memory store
    #[arg(long)]
    scholarships: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct IngestArgs {
    /// CSV file of applications to ingest
    #[arg(long)]
    csv: PathBuf,
    /// JSON file of scholarship rules to seed the in-memory store
    #[arg(long)]
    scholarships: PathBuf,
    /// Apply one scholarship id to every row, ignoring the CSV column
    #[arg(long)]
    scholarship_id: Option<i64>,
    /// Deadline evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Ingest(args) => run_ingest(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn load_scholarships(path: &Path) -> Result<Vec<ScholarshipRule>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(AppError::Seed)
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let seed_path = args.scholarships.or(config.intake.scholarship_seed.clone());
    let scholarships = match &seed_path {
        Some(path) => load_scholarships(path)?,
        None => Vec::new(),
    };
    info!(count = scholarships.len(), "scholarship rules loaded");

    let store = Arc::new(MemoryStore::with_scholarships(scholarships));
    let notifier = Arc::new(LoggingNotifier);
    let service = Arc::new(IntakeService::new(store, notifier));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(intake_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "scholarship intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_ingest(args: IngestArgs) -> Result<(), AppError> {
    let IngestArgs {
        csv,
        scholarships,
        scholarship_id,
        today,
    } = args;

    let rules = load_scholarships(&scholarships)?;
    let store = Arc::new(MemoryStore::with_scholarships(rules));
    let notifier = Arc::new(LoggingNotifier);
    let service = IntakeService::new(store, notifier);

    let text = std::fs::read_to_string(&csv)?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let summary = service.ingest_csv(&text, scholarship_id, today)?;

    render_batch_summary(&summary);
    Ok(())
}

fn render_batch_summary(summary: &BatchSummary) {
    println!("Bulk ingestion summary");
    println!(
        "Inserted: {} | Duplicates: {} | Errors: {} | Rows: {}",
        summary.inserted,
        summary.duplicates,
        summary.errors,
        summary.total_rows()
    );

    for outcome in &summary.rows {
        let detail = match (&outcome.message, &outcome.email) {
            (Some(message), Some(email)) => format!(" ({email}: {message})"),
            (Some(message), None) => format!(" ({message})"),
            (None, Some(email)) => format!(" ({email})"),
            (None, None) => String::new(),
        };
        println!("- row {}: {}{}", outcome.row, outcome.status.label(), detail);
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
