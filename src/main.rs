use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use lendgate::auth::{auth_router, AuthGate, AuthRouterState};
use lendgate::config::AppConfig;
use lendgate::error::AppError;
use lendgate::infra::{InMemoryApplicationRepository, InMemoryAuthProvider, TracingNotifier};
use lendgate::intake::{
    intake_router, ApplicationInput, ApplicationIntakeService, IntakeRouterState,
};
use lendgate::security::events::TracingEventSink;
use lendgate::security::rate_limit::RateLimiter;
use lendgate::security::sanitize::sanitize_input;
use lendgate::security::validation::validate_application;
use lendgate::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;
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
    name = "Lendgate",
    about = "Run the lead-intake security gate service from the command line",
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
    /// Inspect the security gate offline
    Gate {
        #[command(subcommand)]
        command: GateCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum GateCommand {
    /// Run an application payload through validation and sanitization
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// JSON file with the application payload; stdin when omitted
    #[arg(long)]
    file: Option<PathBuf>,
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
        Command::Gate {
            command: GateCommand::Check(args),
        } => run_gate_check(args),
    }
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    // The rate limiter is shared so every guarded action draws from the same
    // process-wide attempt map.
    let limiter = Arc::new(RateLimiter::new());
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let provider = Arc::new(InMemoryAuthProvider::default());
    let notifier = Arc::new(TracingNotifier);
    let events = Arc::new(TracingEventSink);

    let intake = Arc::new(ApplicationIntakeService::new(
        repository,
        notifier.clone(),
        events.clone(),
        limiter.clone(),
        config.security.clone(),
    ));
    let gate = Arc::new(AuthGate::new(
        provider.clone(),
        notifier,
        events,
        limiter,
        config.security.clone(),
    ));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(intake_router(IntakeRouterState {
            service: intake,
            provider: provider.clone(),
        }))
        .merge(auth_router(AuthRouterState { gate }))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lead-intake gate ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_gate_check(args: CheckArgs) -> Result<(), AppError> {
    let raw = match args.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let input: ApplicationInput = match serde_json::from_str(&raw) {
        Ok(input) => input,
        Err(err) => {
            println!("Payload does not parse as an application: {err}");
            return Ok(());
        }
    };

    let config = AppConfig::load()?;
    match validate_application(&input, &config.security.limits) {
        Ok(()) => {
            println!("Validation: passed");
            println!("Sanitized fields:");
            println!("- name: {}", sanitize_input(&input.name));
            println!("- address: {}", sanitize_input(&input.address));
            println!("- annual_income: {}", sanitize_input(&input.annual_income));
            println!(
                "- job_description: {}",
                sanitize_input(&input.job_description)
            );
        }
        Err(report) => {
            println!("Validation: failed");
            for error in report.errors() {
                println!("- {error}");
            }
        }
    }

    Ok(())
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
