use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use common::{
    encoding, HealthResponse, InfoResponse, ModelConfig, ModelsConfig, Outcome, PatientReport,
    PredictResponse, ENCODING_VERSION,
};
use serde_json::json;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};
use sysinfo::System;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

mod gateway;
mod page;

use gateway::{OnnxGateway, OutcomeModel};

// Application state, shared read-only across submissions
struct AppState {
    model: Arc<dyn OutcomeModel>,
    model_config: ModelConfig,
    model_load_time_ms: f64,
    total_requests: AtomicU64,
    system: Arc<tokio::sync::Mutex<System>>,
}

// Error handling
#[derive(Debug)]
enum AppError {
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter("typhoid_server=info,tower_http=info")
        .init();

    info!("======================================================================");
    info!("Typhoid Outcome Prediction Server - Starting");
    info!("======================================================================");

    // Load configuration
    let model_name =
        std::env::var("MODEL_NAME").unwrap_or_else(|_| "typhoid-outcome-v2".to_string());
    info!("Model: {}", model_name);

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/models.yaml".to_string());
    let models_config = ModelsConfig::load(&config_path)?;
    let model_config = models_config
        .get_model(&model_name)
        .ok_or_else(|| anyhow::anyhow!("Model {} not found in config", model_name))?
        .clone();

    // The artifact was trained against one exact code table and feature
    // order; serving with any other is silently meaningless, so refuse
    // to start.
    if model_config.encoding_version != ENCODING_VERSION {
        error!(
            "Artifact was trained with encoding version {}, this binary encodes version {}",
            model_config.encoding_version, ENCODING_VERSION
        );
        return Err(anyhow::anyhow!("Encoding version mismatch"));
    }
    if model_config.num_features != encoding::FEATURE_COUNT {
        error!(
            "Config declares {} features, encoder produces {}",
            model_config.num_features,
            encoding::FEATURE_COUNT
        );
        return Err(anyhow::anyhow!("Feature count mismatch"));
    }

    // Load model
    info!("Loading model: {}", model_config.name);
    let start_time = Instant::now();

    let artifact = &model_config.artifact;
    info!("Artifact path: {}", artifact);

    if !std::path::Path::new(artifact).exists() {
        error!("Classifier artifact not found at {}", artifact);
        error!("Please run: python3 scripts/export_onnx.py");
        return Err(anyhow::anyhow!("Model file not found"));
    }

    let pool_size = std::env::var("POOL_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(4);

    let model = OnnxGateway::load(&model_config, pool_size)?;

    let model_load_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    info!("✓ Model loaded in {:.2}ms", model_load_time_ms);
    info!("  ONNX Runtime version: 2.0.0-rc.10");
    info!("  Pool size: {} sessions", pool_size);
    info!("  Encoding version: {}", ENCODING_VERSION);
    info!("");

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);

    // Create application state
    let state = Arc::new(AppState {
        model: Arc::new(model),
        model_config,
        model_load_time_ms,
        total_requests: AtomicU64::new(0),
        system: Arc::new(tokio::sync::Mutex::new(System::new_all())),
    });

    let app = router(state);

    info!("Server ready on http://0.0.0.0:{}", port);
    info!("======================================================================");

    // Start server
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(form_page))
        .route("/predict", post(predict_form))
        .route("/api/predict", post(predict_api))
        .route("/health", get(health))
        .route("/info", get(info_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Encode, predict, classify. Runs to completion within the request; the
// shared model is never touched mutably.
fn run_prediction(state: &AppState, report: &PatientReport) -> Result<(Outcome, i64), AppError> {
    let features = encoding::encode(report);
    let label = state.model.predict(&features)?;
    state.total_requests.fetch_add(1, Ordering::Relaxed);
    Ok((Outcome::from_label(label), label))
}

async fn form_page(State(_state): State<Arc<AppState>>) -> Html<String> {
    Html(page::render(&PatientReport::default(), None))
}

async fn predict_form(
    State(state): State<Arc<AppState>>,
    Form(report): Form<PatientReport>,
) -> Result<Html<String>, AppError> {
    let (outcome, _) = run_prediction(&state, &report)?;
    Ok(Html(page::render(&report, Some(outcome))))
}

async fn predict_api(
    State(state): State<Arc<AppState>>,
    Json(report): Json<PatientReport>,
) -> Result<Json<PredictResponse>, AppError> {
    let start_time = Instant::now();

    let (outcome, label) = run_prediction(&state, &report)?;

    let inference_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    Ok(Json(PredictResponse {
        outcome: outcome.to_string(),
        label,
        inference_time_ms,
    }))
}

async fn health(State(_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: true,
    })
}

async fn info_handler(State(state): State<Arc<AppState>>) -> Result<Json<InfoResponse>, AppError> {
    let mut system = state.system.lock().await;
    system.refresh_all();

    let process = system.process(sysinfo::get_current_pid().unwrap()).unwrap();
    let memory_rss_mb = process.memory() as f64 / 1024.0 / 1024.0;
    let cpu_percent = process.cpu_usage();

    // Convert model config to HashMap
    let mut model_configuration = HashMap::new();
    model_configuration.insert("name".to_string(), json!(state.model_config.name));
    model_configuration.insert("type".to_string(), json!(state.model_config.model_type));
    model_configuration.insert(
        "num_features".to_string(),
        json!(state.model_config.num_features),
    );
    model_configuration.insert(
        "encoding_version".to_string(),
        json!(state.model_config.encoding_version),
    );

    let cpu_count = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    Ok(Json(InfoResponse {
        service: "typhoid-onnx".to_string(),
        model_name: std::env::var("MODEL_NAME")
            .unwrap_or_else(|_| "typhoid-outcome-v2".to_string()),
        model_configuration,
        model_load_time_ms: state.model_load_time_ms,
        total_requests: state.total_requests.load(Ordering::Relaxed),
        runtime_version: "2.0.0-rc.10".to_string(),
        device: "CPU (oneDNN)".to_string(),
        cpu_count,
        memory_rss_mb,
        cpu_percent,
    }))
}
