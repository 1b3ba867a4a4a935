// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use pose_visibility::{Classification, LandmarkSet, PoseEstimator, decode_frame};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

// Shared application state. The detector is a single long-lived instance
// with internal tracking state, so every invocation goes through the mutex.
struct AppState {
    detector: Mutex<Box<dyn PoseEstimator>>,
}

// Request body for pose detection
#[derive(Debug, Default, Deserialize, ToSchema)]
struct DetectPoseRequest {
    /// Data-URL-style (`data:image/jpeg;base64,...`) or raw base64 frame
    #[serde(default)]
    image: String,
}

// One landmark in the response
#[derive(Serialize, ToSchema)]
struct LandmarkData {
    /// Index into the fixed 33-landmark topology
    index: usize,
    /// Normalized horizontal position [0, 1]
    x: f32,
    /// Normalized vertical position [0, 1]
    y: f32,
    /// Relative depth
    z: f32,
    /// Visibility confidence
    visibility: f32,
}

// Bounding span of the visible landmarks
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CoverageData {
    /// Horizontal span of visible landmarks, in image-width fractions
    width_ratio: f32,
    /// Vertical span of visible landmarks, in image-height fractions
    height_ratio: f32,
    /// Wide-but-short silhouette heuristic
    crowded: bool,
}

// Detection response (person found or not)
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct DetectPoseResponse {
    /// All 33 landmarks, low-visibility ones included; empty when no person
    landmarks: Vec<LandmarkData>,
    /// Capped linear ramp over the visible landmark count [0, 1]
    confidence: f32,
    /// Whether enough of the body spans enough of the frame
    full_body_visible: bool,
    /// Whether all six shoulder/elbow/wrist landmarks are visible
    upper_body_visible: bool,
    /// Bounding span of the visible landmarks
    coverage: CoverageData,
    /// Seconds since epoch at processing time
    timestamp: f64,
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    /// Error message
    error: String,
}

#[derive(Serialize, ToSchema)]
struct HealthResponse {
    /// Server status
    status: String,
    /// API version
    version: String,
}

fn timestamp_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

impl DetectPoseResponse {
    /// Zero-signal payload for a frame with no detected person.
    fn empty() -> Self {
        let classification = Classification::empty();
        Self {
            landmarks: Vec::new(),
            confidence: classification.confidence,
            full_body_visible: classification.full_body_visible,
            upper_body_visible: classification.upper_body_visible,
            coverage: CoverageData {
                width_ratio: classification.coverage.width_ratio,
                height_ratio: classification.coverage.height_ratio,
                crowded: classification.coverage.crowded,
            },
            timestamp: timestamp_now(),
        }
    }

    /// Payload for a detected person: every landmark verbatim plus the
    /// derived classification.
    fn from_detection(landmarks: &LandmarkSet) -> Self {
        let classification = Classification::from_landmarks(landmarks);
        Self {
            landmarks: landmarks
                .iter()
                .map(|l| LandmarkData {
                    index: l.index,
                    x: l.x,
                    y: l.y,
                    z: l.z,
                    visibility: l.visibility,
                })
                .collect(),
            confidence: classification.confidence,
            full_body_visible: classification.full_body_visible,
            upper_body_visible: classification.upper_body_visible,
            coverage: CoverageData {
                width_ratio: classification.coverage.width_ratio,
                height_ratio: classification.coverage.height_ratio,
                crowded: classification.coverage.crowded,
            },
            timestamp: timestamp_now(),
        }
    }
}

// OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pose Visibility Server",
        description = "Pose landmark detection with body-visibility metrics. POST a base64-encoded camera frame to `/detect-pose` and get back the full landmark list plus derived coverage signals.",
        version = "0.1.0",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(root, health, detect_pose),
    components(schemas(
        DetectPoseRequest,
        LandmarkData,
        CoverageData,
        DetectPoseResponse,
        ErrorResponse,
        HealthResponse
    )),
    tags(
        (name = "pose", description = "Pose detection endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
struct ApiDoc;

fn app(state: Arc<AppState>) -> Router {
    // Browser clients call from arbitrary origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/detect-pose", post(detect_pose))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Get model path from environment variable
    let model_path =
        env::var("POSE_MODEL_PATH").unwrap_or_else(|_| "pose_landmark_full.onnx".to_string());

    println!("Loading model: {model_path}");

    // Load the model once; it is reused across all requests
    let model = pose_visibility::OnnxPoseModel::load(&model_path)
        .unwrap_or_else(|e| panic!("Failed to load model {model_path}: {e}"));

    println!("Model loaded - {}", model.model_info());

    let state = Arc::new(AppState {
        detector: Mutex::new(Box::new(model)),
    });

    let app = app(state);

    // Get port from environment (default: 5002)
    let port = env::var("POSE_SERVER_PORT").unwrap_or_else(|_| "5002".to_string());
    let addr = format!("0.0.0.0:{port}");

    // Run our app
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Server listening on {}", listener.local_addr().unwrap());
    println!("Server listening on {}", listener.local_addr().unwrap());
    println!("Swagger UI available at http://localhost:{port}/swagger-ui/");
    axum::serve(listener, app).await.unwrap();
}

/// Root endpoint
///
/// Returns a welcome message and API information.
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Welcome message", body = String)
    )
)]
async fn root() -> &'static str {
    "Pose Visibility Server - POST /detect-pose with a base64 frame. Swagger UI at /swagger-ui/"
}

/// Health check endpoint
///
/// Returns server health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse)
    )
)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Run pose detection on a base64-encoded frame
///
/// The body is read leniently: a missing or non-JSON body counts as an
/// empty request, which fails frame decoding and yields the 400 response.
/// A valid frame with no detectable person is not an error; it returns the
/// zero-signal payload with an empty landmark list.
#[utoipa::path(
    post,
    path = "/detect-pose",
    tag = "pose",
    request_body = DetectPoseRequest,
    responses(
        (status = 200, description = "Detection ran (person found or not)", body = DetectPoseResponse),
        (status = 400, description = "Missing or undecodable frame", body = ErrorResponse),
        (status = 500, description = "Inference fault", body = ErrorResponse)
    )
)]
async fn detect_pose(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<DetectPoseResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request: DetectPoseRequest = serde_json::from_slice(&body).unwrap_or_default();

    let Some(frame) = decode_frame(&request.image) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid frame".to_string(),
            }),
        ));
    };

    // One detection at a time; the model instance carries tracking state
    let mut detector = state.detector.lock().await;
    let detection = match detector.detect(&frame) {
        Ok(detection) => detection,
        Err(e) => {
            // Outside the adapter contract; nothing to recover locally
            tracing::error!("inference fault: {e}");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Inference failed: {e}"),
                }),
            ));
        }
    };
    drop(detector);

    let response = match detection {
        Some(landmarks) => DetectPoseResponse::from_detection(&landmarks),
        None => DetectPoseResponse::empty(),
    };

    Ok(Json(response))
}
