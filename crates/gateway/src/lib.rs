//! HTTP listener for meldgate.
//!
//! Exposes the search endpoint of the registry web interface: JSON in,
//! JSON out, permissive CORS so the static test page can call it from any
//! origin. Recoverable composition failures map to 400 with a structured
//! body; contract violations and backend failures map to 500 in the
//! `{"status": "ERROR", "message": …}` shape callers already consume.
//!
//! Built on Axum.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use meldgate_config::AppConfig;
use meldgate_core::error::{Error, FragmentError, ValidationError};
use meldgate_core::query::{QueryInput, QueryRequest};
use meldgate_transport::{EngineBridge, EngineSettings, SoapClient, parse_response};

/// Which backend executes composed documents.
pub enum Backend {
    /// Send directly to the registry's SOAP endpoint.
    Soap(SoapClient),
    /// Hand off to the external JVM engine as a subprocess.
    Bridge(EngineBridge),
    /// Compose-only mode; `/search` is unavailable.
    None,
}

/// Shared application state for the gateway.
pub struct GatewayState {
    pub config: AppConfig,
    pub backend: Backend,
}

type SharedState = Arc<GatewayState>;

/// Build the backend selected by the configuration.
pub fn build_backend(config: &AppConfig) -> Result<Backend, Error> {
    match config.backend.as_str() {
        "soap" => Ok(Backend::Soap(SoapClient::new(config.soap.endpoint.clone())?)),
        "bridge" => Ok(Backend::Bridge(EngineBridge::new(EngineSettings {
            java_home: config.engine.java_home.clone(),
            classpath: config.engine.classpath.clone(),
            main_class: config.engine.main_class.clone(),
            timeout_secs: config.engine.timeout_secs,
        }))),
        _ => Ok(Backend::None),
    }
}

/// Build the Axum router with all gateway routes.
///
/// CORS mirrors the reference test server: any origin, POST/OPTIONS,
/// Content-Type header. Preflight requests are answered by the CORS layer.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::POST, axum::http::Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/compose", post(compose_handler))
        .route("/search", post(search_handler))
        .with_state(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let backend = build_backend(&config)?;
    let state = Arc::new(GatewayState { config, backend });
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct ComposeResponse {
    status: &'static str,
    document: String,
}

/// Run the composition engine and return the rendered document without
/// sending it anywhere.
async fn compose_handler(
    Json(input): Json<QueryInput>,
) -> Result<Json<ComposeResponse>, ApiError> {
    let document = meldgate_compose::compose_input(input)?;
    Ok(Json(ComposeResponse {
        status: "OK",
        document,
    }))
}

/// Compose a document and execute it against the configured backend.
async fn search_handler(
    State(state): State<SharedState>,
    Json(input): Json<QueryInput>,
) -> Result<Json<Value>, ApiError> {
    let query = QueryRequest::normalize(input).validate()?;
    let document = meldgate_compose::compose(&query)?;

    let result = match &state.backend {
        Backend::Soap(client) => {
            let response = client.send(&document).await?;
            parse_response(&response)?
        }
        Backend::Bridge(bridge) => bridge.invoke(&document).await?,
        Backend::None => {
            return Err(ApiError(Error::Config {
                message: "no backend configured for /search".into(),
            }));
        }
    };

    Ok(Json(result))
}

// --- Error mapping ---

/// JSON error body in the reference shape, with structured detail where the
/// caller can act on it.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, detail) = classify(&self.0);
        let mut body = json!({
            "status": "ERROR",
            "code": code,
            "message": self.0.to_string(),
        });
        if let Some((key, value)) = detail {
            body[key] = value;
        }
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        (status, Json(body)).into_response()
    }
}

fn classify(error: &Error) -> (StatusCode, &'static str, Option<(&'static str, Value)>) {
    match error {
        Error::Validation(ValidationError::IncompleteAddress { missing }) => (
            StatusCode::BAD_REQUEST,
            "INCOMPLETE_ADDRESS",
            Some(("missing", json!(missing))),
        ),
        Error::Validation(ValidationError::UnsupportedMessageType { allowed, .. }) => (
            StatusCode::BAD_REQUEST,
            "UNSUPPORTED_MESSAGE_TYPE",
            Some(("allowed", json!(allowed))),
        ),
        Error::Fragment(FragmentError::StartsWithText) => (
            StatusCode::BAD_REQUEST,
            "FRAGMENT_STARTS_WITH_TEXT",
            None,
        ),
        Error::Fragment(FragmentError::Malformed(_)) => {
            (StatusCode::BAD_REQUEST, "MALFORMED_FRAGMENT", None)
        }
        Error::Contract { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "CONTRACT_VIOLATION",
            None,
        ),
        Error::Transport(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "TRANSPORT_ERROR",
            None,
        ),
        Error::Engine(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ENGINE_ERROR", None),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = Arc::new(GatewayState {
            config: AppConfig::default(),
            backend: Backend::None,
        });
        build_router(state)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn compose_returns_the_rendered_document() {
        let response = test_app()
            .oneshot(post_json(
                "/compose",
                r#"{"vorname": "Max", "nachname": "Mustermann", "geburtsdatum": "1990-05-17"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "OK");
        assert!(
            body["document"]
                .as_str()
                .unwrap()
                .contains("datenabruf.freieSuche.suchanfrage.1332")
        );
    }

    #[tokio::test]
    async fn incomplete_address_maps_to_400_with_missing_list() {
        let response = test_app()
            .oneshot(post_json(
                "/compose",
                r#"{"vorname": "Max", "nachname": "Mustermann", "geburtsdatum": "1990", "plz": "80331"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ERROR");
        assert_eq!(body["code"], "INCOMPLETE_ADDRESS");
        assert_eq!(body["missing"], json!(["strasse", "ort"]));
    }

    #[tokio::test]
    async fn unsupported_message_type_maps_to_400_with_allowed_list() {
        let response = test_app()
            .oneshot(post_json(
                "/compose",
                r#"{"messageType": "9999", "vorname": "Max", "nachname": "Mustermann", "geburtsdatum": "1990"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "UNSUPPORTED_MESSAGE_TYPE");
        assert_eq!(body["allowed"], json!(["1332", "1330"]));
    }

    #[tokio::test]
    async fn malformed_fragment_maps_to_400() {
        let response = test_app()
            .oneshot(post_json(
                "/compose",
                r#"{"vorname": "Max", "nachname": "Mustermann", "geburtsdatum": "1990", "customXml": "<foo>bar"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "MALFORMED_FRAGMENT");
    }

    #[tokio::test]
    async fn missing_required_field_maps_to_500() {
        let response = test_app()
            .oneshot(post_json("/compose", r#"{"nachname": "Mustermann"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], "CONTRACT_VIOLATION");
    }

    #[tokio::test]
    async fn search_without_backend_maps_to_500() {
        let response = test_app()
            .oneshot(post_json(
                "/search",
                r#"{"vorname": "Max", "nachname": "Mustermann", "geburtsdatum": "1990"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
