//! HTTP surface: chat page, question answering and audio transcription.

mod frontend;

use crate::error::RagdeskError;
use crate::normalize::Normalizer;
use crate::rag::AnswerPipeline;
use crate::transcription::Transcriber;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, FromRequest, Multipart, Request, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Multipart field carrying the recorded clip.
const AUDIO_FIELD: &str = "audio";
/// Form field carrying the question.
const INPUT_FIELD: &str = "user_input";
const MISSING_INPUT: &str = "No user input provided";
const AUDIO_PROCESSED: &str = "音頻已處理";
const MISSING_AUDIO: &str = "沒有接收到音訊文件";

/// Shared application state.
pub struct AppState {
    pub pipeline: AnswerPipeline,
    pub transcriber: Arc<dyn Transcriber>,
    pub normalizer: Arc<dyn Normalizer>,
    /// Filename sent with every clip so the transcription API can detect the codec.
    pub audio_filename: String,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        pipeline: AnswerPipeline,
        transcriber: Arc<dyn Transcriber>,
        normalizer: Arc<dyn Normalizer>,
    ) -> Self {
        Self {
            pipeline,
            transcriber,
            normalizer,
            audio_filename: "transcript.wav".to_string(),
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }

    pub fn with_audio_filename(mut self, filename: &str) -> Self {
        self.audio_filename = filename.to_string();
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/", get(frontend::index_handler))
        .route("/static/index.js", get(frontend::js_handler))
        .route("/health", get(health))
        .route("/get_response", post(get_response))
        .route("/upload-audio", post(upload_audio))
        .route("/reset", post(reset))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: &str, state: Arc<AppState>) -> crate::error::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AskForm {
    #[serde(default)]
    user_input: Option<String>,
}

#[derive(Serialize)]
struct AnswerResponse {
    response: String,
}

#[derive(Serialize)]
struct TranscriptResponse {
    message: String,
    transcript: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Map a pipeline error to a status code and JSON body.
fn failure(e: RagdeskError) -> Response {
    match e {
        RagdeskError::InvalidInput(msg) => error_response(StatusCode::BAD_REQUEST, msg),
        e if e.is_upstream() => {
            error!("Upstream dependency failure: {}", e);
            error_response(
                StatusCode::BAD_GATEWAY,
                format!("Upstream dependency failure: {}", e),
            )
        }
        e => {
            error!("Request failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let turns = state.pipeline.history().len().await;
    Json(serde_json::json!({ "status": "ok", "turns": turns }))
}

async fn reset(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.pipeline.history().clear().await;
    info!("Conversation history cleared");
    Json(serde_json::json!({ "status": "ok" }))
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
}

/// Read `user_input` from a urlencoded or multipart form. `None` when the
/// field is absent or the body is not a readable form.
async fn read_user_input(request: Request) -> Option<String> {
    if is_multipart(&request) {
        let mut multipart = match Multipart::from_request(request, &()).await {
            Ok(multipart) => multipart,
            Err(rejection) => {
                debug!("Unreadable multipart form: {}", rejection);
                return None;
            }
        };
        loop {
            match multipart.next_field().await {
                Ok(Some(field)) if field.name() == Some(INPUT_FIELD) => {
                    return field.text().await.ok();
                }
                Ok(Some(_)) => continue,
                Ok(None) => return None,
                Err(e) => {
                    debug!("Malformed multipart form: {}", e);
                    return None;
                }
            }
        }
    }

    match Form::<AskForm>::from_request(request, &()).await {
        Ok(Form(form)) => form.user_input,
        Err(rejection) => {
            debug!("Unreadable form: {}", rejection);
            None
        }
    }
}

async fn get_response(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let user_input = match read_user_input(request).await {
        Some(input) if !input.trim().is_empty() => input,
        _ => return Json(ErrorResponse { error: MISSING_INPUT.to_string() }).into_response(),
    };

    match state.pipeline.answer(&user_input).await {
        Ok(answer) => Json(AnswerResponse {
            response: answer.response,
        })
        .into_response(),
        Err(e) => failure(e),
    }
}

/// Pull the audio field out of a multipart body. `Ok(None)` when absent or empty.
///
/// Errors carry the status the multipart layer assigned, so an upload over the
/// body limit surfaces as 413 rather than a generic 400.
async fn read_audio_field(
    mut multipart: Multipart,
) -> Result<Option<Vec<u8>>, (StatusCode, String)> {
    let reject = |e: MultipartError| (e.status(), e.body_text());
    while let Some(field) = multipart.next_field().await.map_err(reject)? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let bytes = field.bytes().await.map_err(reject)?;
        if bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(bytes.to_vec()));
    }
    Ok(None)
}

async fn upload_audio(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let audio = match multipart {
        Ok(multipart) => match read_audio_field(multipart).await {
            Ok(audio) => audio,
            Err((status, msg)) => {
                warn!("Rejected audio upload ({}): {}", status, msg);
                return error_response(status, msg);
            }
        },
        Err(rejection) => {
            debug!("Not a multipart request: {}", rejection);
            None
        }
    };

    let Some(audio) = audio else {
        return error_response(StatusCode::BAD_REQUEST, MISSING_AUDIO);
    };

    info!("Received audio clip of {} bytes", audio.len());

    match state
        .transcriber
        .transcribe(audio, &state.audio_filename)
        .await
    {
        Ok(text) => Json(TranscriptResponse {
            message: AUDIO_PROCESSED.to_string(),
            transcript: state.normalizer.normalize(&text),
        })
        .into_response(),
        Err(e) => failure(e),
    }
}
