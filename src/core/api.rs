//! HTTP + WebSocket API for blink detection sessions
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /session/new - Start a session (detector config in the body)
//! - GET /session/{id} - Session status
//! - POST /session/{id}/sample - Feed one frame (eye sample or face frame)
//! - DELETE /session/{id} - Stop a session
//! - WS /ws/{id} - Live blink notices

use axum::{
    extract::{ws::{Message, WebSocket}, Path, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use crate::core::{BlinkCounter, BlinkObserver, EyeBlinkDetector};
use crate::types::{DecisionReason, DetectorConfig, DetectorPhase, EyeBlink, InputLine};
use crate::{BlinkError, DEFAULT_COOL_DOWN_SECS, DEFAULT_SENSITIVITY};

/// One running detection session
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub detector: EyeBlinkDetector,
    /// Swap sensor left/right for face frames (front camera)
    pub mirrored: bool,
    pub blinks: BlinkCounter,
    pub update_count: u64,
    /// Timestamp of the latest frame fed
    pub last_frame: Option<Duration>,
    pub notice_tx: broadcast::Sender<BlinkNotice>,
}

/// Live blink message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlinkNotice {
    pub session_id: String,
    pub blink: EyeBlink,
    pub timestamp_s: f64,
}

/// App state
#[derive(Default)]
pub struct AppState {
    pub sessions: RwLock<HashMap<String, Session>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receiver for the blink notices of one session
    pub async fn subscribe(&self, id: &str) -> crate::Result<broadcast::Receiver<BlinkNotice>> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(id)
            .ok_or_else(|| BlinkError::SessionNotFound(id.to_string()))?;
        Ok(session.notice_tx.subscribe())
    }
}

/// Start session request
#[derive(Debug, Deserialize)]
pub struct NewSessionRequest {
    pub detect_both_eyes: bool,
    pub sensitivity: Option<f32>,
    pub cool_down_secs: Option<f64>,
    pub mirrored: Option<bool>,
}

/// Start session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
    pub config: DetectorConfig,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub phase: DetectorPhase,
    pub last_blink_secs: Option<f64>,
    pub blink_count: u64,
    pub blinks: BlinkCounter,
    pub update_count: u64,
    pub config: DetectorConfig,
}

/// Feed sample response
#[derive(Debug, Serialize)]
pub struct SampleResponse {
    pub blink: Option<EyeBlink>,
    pub reason: DecisionReason,
    pub phase: Option<DetectorPhase>,
    pub left_closed: bool,
    pub right_closed: bool,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for BlinkError {
    fn into_response(self) -> Response {
        let status = match self {
            BlinkError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            BlinkError::InvalidConfig(_) | BlinkError::FrameParse { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Create the API router with fresh state
pub fn create_router() -> Router {
    router_with_state(Arc::new(AppState::new()))
}

/// Create the API router over existing state
pub fn router_with_state(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session).delete(stop_session))
        .route("/session/:id/sample", post(feed_sample))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

/// Start a session
async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewSessionRequest>,
) -> Result<Json<NewSessionResponse>, BlinkError> {
    let config = DetectorConfig::builder(req.detect_both_eyes)
        .sensitivity(req.sensitivity.unwrap_or(DEFAULT_SENSITIVITY))
        .cool_down_secs(req.cool_down_secs.unwrap_or(DEFAULT_COOL_DOWN_SECS))
        .build()?;

    let session_id = generate_session_id();
    let (tx, _) = broadcast::channel(100);

    let session = Session {
        id: session_id.clone(),
        detector: EyeBlinkDetector::new(config),
        mirrored: req.mirrored.unwrap_or(true),
        blinks: BlinkCounter::new(),
        update_count: 0,
        last_frame: None,
        notice_tx: tx,
    };

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), session);
    info!(session = %session_id, ?config, "session started");

    Ok(Json(NewSessionResponse {
        websocket_url: format!("/ws/{}", session_id),
        session_id,
        config,
    }))
}

/// Session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, BlinkError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or_else(|| BlinkError::SessionNotFound(id.clone()))?;

    let detector = &session.detector;
    // Phase as of the latest frame; the session has no clock of its own
    let phase = session
        .last_frame
        .map(|t| detector.phase(t))
        .unwrap_or(DetectorPhase::Armed);

    Ok(Json(SessionStatusResponse {
        session_id: id,
        phase,
        last_blink_secs: detector.last_blink().map(|t| t.as_secs_f64()),
        blink_count: session.blinks.total(),
        blinks: session.blinks,
        update_count: session.update_count,
        config: *detector.config(),
    }))
}

/// Feed one frame; the body is one input line (eye sample or face frame)
async fn feed_sample(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<SampleResponse>, BlinkError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| BlinkError::SessionNotFound(id.clone()))?;
    let input = InputLine::parse(session.update_count as usize + 1, body.trim())?;

    let Some(sample) = input.into_sample(session.mirrored) else {
        debug!(session = %id, "no face in frame");
        return Ok(Json(SampleResponse {
            blink: None,
            reason: DecisionReason::R203_NO_FACE,
            phase: None,
            left_closed: false,
            right_closed: false,
        }));
    };

    let decision = session.detector.feed(&sample);
    session.update_count += 1;
    session.last_frame = Some(sample.timestamp());

    if let Some(blink) = decision.blink {
        session.blinks.blink_detected(blink);
        let notice = BlinkNotice {
            session_id: id.clone(),
            blink,
            timestamp_s: decision.timestamp_s,
        };
        // No subscribers is fine
        let _ = session.notice_tx.send(notice);
    }

    Ok(Json(SampleResponse {
        blink: decision.blink,
        reason: decision.reason,
        phase: Some(decision.phase),
        left_closed: decision.left_closed,
        right_closed: decision.right_closed,
    }))
}

/// Stop a session
async fn stop_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, BlinkError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.remove(&id).ok_or_else(|| BlinkError::SessionNotFound(id.clone()))?;
    info!(
        session = %session.id,
        frames = session.update_count,
        blinks = session.blinks.total(),
        "session stopped"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// WebSocket handler for live blinks
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, BlinkError> {
    let rx = state.subscribe(&id).await?;

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, rx).await;
    }))
}

/// Forward notices until the client leaves or the session is stopped
async fn handle_websocket(mut socket: WebSocket, mut rx: broadcast::Receiver<BlinkNotice>) {
    loop {
        match rx.recv().await {
            Ok(notice) => {
                let json = serde_json::to_string(&notice).unwrap_or_default();
                if socket.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                debug!(missed, "websocket client lagging");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Generate session ID
fn generate_session_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("session_{:x}_{}", nanos, seq)
}

/// Run the API server
pub async fn run_server(addr: &str) -> crate::Result<()> {
    let router = create_router();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("blinkgate API running on {}", addr);
    println!("  POST   /session/new        - Start session");
    println!("  GET    /session/:id        - Get status");
    println!("  POST   /session/:id/sample - Feed frame");
    println!("  DELETE /session/:id        - Stop session");
    println!("  WS     /ws/:id             - Live blinks");
    println!("  GET    /health             - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
