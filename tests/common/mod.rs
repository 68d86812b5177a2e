use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use puzzle_bot::config::BotConfig;
use serde_json::{json, Value};

pub const MEDIA_ID: &str = "710511363345354753";
pub const POST_ID: &str = "1445880548472328192";

/// The example row: a start position where White's e2e4 hands the move to Black.
pub const EXAMPLE_ROW: &str = "ex01,rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1,e2e4 e7e5,1200,,,,,https://example.com/ex01";

/// Generate a unique suffix based on timestamp + random bits to avoid collisions.
pub fn unique_suffix() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", ts % 1_000_000_000, rand::random::<u32>())
}

/// Fresh, empty scratch directory for one test.
pub fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("puzzle-bot-{label}-{}", unique_suffix()));
    std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir
}

/// Write `rows` as a header-less puzzle CSV and return its path.
pub fn write_dataset(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("puzzles.csv");
    let mut body = rows.join("\n");
    if !rows.is_empty() {
        body.push('\n');
    }
    std::fs::write(&path, body).expect("Failed to write dataset");
    path
}

/// Bot configuration pointed at a mock server, with dummy credentials.
pub fn config(dataset: &Path, work_dir: &Path, base_url: &str, scale: &str) -> BotConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("TWITTER_API_KEY", "test-key".to_string()),
        ("TWITTER_API_KEY_SECRET", "test-key-secret".to_string()),
        ("TWITTER_ACCESS_TOKEN", "test-token".to_string()),
        ("TWITTER_ACCESS_TOKEN_SECRET", "test-token-secret".to_string()),
        ("PUZZLE_CSV_PATH", dataset.display().to_string()),
        ("WORK_DIR", work_dir.display().to_string()),
        ("RENDER_SCALE", scale.to_string()),
        ("TWITTER_API_BASE", base_url.to_string()),
        ("TWITTER_UPLOAD_BASE", base_url.to_string()),
        ("HTTP_TIMEOUT_SECS", "10".to_string()),
    ]);
    BotConfig::from_lookup(|key: &str| vars.get(key).cloned()).expect("Failed to build config")
}

/// File names directly inside `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

/// Width and height from a PNG's IHDR chunk.
pub fn png_dimensions(path: &Path) -> (u32, u32) {
    let bytes = std::fs::read(path).expect("Failed to read png");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n", "not a PNG file");
    let width = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
    let height = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
    (width, height)
}

// ---------------------------------------------------------------------------
// Mock X/Twitter API
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Failure {
    #[default]
    None,
    RejectCredentials,
    RejectPost,
}

#[derive(Clone, Default)]
pub struct MockState {
    failure: Failure,
    pub requests: Arc<AtomicUsize>,
    pub calls: Arc<Mutex<Vec<&'static str>>>,
    pub upload_sizes: Arc<Mutex<Vec<usize>>>,
    pub posts: Arc<Mutex<Vec<Value>>>,
    pub unsigned: Arc<AtomicUsize>,
}

impl MockState {
    fn record(&self, call: &'static str, headers: &HeaderMap) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(call);

        let signed = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("OAuth ") && v.contains("oauth_signature="))
            .unwrap_or(false);
        if !signed {
            self.unsigned.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<Value> {
        self.posts.lock().unwrap().clone()
    }
}

pub struct MockTwitter {
    pub base_url: String,
    pub state: MockState,
}

/// Start a mock API on an ephemeral localhost port.
pub async fn spawn_mock(failure: Failure) -> MockTwitter {
    let state = MockState {
        failure,
        ..MockState::default()
    };

    let app = Router::new()
        .route("/1.1/account/verify_credentials.json", get(verify_credentials))
        .route("/1.1/media/upload.json", post(upload_media))
        .route("/2/tweets", post(create_post))
        .layer(DefaultBodyLimit::disable())
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockTwitter {
        base_url: format!("http://{addr}"),
        state,
    }
}

async fn verify_credentials(State(state): State<MockState>, headers: HeaderMap) -> Response {
    state.record("verify_credentials", &headers);
    if state.failure == Failure::RejectCredentials {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "errors": [{ "code": 32, "message": "Could not authenticate you." }] })),
        )
            .into_response();
    }
    Json(json!({ "id_str": "42", "screen_name": "ChessPuzzleBot" })).into_response()
}

async fn upload_media(State(state): State<MockState>, headers: HeaderMap, body: Bytes) -> Response {
    state.record("media_upload", &headers);
    state.upload_sizes.lock().unwrap().push(body.len());
    Json(json!({
        "media_id": 710511363345354753u64,
        "media_id_string": MEDIA_ID,
        "size": body.len(),
    }))
    .into_response()
}

async fn create_post(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("create_post", &headers);
    state.posts.lock().unwrap().push(body.clone());
    if state.failure == Failure::RejectPost {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "title": "Forbidden", "detail": "You are not permitted to perform this action." })),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({ "data": { "id": POST_ID, "text": body["text"] } })),
    )
        .into_response()
}
