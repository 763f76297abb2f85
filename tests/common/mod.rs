// Shared helpers; each test binary uses a different subset.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use tempfile::TempDir;

/// Hermetic environment for driving the yt2text binary.
///
/// Each instance gets throwaway HOME/XDG directories and a scratch working
/// directory, so config lookups and downloaded files never touch the
/// developer's machine.
pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    data: TempDir,
    work: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            data: tempfile::tempdir().expect("create temporary XDG data dir"),
            work: tempfile::tempdir().expect("create temporary working dir"),
        }
    }

    /// Command for the yt2text binary with the hermetic environment applied.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("yt2text").expect("yt2text binary");
        cmd.current_dir(self.work.path())
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env("XDG_DATA_HOME", self.data.path())
            .env_remove("LEMONFOX_API_KEY")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Working directory the binary runs in.
    pub fn work_path(&self) -> &Path {
        self.work.path()
    }
}

/// Request captured by the mock transcription API.
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// In-process stand-in for the Lemonfox transcription endpoint.
///
/// Answers every POST to `/v1/audio/transcriptions` with a canned status and
/// body, recording what it received.
pub struct MockTranscriptionApi {
    addr: SocketAddr,
    pub requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    status: u16,
    body: String,
}

impl MockTranscriptionApi {
    pub async fn spawn(status: u16, body: &str) -> Self {
        let requests: Arc<Mutex<Vec<CapturedRequest>>> = Arc::default();
        let state = MockState {
            requests: Arc::clone(&requests),
            status,
            body: body.to_string(),
        };

        let app = Router::new()
            .route("/v1/audio/transcriptions", post(record_request))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock transcription api");
        let addr = listener.local_addr().expect("mock transcription api addr");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("serve mock transcription api");
        });

        Self { addr, requests }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/v1/audio/transcriptions", self.addr)
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }
}

async fn record_request(
    State(state): State<MockState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    state
        .requests
        .lock()
        .expect("requests lock")
        .push(CapturedRequest {
            authorization: header("authorization"),
            content_type: header("content-type"),
            body: body.to_vec(),
        });

    (
        StatusCode::from_u16(state.status).expect("valid canned status"),
        state.body.clone(),
    )
}
