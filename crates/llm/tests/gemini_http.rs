//! Drives `GeminiGenerator` against a local HTTP server that replays scripted
//! `generateContent` responses.

use std::sync::{Arc, Mutex};

use llm::{GeminiConfig, GeminiGenerator};
use pipeline::{Credentials, GenerationError, ReportGenerator};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// ---------------------------------------------------------------------------
// Scripted server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct RecordedRequest {
    head: String,
    body: String,
}

impl RecordedRequest {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }
}

struct ScriptedServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ScriptedServer {
    /// Answers every request with the same status and body.
    async fn start(status: u16, body: Value) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        let body = body.to_string();

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let Some(request) = read_request(&mut stream).await else {
                    continue;
                };
                log.lock().unwrap().push(request);

                let reply = format!(
                    "HTTP/1.1 {status} Scripted\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(reply.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{addr}/v1beta"),
            requests,
        }
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).into_owned();
        let length = head
            .lines()
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.trim()
                    .eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        if buf.len() >= end + 4 + length {
            let body = String::from_utf8_lossy(&buf[end + 4..end + 4 + length]).into_owned();
            return Some(RecordedRequest { head, body });
        }
    }
}

fn generator_for(server: &ScriptedServer) -> GeminiGenerator {
    GeminiGenerator::new(GeminiConfig {
        base_url: server.base_url.clone(),
        ..GeminiConfig::default()
    })
}

fn credentials() -> Credentials {
    Credentials::from_raw("fc-key", "gemini-key")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_generate_sends_key_in_header_and_returns_text() {
    let server = ScriptedServer::start(
        200,
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "# Report\n"}, {"text": "Body"}]},
                "finishReason": "STOP"
            }]
        }),
    )
    .await;

    let report = generator_for(&server)
        .generate(&credentials(), "Summarise qubits")
        .await
        .unwrap();
    assert_eq!(report.as_str(), "# Report\nBody");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request
        .request_line()
        .starts_with("POST /v1beta/models/gemini-1.5-flash:generateContent HTTP/1.1"));
    assert!(!request.request_line().contains("gemini-key"));
    assert_eq!(request.header("x-goog-api-key").as_deref(), Some("gemini-key"));
    assert_eq!(request.header("authorization"), None);

    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["contents"][0]["parts"][0]["text"], "Summarise qubits");
}

#[tokio::test]
async fn test_http_error_is_generation_error_with_api_detail() {
    let server = ScriptedServer::start(
        429,
        json!({"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}),
    )
    .await;

    let err = generator_for(&server)
        .generate(&credentials(), "prompt")
        .await
        .unwrap_err();

    match err {
        GenerationError::Generation { message } => {
            assert!(message.contains("429"));
            assert!(message.contains("Resource has been exhausted"));
        }
        other => panic!("Expected Generation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_blocked_prompt_is_generation_error() {
    let server = ScriptedServer::start(
        200,
        json!({"promptFeedback": {"blockReason": "SAFETY"}}),
    )
    .await;

    let err = generator_for(&server)
        .generate(&credentials(), "prompt")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GenerationError::generation("Prompt was blocked by the model: SAFETY")
    );
}
