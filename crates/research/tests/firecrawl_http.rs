//! Drives `FirecrawlClient` against a local HTTP server that replays scripted
//! Firecrawl responses.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pipeline::{
    ActivityEvent, ActivityObserver, Credentials, ResearchClient, ResearchError, ResearchParams,
    Topic,
};
use research::{FirecrawlClient, FirecrawlConfig};
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
    /// Answers requests with `responses` in order; the last one repeats.
    async fn start(responses: Vec<(u16, Value)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        tokio::spawn(async move {
            let mut served = 0usize;
            while let Ok((mut stream, _)) = listener.accept().await {
                let Some(request) = read_request(&mut stream).await else {
                    continue;
                };
                log.lock().unwrap().push(request);

                let (status, body) = &responses[served.min(responses.len() - 1)];
                served += 1;
                let body = body.to_string();
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
            base_url: format!("http://{addr}"),
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

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Recorder(Mutex<Vec<String>>);

impl ActivityObserver for Recorder {
    fn on_activity(&self, event: &ActivityEvent) {
        self.0.lock().unwrap().push(event.to_string());
    }
}

fn client_for(server: &ScriptedServer) -> FirecrawlClient {
    FirecrawlClient::new(FirecrawlConfig {
        base_url: server.base_url.clone(),
        poll_interval: Duration::from_millis(10),
        ..FirecrawlConfig::default()
    })
    .unwrap()
}

fn credentials() -> Credentials {
    Credentials::from_raw("fc-key", "gemini-key")
}

fn topic() -> Topic {
    Topic::new("Quantum computing").unwrap()
}

fn started() -> (u16, Value) {
    (200, json!({"success": true, "id": "job-1"}))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_polls_until_completed_and_streams_each_activity_once() {
    let search = json!({"type": "search", "message": "Searching"});
    let analyze = json!({"type": "analyze", "message": null});
    let synthesis = json!({"type": "synthesis", "message": "Writing"});

    let server = ScriptedServer::start(vec![
        started(),
        (
            200,
            json!({"success": true, "status": "processing", "activities": [search]}),
        ),
        (
            200,
            json!({"success": true, "status": "processing", "activities": [search, analyze]}),
        ),
        (
            200,
            json!({
                "success": true,
                "status": "completed",
                "activities": [search, analyze, synthesis],
                "data": {
                    "finalAnalysis": "Qubits decohere.",
                    "sources": [
                        {"url": "a.com", "summary": "s1", "description": "d1"},
                        {"title": "no url"}
                    ]
                }
            }),
        ),
    ])
    .await;
    let recorder = Recorder::default();

    let findings = client_for(&server)
        .research(&credentials(), &topic(), &ResearchParams::default(), &recorder)
        .await
        .unwrap();

    assert_eq!(findings.final_analysis(), "Qubits decohere.");
    assert_eq!(findings.sources_count(), 2);
    assert_eq!(findings.sources()[0].summary.as_deref(), Some("s1"));
    assert_eq!(
        *recorder.0.lock().unwrap(),
        vec!["[search] Searching", "[analyze] ", "[synthesis] Writing"]
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 4);
    assert!(requests[0].request_line().starts_with("POST /v1/deep-research "));
    assert_eq!(
        requests[0].header("authorization").as_deref(),
        Some("Bearer fc-key")
    );
    assert_eq!(
        serde_json::from_str::<Value>(&requests[0].body).unwrap(),
        json!({"query": "Quantum computing", "maxDepth": 3, "timeLimit": 180, "maxUrls": 10})
    );
    for poll in &requests[1..] {
        assert!(poll.request_line().starts_with("GET /v1/deep-research/job-1 "));
        assert_eq!(poll.header("authorization").as_deref(), Some("Bearer fc-key"));
    }
}

#[tokio::test]
async fn test_job_still_running_past_deadline_is_api_error() {
    let server = ScriptedServer::start(vec![
        started(),
        (200, json!({"success": true, "status": "processing"})),
    ])
    .await;
    let client = FirecrawlClient::new(FirecrawlConfig {
        base_url: server.base_url.clone(),
        poll_interval: Duration::from_millis(20),
        completion_grace: Duration::from_millis(100),
        ..FirecrawlConfig::default()
    })
    .unwrap();
    let params = ResearchParams::new(3, Duration::from_millis(200), 10).unwrap();

    let err = client
        .research(&credentials(), &topic(), &params, &Recorder::default())
        .await
        .unwrap_err();

    match err {
        ResearchError::NetworkOrApi { message } => {
            assert!(message.contains("job-1"));
            assert!(message.contains("did not finish"));
        }
        other => panic!("Expected NetworkOrApi, got {other:?}"),
    }
    // Start request plus at least one poll before giving up.
    assert!(server.requests().len() >= 2);
}

#[tokio::test]
async fn test_rejected_key_stops_before_polling() {
    let server = ScriptedServer::start(vec![(
        401,
        json!({"success": false, "error": "Unauthorized: Invalid token"}),
    )])
    .await;

    let err = client_for(&server)
        .research(
            &credentials(),
            &topic(),
            &ResearchParams::default(),
            &Recorder::default(),
        )
        .await
        .unwrap_err();

    match err {
        ResearchError::NetworkOrApi { message } => {
            assert!(message.contains("check the API key"));
            assert!(message.contains("Invalid token"));
        }
        other => panic!("Expected NetworkOrApi, got {other:?}"),
    }
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_failed_job_reports_api_error() {
    let server = ScriptedServer::start(vec![
        started(),
        (
            200,
            json!({"success": true, "status": "failed", "error": "Time limit exceeded"}),
        ),
    ])
    .await;

    let err = client_for(&server)
        .research(
            &credentials(),
            &topic(),
            &ResearchParams::default(),
            &Recorder::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(err, ResearchError::network("Time limit exceeded"));
}
