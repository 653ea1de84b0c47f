//! Purpose: End-to-end tests for the HTTP/JSON API server.
//! Exports: None (integration test module).
//! Role: Validate every route and error status across real TCP.
//! Invariants: Uses loopback-only server on an ephemeral port.
//! Invariants: Bounded waits avoid test flakiness.
//! Invariants: Server processes are cleaned up on drop.

use serde_json::Value;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, MutexGuard};
use std::thread::sleep;
use std::time::{Duration, Instant};

type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

static SERVER_LOCK: Mutex<()> = Mutex::new(());

struct TestServer {
    child: Child,
    base_url: String,
    _server_guard: MutexGuard<'static, ()>,
}

impl TestServer {
    fn start() -> TestResult<Self> {
        let guard = SERVER_LOCK
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        let mut last_err: Option<Box<dyn std::error::Error>> = None;
        for _attempt in 0..3 {
            let port = pick_port()?;
            let bind = format!("127.0.0.1:{port}");
            let base_url = format!("http://{bind}");

            let mut child = Command::new(env!("CARGO_BIN_EXE_planar"))
                .arg("serve")
                .arg("--bind")
                .arg(&bind)
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .spawn()?;

            match wait_for_server(&mut child, bind.parse()?) {
                Ok(()) => {
                    return Ok(Self {
                        child,
                        base_url,
                        _server_guard: guard,
                    });
                }
                Err(err) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    last_err = Some(err);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| "server failed to start".into()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn pick_port() -> TestResult<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

fn wait_for_server(child: &mut Child, addr: SocketAddr) -> TestResult<()> {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if let Some(status) = child.try_wait()? {
            return Err(format!("server exited early with {status}").into());
        }
        if TcpStream::connect_timeout(&addr, Duration::from_millis(200)).is_ok() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err("server did not become reachable in time".into());
        }
        sleep(Duration::from_millis(25));
    }
}

fn post_json(url: &str, body: &str) -> Result<Value, ureq::Error> {
    let response = ureq::post(url)
        .set("content-type", "application/json")
        .send_string(body)?;
    let text = response.into_string().expect("read response body");
    Ok(serde_json::from_str(&text).expect("response is JSON"))
}

fn expect_client_error(result: Result<Value, ureq::Error>, expected_kind: &str) {
    match result {
        Err(ureq::Error::Status(code, response)) => {
            assert_eq!(code, 400);
            let text = response.into_string().expect("error body");
            let value: Value = serde_json::from_str(&text).expect("error body is JSON");
            assert_eq!(value["error"]["kind"], expected_kind, "body: {text}");
        }
        other => panic!("expected a 400 response, got {other:?}"),
    }
}

#[test]
fn healthz_reports_ok_with_unix_start_time() -> TestResult<()> {
    let server = TestServer::start()?;
    let response = ureq::get(&server.url("/healthz")).call()?;
    let value: Value = serde_json::from_str(&response.into_string()?)?;
    assert_eq!(value["ok"], true);
    assert!(value["startedAt"].is_i64(), "startedAt must be seconds");
    Ok(())
}

#[test]
fn single_shape_round_trip() -> TestResult<()> {
    let server = TestServer::start()?;
    let value = post_json(
        &server.url("/api/shapes"),
        r#"{"$kind":"circle","radius":2}"#,
    )?;
    assert_eq!(value["type"], "Circle");
    let area = value["area"].as_f64().expect("area is a number");
    assert!((area - 4.0 * std::f64::consts::PI).abs() < 1e-9);
    assert!(value["processedAt"].is_string());
    Ok(())
}

#[test]
fn batch_preserves_order() -> TestResult<()> {
    let server = TestServer::start()?;
    let value = post_json(
        &server.url("/api/shapes/batch"),
        r#"[{"$kind":"circle","radius":1},{"$kind":"rect","width":2,"height":3}]"#,
    )?;
    let results = value.as_array().expect("array response");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["type"], "Circle");
    assert_eq!(results[1]["type"], "Rectangle");
    assert_eq!(results[1]["area"], 6.0);
    Ok(())
}

#[test]
fn fast_path_agrees_with_standard_path() -> TestResult<()> {
    let server = TestServer::start()?;
    let body = r#"{"$kind":"tri","base":6,"height":5}"#;
    let standard = post_json(&server.url("/api/shapes"), body)?;
    let fast = post_json(&server.url("/api/shapes/fast"), body)?;
    assert_eq!(fast["type"], standard["type"]);
    assert_eq!(fast["area"], standard["area"]);
    assert_eq!(fast["area"], 15.0);
    Ok(())
}

#[test]
fn fast_path_rejects_empty_body() -> TestResult<()> {
    let server = TestServer::start()?;
    expect_client_error(post_json(&server.url("/api/shapes/fast"), ""), "EmptyBody");
    Ok(())
}

#[test]
fn fast_path_rejects_malformed_json() -> TestResult<()> {
    let server = TestServer::start()?;
    expect_client_error(
        post_json(&server.url("/api/shapes/fast"), "{not json"),
        "InvalidPayload",
    );
    Ok(())
}

#[test]
fn unknown_kind_is_a_client_error_on_both_paths() -> TestResult<()> {
    let server = TestServer::start()?;
    let body = r#"{"$kind":"hexagon","x":1}"#;
    expect_client_error(post_json(&server.url("/api/shapes"), body), "UnknownVariant");
    expect_client_error(
        post_json(&server.url("/api/shapes/fast"), body),
        "UnknownVariant",
    );
    Ok(())
}

#[test]
fn invoices_are_echoed_with_generated_identity() -> TestResult<()> {
    let server = TestServer::start()?;
    let value = post_json(
        &server.url("/api/invoices"),
        r#"{"amount":42.5,"items":[{"description":"Consulting","quantity":1,"unitPrice":42.5}]}"#,
    )?;
    assert!(
        value["id"].as_str().is_some_and(|id| !id.is_empty()),
        "id is generated"
    );
    assert!(value["issuedDate"].is_string());
    assert_eq!(value["amount"], 42.5);
    assert_eq!(value["currency"], "USD");
    Ok(())
}

#[test]
fn invoice_lookup_returns_sample_data() -> TestResult<()> {
    let server = TestServer::start()?;
    let response = ureq::get(&server.url("/api/invoices/inv-42")).call()?;
    let value: Value = serde_json::from_str(&response.into_string()?)?;
    assert_eq!(value["id"], "inv-42");
    assert_eq!(value["amount"], 1299.99);
    assert_eq!(value["items"][0]["description"], "Professional Services");
    Ok(())
}

#[test]
fn price_quotes_are_canned() -> TestResult<()> {
    let server = TestServer::start()?;
    let value = post_json(
        &server.url("/api/prices"),
        r#"{"productId":"widget-9","region":"eu-west"}"#,
    )?;
    assert_eq!(value["price"], 99.99);
    assert_eq!(value["currency"], "USD");
    assert!(value["validUntil"].is_string());
    Ok(())
}
