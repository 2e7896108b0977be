//! End-to-end tests over a real socket: full parse → match → dispatch →
//! write cycle, static assets included.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Once};
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;

use presto::app::App;
use presto::config::AppConfig;
use presto::dispatcher::HandlerResponse;
use presto::middleware::RequestLogger;
use presto::server::ServerHandle;

static INIT: Once = Once::new();

fn setup() {
    INIT.call_once(|| {
        may::config().set_stack_size(0x8000);
    });
}

/// Build a small app over a temp asset root and serve it on an ephemeral
/// port. The TempDir must outlive the server.
fn start_app() -> (ServerHandle, SocketAddr, TempDir) {
    setup();

    let assets = TempDir::new().unwrap();
    std::fs::create_dir_all(assets.path().join("public")).unwrap();
    std::fs::write(assets.path().join("public/hello.txt"), "Hello\n").unwrap();

    let config = AppConfig {
        assets_root: assets.path().to_path_buf(),
        ..AppConfig::default()
    };
    let mut builder = App::builder(config).unwrap();
    builder
        .get("/", None, |_req| Ok(HandlerResponse::text(200, "welcome")))
        .unwrap();
    builder
        .get("/pets/:id", Some(Arc::new(RequestLogger)), |req| {
            Ok(HandlerResponse::json(
                200,
                json!({ "id": req.params["id"], "query": req.query }),
            ))
        })
        .unwrap();
    builder
        .post("/echo", None, |req| {
            Ok(HandlerResponse::json(201, json!({ "received": req.body })))
        })
        .unwrap();
    let app = builder.build();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let handle = app.listen(addr).unwrap();
    handle.wait_ready().unwrap();
    (handle, addr, assets)
}

fn send_request(addr: &SocketAddr, req: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(req.as_bytes()).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_millis(200)))
        .unwrap();
    let mut buf = Vec::new();
    loop {
        let mut tmp = [0u8; 1024];
        match stream.read(&mut tmp) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&tmp[..n]),
            Err(ref e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                break
            }
            Err(e) => panic!("read error: {e:?}"),
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn parse_parts(resp: &str) -> (u16, String, String) {
    let mut sections = resp.splitn(2, "\r\n\r\n");
    let head = sections.next().unwrap_or("");
    let body = sections.next().unwrap_or("").to_string();
    let mut status = 0;
    let mut content_type = String::new();
    for line in head.lines() {
        if line.starts_with("HTTP/1.1") {
            status = line
                .split_whitespace()
                .nth(1)
                .unwrap_or("0")
                .parse()
                .unwrap();
        } else if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-type") {
                content_type = value.trim().to_string();
            }
        }
    }
    (status, content_type, body)
}

#[test]
fn test_text_route() {
    let (handle, addr, _assets) = start_app();
    let resp = send_request(&addr, "GET / HTTP/1.1\r\nHost: x\r\n\r\n");
    handle.stop();
    let (status, content_type, body) = parse_parts(&resp);
    assert_eq!(status, 200);
    assert_eq!(content_type, "text/plain");
    assert_eq!(body, "welcome");
}

#[test]
fn test_param_route_with_query() {
    let (handle, addr, _assets) = start_app();
    let resp = send_request(&addr, "GET /pets/42?debug=1 HTTP/1.1\r\nHost: x\r\n\r\n");
    handle.stop();
    let (status, content_type, body) = parse_parts(&resp);
    assert_eq!(status, 200);
    assert_eq!(content_type, "application/json");
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["id"], json!("42"));
    assert_eq!(value["query"]["debug"], json!("1"));
}

#[test]
fn test_404_names_the_path() {
    let (handle, addr, _assets) = start_app();
    let resp = send_request(&addr, "GET /missing HTTP/1.1\r\nHost: x\r\n\r\n");
    handle.stop();
    let (status, _, body) = parse_parts(&resp);
    assert_eq!(status, 404);
    assert_eq!(body, "/missing Route Not Found");
}

#[test]
fn test_method_without_registration_is_404() {
    let (handle, addr, _assets) = start_app();
    // `/` is registered for GET only; POST must not match it.
    let resp = send_request(
        &addr,
        "POST / HTTP/1.1\r\nHost: x\r\nContent-Length: 0\r\n\r\n",
    );
    handle.stop();
    let (status, _, _) = parse_parts(&resp);
    assert_eq!(status, 404);
}

#[test]
fn test_post_json_echo() {
    let (handle, addr, _assets) = start_app();
    let payload = r#"{"name":"rex"}"#;
    let req = format!(
        "POST /echo HTTP/1.1\r\nHost: x\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        payload.len(),
        payload
    );
    let resp = send_request(&addr, &req);
    handle.stop();
    let (status, _, body) = parse_parts(&resp);
    assert_eq!(status, 201);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["received"]["name"], json!("rex"));
}

#[test]
fn test_malformed_query_is_400() {
    let (handle, addr, _assets) = start_app();
    let resp = send_request(&addr, "GET /pets/1?k=%zz HTTP/1.1\r\nHost: x\r\n\r\n");
    handle.stop();
    let (status, _, _) = parse_parts(&resp);
    assert_eq!(status, 400);
}

#[test]
fn test_static_file_served() {
    let (handle, addr, _assets) = start_app();
    let resp = send_request(&addr, "GET /public/hello.txt HTTP/1.1\r\nHost: x\r\n\r\n");
    handle.stop();
    let (status, content_type, body) = parse_parts(&resp);
    assert_eq!(status, 200);
    assert_eq!(content_type, "text/plain");
    assert_eq!(body, "Hello\n");
}

#[test]
fn test_static_missing_file_is_404() {
    let (handle, addr, _assets) = start_app();
    let resp = send_request(&addr, "GET /public/nope.txt HTTP/1.1\r\nHost: x\r\n\r\n");
    handle.stop();
    let (status, _, _) = parse_parts(&resp);
    assert_eq!(status, 404);
}

#[test]
fn test_static_traversal_blocked() {
    let (handle, addr, _assets) = start_app();
    let resp = send_request(
        &addr,
        "GET /public/../secret.txt HTTP/1.1\r\nHost: x\r\n\r\n",
    );
    handle.stop();
    let (status, _, _) = parse_parts(&resp);
    assert_eq!(status, 404);
}
