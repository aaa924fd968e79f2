#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One request received by [`StubServer`], with the time it arrived.
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    /// Full request target, including the query string.
    pub path: String,
    /// Header names are lowercased.
    pub headers: HashMap<String, String>,
    pub body: String,
    pub at: Instant,
}

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

pub fn ok(body: &str) -> StubResponse {
    status(200, body)
}

pub fn status(code: u16, body: &str) -> StubResponse {
    StubResponse {
        status: code,
        body: String::from(body),
    }
}

/// A minimal in-process HTTP server for exercising the real client over a
/// real socket. Responses are scripted per route: they are consumed in
/// order, and the last one repeats. Routes with no script answer 404 with
/// an empty body.
pub struct StubServer {
    addr: SocketAddr,
    hits: Arc<Mutex<Vec<Hit>>>,
    script: Arc<Mutex<HashMap<String, Vec<StubResponse>>>>,
}

impl StubServer {
    pub async fn start() -> StubServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let hits: Arc<Mutex<Vec<Hit>>> = Arc::new(Mutex::new(Vec::new()));
        let script: Arc<Mutex<HashMap<String, Vec<StubResponse>>>> =
            Arc::new(Mutex::new(HashMap::new()));

        let accept_hits = Arc::clone(&hits);
        let accept_script = Arc::clone(&script);
        tokio::spawn(async move {
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let hits = Arc::clone(&accept_hits);
                let script = Arc::clone(&accept_script);
                tokio::spawn(async move {
                    handle(stream, hits, script).await;
                });
            }
        });

        StubServer { addr, hits, script }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Scripts responses for `method` on the path without its query
    /// string. Replaces any previous script for the route.
    pub fn on(&self, method: &str, path: &str, responses: Vec<StubResponse>) {
        let key = route_key(method, path);
        self.script.lock().unwrap().insert(key, responses);
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    /// Hits for a route, ignoring query strings.
    pub fn hits_for(&self, method: &str, path: &str) -> Vec<Hit> {
        self.hits()
            .into_iter()
            .filter(|hit| {
                hit.method == method && strip_query(&hit.path) == path
            })
            .collect()
    }
}

fn route_key(method: &str, path: &str) -> String {
    format!("{method} {path}")
}

fn strip_query(path: &str) -> &str {
    match path.split_once('?') {
        Some((path, _)) => path,
        None => path,
    }
}

async fn handle(
    mut stream: TcpStream,
    hits: Arc<Mutex<Vec<Hit>>>,
    script: Arc<Mutex<HashMap<String, Vec<StubResponse>>>>,
) {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        match find_blank_line(&buf) {
            Some(pos) => break pos,
            None => {}
        }
        let read = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(read) => read,
        };
        buf.extend_from_slice(&chunk[..read]);
        if buf.len() > 64 * 1024 {
            return;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");

    let request_line = match lines.next() {
        Some(line) => line,
        None => return,
    };
    let mut parts = request_line.split_whitespace();
    let method = match parts.next() {
        Some(method) => String::from(method),
        None => return,
    };
    let path = match parts.next() {
        Some(path) => String::from(path),
        None => return,
    };

    let mut headers: HashMap<String, String> = HashMap::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_lowercase(), String::from(value.trim()));
        }
    }

    let content_length: usize = headers
        .get("content-length")
        .and_then(|value| value.parse().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let read = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(read) => read,
        };
        buf.extend_from_slice(&chunk[..read]);
    }
    let body = String::from_utf8_lossy(&buf[body_start..body_start + content_length])
        .into_owned();

    let key = route_key(&method, strip_query(&path));
    hits.lock().unwrap().push(Hit {
        method,
        path,
        headers,
        body,
        at: Instant::now(),
    });

    let response = {
        let mut script = script.lock().unwrap();
        match script.get_mut(&key) {
            Some(responses) if responses.len() > 1 => responses.remove(0),
            Some(responses) if responses.len() == 1 => responses[0].clone(),
            _ => status(404, ""),
        }
    };

    let reason = match response.status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    };
    let raw = format!(
        "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        response.status,
        reason,
        response.body.len(),
        response.body
    );

    let _ = stream.write_all(raw.as_bytes()).await;
    let _ = stream.flush().await;
}

fn find_blank_line(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}
