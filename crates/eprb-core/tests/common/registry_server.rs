//! Minimal HTTP/1.1 server standing in for the package registry in integration tests.
//!
//! Serves a fixed route table keyed by request target (path plus query).
//! Unknown targets get 404. Every response carries `Connection: close`.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: Vec<u8>,
    /// Sleep before answering (to shuffle completion order).
    pub delay: Duration,
    /// The first `fail_first` hits answer `fail_status` instead.
    pub fail_first: usize,
    pub fail_status: u16,
}

impl Route {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: Duration::ZERO,
            fail_first: 0,
            fail_status: 500,
        }
    }

    pub fn status(code: u16) -> Self {
        Self {
            status: code,
            ..Self::ok(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing_first(mut self, n: usize, status: u16) -> Self {
        self.fail_first = n;
        self.fail_status = status;
        self
    }
}

pub struct RegistryServer {
    /// e.g. "http://127.0.0.1:12345"
    pub base_url: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl RegistryServer {
    /// Number of requests received for `target` so far.
    pub fn hits(&self, target: &str) -> usize {
        self.hits.lock().unwrap().get(target).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(routes: HashMap<String, Route>) -> RegistryServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    let hits = Arc::new(Mutex::new(HashMap::new()));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    RegistryServer {
        base_url: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, Route>,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("").to_string();
    if !method.eq_ignore_ascii_case("GET") {
        respond(&mut stream, 405, b"");
        return;
    }

    let hit = {
        let mut hits = hits.lock().unwrap();
        let count = hits.entry(target.clone()).or_insert(0);
        *count += 1;
        *count
    };

    match routes.get(&target) {
        None => respond(&mut stream, 404, b"not found"),
        Some(route) => {
            if !route.delay.is_zero() {
                thread::sleep(route.delay);
            }
            if hit <= route.fail_first {
                respond(&mut stream, route.fail_status, b"transient");
            } else {
                respond(&mut stream, route.status, &route.body);
            }
        }
    }
}

fn respond(stream: &mut TcpStream, status: u16, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {} X\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}

/// Search target for a version, as the registry client requests it.
pub fn search_target(version: &str) -> String {
    format!("/search?kibana.version={}", version)
}

/// Artifact and signature targets for a package named `name`.
pub fn package_targets(name: &str) -> (String, String) {
    (
        format!("/epr/{name}/{name}-1.0.0.zip"),
        format!("/epr/{name}/{name}-1.0.0.zip.sig"),
    )
}

/// Catalog JSON for `names` plus OK routes serving each file (body = its target).
pub fn catalog_routes(version: &str, names: &[&str]) -> HashMap<String, Route> {
    let mut routes = HashMap::new();
    let mut entries = Vec::new();
    for name in names {
        let (zip, sig) = package_targets(name);
        entries.push(format!(
            r#"{{"name":"{name}","version":"1.0.0","title":"{name}","download":"{zip}","signature_path":"{sig}"}}"#
        ));
        routes.insert(zip.clone(), Route::ok(zip.clone().into_bytes()));
        routes.insert(sig.clone(), Route::ok(sig.clone().into_bytes()));
    }
    let catalog = format!("[{}]", entries.join(","));
    routes.insert(search_target(version), Route::ok(catalog.into_bytes()));
    routes
}
