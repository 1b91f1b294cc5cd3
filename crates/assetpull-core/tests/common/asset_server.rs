//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed bodies, redirect chains and error statuses by path, and counts
//! GET requests per path so tests can assert how often a URL was fetched.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub enum Route {
    Body(Vec<u8>),
    /// Status (301/302/...) plus `Location` value, absolute or relative.
    Redirect(u32, String),
    /// Redirect response with no `Location` header.
    BareRedirect(u32),
    Status(u32),
}

pub struct AssetServer {
    base: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl AssetServer {
    /// Base URL ending in `/`, e.g. `http://127.0.0.1:12345/`.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    /// GET requests seen for `path` (leading `/` optional).
    pub fn hits(&self, path: &str) -> usize {
        let key = format!("/{}", path.trim_start_matches('/'));
        self.hits.lock().unwrap().get(&key).copied().unwrap_or(0)
    }
}

/// Starts a server in a background thread. Unknown paths get 404. The server
/// runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> AssetServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (format!("/{}", p.trim_start_matches('/')), r))
            .collect(),
    );
    let hits = Arc::new(Mutex::new(HashMap::new()));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    AssetServer {
        base: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

fn reason(code: u32) -> &'static str {
    match code {
        200 => "OK",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("/");
    let path = target.split(['?', '#']).next().unwrap_or("/").to_string();

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    *hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    let response: Vec<u8> = match routes.get(&path) {
        Some(Route::Body(body)) => {
            let mut r = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: image/png\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .into_bytes();
            r.extend_from_slice(body);
            r
        }
        Some(Route::Redirect(code, location)) => format!(
            "HTTP/1.1 {} {}\r\nLocation: {}\r\nContent-Length: 9\r\nConnection: close\r\n\r\nredirect\n",
            code,
            reason(*code),
            location
        )
        .into_bytes(),
        Some(Route::BareRedirect(code)) => format!(
            "HTTP/1.1 {} {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            code,
            reason(*code)
        )
        .into_bytes(),
        Some(Route::Status(code)) => format!(
            "HTTP/1.1 {} {}\r\nContent-Length: 10\r\nConnection: close\r\n\r\nerror page",
            code,
            reason(*code)
        )
        .into_bytes(),
        None => b"HTTP/1.1 404 Not Found\r\nContent-Length: 10\r\nConnection: close\r\n\r\nerror page".to_vec(),
    };
    let _ = stream.write_all(&response);
}
