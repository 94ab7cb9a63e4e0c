//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves canned responses by request path and records every requested path
//! in arrival order. Bodies may contain `{base}`, replaced with the server's
//! base URL (e.g. "http://127.0.0.1:12345") so pages can link back to it.

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
}

impl Route {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: format!("error {status}").into_bytes(),
        }
    }
}

/// Hosting page markup advertising `filename` with a download link to `link`.
pub fn hosting_page(filename: &str, link: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>{filename} - MediaFire</title></head>
<body>
  <div class="dl-btn-label" title="{filename}"><div class="filename">{filename}</div></div>
  <div class="download_link" id="download_link">
    <a class="input popsok" aria-label="Download file" href="{link}">Download</a>
  </div>
</body></html>"#
    )
}

pub struct PageServer {
    /// Base URL without trailing slash.
    pub base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl PageServer {
    /// Starts a server in a background thread. It runs until the process exits.
    pub fn start(routes: Vec<(&str, Route)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let base = format!("http://127.0.0.1:{}", port);

        let routes: HashMap<String, Route> = routes
            .into_iter()
            .map(|(path, mut route)| {
                // Binary bodies are served untouched.
                if let Ok(text) = std::str::from_utf8(&route.body) {
                    if text.contains("{base}") {
                        route.body = text.replace("{base}", &base).into_bytes();
                    }
                }
                (path.to_string(), route)
            })
            .collect();
        let routes = Arc::new(routes);
        let requests = Arc::new(Mutex::new(Vec::new()));

        {
            let requests = Arc::clone(&requests);
            thread::spawn(move || {
                for stream in listener.incoming().flatten() {
                    let routes = Arc::clone(&routes);
                    let requests = Arc::clone(&requests);
                    thread::spawn(move || handle(stream, &routes, &requests));
                }
            });
        }

        Self { base, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Requested paths, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, requests: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let request = String::from_utf8_lossy(&buf);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    requests.lock().unwrap().push(path.clone());

    let route = routes.get(&path).cloned().unwrap_or_else(|| Route::status(404));
    let reason = match route.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n",
        route.status,
        reason,
        route.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
    let _ = stream.flush();
}
