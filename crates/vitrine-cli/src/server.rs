//! Static file server with the contact endpoint.
//!
//! Routing lives in [`Site::handle`], which takes the request parts and
//! returns an [`HttpResponse`], so it can be tested without a socket.
//! [`run`] is the blocking accept loop on top of `tiny_http`.

use crate::contact::{self, ContactError};
use crate::mailer::MailRelay;
use anyhow::anyhow;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tiny_http::{Header, Request, Response, Server};
use tracing::{debug, info, warn};

/// Path of the contact endpoint.
pub const CONTACT_PATH: &str = "/api/contact";

/// A response ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// `Content-Type`
    pub content_type: &'static str,
    /// `Cache-Control`, for static files
    pub cache_control: Option<&'static str>,
    /// Body bytes
    pub body: Vec<u8>,
}

impl HttpResponse {
    fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            cache_control: None,
            body: value.to_string().into_bytes(),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self::json(status, &serde_json::json!({ "error": message }))
    }

    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            cache_control: None,
            body: body.as_bytes().to_vec(),
        }
    }

    /// Body as UTF-8, lossy.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Content type by file extension.
pub fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html",
        Some("js") => "application/javascript",
        Some("wasm") => "application/wasm",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Cache policy by file extension.
pub fn cache_control(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("wasm") => "public, max-age=31536000, immutable",
        Some("css" | "woff" | "woff2" | "ttf") => "public, max-age=604800",
        Some("png" | "jpg" | "jpeg" | "gif" | "svg" | "ico") => "public, max-age=86400",
        Some("html") => "no-cache, must-revalidate",
        _ => "public, max-age=3600",
    }
}

/// Map a URL path onto `root`. `None` if the path tries to leave it.
fn resolve(root: &Path, url_path: &str) -> Option<PathBuf> {
    let relative = Path::new(url_path.trim_start_matches('/'));
    if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
        return None;
    }
    let path = root.join(relative);
    if url_path.ends_with('/') || path.is_dir() {
        Some(path.join("index.html"))
    } else {
        Some(path)
    }
}

/// A served site: static root, body limit and contact relay.
pub struct Site {
    root: PathBuf,
    max_body_bytes: usize,
    relay: Box<dyn MailRelay>,
}

impl Site {
    /// Create a site serving `root`.
    pub fn new(root: impl Into<PathBuf>, max_body_bytes: usize, relay: Box<dyn MailRelay>) -> Self {
        Self {
            root: root.into(),
            max_body_bytes,
            relay,
        }
    }

    /// Static root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Largest accepted body.
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Route one request.
    pub fn handle(&self, method: &str, url: &str, body: &[u8]) -> HttpResponse {
        let path = url_path(url);
        if path == CONTACT_PATH {
            return self.contact(method, body);
        }
        match method {
            "GET" | "HEAD" => self.static_file(path),
            _ => HttpResponse::text(405, "405 Method Not Allowed"),
        }
    }

    fn contact(&self, method: &str, body: &[u8]) -> HttpResponse {
        if method != "POST" {
            warn!(method, "method not allowed on contact endpoint");
            return HttpResponse::error(405, "Method not allowed");
        }
        if body.len() > self.max_body_bytes {
            warn!(len = body.len(), limit = self.max_body_bytes, "contact body too large");
            return HttpResponse::error(413, "Payload too large");
        }
        match contact::submit(body, self.relay.as_ref()) {
            Ok(_) => HttpResponse::json(200, &serde_json::json!({ "success": true })),
            Err(err) => err.into(),
        }
    }

    fn static_file(&self, url_path: &str) -> HttpResponse {
        let Some(path) = resolve(&self.root, url_path) else {
            warn!(url_path, "rejected path outside site root");
            return HttpResponse::text(403, "403 Forbidden");
        };
        match std::fs::read(&path) {
            Ok(body) => HttpResponse {
                status: 200,
                content_type: content_type(&path),
                cache_control: Some(cache_control(&path)),
                body,
            },
            Err(err) => {
                debug!(path = %path.display(), %err, "not found");
                HttpResponse::text(404, "404 Not Found")
            }
        }
    }
}

/// Whether a request can be answered 413 from its declared length alone,
/// before reading the body. Only contact posts qualify.
fn is_oversized_contact(method: &str, url: &str, declared: Option<usize>, limit: usize) -> bool {
    method == "POST" && url_path(url) == CONTACT_PATH && declared.is_some_and(|n| n > limit)
}

/// The path part of a request URL.
fn url_path(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or_default()
}

/// Read at most `limit + 1` bytes so oversized bodies are detected without
/// buffering them whole.
fn read_body(request: &mut Request, limit: usize) -> std::io::Result<Vec<u8>> {
    let mut body = Vec::new();
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    request.as_reader().take(cap).read_to_end(&mut body)?;
    Ok(body)
}

fn respond(request: Request, response: HttpResponse) {
    let status = response.status;
    let mut out = Response::from_data(response.body).with_status_code(status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], response.content_type.as_bytes()) {
        out.add_header(header);
    }
    if let Some(cache) = response.cache_control {
        if let Ok(header) = Header::from_bytes(&b"Cache-Control"[..], cache.as_bytes()) {
            out.add_header(header);
        }
    }
    if let Err(err) = request.respond(out) {
        warn!(%err, "failed to write response");
    }
}

/// Serve `site` on `0.0.0.0:port` until the process is stopped.
pub fn run(site: &Site, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let server = Server::http(&addr).map_err(|err| anyhow!("failed to bind {addr}: {err}"))?;
    info!(%addr, root = %site.root().display(), "serving");

    for mut request in server.incoming_requests() {
        let method = request.method().to_string();
        let url = request.url().to_string();

        let declared = request.body_length();
        let response = if is_oversized_contact(&method, &url, declared, site.max_body_bytes()) {
            warn!(%url, "declared contact body too large");
            HttpResponse::error(413, "Payload too large")
        } else {
            match read_body(&mut request, site.max_body_bytes()) {
                Ok(body) => site.handle(&method, &url, &body),
                Err(err) => {
                    warn!(%err, "failed to read request body");
                    HttpResponse::error(400, "Bad request")
                }
            }
        };
        debug!(%method, %url, status = response.status, "request");
        respond(request, response);
    }
    Ok(())
}

impl From<ContactError> for HttpResponse {
    fn from(err: ContactError) -> Self {
        Self::error(err.status(), &err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::RecordingRelay;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

    fn site_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "vitrine-server-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(dir.join("assets")).unwrap();
        std::fs::write(dir.join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::write(dir.join("assets/app.wasm"), [0u8, 97, 115, 109]).unwrap();
        std::fs::write(dir.join("assets/style.css"), "body{}").unwrap();
        dir
    }

    fn site() -> Site {
        Site::new(site_dir(), 64, Box::new(RecordingRelay::new()))
    }

    #[test]
    fn test_index_for_root() {
        let response = site().handle("GET", "/", b"");
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "text/html");
        assert_eq!(response.cache_control, Some("no-cache, must-revalidate"));
        assert_eq!(response.body_text(), "<h1>home</h1>");
    }

    #[test]
    fn test_static_types() {
        let site = site();
        let wasm = site.handle("GET", "/assets/app.wasm?v=2", b"");
        assert_eq!(wasm.status, 200);
        assert_eq!(wasm.content_type, "application/wasm");
        assert_eq!(wasm.cache_control, Some("public, max-age=31536000, immutable"));

        let css = site.handle("HEAD", "/assets/style.css", b"");
        assert_eq!(css.content_type, "text/css");
    }

    #[test]
    fn test_not_found() {
        assert_eq!(site().handle("GET", "/missing.js", b"").status, 404);
    }

    #[test]
    fn test_traversal_rejected() {
        let site = site();
        assert_eq!(site.handle("GET", "/../etc/passwd", b"").status, 403);
        assert_eq!(site.handle("GET", "/assets/../../secret", b"").status, 403);
    }

    #[test]
    fn test_static_wrong_method() {
        assert_eq!(site().handle("DELETE", "/", b"").status, 405);
    }

    #[test]
    fn test_contact_success() {
        let body = br#"{"name":"Ada","email":"ada@example.com","message":"hi"}"#;
        let response = site().handle("POST", CONTACT_PATH, body);
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "application/json");
        assert_eq!(response.body_text(), r#"{"success":true}"#);
    }

    #[test]
    fn test_contact_validation() {
        let site = site();
        let missing = site.handle("POST", CONTACT_PATH, br#"{"name":"Ada"}"#);
        assert_eq!(missing.status, 400);
        assert_eq!(missing.body_text(), r#"{"error":"Missing required fields"}"#);

        let bad_email = site.handle(
            "POST",
            CONTACT_PATH,
            br#"{"name":"A","email":"not-an-email","message":"m"}"#,
        );
        assert_eq!(bad_email.status, 400);
        assert_eq!(bad_email.body_text(), r#"{"error":"Invalid email format"}"#);
    }

    #[test]
    fn test_contact_relay_failure() {
        let site = Site::new(site_dir(), 1024, Box::new(RecordingRelay::failing()));
        let body = br#"{"name":"Ada","email":"ada@example.com","message":"hi"}"#;
        let response = site.handle("POST", CONTACT_PATH, body);
        assert_eq!(response.status, 500);
        assert_eq!(response.body_text(), r#"{"error":"Failed to send email"}"#);
    }

    #[test]
    fn test_contact_unroutable_email_is_400() {
        let body = br#"{"name":"A","email":"a,b@example.com","message":"m"}"#;
        let response = site().handle("POST", CONTACT_PATH, body);
        assert_eq!(response.status, 400);
        assert_eq!(response.body_text(), r#"{"error":"Invalid email format"}"#);
    }

    #[test]
    fn test_early_413_only_for_contact_posts() {
        assert!(is_oversized_contact("POST", CONTACT_PATH, Some(65), 64));
        assert!(is_oversized_contact("POST", "/api/contact?src=footer", Some(65), 64));
        assert!(!is_oversized_contact("POST", CONTACT_PATH, Some(64), 64));
        assert!(!is_oversized_contact("POST", CONTACT_PATH, None, 64));
        assert!(!is_oversized_contact("POST", "/api/contactfoo", Some(65), 64));
        assert!(!is_oversized_contact("GET", CONTACT_PATH, Some(65), 64));
    }

    #[test]
    fn test_contact_method_and_size() {
        let site = site();
        let get = site.handle("GET", CONTACT_PATH, b"");
        assert_eq!(get.status, 405);
        assert_eq!(get.body_text(), r#"{"error":"Method not allowed"}"#);

        let big = vec![b' '; 65];
        let response = site.handle("POST", CONTACT_PATH, &big);
        assert_eq!(response.status, 413);
        assert_eq!(response.body_text(), r#"{"error":"Payload too large"}"#);
    }

    #[test]
    fn test_content_type_fallbacks() {
        assert_eq!(content_type(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(content_type(Path::new("a.bin")), "application/octet-stream");
        assert_eq!(cache_control(Path::new("a.svg")), "public, max-age=86400");
        assert_eq!(cache_control(Path::new("a.js")), "public, max-age=3600");
    }

    #[test]
    fn test_contact_error_response() {
        let response = HttpResponse::from(ContactError::InvalidEmail);
        assert_eq!(response.status, 400);
    }
}
