use std::time::SystemTime;

use anyhow::Context;
use bytes::Bytes;

use crate::http::mime;
use crate::http::resource::ResourcePath;

/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): Resource found and served
/// - `BadRequest` (400): Malformed request or missing `Host` header
/// - `NotFound` (404): Resource not found
/// - `MethodNotAllowed` (405): Known but unsupported method
/// - `HttpVersionNotSupported` (505): Version other than HTTP/1.1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 505 HTTP Version Not Supported
    HttpVersionNotSupported,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use beacon::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::HttpVersionNotSupported.as_u16(), 505);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::HttpVersionNotSupported => 505,
        }
    }

    /// Returns the reason phrase sent on the status line.
    ///
    /// # Example
    ///
    /// ```
    /// # use beacon::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::HttpVersionNotSupported => "HTTP Version Not Supported",
        }
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
///
/// Headers are kept in the order they were added, which is the order they
/// go out on the wire.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Header name/value pairs in wire order
    pub headers: Vec<(String, String)>,
    /// Response body, empty unless the status is 200
    pub body: Bytes,
}

impl Response {
    /// Looks up the first header with the given name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html")
///     .body(b"<p>hi</p>".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Adds or replaces a header. A replaced header keeps its position.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();

        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the final Response.
    ///
    /// Appends a Content-Length header from the body size if none was set.
    pub fn build(mut self) -> Response {
        if !self.headers.iter().any(|(k, _)| k == "Content-Length") {
            self.headers
                .push(("Content-Length".to_string(), self.body.len().to_string()));
        }

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

/// Builds the response for a request that resolved to `status`.
///
/// Every response carries `Date` (formatted from `now`) and
/// `Connection: close`. A 200 response also carries `Content-Type` and the
/// file as its body; when the extension gives no MIME guess the content type
/// is the literal `None`. Every other status has `Content-Length: 0` and no
/// body.
///
/// Fails if `status` is 200 and the resource is missing or unreadable.
pub async fn build_response(
    status: StatusCode,
    resource: Option<&ResourcePath>,
    now: SystemTime,
) -> anyhow::Result<Response> {
    if status != StatusCode::Ok {
        return Ok(empty_response(status, now));
    }

    let path = resource.context("no resource path for a 200 response")?;
    let body = tokio::fs::read(path.as_path())
        .await
        .with_context(|| format!("failed to read {}", path))?;
    let content_type = mime::guess(path.as_path()).unwrap_or("None");

    Ok(base_headers(status, now)
        .header("Content-Type", content_type)
        .header("Content-Length", body.len().to_string())
        .body(body)
        .build())
}

/// Builds a body-less response: `Date`, `Connection: close` and
/// `Content-Length: 0`.
pub fn empty_response(status: StatusCode, now: SystemTime) -> Response {
    base_headers(status, now)
        .header("Content-Length", "0")
        .build()
}

fn base_headers(status: StatusCode, now: SystemTime) -> ResponseBuilder {
    ResponseBuilder::new(status)
        .header("Date", httpdate::fmt_http_date(now))
        .header("Connection", "close")
}
