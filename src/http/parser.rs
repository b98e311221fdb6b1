use std::fmt;

use tokio::io::AsyncRead;

use crate::http::line::read_line;
use crate::http::request::{Headers, Method, RequestLine};
use crate::http::resource::{ResourcePath, ResourceResolver};
use crate::http::response::StatusCode;

/// Only this version is served; anything else gets 505.
pub const SUPPORTED_VERSION: &str = "HTTP/1.1";

/// Header that every request must carry.
pub const HOST_HEADER: &str = "Host";

#[derive(Debug)]
pub enum ParseError {
    /// The request line did not split into exactly three tokens.
    MalformedRequestLine,
    /// A line was not valid UTF-8.
    InvalidEncoding,
    /// The stream failed or ended before a line was complete.
    Io(std::io::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedRequestLine => f.write_str("malformed request line"),
            ParseError::InvalidEncoding => f.write_str("line is not valid UTF-8"),
            ParseError::Io(e) => write!(f, "failed to read request: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}

/// Reads and validates the request line.
///
/// GET targets are resolved through `resolver`, which may turn the status
/// into 404. POST, PUT, PATCH and DELETE get 405 and any other method 400,
/// without a resource path. A version other than HTTP/1.1 overrides all of
/// these with 505.
pub async fn parse_status_line<R>(
    stream: &mut R,
    resolver: &ResourceResolver,
) -> Result<(StatusCode, Option<ResourcePath>), ParseError>
where
    R: AsyncRead + Unpin,
{
    let line = read_line(stream).await?;
    let request_line = RequestLine::parse(&line)?;

    tracing::debug!(
        method = %request_line.method,
        target = %request_line.target,
        version = %request_line.version,
        "Request line"
    );

    let mut resource = None;
    let mut status = check_method(&request_line.method);

    if status == StatusCode::Ok {
        let (resolved, path) = resolver.resolve(&request_line.target).await;
        status = resolved;
        resource = Some(path);
    }

    if request_line.version != SUPPORTED_VERSION {
        status = StatusCode::HttpVersionNotSupported;
    }

    Ok((status, resource))
}

/// Classifies a method token: 200 for GET, 405 for the known but
/// unsupported verbs, 400 for everything else.
pub fn check_method(token: &str) -> StatusCode {
    match Method::from_str(token) {
        Some(Method::GET) => StatusCode::Ok,
        Some(method) if method.is_unsupported() => StatusCode::MethodNotAllowed,
        _ => StatusCode::BadRequest,
    }
}

/// Reads header lines up to and including the blank line that ends the block.
///
/// Each line is split on its first colon; the name is kept verbatim and the
/// value is trimmed. A line without a colon makes the block a Bad Request,
/// as does a block with no `Host` header, but the rest of the block is still
/// consumed.
pub async fn parse_headers<R>(stream: &mut R) -> Result<(StatusCode, Headers), ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut headers = Headers::new();
    let mut malformed = false;

    loop {
        let line = read_line(stream).await?;
        if line.is_empty() {
            break;
        }

        match line.split_once(':') {
            Some((name, value)) => headers.insert(name, value.trim()),
            None => {
                tracing::debug!(line = %line, "Header line without a colon");
                malformed = true;
            }
        }
    }

    let status = if malformed || !headers.contains(HOST_HEADER) {
        StatusCode::BadRequest
    } else {
        StatusCode::Ok
    };

    Ok((status, headers))
}
