use std::time::SystemTime;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::http::parser::{parse_headers, parse_status_line, ParseError};
use crate::http::resource::{ResourcePath, ResourceResolver};
use crate::http::response::{build_response, empty_response, Response, StatusCode};
use crate::http::writer::ResponseWriter;

/// Handles exactly one request/response exchange on a stream.
///
/// Every connection gets one response and is then shut down; the server
/// never offers keep-alive. Reads have no timeout, so a silent peer holds
/// its task until it disconnects.
pub struct Connection<S> {
    stream: S,
    resolver: ResourceResolver,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, resolver: ResourceResolver) -> Self {
        Self {
            stream,
            resolver,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    let (status, resource) = self.read_request().await;
                    let response = Self::respond(status, resource.as_ref()).await;

                    tracing::info!(
                        status = response.status.as_u16(),
                        resource = resource.as_ref().map(ResourcePath::as_str),
                        "Sending response"
                    );

                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(writer) => {
                    let result = writer.write_to_stream(&mut self.stream).await;
                    self.state = ConnectionState::Closed;
                    result?;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        self.stream.shutdown().await?;
        Ok(())
    }

    /// Reads the request and settles on a single status code.
    ///
    /// Any parse failure becomes 400. A 505 from the request line beats a
    /// bad header block; otherwise a bad header block beats the method and
    /// resource checks.
    pub async fn read_request(&mut self) -> (StatusCode, Option<ResourcePath>) {
        match self.parse_request().await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!(error = %e, "Malformed request");
                (StatusCode::BadRequest, None)
            }
        }
    }

    async fn parse_request(&mut self) -> Result<(StatusCode, Option<ResourcePath>), ParseError> {
        let (status, resource) = parse_status_line(&mut self.stream, &self.resolver).await?;

        // The header block is drained even when the request line already
        // decided the outcome.
        let (header_status, headers) = parse_headers(&mut self.stream).await?;

        for (name, value) in headers.iter() {
            tracing::debug!(name, value, "Received header");
        }

        if status == StatusCode::HttpVersionNotSupported || header_status == StatusCode::Ok {
            Ok((status, resource))
        } else {
            Ok((header_status, None))
        }
    }

    async fn respond(status: StatusCode, resource: Option<&ResourcePath>) -> Response {
        let now = SystemTime::now();

        match build_response(status, resource, now).await {
            Ok(response) => response,
            Err(e) => {
                // e.g. the target exists but is a directory
                tracing::warn!("Resource could not be served: {:#}", e);
                empty_response(StatusCode::NotFound, now)
            }
        }
    }
}
