//! HTTP/1.1 request handling for a static file server.
//!
//! Each accepted connection carries exactly one request and gets exactly one
//! response, after which the connection is closed.
//!
//! # Architecture
//!
//! - **`line`**: Reads CRLF-terminated lines one byte at a time
//! - **`parser`**: Validates the request line and header block
//! - **`request`**: Method, request line and header types
//! - **`resource`**: Maps request targets onto files under the document root
//! - **`mime`**: MIME type detection based on file extensions
//! - **`response`**: Status codes, responses and the response builder
//! - **`writer`**: Serializes and writes responses to the client
//! - **`connection`**: Drives one exchange from request to close
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Parse request line and headers, pick a status
//!        └──────┬──────┘
//!               │ Response built
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send the whole response
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │    Closed        │ ← Shut the stream down
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use beacon::http::connection::Connection;
//! use beacon::http::resource::ResourceResolver;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let resolver = ResourceResolver::new(".");
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let resolver = resolver.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, resolver);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod line;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resource;
pub mod response;
pub mod writer;
