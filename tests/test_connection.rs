//! End-to-end exchanges over in-memory streams.

use beacon::http::connection::Connection;
use beacon::http::resource::ResourceResolver;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const INDEX: &[u8] = b"<p>hi</p>\n";

fn docroot() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX).unwrap();
    std::fs::write(dir.path().join("a.html"), b"<p>a</p>").unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("sub").join("data.json"), b"{\"k\":1}").unwrap();
    dir
}

/// Sends `request` through a fresh connection and returns everything the
/// server wrote before closing.
async fn exchange(dir: &TempDir, request: &[u8]) -> Vec<u8> {
    let (mut client, server) = tokio::io::duplex(64 * 1024);
    let resolver = ResourceResolver::new(dir.path().to_str().unwrap());

    let handle = tokio::spawn(async move {
        let mut conn = Connection::new(server, resolver);
        conn.run().await
    });

    client.write_all(request).await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    handle.await.unwrap().unwrap();

    response
}

fn status_line(response: &[u8]) -> String {
    let end = response.windows(2).position(|w| w == b"\r\n").unwrap();
    String::from_utf8(response[..end].to_vec()).unwrap()
}

fn split_head_body(response: &[u8]) -> (String, Vec<u8>) {
    let end = response.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
    let head = String::from_utf8(response[..end + 4].to_vec()).unwrap();
    (head, response[end + 4..].to_vec())
}

#[tokio::test]
async fn test_get_root_serves_index() {
    let dir = docroot();
    let response = exchange(&dir, b"GET / HTTP/1.1\r\nHost: x\r\n\r\n").await;
    let (head, body) = split_head_body(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.contains("Content-Length: 10\r\n"));
    assert!(head.contains("Content-Type: text/html\r\n"));
    assert!(head.contains("Connection: close\r\n"));
    assert!(head.contains("Date: "));
    assert_eq!(body, INDEX);
}

#[tokio::test]
async fn test_get_index_html_serves_same_document() {
    let dir = docroot();
    let response = exchange(&dir, b"GET /index.html HTTP/1.1\r\nHost: x\r\n\r\n").await;
    let (head, body) = split_head_body(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(body, INDEX);
}

#[tokio::test]
async fn test_get_nested_file() {
    let dir = docroot();
    let response = exchange(&dir, b"GET /sub/data.json HTTP/1.1\r\nHost: x\r\n\r\n").await;
    let (head, body) = split_head_body(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.contains("Content-Type: application/json\r\n"));
    assert_eq!(body, b"{\"k\":1}");
}

#[tokio::test]
async fn test_missing_resource_is_404() {
    let dir = docroot();
    let response = exchange(&dir, b"GET /missing.txt HTTP/1.1\r\nHost: x\r\n\r\n").await;
    let (head, body) = split_head_body(&response);

    assert!(head.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(head.ends_with("Content-Length: 0\r\n\r\n"));
    assert!(!head.contains("Content-Type"));
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_missing_host_is_400() {
    let dir = docroot();

    let requests: [&[u8]; 4] = [
        b"GET / HTTP/1.1\r\n\r\n",
        b"GET /missing.txt HTTP/1.1\r\nAccept: */*\r\n\r\n",
        b"POST / HTTP/1.1\r\n\r\n",
        b"BREW / HTTP/1.1\r\n\r\n",
    ];

    for request in requests {
        let response = exchange(&dir, request).await;
        assert_eq!(status_line(&response), "HTTP/1.1 400 Bad Request");
        assert!(split_head_body(&response).1.is_empty());
    }
}

#[tokio::test]
async fn test_unsupported_methods_are_405() {
    let dir = docroot();

    for method in ["POST", "PUT", "PATCH", "DELETE"] {
        for target in ["/a.html", "/missing.txt"] {
            let request = format!("{} {} HTTP/1.1\r\nHost: x\r\n\r\n", method, target);
            let response = exchange(&dir, request.as_bytes()).await;

            assert_eq!(
                status_line(&response),
                "HTTP/1.1 405 Method Not Allowed",
                "{} {}",
                method,
                target
            );
            assert!(split_head_body(&response).1.is_empty());
        }
    }
}

#[tokio::test]
async fn test_unknown_method_is_400() {
    let dir = docroot();
    let response = exchange(&dir, b"HEAD / HTTP/1.1\r\nHost: x\r\n\r\n").await;

    assert_eq!(status_line(&response), "HTTP/1.1 400 Bad Request");
}

#[tokio::test]
async fn test_bad_version_is_505() {
    let dir = docroot();

    let requests: [&[u8]; 4] = [
        b"GET /a.html HTTP/1.0\r\nHost: x\r\n\r\n",
        b"GET /missing.txt HTTP/1.0\r\nHost: x\r\n\r\n",
        b"BREW / HTTP/1.0\r\nHost: x\r\n\r\n",
        // version beats a bad header block
        b"GET / HTTP/2\r\nBroken\r\n\r\n",
    ];

    for request in requests {
        let response = exchange(&dir, request).await;
        assert_eq!(status_line(&response), "HTTP/1.1 505 HTTP Version Not Supported");
        assert!(split_head_body(&response).1.is_empty());
    }
}

#[tokio::test]
async fn test_malformed_request_line_is_400() {
    let dir = docroot();

    // answered without waiting for a header block
    let response = exchange(&dir, b"GET /\r\n").await;
    assert_eq!(status_line(&response), "HTTP/1.1 400 Bad Request");

    let response = exchange(&dir, b"GET  / HTTP/1.1\r\nHost: x\r\n\r\n").await;
    assert_eq!(status_line(&response), "HTTP/1.1 400 Bad Request");
}

#[tokio::test]
async fn test_malformed_header_is_400() {
    let dir = docroot();
    let response = exchange(&dir, b"GET / HTTP/1.1\r\nHost: x\r\nNoColonHere\r\n\r\n").await;

    assert_eq!(status_line(&response), "HTTP/1.1 400 Bad Request");
}

#[tokio::test]
async fn test_truncated_request_is_400() {
    let dir = docroot();
    let (mut client, server) = tokio::io::duplex(1024);
    let resolver = ResourceResolver::new(dir.path().to_str().unwrap());

    let handle = tokio::spawn(async move {
        let mut conn = Connection::new(server, resolver);
        conn.run().await
    });

    client.write_all(b"GET / HTTP/1.1\r\nHost:").await.unwrap();
    client.shutdown().await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    handle.await.unwrap().unwrap();

    assert_eq!(status_line(&response), "HTTP/1.1 400 Bad Request");
}

#[tokio::test]
async fn test_directory_target_falls_back_to_404() {
    let dir = docroot();
    let response = exchange(&dir, b"GET /sub HTTP/1.1\r\nHost: x\r\n\r\n").await;
    let (head, body) = split_head_body(&response);

    assert!(head.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_repeated_request_is_identical_except_date() {
    let dir = docroot();
    let request = b"GET /a.html HTTP/1.1\r\nHost: x\r\n\r\n";

    let first = exchange(&dir, request).await;
    let second = exchange(&dir, request).await;

    let strip_date = |response: &[u8]| -> Vec<String> {
        String::from_utf8(response.to_vec())
            .unwrap()
            .split("\r\n")
            .filter(|line| !line.starts_with("Date: "))
            .map(str::to_string)
            .collect()
    };

    assert_eq!(strip_date(&first[..]), strip_date(&second[..]));
}

#[tokio::test]
async fn test_only_one_response_per_connection() {
    let dir = docroot();
    let response = exchange(
        &dir,
        b"GET /a.html HTTP/1.1\r\nHost: x\r\n\r\nGET / HTTP/1.1\r\nHost: x\r\n\r\n",
    )
    .await;

    let text = String::from_utf8(response).unwrap();
    assert_eq!(text.matches("HTTP/1.1 ").count(), 1);
    assert!(text.ends_with("<p>a</p>"));
}
