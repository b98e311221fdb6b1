use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::parser::ParseError;

/// Reads one CRLF-terminated line, one byte at a time.
///
/// The CRLF is stripped from the returned line and nothing past it is
/// consumed, so the next call starts exactly at the following line. There is
/// no length limit and no timeout: a peer that never sends CRLF keeps this
/// future pending.
pub async fn read_line<R>(reader: &mut R) -> Result<String, ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut line = Vec::new();

    loop {
        let byte = reader.read_u8().await?;
        line.push(byte);

        if line.ends_with(b"\r\n") {
            line.truncate(line.len() - 2);
            break;
        }
    }

    String::from_utf8(line).map_err(|_| ParseError::InvalidEncoding)
}
