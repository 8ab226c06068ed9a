//! Newline-delimited JSON-RPC transport
//!
//! One request per input line, one response per output line. Notifications
//! produce no output. EOF on the reader ends the loop cleanly.

use eyre::{Result, WrapErr};
use hn_mcp::McpHandler;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

pub async fn serve<R, W>(handler: &McpHandler, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .wrap_err("Failed to read request line")?;
        if read == 0 {
            break;
        }

        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }
        debug!(bytes = line.len(), "Request received");

        // Undecodable lines get a parse error, the session goes on
        if let Some(response) = handler.handle_bytes(line).await {
            writer
                .write_all(response.as_bytes())
                .await
                .wrap_err("Failed to write response")?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    info!("Input closed, stopping stdio server");
    Ok(())
}
