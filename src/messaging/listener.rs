//! Line-framed TCP transport for the message handler.
//!
//! # Protocol
//! ```text
//! client → gateway:  <payload bytes>\n
//! gateway → client:  +OK\n | -ERR <message>\n
//! ```
//!
//! # Design Decisions
//! - One payload per line; a trailing `\r` is stripped
//! - Oversized lines get an error reply and the connection is closed
//! - Shutdown stops the accept loop and every open connection

use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::broadcast;

use crate::messaging::handler::MessageHandler;
use crate::net::{ConnectionId, Listener, ListenerError};
use crate::observability::metrics;

const OK_REPLY: &[u8] = b"+OK\n";

pub struct MessageListener {
    listener: Listener,
    handler: Arc<MessageHandler>,
    max_payload_bytes: usize,
}

impl MessageListener {
    pub fn new(listener: Listener, handler: MessageHandler, max_payload_bytes: usize) -> Self {
        Self {
            listener,
            handler: Arc::new(handler),
            max_payload_bytes,
        }
    }

    pub fn local_addr(&self) -> Result<std::net::SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Accept connections until shutdown fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), ListenerError> {
        tracing::info!(
            mode = ?self.handler.mode(),
            max_payload_bytes = self.max_payload_bytes,
            "Message listener starting"
        );

        loop {
            let accepted = tokio::select! {
                accepted = self.listener.accept() => accepted,
                _ = shutdown.recv() => break,
            };

            let (stream, peer_addr, permit) = match accepted {
                Ok(conn) => conn,
                Err(ListenerError::Accept(e)) => {
                    tracing::warn!(error = %e, "Failed to accept message connection");
                    continue;
                }
                Err(e) => return Err(e),
            };

            let handler = self.handler.clone();
            let limit = self.max_payload_bytes;
            let conn_shutdown = shutdown.resubscribe();
            tokio::spawn(async move {
                let id = permit.id();
                if let Err(e) = serve_connection(stream, id, &handler, limit, conn_shutdown).await {
                    tracing::debug!(connection_id = %id, peer_addr = %peer_addr, error = %e, "Message connection ended with error");
                }
                drop(permit);
            });
        }

        tracing::info!("Message listener stopped");
        Ok(())
    }
}

/// Read payload lines from `stream` and answer each one.
pub async fn serve_connection<S>(
    stream: S,
    id: ConnectionId,
    handler: &MessageHandler,
    max_payload_bytes: usize,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);
    let mut line = Vec::new();
    // Room for the payload plus a `\r\n` terminator.
    let read_cap = max_payload_bytes as u64 + 2;

    loop {
        line.clear();
        let mut limited = (&mut reader).take(read_cap);
        let read = tokio::select! {
            read = limited.read_until(b'\n', &mut line) => read?,
            _ = shutdown.recv() => break,
        };
        if read == 0 {
            break;
        }

        let truncated = line.len() as u64 == read_cap && !line.ends_with(b"\n");
        let payload = trim_line_ending(&line);
        if truncated || payload.len() > max_payload_bytes {
            tracing::warn!(connection_id = %id, limit = max_payload_bytes, "Message payload too large");
            metrics::record_message("too_large");
            write_half.write_all(b"-ERR payload too large\n").await?;
            break;
        }

        let start = Instant::now();
        match handler.on_message(payload) {
            Ok(()) => {
                tracing::debug!(connection_id = %id, bytes = payload.len(), elapsed = ?start.elapsed(), "Message handled");
                metrics::record_message("ok");
                write_half.write_all(OK_REPLY).await?;
            }
            Err(e) => {
                tracing::warn!(connection_id = %id, error = %e, "Message rejected");
                metrics::record_message("error");
                write_half.write_all(format!("-ERR {e}\n").as_bytes()).await?;
            }
        }
    }

    write_half.shutdown().await
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::registry::{CommandRegistry, LookupPolicy};
    use crate::command::Executor;
    use crate::messaging::MessageMode;
    use crate::settings::MemoryStore;

    fn handler(mode: MessageMode) -> MessageHandler {
        let store = Arc::new(MemoryStore::default());
        MessageHandler::new(
            Executor::new(CommandRegistry::builtin(store, LookupPolicy::Lenient)),
            mode,
        )
    }

    async fn exchange(mode: MessageMode, limit: usize, input: &[u8]) -> String {
        let (mut client, server) = tokio::io::duplex(4096);
        let (_tx, rx) = broadcast::channel(1);
        let handler = handler(mode);

        client.write_all(input).await.unwrap();
        client.shutdown().await.unwrap();
        serve_connection(server, ConnectionId::new(), &handler, limit, rx)
            .await
            .unwrap();

        let mut out = String::new();
        client.read_to_string(&mut out).await.unwrap();
        out
    }

    #[test]
    fn test_trim_line_ending() {
        assert_eq!(trim_line_ending(b"abc\r\n"), b"abc");
        assert_eq!(trim_line_ending(b"abc\n"), b"abc");
        assert_eq!(trim_line_ending(b"abc"), b"abc");
        assert_eq!(trim_line_ending(b"\n"), b"");
    }

    #[tokio::test]
    async fn test_accept_mode_acknowledges_every_line() {
        let out = exchange(MessageMode::Accept, 64, b"hello\n\n[\"unknown\"]\r\nlast").await;
        assert_eq!(out, "+OK\n+OK\n+OK\n+OK\n");
    }

    #[tokio::test]
    async fn test_execute_mode_reports_errors() {
        let out = exchange(MessageMode::Execute, 64, b"[\"config\",\"k\"]\n[\"nope\"]\n").await;
        assert_eq!(out, "+OK\n-ERR command not yet supported: nope\n");
    }

    #[tokio::test]
    async fn test_oversized_line_closes_connection() {
        let out = exchange(MessageMode::Accept, 4, b"ok\n0123456789\nnever\n").await;
        assert_eq!(out, "+OK\n-ERR payload too large\n");
    }

    #[tokio::test]
    async fn test_line_at_limit_is_accepted() {
        let out = exchange(MessageMode::Accept, 4, b"abcd\n").await;
        assert_eq!(out, "+OK\n");
    }

    #[tokio::test]
    async fn test_crlf_line_at_limit_gets_one_reply() {
        let out = exchange(MessageMode::Accept, 4, b"abcd\r\nnext\r\n").await;
        assert_eq!(out, "+OK\n+OK\n");
    }

    #[tokio::test]
    async fn test_line_over_limit_by_one_is_rejected() {
        let out = exchange(MessageMode::Accept, 4, b"abcde\n").await;
        assert_eq!(out, "-ERR payload too large\n");

        let out = exchange(MessageMode::Accept, 4, b"abcd\rx\n").await;
        assert_eq!(out, "-ERR payload too large\n");
    }
}
