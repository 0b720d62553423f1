//! Newline-delimited JSON transport.
//!
//! Bridges an async reader/writer pair (stdin/stdout for the `serve` command)
//! to an in-process [`Port`]: one envelope per line in each direction.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::port::Port;
use super::protocol::Envelope;

/// Spawn the reader and writer tasks and return the local end of the link.
///
/// The returned handles finish when the reader hits EOF and when the local
/// port is dropped, respectively.
pub fn bridge<R, W>(reader: R, writer: W) -> (Port, JoinHandle<()>, JoinHandle<()>)
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (local, remote) = Port::pair();
    let (to_local, from_local) = remote.split();

    let read_task = tokio::spawn(async move {
        let mut reader = reader;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) => {
                    warn!(error = %err, "failed to read from transport");
                    break;
                }
            }
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(err) => {
                    warn!(error = %err, "dropping non-UTF-8 line");
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match Envelope::decode(line) {
                Ok(envelope) => {
                    if to_local.send(envelope).is_err() {
                        break;
                    }
                }
                Err(err) => warn!(error = %err, "dropping undecodable line"),
            }
        }
        debug!("transport reader finished");
    });

    let write_task = tokio::spawn(async move {
        let mut writer = writer;
        let mut from_local = from_local;
        while let Some(envelope) = from_local.recv().await {
            let line = match envelope.encode() {
                Ok(line) => line,
                Err(err) => {
                    warn!(error = %err, id = envelope.id(), "dropping unencodable envelope");
                    continue;
                }
            };
            let written = async {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await
            };
            if let Err(err) = written.await {
                warn!(error = %err, "failed to write to transport");
                break;
            }
        }
        debug!("transport writer finished");
    });

    (local, read_task, write_task)
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, BufReader, duplex};

    use super::*;
    use crate::channel::protocol::Response;

    #[tokio::test]
    async fn test_bridge_round_trips_lines() {
        let input = b"{\"rpc\":\"listTabs\",\"id\":1}\n\nnot json\n{\"id\":2,\"error\":\"x\"}\n";
        let (out_writer, mut out_reader) = duplex(1024);
        let (mut port, reader, writer) = bridge(BufReader::new(&input[..]), out_writer);

        assert_eq!(port.recv().await.map(|e| e.id()), Some(1));
        assert_eq!(port.recv().await.map(|e| e.id()), Some(2));
        assert!(port.recv().await.is_none());
        reader.await.unwrap();

        port.post(Response::success(1, serde_json::json!([])));
        drop(port);
        writer.await.unwrap();

        let mut written = String::new();
        out_reader.read_to_string(&mut written).await.unwrap();
        assert_eq!(written, "{\"id\":1,\"result\":[]}\n");
    }

    #[tokio::test]
    async fn test_bridge_skips_invalid_utf8_line() {
        let input = b"\xff\xfe garbage\n{\"rpc\":\"listTabs\",\"id\":1}\n";
        let (mut port, reader, _writer) = bridge(BufReader::new(&input[..]), tokio::io::sink());

        assert_eq!(port.recv().await.map(|e| e.id()), Some(1));
        assert!(port.recv().await.is_none());
        reader.await.unwrap();
    }
}
