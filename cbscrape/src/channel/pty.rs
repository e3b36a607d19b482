//! PTY channel over an interactive byte stream.

use std::time::Duration;

use bytes::BytesMut;
use log::{debug, trace, warn};
use regex::bytes::Regex;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::buffer::PatternBuffer;
use super::expect::{Connector, Expect, TerminalChannel};
use crate::error::{ChannelError, Result};
use crate::transport::{SshConfig, SshStream, SshTransport};

const READ_CHUNK: usize = 4096;

/// Terminal channel over any async byte stream.
///
/// In production the stream is an SSH shell channel; tests drive it with
/// scripted transcripts.
pub struct PtyChannel<T> {
    io: T,

    /// Pattern buffer for accumulating output.
    buffer: PatternBuffer,

    /// The stream reported end of file.
    eof: bool,

    /// SSH session kept alive for as long as the channel is open.
    transport: Option<SshTransport>,
}

impl<T> PtyChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Create a channel over a bare stream.
    pub fn new(io: T) -> Self {
        Self {
            io,
            buffer: PatternBuffer::new(),
            eof: false,
            transport: None,
        }
    }

    /// Whether the stream has ended.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Read one chunk into the pattern buffer. Returns false on end of stream.
    async fn fill(&mut self) -> Result<bool> {
        let mut chunk = BytesMut::with_capacity(READ_CHUNK);
        let n = self
            .io
            .read_buf(&mut chunk)
            .await
            .map_err(ChannelError::Io)?;
        if n == 0 {
            self.eof = true;
            return Ok(false);
        }
        trace!("read {} bytes: {:?}", n, String::from_utf8_lossy(&chunk));
        self.buffer.extend(&chunk);
        Ok(true)
    }
}

impl PtyChannel<SshStream> {
    fn with_transport(io: SshStream, transport: SshTransport) -> Self {
        let mut channel = Self::new(io);
        channel.transport = Some(transport);
        channel
    }
}

impl<T> TerminalChannel for PtyChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn expect<K>(&mut self, patterns: &[(K, Regex)], timeout: Duration) -> Result<Expect<K>>
    where
        K: Copy + Send + Sync,
    {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if let Some((kind, start, end)) = self.buffer.find_earliest(patterns) {
                let consumed = self.buffer.consume(end);
                return Ok(Expect::Matched {
                    kind,
                    before: String::from_utf8_lossy(&consumed[..start]).into_owned(),
                    matched: String::from_utf8_lossy(&consumed[start..]).into_owned(),
                });
            }

            if self.eof {
                let rest = self.buffer.take();
                debug!("expect: end of stream");
                return Ok(Expect::Eof {
                    before: String::from_utf8_lossy(&rest).into_owned(),
                });
            }

            match tokio::time::timeout_at(deadline, self.fill()).await {
                Ok(result) => {
                    result?;
                }
                Err(_) => {
                    let rest = self.buffer.take();
                    debug!("expect: timed out after {:?}", timeout);
                    return Ok(Expect::Timeout {
                        before: String::from_utf8_lossy(&rest).into_owned(),
                    });
                }
            }
        }
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        self.io.write_all(data).await.map_err(ChannelError::Io)?;
        self.io.flush().await.map_err(ChannelError::Io)?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let shutdown = self.io.shutdown().await.map_err(ChannelError::Io);
        if let Some(transport) = self.transport.take() {
            transport.close().await?;
        }
        self.eof = true;
        shutdown?;
        Ok(())
    }
}

impl<T> Drop for PtyChannel<T> {
    fn drop(&mut self) {
        if self.transport.is_some() {
            warn!("PtyChannel dropped without close()");
        }
    }
}

/// Spawns SSH shell channels to one device.
#[derive(Debug)]
pub struct SshConnector {
    config: SshConfig,
}

impl SshConnector {
    pub fn new(config: SshConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SshConfig {
        &self.config
    }
}

impl Connector for SshConnector {
    type Channel = PtyChannel<SshStream>;

    async fn spawn(&self) -> Result<Self::Channel> {
        let transport = SshTransport::connect(&self.config).await?;
        let stream = match transport.open_shell().await {
            Ok(stream) => stream,
            Err(e) => {
                let _ = transport.close().await;
                return Err(e);
            }
        };
        Ok(PtyChannel::with_transport(stream, transport))
    }
}
