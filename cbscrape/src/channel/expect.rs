//! Expectation results and the terminal channel seam.

use std::future::Future;
use std::time::Duration;

use regex::bytes::Regex;

use crate::error::Result;

/// Outcome of waiting for one of several patterns.
///
/// `K` is the caller's own kind enum, so every call site matches on named
/// variants and an unhandled outcome is a compile error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expect<K> {
    /// One of the patterns matched.
    Matched {
        kind: K,
        /// Output preceding the match.
        before: String,
        /// The matched text.
        matched: String,
    },

    /// The stream ended first. `before` holds whatever was left unread.
    Eof { before: String },

    /// The timeout elapsed first. `before` holds whatever arrived meanwhile.
    Timeout { before: String },
}

impl<K> Expect<K> {
    /// Text received before the match, end of stream or timeout.
    pub fn before(&self) -> &str {
        match self {
            Expect::Matched { before, .. } | Expect::Eof { before } | Expect::Timeout { before } => {
                before
            }
        }
    }

    /// Consume the outcome, keeping only the preceding text.
    pub fn into_before(self) -> String {
        match self {
            Expect::Matched { before, .. } | Expect::Eof { before } | Expect::Timeout { before } => {
                before
            }
        }
    }
}

/// An interactive text console with blocking pattern reads.
pub trait TerminalChannel: Send {
    /// Wait until one of `patterns` appears, the stream ends, or `timeout`
    /// elapses. Everything up to the end of the match is consumed.
    fn expect<K>(
        &mut self,
        patterns: &[(K, Regex)],
        timeout: Duration,
    ) -> impl Future<Output = Result<Expect<K>>> + Send
    where
        K: Copy + Send + Sync;

    /// Write raw bytes.
    fn send(&mut self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Write a line followed by a newline.
    fn send_line(&mut self, line: &str) -> impl Future<Output = Result<()>> + Send {
        let mut data = Vec::with_capacity(line.len() + 1);
        data.extend_from_slice(line.as_bytes());
        data.push(b'\n');
        async move { self.send(&data).await }
    }

    /// Close the channel.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Something that can open fresh terminal channels to one device.
pub trait Connector: Send + Sync {
    type Channel: TerminalChannel;

    /// Spawn a new channel.
    fn spawn(&self) -> impl Future<Output = Result<Self::Channel>> + Send;
}
