//! Channel layer: pattern-driven reads and raw writes over a text console.
//!
//! The device protocol has no framing. Every response is delimited by
//! matching a pattern (prompt, pagination marker, login challenge) against
//! the character stream, so this layer exposes exactly two primitives:
//! `expect` and `send`.

mod buffer;
mod expect;
mod pty;
#[cfg(test)]
pub(crate) mod testing;

pub use buffer::PatternBuffer;
pub use expect::{Connector, Expect, TerminalChannel};
pub use pty::{PtyChannel, SshConnector};
