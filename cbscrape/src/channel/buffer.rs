//! Pattern buffer for accumulating device output.
//!
//! Output is stripped of ANSI escape sequences as it arrives and held until
//! an expectation consumes it. Matching always runs against the unconsumed
//! region, so the text before a match is exactly what the device printed
//! since the previous match.

use bytes::BytesMut;
use regex::bytes::Regex;
use vte::{Parser, Perform};

/// Buffer for accumulating output and finding the earliest pattern match.
pub struct PatternBuffer {
    /// Unconsumed output.
    buffer: BytesMut,

    /// Escape sequence parser, kept across chunks so sequences split over
    /// two reads are still removed.
    parser: Parser,
}

impl PatternBuffer {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            parser: Parser::new(),
        }
    }

    /// Extend the buffer with new data, stripping ANSI escape codes.
    pub fn extend(&mut self, data: &[u8]) {
        let mut stripper = Stripper {
            out: &mut self.buffer,
        };
        self.parser.advance(&mut stripper, data);
    }

    /// Find the pattern whose match starts earliest in the buffer.
    ///
    /// Ties go to the pattern listed first. Returns the pattern's kind and
    /// the match's byte range.
    pub fn find_earliest<K: Copy>(&self, patterns: &[(K, Regex)]) -> Option<(K, usize, usize)> {
        let mut best: Option<(K, usize, usize)> = None;
        for (kind, pattern) in patterns {
            if let Some(m) = pattern.find(&self.buffer) {
                if best.is_none_or(|(_, start, _)| m.start() < start) {
                    best = Some((*kind, m.start(), m.end()));
                }
            }
        }
        best
    }

    /// Remove and return everything up to `end`.
    pub fn consume(&mut self, end: usize) -> BytesMut {
        self.buffer.split_to(end.min(self.buffer.len()))
    }

    /// Take ownership of the buffer contents and reset.
    pub fn take(&mut self) -> BytesMut {
        self.buffer.split()
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PatternBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternBuffer")
            .field("buffer", &String::from_utf8_lossy(&self.buffer))
            .finish()
    }
}

/// vte performer that keeps printable text and line control characters.
struct Stripper<'a> {
    out: &'a mut BytesMut,
}

impl Perform for Stripper<'_> {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.out.extend_from_slice(&[byte]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Prompt,
        More,
    }

    #[test]
    fn test_basic_extend() {
        let mut buffer = PatternBuffer::new();
        buffer.extend(b"Hello, world!");
        assert_eq!(buffer.as_slice(), b"Hello, world!");
    }

    #[test]
    fn test_ansi_stripping() {
        let mut buffer = PatternBuffer::new();
        buffer.extend(b"\x1b[32mGreen text\x1b[0m\r\n");
        assert_eq!(buffer.as_slice(), b"Green text\r\n");
    }

    #[test]
    fn test_escape_split_across_chunks() {
        let mut buffer = PatternBuffer::new();
        buffer.extend(b"abc\x1b[");
        buffer.extend(b"0mdef");
        assert_eq!(buffer.as_slice(), b"abcdef");
    }

    #[test]
    fn test_earliest_match_wins() {
        let mut buffer = PatternBuffer::new();
        buffer.extend(b"line\r\nMore: <space> switch#");
        let patterns = [
            (Kind::Prompt, Regex::new(r"switch#").unwrap()),
            (Kind::More, Regex::new(r"More: <space>").unwrap()),
        ];
        let (kind, start, end) = buffer.find_earliest(&patterns).unwrap();
        assert_eq!(kind, Kind::More);
        assert_eq!(&buffer.as_slice()[start..end], b"More: <space>");
    }

    #[test]
    fn test_consume_leaves_remainder() {
        let mut buffer = PatternBuffer::new();
        buffer.extend(b"before#after");
        let consumed = buffer.consume(7);
        assert_eq!(&consumed[..], b"before#");
        assert_eq!(buffer.as_slice(), b"after");
        assert_eq!(&buffer.take()[..], b"after");
        assert!(buffer.is_empty());
    }
}
