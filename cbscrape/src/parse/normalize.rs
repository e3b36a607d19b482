//! Configuration dump normalizer.
//!
//! Turns the raw output of `show running-config` / `show startup-config` into
//! one logical statement per line. The device wraps long statements with
//! double-space padding instead of a newline, so a run of two or more spaces
//! is a line boundary just like `\n`.

use memchr::memmem;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dialect::PAGINATION_HINT;

/// `username ... privilege 15username ...` arrives fused on one line.
static PRIVILEGE_USERNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(privilege \d+)(username )").expect("valid privilege/username pattern")
});

static PRIVILEGE_SSH_SERVER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(privilege \d+)\s*(ip ssh server)").expect("valid privilege/ssh pattern")
});

const WRAP: &[u8] = b"  ";

/// Normalize a raw configuration dump into ordered logical lines.
///
/// Lines are trimmed; empty lines and the block terminators `exit` and `!`
/// are dropped. Feeding the result back in (joined by `\n`) yields the same
/// lines.
pub fn normalize_config(raw: &str) -> Vec<String> {
    let text = PAGINATION_HINT.replace_all(raw, "");
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = PRIVILEGE_USERNAME.replace_all(&text, "$1\n$2");
    let text = PRIVILEGE_SSH_SERVER.replace_all(&text, "$1\n$2");

    let finder = memmem::Finder::new(WRAP);
    let mut lines = Vec::new();
    for physical in text.split('\n') {
        let mut start = 0;
        for pos in finder.find_iter(physical.as_bytes()) {
            push_statement(&mut lines, &physical[start..pos]);
            start = pos + WRAP.len();
        }
        push_statement(&mut lines, &physical[start..]);
    }
    lines
}

fn push_statement(lines: &mut Vec<String>, piece: &str) {
    let statement = piece.trim();
    if statement.is_empty()
        || statement.eq_ignore_ascii_case("exit")
        || statement == "!"
    {
        return;
    }
    lines.push(statement.to_string());
}
