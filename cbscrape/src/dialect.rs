//! The CBS CLI dialect: commands, login challenges, prompt and pagination.
//!
//! # Prompt Examples
//!
//! ```text
//! User Name:                         # in-band login challenge
//! Password:
//! switch01#                          # privileged exec, where every command runs
//! switch01>                          # user exec (only probed by validate)
//! More: <space>,  Quit: q or CTRL+Z, One line: <return>
//! ```

use once_cell::sync::Lazy;
use regex::Regex as TextRegex;
use regex::bytes::Regex;

/// Model identification command.
pub const SHOW_SYSTEM: &str = "show system";

/// Running configuration dump (paged).
pub const SHOW_RUNNING_CONFIG: &str = "show running-config";

/// Startup configuration dump (paged).
pub const SHOW_STARTUP_CONFIG: &str = "show startup-config";

/// Interface status summary (paged on larger switches).
pub const SHOW_INTERFACES_STATUS: &str = "show interfaces status";

/// Reply to the OpenSSH host key trust question.
pub const HOST_KEY_ACCEPT: &str = "yes";

/// Sent at a pagination marker to fetch the next page.
pub const NEXT_PAGE: &[u8] = b" ";

/// Model name reported when `show system` cannot be parsed.
pub const UNKNOWN_MODEL: &str = "Unknown";

pub(crate) static HOST_KEY_PROMPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"The authenticity of host .* can't be established").expect("valid host key pattern")
});

pub(crate) static CONNECTION_REFUSED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"ssh: connect to host .* port .*: Connection refused")
        .expect("valid refusal pattern")
});

pub(crate) static USER_NAME_PROMPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"User Name:").expect("valid user name pattern"));

pub(crate) static PASSWORD_PROMPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Password:").expect("valid password pattern"));

/// Privileged exec prompt of an unknown host: a hostname ending in `#` at
/// the end of a line. Only used until login shows the real hostname, see
/// [`host_prompt`].
pub(crate) static COMMAND_PROMPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[\w.\-@()/: ]{1,63}#[ \t\r]?$").expect("valid prompt pattern")
});

/// Any prompt, privileged or not. Used to probe a possibly stale console.
pub(crate) static ANY_PROMPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[>#]").expect("valid probe pattern"));

pub(crate) static MORE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"More: <space>").expect("valid pagination pattern"));

/// The pagination hint as it lands in captured output. The marker and the
/// key help each show up alone: the marker when a read stopped on it without
/// consuming it, the key help when the paged read did. The key help is
/// followed by one padding space; anything past it belongs to the next page.
pub(crate) static PAGINATION_HINT: Lazy<TextRegex> = Lazy::new(|| {
    TextRegex::new(
        r"(?:More: <space>)?,?[ \t]*Quit: q or CTRL\+Z, One line: <return> ?|More: <space>",
    )
    .expect("valid pagination hint pattern")
});

/// Hostname shown by a privileged prompt match such as `switch01# `.
pub(crate) fn prompt_hostname(matched: &str) -> Option<&str> {
    let hostname = matched.trim_end().strip_suffix('#')?.trim();
    (!hostname.is_empty()).then_some(hostname)
}

/// Privileged exec prompt of one known host.
///
/// Config lines ending in `#` (a description, a banner) would satisfy the
/// generic [`COMMAND_PROMPT`] and cut a dump short.
pub(crate) fn host_prompt(hostname: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?m)^{}#[ \t\r]?$", regex::escape(hostname)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_prompt_match() {
        assert!(COMMAND_PROMPT.is_match(b"switch01#"));
        assert!(COMMAND_PROMPT.is_match(b"output\r\nswitch01# "));
        assert!(COMMAND_PROMPT.is_match(b"line\r\ncore-sw.lab#\r\n"));
        assert!(!COMMAND_PROMPT.is_match(b"switch01>"));
        assert!(!COMMAND_PROMPT.is_match(b"User Name:"));
        assert!(!COMMAND_PROMPT.is_match(b"description a#b"));
    }

    #[test]
    fn test_pagination_hint_strip() {
        let raw = "line1\r\nMore: <space>,  Quit: q or CTRL+Z, One line: <return> line2";
        assert_eq!(PAGINATION_HINT.replace_all(raw, ""), "line1\r\nline2");
    }

    #[test]
    fn test_pagination_hint_parts_strip_alone() {
        assert_eq!(PAGINATION_HINT.replace_all("a\r\nMore: <space>b", ""), "a\r\nb");
        assert_eq!(
            PAGINATION_HINT.replace_all("a\r\n,  Quit: q or CTRL+Z, One line: <return> b", ""),
            "a\r\nb"
        );
    }

    #[test]
    fn test_pagination_hint_keeps_wrap_padding() {
        let raw = "a More: <space>,  Quit: q or CTRL+Z, One line: <return>   b";
        assert_eq!(PAGINATION_HINT.replace_all(raw, ""), "a   b");
    }

    #[test]
    fn test_prompt_hostname() {
        assert_eq!(prompt_hostname("switch01#"), Some("switch01"));
        assert_eq!(prompt_hostname("core-sw.lab# \r"), Some("core-sw.lab"));
        assert_eq!(prompt_hostname("#"), None);
        assert_eq!(prompt_hostname("switch01>"), None);
    }

    #[test]
    fn test_host_prompt_ignores_other_lines_ending_in_hash() {
        let prompt = host_prompt("switch01").unwrap();
        assert!(prompt.is_match(b"output\r\nswitch01#"));
        assert!(prompt.is_match(b"output\r\nswitch01# "));
        assert!(!prompt.is_match(b" description Lab#\r\n"));
        assert!(!prompt.is_match(b"switch012#"));

        let dotted = host_prompt("core.sw").unwrap();
        assert!(!dotted.is_match(b"corexsw#"));
    }
}
