//! SSH transport layer wrapping russh.
//!
//! Connection setup, host key checking, SSH-level authentication and
//! opening the interactive shell channel. CBS switches normally accept the
//! SSH layer without credentials and ask for them inside the shell.

pub mod config;
mod known_hosts;
mod ssh;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use ssh::{SshStream, SshTransport};
