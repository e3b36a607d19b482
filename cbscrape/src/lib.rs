//! # cbscrape
//!
//! Async, read-only scraper for the CLI of Cisco Business (CBS) switches.
//!
//! CBS switches run an interactive shell with its own `User Name:` /
//! `Password:` dialogue, paginate long output and offer no structured
//! management API. cbscrape drives that console over SSH and turns what it
//! prints into typed per-interface records.
//!
//! ## Features
//!
//! - Async SSH connections via russh
//! - Login state machine with every outcome reported as a value
//! - Echo resynchronisation, pagination and quiet reconnects
//! - Config normalizer and `show interfaces status` parser
//! - Declarative directive table mapping config lines onto settings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cbscrape::{Initializer, SessionBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cbscrape::Error> {
//!     let mut session = SessionBuilder::new("192.168.1.254")
//!         .username("cisco")
//!         .password("secret")
//!         .build()?;
//!
//!     let outcome = session.connect().await;
//!     println!("{outcome}");
//!
//!     let mut init = Initializer::new(&mut session);
//!     init.initialize().await;
//!     for entry in init.log().iter() {
//!         println!("{entry}");
//!     }
//!     for (name, settings) in &init.records().settings {
//!         println!("{name}: {} {}", settings.mode, settings.speed);
//!     }
//!
//!     session.disconnect().await;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod dialect;
pub mod error;
pub mod initializer;
pub mod interface;
pub mod parse;
pub mod session;
pub mod transport;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use initializer::{InitializationLog, InitializationReport, Initializer};
pub use interface::{InterfaceName, PhysicalInterfaceCurrentStatus, PhysicalInterfaceSettings};
pub use parse::StatusTable;
pub use session::{ConfigSource, ConnectOutcome, Session, SessionBuilder, SessionState};
pub use transport::{AuthMethod, HostKeyVerification, SshConfig};
