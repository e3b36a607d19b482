//! Pure text parsers for captured CLI output.
//!
//! Nothing here touches a channel. Each parser degrades instead of failing:
//! unrecognised input is dropped and the caller gets whatever could be read.

mod normalize;
mod status;
mod system;

pub use normalize::normalize_config;
pub use status::{STATUS_HEADERS, StatusTable, parse_interfaces_status};
pub use system::parse_model_name;
