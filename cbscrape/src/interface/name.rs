//! Canonical interface names.

use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;

const GIGABIT_ETHERNET: &str = "GigabitEthernet";
const PHYSICAL_PREFIX: &str = "gi";

/// Short interface name as used by `show interfaces status` (`gi1/0/1`,
/// `Po1`). This is the join key between config blocks and status rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct InterfaceName(String);

impl InterfaceName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Key for a config `interface <label>` header.
    ///
    /// `GigabitEthernet1/0/1` becomes `gi1/0/1`. Every other label is kept
    /// verbatim, so `Port-channel1` does not become `Po1`.
    pub fn from_config_label(label: &str) -> Self {
        let label = label.trim();
        match label.strip_prefix(GIGABIT_ETHERNET) {
            Some(rest) => Self(format!("{PHYSICAL_PREFIX}{}", rest.trim())),
            None => Self(label.to_string()),
        }
    }

    /// Whether this names a physical gigabit port.
    pub fn is_physical(&self) -> bool {
        self.0.starts_with(PHYSICAL_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for InterfaceName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for InterfaceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InterfaceName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for InterfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
