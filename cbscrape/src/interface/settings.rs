//! Administrative settings of a physical port.

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::name::InterfaceName;

/// Define a closed set of CLI keywords with their display form.
///
/// `parse` is case-insensitive, matching how the device prints the same
/// keyword in lower case in the config and capitalised in status tables.
macro_rules! cli_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All values, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }

            pub fn parse(token: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str().eq_ignore_ascii_case(token))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

cli_enum! {
    pub enum Duplex {
        Full => "Full",
        Half => "Half",
    }
}

cli_enum! {
    /// Port speed in Mbit/s.
    pub enum Speed {
        Mbps10 => "10",
        Mbps100 => "100",
        Mbps1000 => "1000",
        Mbps10000 => "10000",
    }
}

cli_enum! {
    pub enum Negotiation {
        Enabled => "Enabled",
        Disabled => "Disabled",
    }
}

cli_enum! {
    pub enum FlowControl {
        Off => "Off",
        On => "On",
        Auto => "Auto",
    }
}

cli_enum! {
    pub enum AdminState {
        Shutdown => "shutdown",
        NoShutdown => "no shutdown",
    }
}

cli_enum! {
    pub enum BackPressure {
        Disabled => "Disabled",
        Enabled => "Enabled",
    }
}

cli_enum! {
    pub enum MdixMode {
        Auto => "Auto",
        On => "On",
    }
}

cli_enum! {
    /// Switchport mode. Each mode has its own VLAN attributes.
    pub enum SwitchportMode {
        Access => "access",
        Trunk => "trunk",
        General => "general",
        Customer => "customer",
        /// Routed port.
        NoSwitchport => "no switchport",
    }
}

/// IP addressing of a routed port. DHCP and static addresses exclude each
/// other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Addressing {
    /// Static address to mask.
    Static(IndexMap<String, String>),
    Dhcp,
}

impl Default for Addressing {
    fn default() -> Self {
        Addressing::Static(IndexMap::new())
    }
}

impl Addressing {
    pub fn is_dhcp(&self) -> bool {
        matches!(self, Addressing::Dhcp)
    }

    /// Switch to DHCP, discarding any static address.
    pub fn set_dhcp(&mut self) {
        *self = Addressing::Dhcp;
    }

    /// Add a static address. Ignored once DHCP is set.
    pub fn add_static(&mut self, ip: impl Into<String>, mask: impl Into<String>) -> bool {
        match self {
            Addressing::Static(addresses) => {
                addresses.insert(ip.into(), mask.into());
                true
            }
            Addressing::Dhcp => false,
        }
    }

    pub fn static_addresses(&self) -> Option<&IndexMap<String, String>> {
        match self {
            Addressing::Static(addresses) => Some(addresses),
            Addressing::Dhcp => None,
        }
    }
}

/// Configured state of one physical port, seeded with device defaults and
/// overridden by the port's config block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhysicalInterfaceSettings {
    pub name: InterfaceName,

    /// Port type from the status table (e.g. `1G-Copper`).
    pub port_type: Option<String>,

    pub duplex: Duplex,
    pub speed: Speed,
    pub negotiation: Negotiation,
    pub flow_control: FlowControl,
    pub admin_state: AdminState,
    pub back_pressure: BackPressure,
    pub mdix: MdixMode,
    /// Without the surrounding double quotes the config line carries.
    pub description: String,

    pub mode: SwitchportMode,

    // access
    pub access_vlan: u16,

    // trunk
    pub allowed_vlans: Vec<u16>,
    pub native_vlan: u16,

    // general
    pub general_tagged: Vec<u16>,
    pub general_untagged: Vec<u16>,
    pub general_forbidden: Vec<u16>,
    pub pvid: u16,

    // customer
    pub customer_vlan: u16,

    pub addressing: Addressing,
}

impl PhysicalInterfaceSettings {
    /// Defaults for a port whose status row is `row`.
    pub fn new(name: InterfaceName, row: &[String]) -> Self {
        Self {
            name,
            port_type: row.first().cloned(),
            duplex: Duplex::Full,
            speed: Speed::Mbps1000,
            negotiation: Negotiation::Enabled,
            flow_control: FlowControl::Off,
            admin_state: AdminState::NoShutdown,
            back_pressure: BackPressure::Disabled,
            mdix: MdixMode::Auto,
            description: String::new(),
            mode: SwitchportMode::Access,
            access_vlan: 1,
            allowed_vlans: Vec::new(),
            native_vlan: 0,
            general_tagged: Vec::new(),
            general_untagged: Vec::new(),
            general_forbidden: Vec::new(),
            pvid: 0,
            customer_vlan: 0,
            addressing: Addressing::default(),
        }
    }
}
