//! Live status of a physical port, straight from the status table.

use serde::Serialize;

use super::name::InterfaceName;

/// Positional snapshot of one `show interfaces status` row.
///
/// Values are kept verbatim (`--` included); a short row leaves the trailing
/// fields empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhysicalInterfaceCurrentStatus {
    pub name: InterfaceName,
    pub port_type: Option<String>,
    pub duplex: Option<String>,
    pub speed: Option<String>,
    pub negotiation: Option<String>,
    pub flow_control: Option<String>,
    pub link_state: Option<String>,
    pub back_pressure: Option<String>,
    pub mdix: Option<String>,
}

impl PhysicalInterfaceCurrentStatus {
    pub fn from_row(name: InterfaceName, row: &[String]) -> Self {
        let field = |i: usize| row.get(i).cloned();
        Self {
            name,
            port_type: field(0),
            duplex: field(1),
            speed: field(2),
            negotiation: field(3),
            flow_control: field(4),
            link_state: field(5),
            back_pressure: field(6),
            mdix: field(7),
        }
    }

    /// The populated fields in table order.
    pub fn fields(&self) -> Vec<&str> {
        [
            &self.port_type,
            &self.duplex,
            &self.speed,
            &self.negotiation,
            &self.flow_control,
            &self.link_state,
            &self.back_pressure,
            &self.mdix,
        ]
        .into_iter()
        .map_while(|field| field.as_deref())
        .collect()
    }

    pub fn is_up(&self) -> bool {
        self.link_state.as_deref() == Some("Up")
    }
}
