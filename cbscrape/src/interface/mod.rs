//! Per-interface data model and the settings builder.
//!
//! Records exist for every physical port in the status table. The port's
//! `interface GigabitEthernetN` config block, if any, is then applied over
//! the defaults through the [`directives`] table.

mod builder;
pub mod directives;
mod name;
mod settings;
mod status;

pub use builder::{InterfaceRecords, build_interfaces, group_blocks};
pub use name::InterfaceName;
pub use settings::{
    Addressing, AdminState, BackPressure, Duplex, FlowControl, MdixMode, Negotiation,
    PhysicalInterfaceSettings, Speed, SwitchportMode,
};
pub use status::PhysicalInterfaceCurrentStatus;
