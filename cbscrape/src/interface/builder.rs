//! Join config blocks with status rows into per-interface records.

use indexmap::IndexMap;
use log::{debug, trace};
use serde::Serialize;

use super::directives;
use super::name::InterfaceName;
use super::settings::PhysicalInterfaceSettings;
use super::status::PhysicalInterfaceCurrentStatus;
use crate::parse::StatusTable;

const INTERFACE_HEADER: &str = "interface ";

/// Per-interface records built in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceRecords {
    pub settings: IndexMap<InterfaceName, PhysicalInterfaceSettings>,
    pub status: IndexMap<InterfaceName, PhysicalInterfaceCurrentStatus>,
}

impl InterfaceRecords {
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

/// Group normalized config lines by the interface block they belong to.
///
/// Every `interface <label>` line moves the cursor; lines before the first
/// header belong to no block. A label seen twice keeps accumulating into the
/// same block.
pub fn group_blocks(lines: &[String]) -> IndexMap<InterfaceName, Vec<String>> {
    let mut blocks: IndexMap<InterfaceName, Vec<String>> = IndexMap::new();
    let mut current: Option<InterfaceName> = None;

    for line in lines {
        if let Some(label) = line.strip_prefix(INTERFACE_HEADER) {
            let name = InterfaceName::from_config_label(label);
            blocks.entry(name.clone()).or_default();
            current = Some(name);
        } else if let Some(name) = &current {
            if let Some(block) = blocks.get_mut(name) {
                block.push(line.trim().to_string());
            }
        }
    }
    blocks
}

/// Build settings and status records for every physical interface in the
/// status table.
///
/// Status rows decide which records exist: a config block with no status row
/// is never materialized, and aggregate (`Po…`) rows are skipped.
pub fn build_interfaces(config: &[String], status: &StatusTable) -> InterfaceRecords {
    let blocks = group_blocks(config);
    let mut records = InterfaceRecords::default();

    for (name, row) in status.iter() {
        let name = InterfaceName::new(name);
        if !name.is_physical() {
            continue;
        }

        let mut settings = PhysicalInterfaceSettings::new(name.clone(), row);
        if let Some(block) = blocks.get(name.as_str()) {
            for line in block {
                if !directives::apply(&mut settings, line) {
                    trace!("{}: ignoring '{}'", name, line);
                }
            }
        }

        records
            .status
            .insert(name.clone(), PhysicalInterfaceCurrentStatus::from_row(name.clone(), row));
        records.settings.insert(name, settings);
    }

    let orphans = blocks
        .keys()
        .filter(|name| !status.contains(name.as_str()))
        .count();
    if orphans > 0 {
        debug!("{} config block(s) without a status row", orphans);
    }
    records
}
