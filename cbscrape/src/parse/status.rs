//! `show interfaces status` parser.
//!
//! # Example
//!
//! ```text
//!                                              Flow Link        Back   Mdix
//! Port     Type         Duplex  Speed Neg      ctrl State       Pressure Mode
//! -------- ------------ ------  ----- -------- ---- ----------- -------- -------
//! gi1      1G-Copper    Full    1000  Enabled  Off  Up          Disabled On
//! gi2      1G-Copper      --      --     --     --  Down           --     --
//!
//!                                           Flow    Link
//! Ch       Type    Duplex  Speed  Neg      control  State
//! -------- ------- ------  -----  -------- -------  -----------
//! Po1         --     --      --      --       --    Not Present
//! ```

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::dialect::PAGINATION_HINT;

/// Meaning of each position in a physical interface row.
pub const STATUS_HEADERS: [&str; 8] = [
    "Type",
    "Duplex",
    "Speed",
    "Neg",
    "Flow ctrl",
    "Link State",
    "Back Pressure",
    "Mdix Mode",
];

const PHYSICAL_FIELDS: usize = 8;
const AGGREGATE_FIELDS: usize = 6;

static PHYSICAL_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+(gi\d{1,2}(?:/\d{1,2})*)").expect("valid gi row pattern"));

static AGGREGATE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+(Po\d{1,2})").expect("valid Po row pattern"));

static ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(gi\d+(?:/\d+)*|Po\d+)\s+(.+)$").expect("valid status row pattern"));

static COLUMN_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("valid column gap"));

/// Interface status rows keyed by short interface name, in device order.
///
/// Physical (`gi…`) rows carry at most 8 fields, aggregate (`Po…`) rows at
/// most 6. Column names live in [`StatusTable::headers`], apart from the rows,
/// and serialize next to them as `headers`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTable {
    rows: IndexMap<String, Vec<String>>,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column names for physical interface rows.
    pub fn headers(&self) -> &'static [&'static str] {
        &STATUS_HEADERS
    }

    pub fn insert(&mut self, name: impl Into<String>, fields: Vec<String>) {
        self.rows.insert(name.into(), fields);
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.rows.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rows.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rows
            .iter()
            .map(|(name, fields)| (name.as_str(), fields.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Serialize for StatusTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("StatusTable", 2)?;
        state.serialize_field("headers", self.headers())?;
        state.serialize_field("rows", &self.rows)?;
        state.end()
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<String>)> for StatusTable {
    fn from_iter<I: IntoIterator<Item = (N, Vec<String>)>>(iter: I) -> Self {
        let mut table = StatusTable::new();
        for (name, fields) in iter {
            table.insert(name, fields);
        }
        table
    }
}

/// Parse raw `show interfaces status` output.
///
/// Banner, header and separator lines do not match the row pattern and are
/// dropped silently.
pub fn parse_interfaces_status(raw: &str) -> StatusTable {
    let text = PAGINATION_HINT.replace_all(raw, "");
    let text = PHYSICAL_START.replace_all(&text, "\n$1");
    let text = AGGREGATE_START.replace_all(&text, "\n$1");

    let mut table = StatusTable::new();
    for line in text.split('\n') {
        let line = line.replace('\r', "");
        let Some(caps) = ROW.captures(line.trim()) else {
            continue;
        };
        let name = &caps[1];
        let mut fields = split_fields(&caps[2]);

        let limit = if name.starts_with("gi") {
            PHYSICAL_FIELDS
        } else {
            AGGREGATE_FIELDS
        };
        fields.truncate(limit);
        table.insert(name, fields);
    }
    table
}

/// Split on column gaps, repairing `Enabled X` / `Disabled X` fusions where
/// the device padded two columns with a single space.
fn split_fields(rest: &str) -> Vec<String> {
    let mut fields = Vec::new();
    for field in COLUMN_GAP.split(rest.trim()) {
        if field.starts_with("Enabled ") || field.starts_with("Disabled ") {
            if let Some((flag, tail)) = field.split_once(' ') {
                fields.push(flag.to_string());
                fields.push(tail.to_string());
                continue;
            }
        }
        fields.push(field.to_string());
    }
    fields
}
