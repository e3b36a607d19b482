//! `show system` model name extraction.

use once_cell::sync::Lazy;
use regex::Regex;

static SYSTEM_DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"System Description:\s+(CBS\d{3,4}-[A-Z0-9\-]+)").expect("valid description pattern")
});

/// Stacked units list the model in a unit table instead.
static UNIT_TABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*1\s+(CBS\d{3,4}-[A-Z0-9\-]+)").expect("valid unit table pattern")
});

/// Extract the model name (e.g. `CBS250-8T-E-2G`) from `show system` output.
pub fn parse_model_name(output: &str) -> Option<String> {
    SYSTEM_DESCRIPTION
        .captures(output)
        .or_else(|| UNIT_TABLE.captures(output))
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_description() {
        let output = "System Description:                       CBS250-8T-E-2G 8-Port Gigabit Smart Switch\r\n\
System Up Time (days,hour:min:sec):        03,04:11:52\r\n";
        assert_eq!(parse_model_name(output).as_deref(), Some("CBS250-8T-E-2G"));
    }

    #[test]
    fn test_unit_table_fallback() {
        let output = "Unit    Type\r\n----  --------------------\r\n 1    CBS350-24P-4G\r\n";
        assert_eq!(parse_model_name(output).as_deref(), Some("CBS350-24P-4G"));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(parse_model_name("System Description: SG350-10 Managed Switch"), None);
        assert_eq!(parse_model_name(""), None);
    }
}
