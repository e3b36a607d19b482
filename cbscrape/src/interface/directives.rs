//! Interface config directives and their effect on the settings record.
//!
//! Each [`Directive`] pairs a line predicate with a mutation. [`apply`] walks
//! [`DIRECTIVES`] in order and stops at the first match, so a more specific
//! entry must precede a more general one sharing its prefix (`ip address
//! dhcp` before `ip address`).

use super::settings::{
    AdminState, BackPressure, Duplex, FlowControl, MdixMode, Negotiation,
    PhysicalInterfaceSettings, Speed, SwitchportMode,
};

/// How a directive recognises its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// The whole line.
    Exact(&'static str),
    Prefix(&'static str),
    /// Anywhere in the line.
    Contains(&'static str),
}

impl Matcher {
    pub fn matches(&self, line: &str) -> bool {
        match *self {
            Matcher::Exact(text) => line == text,
            Matcher::Prefix(text) => line.starts_with(text),
            Matcher::Contains(text) => line.contains(text),
        }
    }
}

/// One config statement understood by the settings builder.
pub struct Directive {
    pub matcher: Matcher,
    apply: fn(&mut PhysicalInterfaceSettings, &str),
}

impl Directive {
    const fn new(matcher: Matcher, apply: fn(&mut PhysicalInterfaceSettings, &str)) -> Self {
        Self { matcher, apply }
    }

    /// Apply this directive to `settings` if it recognises `line`.
    pub fn try_apply(&self, settings: &mut PhysicalInterfaceSettings, line: &str) -> bool {
        if !self.matcher.matches(line) {
            return false;
        }
        (self.apply)(settings, line);
        true
    }
}

impl std::fmt::Debug for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directive")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

/// The directive table, in match order.
pub static DIRECTIVES: &[Directive] = &[
    Directive::new(Matcher::Prefix("description"), description),
    Directive::new(Matcher::Exact("no negotiation"), |s, _| {
        s.negotiation = Negotiation::Disabled;
    }),
    Directive::new(Matcher::Prefix("speed"), |s, line| {
        if let Some(speed) = last_token(line).and_then(Speed::parse) {
            s.speed = speed;
        }
    }),
    Directive::new(Matcher::Prefix("duplex"), |s, line| {
        if let Some(duplex) = last_token(line).and_then(Duplex::parse) {
            s.duplex = duplex;
        }
    }),
    Directive::new(Matcher::Prefix("mdix"), |s, line| {
        if let Some(mdix) = last_token(line).and_then(MdixMode::parse) {
            s.mdix = mdix;
        }
    }),
    Directive::new(Matcher::Prefix("flowcontrol"), |s, line| {
        if let Some(flow) = last_token(line).and_then(FlowControl::parse) {
            s.flow_control = flow;
        }
    }),
    Directive::new(Matcher::Prefix("back-pressure"), |s, _| {
        s.back_pressure = BackPressure::Enabled;
    }),
    Directive::new(Matcher::Exact("shutdown"), |s, _| {
        s.admin_state = AdminState::Shutdown;
    }),
    Directive::new(Matcher::Prefix("ip address dhcp"), |s, _| {
        s.addressing.set_dhcp();
    }),
    Directive::new(Matcher::Prefix("ip address"), static_address),
    Directive::new(Matcher::Exact("no switchport"), |s, _| {
        s.mode = SwitchportMode::NoSwitchport;
    }),
    Directive::new(Matcher::Contains("switchport mode access"), |s, _| {
        s.mode = SwitchportMode::Access;
    }),
    Directive::new(Matcher::Contains("switchport mode trunk"), |s, _| {
        s.mode = SwitchportMode::Trunk;
    }),
    Directive::new(Matcher::Contains("switchport mode general"), |s, _| {
        s.mode = SwitchportMode::General;
    }),
    Directive::new(Matcher::Contains("switchport mode customer"), |s, _| {
        s.mode = SwitchportMode::Customer;
    }),
    Directive::new(Matcher::Prefix("switchport access vlan"), |s, line| {
        if let Some(vlan) = last_token(line).and_then(vlan_id) {
            s.access_vlan = vlan;
        }
    }),
    Directive::new(Matcher::Prefix("switchport trunk allowed vlan"), |s, line| {
        s.allowed_vlans = last_token(line)
            .map(|list| list.split(',').filter_map(vlan_id).collect())
            .unwrap_or_default();
    }),
    Directive::new(Matcher::Prefix("switchport trunk native vlan"), |s, line| {
        if let Some(vlan) = last_token(line).and_then(vlan_id) {
            s.native_vlan = vlan;
        }
    }),
    Directive::new(
        Matcher::Prefix("switchport general allowed vlan add"),
        general_allowed,
    ),
    Directive::new(
        Matcher::Prefix("switchport general forbidden vlan add"),
        |s, line| {
            if let Some(vlan) = last_token(line).and_then(vlan_id) {
                s.general_forbidden.push(vlan);
            }
        },
    ),
    Directive::new(Matcher::Prefix("switchport general pvid"), |s, line| {
        if let Some(vlan) = last_token(line).and_then(vlan_id) {
            s.pvid = vlan;
        }
    }),
    Directive::new(Matcher::Prefix("switchport customer vlan"), |s, line| {
        if let Some(vlan) = last_token(line).and_then(vlan_id) {
            s.customer_vlan = vlan;
        }
    }),
];

/// Apply the first matching directive. Returns false for an unrecognised
/// line, which is not an error.
pub fn apply(settings: &mut PhysicalInterfaceSettings, line: &str) -> bool {
    DIRECTIVES
        .iter()
        .any(|directive| directive.try_apply(settings, line))
}

/// `description <text>`. Surrounding double quotes are dropped, so the stored
/// value differs from the config line for quoted descriptions.
fn description(s: &mut PhysicalInterfaceSettings, line: &str) {
    let text = line["description".len()..].trim();
    let text = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    s.description = text.to_string();
}

/// `ip address <ip> <mask>`
fn static_address(s: &mut PhysicalInterfaceSettings, line: &str) {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if let [_, _, ip, mask] = parts.as_slice() {
        s.addressing.add_static(*ip, *mask);
    }
}

/// `switchport general allowed vlan add <vlan> tagged|untagged`
fn general_allowed(s: &mut PhysicalInterfaceSettings, line: &str) {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let (Some(vlan), Some(tagging)) = (parts.get(5).copied().and_then(vlan_id), parts.get(6))
    else {
        return;
    };
    match *tagging {
        "tagged" => s.general_tagged.push(vlan),
        "untagged" => s.general_untagged.push(vlan),
        _ => {}
    }
}

fn last_token(line: &str) -> Option<&str> {
    line.split_whitespace().last()
}

/// A VLAN id written as plain decimal digits.
fn vlan_id(token: &str) -> Option<u16> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::name::InterfaceName;
    use crate::interface::settings::Addressing;

    fn settings() -> PhysicalInterfaceSettings {
        PhysicalInterfaceSettings::new(InterfaceName::new("gi1"), &[])
    }

    fn apply_all(lines: &[&str]) -> PhysicalInterfaceSettings {
        let mut s = settings();
        for line in lines {
            apply(&mut s, line);
        }
        s
    }

    #[test]
    fn test_description_quotes_stripped() {
        assert_eq!(apply_all(&["description \"uplink to core\""]).description, "uplink to core");
        assert_eq!(apply_all(&["description printer"]).description, "printer");
        assert_eq!(apply_all(&["description \"half"]).description, "\"half");
    }

    #[test]
    fn test_port_keywords() {
        let s = apply_all(&[
            "no negotiation",
            "speed 100",
            "duplex half",
            "mdix on",
            "flowcontrol on",
            "back-pressure",
            "shutdown",
        ]);
        assert_eq!(s.negotiation, Negotiation::Disabled);
        assert_eq!(s.speed, Speed::Mbps100);
        assert_eq!(s.duplex, Duplex::Half);
        assert_eq!(s.mdix, MdixMode::On);
        assert_eq!(s.flow_control, FlowControl::On);
        assert_eq!(s.back_pressure, BackPressure::Enabled);
        assert_eq!(s.admin_state, AdminState::Shutdown);
    }

    #[test]
    fn test_flowcontrol_reads_its_value() {
        assert_eq!(apply_all(&["flowcontrol off"]).flow_control, FlowControl::Off);
        assert_eq!(apply_all(&["flowcontrol auto"]).flow_control, FlowControl::Auto);
    }

    #[test]
    fn test_values_outside_set_ignored() {
        let s = apply_all(&["speed 2500", "duplex auto"]);
        assert_eq!(s.speed, Speed::Mbps1000);
        assert_eq!(s.duplex, Duplex::Full);
    }

    #[test]
    fn test_dhcp_then_static() {
        let s = apply_all(&["ip address dhcp", "ip address 10.1.1.1 255.255.255.0"]);
        assert_eq!(s.addressing, Addressing::Dhcp);
    }

    #[test]
    fn test_static_addresses() {
        let s = apply_all(&[
            "ip address 10.1.1.1 255.255.255.0",
            "ip address 10.2.2.2 255.255.0.0",
            "ip address 10.3.3.3",
        ]);
        let addresses = s.addressing.static_addresses().unwrap();
        assert_eq!(addresses.len(), 2);
        assert_eq!(addresses["10.2.2.2"], "255.255.0.0");
    }

    #[test]
    fn test_trunk_vlans() {
        let s = apply_all(&[
            "switchport mode trunk",
            "switchport trunk allowed vlan 10,20,30",
            "switchport trunk native vlan 99",
        ]);
        assert_eq!(s.mode, SwitchportMode::Trunk);
        assert_eq!(s.allowed_vlans, vec![10, 20, 30]);
        assert_eq!(s.native_vlan, 99);
    }

    #[test]
    fn test_non_numeric_vlan_dropped() {
        let s = apply_all(&["switchport trunk allowed vlan 10,abc,30,40-50"]);
        assert_eq!(s.allowed_vlans, vec![10, 30]);
    }

    #[test]
    fn test_general_mode() {
        let s = apply_all(&[
            "switchport mode general",
            "switchport general allowed vlan add 10 tagged",
            "switchport general allowed vlan add 20 untagged",
            "switchport general allowed vlan add 30",
            "switchport general forbidden vlan add 40",
            "switchport general pvid 20",
        ]);
        assert_eq!(s.mode, SwitchportMode::General);
        assert_eq!(s.general_tagged, vec![10]);
        assert_eq!(s.general_untagged, vec![20]);
        assert_eq!(s.general_forbidden, vec![40]);
        assert_eq!(s.pvid, 20);
    }

    #[test]
    fn test_access_and_customer() {
        let s = apply_all(&["switchport access vlan 12"]);
        assert_eq!(s.access_vlan, 12);

        let s = apply_all(&["switchport mode customer", "switchport customer vlan 300"]);
        assert_eq!(s.mode, SwitchportMode::Customer);
        assert_eq!(s.customer_vlan, 300);
    }

    #[test]
    fn test_routed_port() {
        assert_eq!(apply_all(&["no switchport"]).mode, SwitchportMode::NoSwitchport);
    }

    #[test]
    fn test_unrecognised_lines() {
        let mut s = settings();
        assert!(!apply(&mut s, "spanning-tree portfast"));
        assert!(!apply(&mut s, "no shutdown"));
        assert_eq!(s, settings());
    }

    #[test]
    fn test_first_match_wins() {
        let index = |line: &str| DIRECTIVES.iter().position(|d| d.matcher.matches(line));
        assert_eq!(index("ip address dhcp"), Some(8));
        assert_eq!(index("ip address 10.0.0.1 255.0.0.0"), Some(9));
    }
}
