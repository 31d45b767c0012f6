//! HSRP redundancy validation policy.
//!
//! A thin, swappable layer over the engine's records: each peer of a
//! redundant pair carries a table of expected per-group roles, and the
//! check reads the `GROUP` and `STATE` fields of every parsed record
//! against it. Swap this module out for other first-hop redundancy
//! protocols without touching the engine.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::engine::ParseResult;

/// Template for `show standby brief` output, shipped with the crate.
pub const STANDBY_BRIEF_TEMPLATE: &str =
    include_str!("../../templates/cisco_ios_show_standby_brief.textfsm");

/// HSRP role a group is expected to hold on one peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HsrpRole {
    Active,
    Standby,
}

impl HsrpRole {
    /// The role the redundant peer should hold for the same group.
    pub fn opposite(self) -> Self {
        match self {
            Self::Active => Self::Standby,
            Self::Standby => Self::Active,
        }
    }

    /// The role as it appears in the `STATE` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Standby => "Standby",
        }
    }
}

impl fmt::Display for HsrpRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pass/fail judgement for one HSRP group on one peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStatus {
    /// Group label, e.g. `"Group 1"`.
    pub group: String,

    /// `"Pass"` or `"Fail - No longer <Role>"`.
    pub status: String,
}

/// Expected per-group roles for one peer of a redundant pair.
///
/// Replaces hard-coded per-peer branches with data: build one peer's
/// expectation, derive the other with [`PeerExpectation::inverted`].
#[derive(Debug, Clone)]
pub struct PeerExpectation {
    name: String,
    groups: IndexMap<String, HsrpRole>,
}

impl PeerExpectation {
    /// Create an expectation for the named peer with no groups yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: IndexMap::new(),
        }
    }

    /// Expect `role` for the given group number.
    pub fn with_group(mut self, group: impl Into<String>, role: HsrpRole) -> Self {
        self.groups.insert(group.into(), role);
        self
    }

    /// Build the redundant peer's expectation: same groups, opposite
    /// roles.
    pub fn inverted(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: self
                .groups
                .iter()
                .map(|(group, role)| (group.clone(), role.opposite()))
                .collect(),
        }
    }

    /// Peer name used in reports.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Judge parsed records against this expectation.
    ///
    /// Records whose `GROUP` is not in the table are ignored; order of
    /// the judgements follows record order.
    pub fn check(&self, result: &ParseResult) -> Vec<GroupStatus> {
        let mut statuses = Vec::new();
        for record in result {
            let Some(group) = record.get("GROUP").and_then(|v| v.as_str()) else {
                continue;
            };
            let Some(expected) = self.groups.get(group) else {
                continue;
            };
            let actual = record
                .get("STATE")
                .and_then(|v| v.as_str())
                .unwrap_or_default();

            let status = if actual == expected.as_str() {
                "Pass".to_string()
            } else {
                format!("Fail - No longer {expected}")
            };
            statuses.push(GroupStatus {
                group: format!("Group {group}"),
                status,
            });
        }
        statuses
    }
}

/// Aggregated judgement for a device pair, rendered as the JSON shape
/// `{"hsrp_result": [{"CE1": [{"group": ..., "status": ...}, ...]}]}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HsrpReport {
    pub hsrp_result: Vec<IndexMap<String, Vec<GroupStatus>>>,
}

impl HsrpReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one peer's judgements.
    pub fn push_peer(&mut self, name: impl Into<String>, statuses: Vec<GroupStatus>) {
        let mut entry = IndexMap::new();
        entry.insert(name.into(), statuses);
        self.hsrp_result.push(entry);
    }

    /// Render the report as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;

    const OUTPUT_CE1: &str = "
Interface   Grp  Pri P State   Active          Standby         Virtual IP
Gi0/1         1  150   Active  local           192.168.1.2     192.168.1.253
Gi0/1         2  100   Standby 192.168.1.1     local           192.168.1.254
";

    fn parse(output: &str) -> ParseResult {
        Template::compile(STANDBY_BRIEF_TEMPLATE)
            .unwrap()
            .parse_text(output)
            .unwrap()
    }

    fn ce1() -> PeerExpectation {
        PeerExpectation::new("CE1")
            .with_group("1", HsrpRole::Active)
            .with_group("2", HsrpRole::Standby)
    }

    #[test]
    fn test_bundled_template_parses_sample() {
        let result = parse(OUTPUT_CE1);
        assert_eq!(result.len(), 2);
        assert_eq!(result.records()[0]["STATE"].as_str(), Some("Active"));
        assert_eq!(result.records()[1]["STATE"].as_str(), Some("Standby"));
        assert_eq!(result.records()[0]["VIRTUALIP"].as_str(), Some("192.168.1.253"));
    }

    #[test]
    fn test_all_groups_pass() {
        let statuses = ce1().check(&parse(OUTPUT_CE1));
        assert_eq!(
            statuses,
            vec![
                GroupStatus {
                    group: "Group 1".to_string(),
                    status: "Pass".to_string()
                },
                GroupStatus {
                    group: "Group 2".to_string(),
                    status: "Pass".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_failed_role_reported() {
        // CE2 expectations against CE1's output: both groups flipped.
        let statuses = ce1().inverted("CE2").check(&parse(OUTPUT_CE1));
        assert_eq!(statuses[0].status, "Fail - No longer Standby");
        assert_eq!(statuses[1].status, "Fail - No longer Active");
    }

    #[test]
    fn test_unknown_groups_ignored() {
        let only_group1 = PeerExpectation::new("CE1").with_group("1", HsrpRole::Active);
        let statuses = only_group1.check(&parse(OUTPUT_CE1));
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].group, "Group 1");
    }

    #[test]
    fn test_report_json_shape() {
        let mut report = HsrpReport::new();
        report.push_peer("CE1", ce1().check(&parse(OUTPUT_CE1)));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "hsrp_result": [
                    {
                        "CE1": [
                            {"group": "Group 1", "status": "Pass"},
                            {"group": "Group 2", "status": "Pass"}
                        ]
                    }
                ]
            })
        );
    }
}
