//! `corbautil parse <list>`

use crate::create_policy_registry;
use corbautil_policy::orb::memory::InMemoryOrb;
use corbautil_policy::orb::policy_type;
use corbautil_policy::{ParsedPolicy, PolicyListParser, VendorProfile};
use serde::Serialize;
use std::error::Error;

#[derive(Debug, Serialize)]
pub struct CreatedPolicy {
    pub policy_type: u32,
    pub type_name: &'static str,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ParseReport {
    pub clauses: Vec<ParsedPolicy>,
    pub policies: Vec<CreatedPolicy>,
}

impl ParseReport {
    pub fn summary(&self) -> String {
        format!("Parsed {} policies", self.policies.len())
    }
}

/// Parse `text` and create its policies against a fresh in-memory ORB
pub fn run_parse(
    text: &str,
    vendor: VendorProfile,
    register: &[String],
) -> Result<ParseReport, Box<dyn Error>> {
    let registry = create_policy_registry(vendor, register)?;
    let orb = InMemoryOrb::new();

    let mut parser = PolicyListParser::new();
    let clauses = parser.parse_clauses(text)?;
    let handles = parser.parse_policy_list(text, &orb, registry.as_ref())?;

    let policies = handles
        .iter()
        .map(|policy| CreatedPolicy {
            policy_type: policy.policy_type(),
            type_name: policy_type::name(policy.policy_type()),
            value: policy.value().to_string(),
        })
        .collect();

    for policy in &handles {
        policy.destroy();
    }

    log::debug!("parsed {} clauses from {:?}", clauses.len(), text);
    Ok(ParseReport { clauses, policies })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_policies() {
        let report = run_parse("persistent, user_id", VendorProfile::Portable, &[]).unwrap();
        assert_eq!(report.summary(), "Parsed 2 policies");
        assert_eq!(report.policies[0].type_name, "LifespanPolicy");
        assert_eq!(report.policies[1].type_name, "IdAssignmentPolicy");
        assert_eq!(report.clauses[0].name, "persistent");
    }

    #[test]
    fn test_parse_with_registered_name() {
        let register = vec!["foo".to_string()];
        let report = run_parse("foo(bar=1, 'baz')", VendorProfile::Portable, &register).unwrap();
        assert_eq!(report.policies.len(), 1);
        assert_eq!(report.clauses[0].parameters.len(), 2);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["clauses"][0]["name"], "foo");
    }

    #[test]
    fn test_parse_unknown_name_fails() {
        let error = run_parse("foo", VendorProfile::Portable, &[]).unwrap_err();
        assert!(error.to_string().contains("illegal policy name"));
    }

    #[test]
    fn test_parse_syntax_error() {
        assert!(run_parse("persistent(", VendorProfile::Portable, &[]).is_err());
    }
}
