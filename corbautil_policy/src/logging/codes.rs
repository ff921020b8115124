//! Event codes and their metadata
//!
//! `E0xx` codes are errors grouped by subsystem, `I0xx` codes mark successful
//! operations. Every code declared here has one row in the metadata table.

use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Table row for this code, `None` for ad hoc codes such as `W000`
    pub fn metadata(&self) -> Option<&'static ErrorMetadata> {
        metadata(self.0)
    }

    pub fn category(&self) -> Category {
        self.metadata().map_or(Category::Unknown, |m| m.category)
    }

    pub fn severity(&self) -> Severity {
        self.metadata().map_or(Severity::Medium, |m| m.severity)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// Subsystem an event code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    System,
    Lexical,
    Syntax,
    PolicyCreation,
    Registration,
    Orb,
    Poa,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::System => "System",
            Category::Lexical => "Lexical",
            Category::Syntax => "Syntax",
            Category::PolicyCreation => "PolicyCreation",
            Category::Registration => "Registration",
            Category::Orb => "Orb",
            Category::Poa => "Poa",
            Category::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

const fn entry(
    code: &'static str,
    category: Category,
    severity: Severity,
    recoverable: bool,
    description: &'static str,
    recommended_action: &'static str,
) -> ErrorMetadata {
    ErrorMetadata {
        code,
        category,
        severity,
        recoverable,
        description,
        recommended_action,
    }
}

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Policy-list lexical error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const UNEXPECTED_OPEN_PAREN: Code = Code::new("E022");
    pub const UNEXPECTED_CLOSE_PAREN: Code = Code::new("E023");
    pub const POLICY_LIST_TOO_LONG: Code = Code::new("E024");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E025");
}

/// Policy-list syntax error codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E040");
    pub const TRAILING_INPUT: Code = Code::new("E041");
    pub const TOO_MANY_POLICIES: Code = Code::new("E042");
    pub const TOO_MANY_PARAMETERS: Code = Code::new("E043");
    pub const POLICY_CREATION_FAILED: Code = Code::new("E044");
}

/// Policy creation error codes
pub mod factory {
    use super::Code;

    pub const ILLEGAL_POLICY_NAME: Code = Code::new("E060");
    pub const UNEXPECTED_PARAMETERS: Code = Code::new("E061");
    pub const ILLEGAL_BOOLEAN: Code = Code::new("E062");
    pub const ILLEGAL_INTEGER: Code = Code::new("E063");
    pub const ILLEGAL_FLOAT: Code = Code::new("E064");
    pub const ROOT_POA_UNAVAILABLE: Code = Code::new("E065");
    pub const ORB_REJECTED_POLICY: Code = Code::new("E066");
    pub const INVALID_PARAMETER: Code = Code::new("E067");
}

/// Policy factory registration error codes
pub mod registration {
    use super::Code;

    pub const CONFLICTS_WITH_PREDEFINED: Code = Code::new("E070");
    pub const DUPLICATE_REGISTRATION: Code = Code::new("E071");
    pub const REGISTRY_FULL: Code = Code::new("E072");
    pub const VENDOR_EXTENSION_CONFLICT: Code = Code::new("E073");
}

/// Collaborator (ORB/POA) error codes
pub mod orb {
    use super::Code;

    pub const INVALID_POLICY: Code = Code::new("E080");
    pub const ADAPTER_ALREADY_EXISTS: Code = Code::new("E081");
    pub const INITIAL_REFERENCE_NOT_FOUND: Code = Code::new("E082");
    pub const BAD_POLICY_VALUE: Code = Code::new("E083");
    pub const UNSUPPORTED_POLICY: Code = Code::new("E084");
    pub const SYSTEM_EXCEPTION: Code = Code::new("E085");
}

/// POA construction error codes
pub mod poa {
    use super::Code;

    pub const INVALID_DEPLOYMENT_MODEL: Code = Code::new("E090");
    pub const INVALID_VENDOR_PROFILE: Code = Code::new("E091");
    pub const POA_CREATION_FAILED: Code = Code::new("E092");
    pub const POA_INVALID_POLICY: Code = Code::new("E093");
    pub const MANAGER_CREATION_FAILED: Code = Code::new("E094");
    pub const PATH_TOO_DEEP: Code = Code::new("E095");
    pub const HELPER_LIMIT_REACHED: Code = Code::new("E096");
    pub const MANAGER_FACTORY_UNAVAILABLE: Code = Code::new("E097");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const POLICY_LIST_PARSED: Code = Code::new("I040");
    pub const POLICY_CREATED: Code = Code::new("I060");
    pub const POLICY_FACTORY_REGISTERED: Code = Code::new("I070");
    pub const POA_CREATED: Code = Code::new("I090");
    pub const POA_MANAGER_CREATED: Code = Code::new("I091");
}

static METADATA: &[ErrorMetadata] = &[
    entry(
        "ERR001",
        Category::System,
        Severity::Critical,
        false,
        "Internal error in corbautil",
        "Report the failure with the full log output",
    ),
    entry(
        "ERR002",
        Category::System,
        Severity::Critical,
        false,
        "Logging, configuration or PoaUtility initialization failed",
        "Check build profile and runtime configuration",
    ),
    entry(
        "E020",
        Category::Lexical,
        Severity::High,
        false,
        "Unexpected character in policy list",
        "Policy lists may only contain identifiers, quoted literals, '=', '(', ')' and ','",
    ),
    entry(
        "E021",
        Category::Lexical,
        Severity::High,
        false,
        "Unterminated string literal in policy list",
        "Close the quoted literal with a single quote",
    ),
    entry(
        "E022",
        Category::Lexical,
        Severity::High,
        false,
        "Nested parameter list in policy list",
        "Parameter lists cannot be nested",
    ),
    entry(
        "E023",
        Category::Lexical,
        Severity::High,
        false,
        "Closing parenthesis outside a parameter list",
        "Remove the stray ')' or open the parameter list",
    ),
    entry(
        "E024",
        Category::Lexical,
        Severity::High,
        false,
        "Policy list exceeds the configured maximum length",
        "Split the policy list or raise max_policy_list_length",
    ),
    entry(
        "E025",
        Category::Lexical,
        Severity::Medium,
        false,
        "Identifier exceeds the configured maximum length",
        "Shorten the identifier or raise max_identifier_length",
    ),
    entry(
        "E040",
        Category::Syntax,
        Severity::High,
        false,
        "Unexpected token in policy list",
        "Check the policy list against: name[(param[=value], ...)] ...",
    ),
    entry(
        "E041",
        Category::Syntax,
        Severity::High,
        false,
        "Unexpected input after the last policy",
        "Remove trailing characters from the policy list",
    ),
    entry(
        "E042",
        Category::Syntax,
        Severity::Medium,
        false,
        "Too many policies in one policy list",
        "Reduce the number of policies or raise max_policies_per_list",
    ),
    entry(
        "E043",
        Category::Syntax,
        Severity::Medium,
        false,
        "Too many parameters for one policy",
        "Reduce the parameter count or raise max_parameters_per_policy",
    ),
    entry(
        "E044",
        Category::Syntax,
        Severity::High,
        false,
        "A policy factory rejected a policy in the list",
        "See the nested error for the failing policy",
    ),
    entry(
        "E060",
        Category::PolicyCreation,
        Severity::High,
        false,
        "Unknown policy name",
        "Use a predefined policy name or register a policy factory",
    ),
    entry(
        "E061",
        Category::PolicyCreation,
        Severity::High,
        false,
        "Parameters supplied to a parameterless policy",
        "Remove the parameter list from the predefined policy",
    ),
    entry(
        "E062",
        Category::PolicyCreation,
        Severity::Medium,
        false,
        "Illegal boolean parameter value",
        "Use 'true' or 'false'",
    ),
    entry(
        "E063",
        Category::PolicyCreation,
        Severity::Medium,
        false,
        "Illegal integer parameter value",
        "Use a decimal 32-bit integer",
    ),
    entry(
        "E064",
        Category::PolicyCreation,
        Severity::Medium,
        false,
        "Illegal floating-point parameter value",
        "Use a decimal floating-point number",
    ),
    entry(
        "E065",
        Category::PolicyCreation,
        Severity::Critical,
        false,
        "Root POA could not be resolved",
        "Check ORB initialization",
    ),
    entry(
        "E066",
        Category::PolicyCreation,
        Severity::High,
        false,
        "ORB rejected a policy value",
        "Check that the ORB supports the requested policy",
    ),
    entry(
        "E067",
        Category::PolicyCreation,
        Severity::Medium,
        false,
        "Invalid parameter for a custom policy",
        "Check the parameters accepted by the policy factory",
    ),
    entry(
        "E070",
        Category::Registration,
        Severity::High,
        false,
        "Policy factory name conflicts with a predefined policy",
        "Choose a different policy name",
    ),
    entry(
        "E071",
        Category::Registration,
        Severity::High,
        false,
        "Policy factory name already registered",
        "Register each custom policy name once",
    ),
    entry(
        "E072",
        Category::Registration,
        Severity::Medium,
        false,
        "Policy factory registry is full",
        "Raise max_registered_factories",
    ),
    entry(
        "E073",
        Category::Registration,
        Severity::Medium,
        false,
        "Vendor predefined policy name is already registered as a custom factory",
        "Rename the custom factory or install the vendor extensions first",
    ),
    entry(
        "E080",
        Category::Orb,
        Severity::High,
        false,
        "POA creation rejected a policy",
        "Check the policy at the reported index",
    ),
    entry(
        "E081",
        Category::Orb,
        Severity::High,
        false,
        "A POA with the same name already exists",
        "Use a unique name under the parent POA",
    ),
    entry(
        "E082",
        Category::Orb,
        Severity::Critical,
        false,
        "Initial reference not found",
        "Check ORB configuration",
    ),
    entry(
        "E083",
        Category::Orb,
        Severity::High,
        false,
        "Bad policy value",
        "Check the value passed for the policy type",
    ),
    entry(
        "E084",
        Category::Orb,
        Severity::High,
        false,
        "Policy type not supported by the ORB",
        "Select a vendor profile that supports the policy",
    ),
    entry(
        "E085",
        Category::Orb,
        Severity::High,
        true,
        "ORB system exception",
        "Inspect the ORB diagnostics",
    ),
    entry(
        "E090",
        Category::Poa,
        Severity::Medium,
        false,
        "Invalid deployment model",
        "Use RANDOM_PORTS_NO_IMR, RANDOM_PORTS_WITH_IMR, FIXED_PORTS_NO_IMR or FIXED_PORTS_WITH_IMR",
    ),
    entry(
        "E091",
        Category::Poa,
        Severity::Medium,
        false,
        "Invalid vendor profile",
        "Use portable, orbix or orbacus",
    ),
    entry(
        "E092",
        Category::Poa,
        Severity::High,
        false,
        "POA creation failed",
        "See the nested error for the failing POA",
    ),
    entry(
        "E093",
        Category::Poa,
        Severity::High,
        false,
        "POA creation rejected a policy",
        "Check the policy at the reported index",
    ),
    entry(
        "E094",
        Category::Poa,
        Severity::High,
        false,
        "POA manager creation failed",
        "See the nested error for the failing manager",
    ),
    entry(
        "E095",
        Category::Poa,
        Severity::Medium,
        false,
        "POA hierarchy exceeds the configured depth",
        "Flatten the hierarchy or raise max_poa_path_depth",
    ),
    entry(
        "E096",
        Category::Poa,
        Severity::Medium,
        false,
        "Helper POA limit reached",
        "Reuse POA managers or raise max_helper_poas",
    ),
    entry(
        "E097",
        Category::Poa,
        Severity::High,
        false,
        "ORB offers no POA manager factory",
        "Use a vendor profile that does not need one or a different ORB binding",
    ),
    entry(
        "I004",
        Category::System,
        Severity::Low,
        true,
        "System initialization completed successfully",
        "Continue normal operation",
    ),
    entry(
        "I040",
        Category::Syntax,
        Severity::Low,
        true,
        "Policy list parsed successfully",
        "Continue normal operation",
    ),
    entry(
        "I060",
        Category::PolicyCreation,
        Severity::Low,
        true,
        "Policy created successfully",
        "Continue normal operation",
    ),
    entry(
        "I070",
        Category::Registration,
        Severity::Low,
        true,
        "Policy factory registered",
        "Continue normal operation",
    ),
    entry(
        "I090",
        Category::Poa,
        Severity::Low,
        true,
        "POA created successfully",
        "Continue normal operation",
    ),
    entry(
        "I091",
        Category::Poa,
        Severity::Low,
        true,
        "POA manager created successfully",
        "Continue normal operation",
    ),
];

/// Metadata row for `code`
pub fn metadata(code: &str) -> Option<&'static ErrorMetadata> {
    METADATA.iter().find(|row| row.code == code)
}

/// Codes declared in more than one row would make lookups ambiguous
pub fn duplicate_codes() -> Vec<&'static str> {
    let mut seen: Vec<&'static str> = Vec::with_capacity(METADATA.len());
    let mut duplicates = Vec::new();
    for row in METADATA {
        if seen.contains(&row.code) {
            duplicates.push(row.code);
        } else {
            seen.push(row.code);
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_code_has_metadata() {
        let declared = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            lexical::INVALID_CHARACTER,
            lexical::UNTERMINATED_STRING,
            lexical::UNEXPECTED_OPEN_PAREN,
            lexical::UNEXPECTED_CLOSE_PAREN,
            lexical::POLICY_LIST_TOO_LONG,
            lexical::IDENTIFIER_TOO_LONG,
            syntax::UNEXPECTED_TOKEN,
            syntax::TRAILING_INPUT,
            syntax::TOO_MANY_POLICIES,
            syntax::TOO_MANY_PARAMETERS,
            syntax::POLICY_CREATION_FAILED,
            factory::ILLEGAL_POLICY_NAME,
            factory::UNEXPECTED_PARAMETERS,
            factory::ILLEGAL_BOOLEAN,
            factory::ILLEGAL_INTEGER,
            factory::ILLEGAL_FLOAT,
            factory::ROOT_POA_UNAVAILABLE,
            factory::ORB_REJECTED_POLICY,
            factory::INVALID_PARAMETER,
            registration::CONFLICTS_WITH_PREDEFINED,
            registration::DUPLICATE_REGISTRATION,
            registration::REGISTRY_FULL,
            registration::VENDOR_EXTENSION_CONFLICT,
            orb::INVALID_POLICY,
            orb::ADAPTER_ALREADY_EXISTS,
            orb::INITIAL_REFERENCE_NOT_FOUND,
            orb::BAD_POLICY_VALUE,
            orb::UNSUPPORTED_POLICY,
            orb::SYSTEM_EXCEPTION,
            poa::INVALID_DEPLOYMENT_MODEL,
            poa::INVALID_VENDOR_PROFILE,
            poa::POA_CREATION_FAILED,
            poa::POA_INVALID_POLICY,
            poa::MANAGER_CREATION_FAILED,
            poa::PATH_TOO_DEEP,
            poa::HELPER_LIMIT_REACHED,
            poa::MANAGER_FACTORY_UNAVAILABLE,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::POLICY_LIST_PARSED,
            success::POLICY_CREATED,
            success::POLICY_FACTORY_REGISTERED,
            success::POA_CREATED,
            success::POA_MANAGER_CREATED,
        ];

        for code in declared {
            assert!(code.metadata().is_some(), "missing metadata for {}", code);
        }
        assert_eq!(declared.len(), METADATA.len());
        assert!(duplicate_codes().is_empty());
    }

    #[test]
    fn test_classification() {
        assert_eq!(lexical::UNTERMINATED_STRING.category(), Category::Lexical);
        assert_eq!(system::INTERNAL_ERROR.severity(), Severity::Critical);
        assert!(!registration::DUPLICATE_REGISTRATION.metadata().unwrap().recoverable);
        assert_eq!(Code::new("W000").category(), Category::Unknown);
        assert_eq!(Code::new("W000").severity(), Severity::Medium);
    }
}
