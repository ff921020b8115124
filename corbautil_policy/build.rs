//! Turns `config/<profile>.toml` into the `compile_time` constants module.
use serde::Deserialize;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const PROFILE_VAR: &str = "CORBAUTIL_BUILD_PROFILE";
const CONFIG_DIR_VAR: &str = "CORBAUTIL_CONFIG_DIR";

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Profile {
    lexical: Lexical,
    syntax: Syntax,
    factory: Factory,
    poa: Poa,
    logging: Logging,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Lexical {
    max_policy_list_length: usize,
    max_identifier_length: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Syntax {
    max_policies_per_list: usize,
    max_parameters_per_policy: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Factory {
    max_registered_factories: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Poa {
    max_poa_path_depth: usize,
    max_helper_poas: u32,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Logging {
    log_buffer_size: usize,
    max_log_message_length: usize,
    security_min_log_level: u8,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed={}", PROFILE_VAR);
    println!("cargo:rerun-if-env-changed={}", CONFIG_DIR_VAR);

    let profile_name = env::var(PROFILE_VAR).unwrap_or_else(|_| "development".into());
    let path = profile_path(&profile_name);
    println!("cargo:rerun-if-changed={}", path.display());

    let text = fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "cannot read build profile '{}' at {}: {}",
            profile_name,
            path.display(),
            e
        )
    });
    let profile: Profile = toml::from_str(&text)
        .unwrap_or_else(|e| panic!("{} is not a valid build profile: {}", path.display(), e));

    if let Err(problem) = check(&profile, &profile_name) {
        panic!("build profile '{}' rejected: {}", profile_name, problem);
    }

    let out = PathBuf::from(env::var("OUT_DIR").expect("cargo sets OUT_DIR"));
    fs::write(out.join("constants.rs"), render(&profile, &profile_name))
        .expect("cannot write generated constants");
}

/// `<workspace>/<config dir>/<profile>.toml`
fn profile_path(profile_name: &str) -> PathBuf {
    let manifest = env::var("CARGO_MANIFEST_DIR").expect("cargo sets CARGO_MANIFEST_DIR");
    let workspace = Path::new(&manifest)
        .parent()
        .expect("corbautil_policy lives inside the workspace")
        .to_path_buf();
    let dir = env::var(CONFIG_DIR_VAR).unwrap_or_else(|_| "config".into());
    workspace.join(dir).join(format!("{}.toml", profile_name))
}

fn check(p: &Profile, profile_name: &str) -> Result<(), &'static str> {
    const LIST_CEILING: usize = 1 << 20;
    const POA_DEPTH_CEILING: usize = 1024;

    if p.lexical.max_policy_list_length > LIST_CEILING {
        return Err("lexical.max_policy_list_length is above 1 MiB");
    }
    if p.lexical.max_identifier_length > p.lexical.max_policy_list_length {
        return Err("lexical.max_identifier_length exceeds the list length limit");
    }
    if p.syntax.max_policies_per_list == 0 || p.syntax.max_parameters_per_policy == 0 {
        return Err("syntax limits must be at least 1");
    }
    if p.factory.max_registered_factories == 0 {
        return Err("factory.max_registered_factories must be at least 1");
    }
    if p.poa.max_poa_path_depth > POA_DEPTH_CEILING {
        return Err("poa.max_poa_path_depth is above 1024");
    }
    if !(100..=100_000).contains(&p.logging.log_buffer_size) {
        return Err("logging.log_buffer_size must be within 100..=100000");
    }
    if p.logging.security_min_log_level > 2 {
        return Err("logging.security_min_log_level must be 0, 1 or 2");
    }
    if profile_name == "production" && p.lexical.max_policy_list_length > 65_536 {
        return Err("production builds cap lexical.max_policy_list_length at 65536");
    }
    Ok(())
}

fn render(p: &Profile, profile_name: &str) -> String {
    let sections: [(&str, Vec<(&str, &str, String)>); 5] = [
        (
            "lexical",
            vec![
                ("MAX_POLICY_LIST_LENGTH", "usize", p.lexical.max_policy_list_length.to_string()),
                ("MAX_IDENTIFIER_LENGTH", "usize", p.lexical.max_identifier_length.to_string()),
            ],
        ),
        (
            "syntax",
            vec![
                ("MAX_POLICIES_PER_LIST", "usize", p.syntax.max_policies_per_list.to_string()),
                (
                    "MAX_PARAMETERS_PER_POLICY",
                    "usize",
                    p.syntax.max_parameters_per_policy.to_string(),
                ),
            ],
        ),
        (
            "factory",
            vec![(
                "MAX_REGISTERED_FACTORIES",
                "usize",
                p.factory.max_registered_factories.to_string(),
            )],
        ),
        (
            "poa",
            vec![
                ("MAX_POA_PATH_DEPTH", "usize", p.poa.max_poa_path_depth.to_string()),
                ("MAX_HELPER_POAS", "u32", p.poa.max_helper_poas.to_string()),
            ],
        ),
        (
            "logging",
            vec![
                ("LOG_BUFFER_SIZE", "usize", p.logging.log_buffer_size.to_string()),
                ("MAX_LOG_MESSAGE_LENGTH", "usize", p.logging.max_log_message_length.to_string()),
                ("SECURITY_MIN_LOG_LEVEL", "u8", p.logging.security_min_log_level.to_string()),
            ],
        ),
    ];

    let mut code = format!(
        "// Generated by build.rs from the '{}' build profile.\n\npub mod compile_time {{\n",
        profile_name
    );
    for (module, constants) in &sections {
        let _ = writeln!(code, "    pub mod {} {{", module);
        for (name, ty, value) in constants {
            let _ = writeln!(code, "        pub const {}: {} = {};", name, ty, value);
        }
        code.push_str("    }\n");
    }
    code.push_str("}\n");
    code
}
