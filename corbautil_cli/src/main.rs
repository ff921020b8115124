//! # corbautil CLI

use clap::{Parser, Subcommand};
use corbautil_cli::commands::{self, DemoBackend, DemoConfig, PoaRequest};
use corbautil_policy::config::runtime::{init_policy_preferences, policy_preferences, RuntimeConfig};
use corbautil_policy::{log_info, logging, DeploymentModel, VendorProfile};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "corbautil", version, about = "CORBA policy-list and POA utilities")]
struct Cli {
    /// TOML file with [policy] and [logging] preferences
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a policy list and create its policies
    Parse {
        policy_list: String,

        /// Accept NAME as a custom policy with any parameters
        #[arg(long = "register", value_name = "NAME")]
        register: Vec<String>,

        /// portable, orbix or orbacus
        #[arg(long)]
        vendor: Option<String>,
    },

    /// Create a POA hierarchy under the in-memory ORB
    Poa {
        /// `/`-separated path below the root POA
        path: String,

        #[arg(long, default_value = "")]
        policies: String,

        #[arg(long, default_value = "default")]
        manager: String,

        /// RANDOM_PORTS_NO_IMR, RANDOM_PORTS_WITH_IMR, FIXED_PORTS_NO_IMR or
        /// FIXED_PORTS_WITH_IMR
        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        vendor: Option<String>,

        #[arg(long = "register", value_name = "NAME")]
        register: Vec<String>,
    },

    /// Run producers and consumers over a bounded buffer
    GspDemo {
        #[arg(long, value_enum, default_value_t = DemoBackend::Native)]
        backend: DemoBackend,

        #[arg(long, default_value_t = 8)]
        capacity: usize,

        #[arg(long, default_value_t = 10_000)]
        items: usize,

        /// Defaults to the number of CPUs
        #[arg(long)]
        threads: Option<usize>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        let config = RuntimeConfig::load_from_file(path)?;
        logging::config::init_runtime_preferences(config.logging)?;
        init_policy_preferences(config.policy)?;
    }

    logging::init_global_logging()?;
    log_info!("corbautil starting");

    let preferences = policy_preferences();

    match cli.command {
        Command::Parse {
            policy_list,
            register,
            vendor,
        } => {
            let vendor = parse_vendor(vendor.as_deref(), preferences.vendor_profile)?;
            let report = commands::run_parse(&policy_list, vendor, &register)?;
            if cli.json {
                print_json(&report)?;
            } else {
                for clause in &report.clauses {
                    println!("  {}", clause);
                }
                println!("{}", report.summary());
            }
        }
        Command::Poa {
            path,
            policies,
            manager,
            model,
            vendor,
            register,
        } => {
            let model = match model {
                Some(model) => model.parse::<DeploymentModel>()?,
                None => preferences.default_deployment_model,
            };
            let vendor = parse_vendor(vendor.as_deref(), preferences.vendor_profile)?;

            let report = commands::run_poa(&PoaRequest {
                path,
                policies,
                manager_label: manager,
                model,
                vendor,
                register,
            })?;

            if cli.json {
                print_json(&report)?;
            } else {
                println!("{} (manager '{}', {}, {})", report.path, report.manager, model, vendor);
                for policy in &report.policies {
                    println!("  {} = {}", policy.type_name, policy.value);
                }
            }
        }
        Command::GspDemo {
            backend,
            capacity,
            items,
            threads,
        } => {
            let report = commands::run_gsp_demo(&DemoConfig {
                backend,
                capacity,
                items,
                threads: threads.unwrap_or_else(num_cpus::get),
            })?;

            if cli.json {
                print_json(&report)?;
            } else {
                println!(
                    "{} producers / {} consumers moved {} of {} items in {} ms (max buffered {} of {})",
                    report.producers,
                    report.consumers,
                    report.consumed,
                    report.produced,
                    report.elapsed_ms,
                    report.max_buffered,
                    report.capacity
                );
            }
        }
    }

    Ok(())
}

fn parse_vendor(
    value: Option<&str>,
    fallback: VendorProfile,
) -> Result<VendorProfile, Box<dyn Error>> {
    match value {
        Some(value) => Ok(value.parse()?),
        None => Ok(fallback),
    }
}

fn print_json<T: Serialize>(report: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
