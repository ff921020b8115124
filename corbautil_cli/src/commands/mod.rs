//! Subcommand implementations
//!
//! Each command returns a serializable report; `main` decides how to print
//! it.

pub mod gsp_demo;
pub mod parse;
pub mod poa;

pub use gsp_demo::{run_gsp_demo, DemoBackend, DemoConfig, DemoReport};
pub use parse::{run_parse, ParseReport};
pub use poa::{run_poa, PoaReport, PoaRequest};
