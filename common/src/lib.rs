//! This library is there to share some common code amongst all flightmsg modules.
//!
//! - logging initialisation (`tracing` with optional tree & file output)
//! - versioned HCL configuration file loading
//!

mod config;
mod logging;
mod macros;

use clap::{crate_name, crate_version};
pub use config::*;
pub use logging::*;

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}
