mod errors;
pub(crate) mod launch;
pub(crate) mod signals;

pub use errors::LaunchError;
pub use launch::{LaunchPlan, run_server, run_server_with};
pub use signals::{ShutdownError, ShutdownSignal, SignalWatch, SystemShutdownSignal};

pub(crate) const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");
