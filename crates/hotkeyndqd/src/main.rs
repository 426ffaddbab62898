use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match hotkeyndqd::run_server() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Telemetry may not be installed yet, so report directly.
            writeln!(io::stderr().lock(), "hotkeyndqd: {error}").ok();
            ExitCode::FAILURE
        }
    }
}
