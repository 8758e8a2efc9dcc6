use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match cadbridge_host::run_host() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Telemetry may not be installed yet, so report on stderr directly.
            let _ = writeln!(io::stderr(), "cadbridge-host: {error}");
            ExitCode::FAILURE
        }
    }
}
