//! `restygen` binary.

use std::process::ExitCode;

fn main() -> ExitCode {
    let code = restygen_cli::run_cli(std::env::args().collect());
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
