//! Subcommands. Each exposes an `Args` struct and a `run` returning the
//! process exit code.

pub mod generate;
pub mod inspect;

use std::path::Path;

use restygen_common::DeclarationModel;

/// Run a command body, printing its error and mapping it to exit code 1.
pub(crate) fn run_command<F>(f: F) -> i32
where
    F: FnOnce() -> Result<(), String>,
{
    match f() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

pub(crate) fn load_model(path: &Path) -> Result<DeclarationModel, String> {
    DeclarationModel::from_path(path).map_err(|err| err.to_string())
}
