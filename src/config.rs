//! Configuration loading helpers.
//!
//! Sub-command arguments are merged with `RESPCTX_*` environment variables
//! and the config file through `ortho_config`. Positional arguments only
//! ever come from the command line, so a merge that fails because one of
//! them is absent from the other layers keeps the parsed arguments as-is.

use figment::error::{Error as FigmentError, Kind as FigmentKind};
use log::debug;
use ortho_config::{OrthoConfig, OrthoError, load_and_merge_subcommand_for};

/// Positional arguments that no config layer is expected to supply.
const POSITIONAL_FIELDS: [&str; 3] = ["record", "name", "method"];

/// The positional field whose absence failed the merge, if any.
fn missing_positional(err: &FigmentError) -> Option<String> {
    // FigmentError yields its causes only by value.
    err.clone().into_iter().find_map(|e| match e.kind {
        FigmentKind::MissingField(f) if POSITIONAL_FIELDS.iter().any(|p| *p == f) => {
            Some(f.into_owned())
        }
        _ => None,
    })
}

/// Merge sub-command arguments with environment and config file values.
///
/// # Errors
///
/// Returns an [`OrthoError`] if gathering fails for any reason other than a
/// positional argument missing from the merged layers.
#[expect(
    clippy::result_large_err,
    reason = "configuration loading errors can be verbose"
)]
pub fn load_subcommand_config<T>(cli_args: T) -> Result<T, OrthoError>
where
    T: OrthoConfig + serde::Serialize + Default + clap::CommandFactory + Clone,
{
    match load_and_merge_subcommand_for::<T>(&cli_args) {
        Err(OrthoError::Gathering(e)) => match missing_positional(&e) {
            Some(field) => {
                debug!("config layers omit `{field}`; using command-line arguments");
                Ok(cli_args)
            }
            None => Err(OrthoError::Gathering(e)),
        },
        other => other,
    }
}
