//! Command-line argument structures.
//!
//! Every sub-command names a stored response record and may resolve its body
//! file against `--body-root`. Sub-command arguments derive `OrthoConfig` so
//! the environment and config file can fill them in.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

/// Options shared by every sub-command.
#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl GlobalArgs {
    /// Default `env_logger` filter for the requested verbosity.
    ///
    /// `RUST_LOG` still takes precedence when set.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Access to the record location shared by all sub-commands.
pub trait RecordSource {
    fn record_path(&self) -> Option<&Path>;
    fn body_root(&self) -> Option<&Path>;
}

macro_rules! record_source {
    ($($ty:ty),+ $(,)?) => {
        $(impl RecordSource for $ty {
            fn record_path(&self) -> Option<&Path> {
                self.record.as_deref()
            }

            fn body_root(&self) -> Option<&Path> {
                self.body_root.as_deref()
            }
        })+
    };
}

record_source!(ShowArgs, HeaderArgs, BodyArgs, CallArgs);

/// Parameters accepted by the `show` sub-command.
#[derive(Parser, Deserialize, Serialize, Debug, OrthoConfig, Clone, Default)]
#[command(name = "show")]
#[ortho_config(prefix = "RESPCTX")]
pub struct ShowArgs {
    /// Path to the stored response record (JSON)
    #[arg(required = true, value_name = "RECORD")]
    // Clap enforces presence; `Option` lets config merging leave it unset.
    pub record: Option<PathBuf>,
    /// Directory that relative body paths are resolved against
    #[arg(long, value_name = "DIR")]
    pub body_root: Option<PathBuf>,
}

/// Parameters accepted by the `header` sub-command.
#[derive(Parser, Deserialize, Serialize, Debug, OrthoConfig, Clone, Default)]
#[command(name = "header")]
#[ortho_config(prefix = "RESPCTX")]
pub struct HeaderArgs {
    /// Path to the stored response record (JSON)
    #[arg(required = true, value_name = "RECORD")]
    pub record: Option<PathBuf>,
    /// Header name, matched case-insensitively
    #[arg(required = true, value_name = "NAME")]
    pub name: String,
    /// Directory that relative body paths are resolved against
    #[arg(long, value_name = "DIR")]
    pub body_root: Option<PathBuf>,
}

/// Parameters accepted by the `body` sub-command.
#[derive(Parser, Deserialize, Serialize, Debug, OrthoConfig, Clone, Default)]
#[command(name = "body")]
#[ortho_config(prefix = "RESPCTX")]
pub struct BodyArgs {
    /// Path to the stored response record (JSON)
    #[arg(required = true, value_name = "RECORD")]
    pub record: Option<PathBuf>,
    /// Directory that relative body paths are resolved against
    #[arg(long, value_name = "DIR")]
    pub body_root: Option<PathBuf>,
}

/// Parameters accepted by the `call` sub-command.
#[derive(Parser, Deserialize, Serialize, Debug, OrthoConfig, Clone, Default)]
#[command(name = "call")]
#[ortho_config(prefix = "RESPCTX")]
pub struct CallArgs {
    /// Path to the stored response record (JSON)
    #[arg(required = true, value_name = "RECORD")]
    pub record: Option<PathBuf>,
    /// Response function to invoke, e.g. `getHeader`
    #[arg(required = true, value_name = "METHOD")]
    pub method: String,
    /// Arguments, each parsed as JSON and otherwise passed as a string
    #[arg(value_name = "ARG", num_args = 0..)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Indent the JSON reply
    #[arg(long)]
    // `crate::bool_predicates::not` keeps an unset flag from overriding env or config.
    #[serde(default, skip_serializing_if = "crate::bool_predicates::not")]
    pub pretty: bool,
    /// Directory that relative body paths are resolved against
    #[arg(long, value_name = "DIR")]
    pub body_root: Option<PathBuf>,
}
