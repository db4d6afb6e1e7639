//! Response context for plugin sandboxes.
//!
//! Exposes a stored HTTP response (status, headers, timing and body file)
//! through the fixed set of accessors plugins see as `context.response`.
//! The binary uses the same API to inspect records from the terminal.

pub mod body;
pub mod bool_predicates;
pub mod bridge;
pub mod cli_args;
pub mod config;
pub mod context;
pub mod error;
pub mod headers;
pub mod printer;
pub mod record;
pub mod store;

pub use context::{PluginContext, ResponseContext, init, init_with_store};
pub use error::ContextError;
pub use record::{BodyCompression, Header, ResponseRecord};
