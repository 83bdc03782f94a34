//! Shadowtake - read Shadow motion capture takes
//!
//! This library crate exposes take discovery, definition parsing and the
//! `Take` facade used by the CLI and integration tests.

pub mod config;
pub mod definition;
pub mod locator;
pub mod take;

pub use definition::{load_definition, parse_definition, DefinitionError};
pub use locator::{find_newest_take, take_path, LocateError, TakeFiles};
pub use take::Take;
