//! Tokenless scanning for recursive descent parsers.
//!
//! Grammar functions probe the line for the next lexical element with
//! [`ScanState::accept`] or [`ScanState::expect`]. There is no separate
//! tokenizing pass: each probe either commits the shared cursor past what it
//! matched or leaves it untouched. A failed `expect` is a hard error, carried
//! back to the session's single recovery point as a [`ScanError`].

mod error;
mod matchers;
mod probe;
mod session;
mod state;
mod terminal;

// Re-export all public symbols
pub use error::ScanError;
pub use session::{run, Driver};
pub use state::{ScanState, Value};
pub use terminal::{Descriptor, Registry, RegistryBuilder, ScanFn, Terminal, TerminalId, END};
