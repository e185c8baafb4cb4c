//! Hard errors: the one way out of a parse that is not a normal return.

use std::fmt;

use tracing::debug;

use super::state::ScanState;

/// A hard parse error. Returned up through every grammar function with `?`
/// until it reaches the session's recovery point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub message: String,
    /// Byte offset into the line of the failure point.
    pub offset: usize,
    /// The same point as a 1-based character position, for humans.
    pub position: usize,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ScanError {}

/// Raise a hard error from inside a grammar or terminal function, returning
/// it from the enclosing function.
///
/// ```ignore
/// raise!(s, "unknown function {}", name);
/// ```
#[macro_export]
macro_rules! raise {
    ($state:expr, $($arg:tt)+) => {
        return Err($state.raise(format!($($arg)+)))
    };
}

impl<'i> ScanState<'i> {
    /// Record `message` as this session's diagnostic, run the cleanup hook
    /// if one is set, and hand back the error for the caller to return.
    pub fn raise(&mut self, message: impl Into<String>) -> ScanError {
        let message = message.into();
        let offset = self
            .fail_position
            .unwrap_or(self.cursor);
        let position = self.error_position();

        debug!(%message, position, probe = ?self.probe, "raising scan error");

        self.message = message.clone();

        if let Some(hook) = self
            .cleanup
            .take()
        {
            hook();
        }

        ScanError {
            message,
            offset,
            position,
        }
    }

    /// Install a hook to run once, immediately before the next hard error
    /// is raised. Replaces any hook already set.
    pub fn on_cleanup(&mut self, hook: impl FnOnce() + 'i) {
        self.cleanup = Some(Box::new(hook));
    }
}
