//! Scan state shared by every probe within one session.

use std::fmt;
use std::panic::Location;

use super::terminal::{Registry, END};

/// Converted value written into a caller's result slot by a successful probe.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    Empty,
    Integer(i64),
    Character(char),
    Text(String),
    /// Offset into the line where a literal matched.
    Offset(usize),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

pub(crate) fn store(slot: Option<&mut Value>, value: Value) {
    if let Some(slot) = slot {
        *slot = value;
    }
}

/// Cursor, last match, and failure bookkeeping for one parse of one line.
///
/// The cursor only moves when a probe commits via [`ScanState::success`];
/// a failed probe leaves it exactly where it was.
pub struct ScanState<'i> {
    pub(crate) registry: &'i Registry,
    line: &'i str,
    pub(crate) cursor: usize,
    pub(crate) match_start: usize,
    pub(crate) match_length: usize,
    pub(crate) fail_position: Option<usize>,
    pub(crate) fail_detail: Option<String>,
    pub(crate) message: String,
    pub(crate) cleanup: Option<Box<dyn FnOnce() + 'i>>,
    pub(crate) probe: Option<&'static Location<'static>>,
}

impl<'i> ScanState<'i> {
    pub fn new(registry: &'i Registry, line: &'i str) -> ScanState<'i> {
        ScanState {
            registry,
            line,
            cursor: 0,
            match_start: 0,
            match_length: 0,
            fail_position: None,
            fail_detail: None,
            message: String::new(),
            cleanup: None,
            probe: None,
        }
    }

    /// Start over on a new line. Any cleanup hook that did not fire during
    /// the previous session is dropped without being called.
    pub fn reset(&mut self, line: &'i str) {
        *self = ScanState::new(self.registry, line);
    }

    pub fn registry(&self) -> &'i Registry {
        self.registry
    }

    pub fn line(&self) -> &'i str {
        self.line
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The input not yet consumed.
    pub fn remaining(&self) -> &'i str {
        &self.line[self.cursor..]
    }

    /// True when only whitespace is left to scan.
    pub fn is_finished(&self) -> bool {
        self.peek_at(self.skip_whitespace(self.cursor)) == END
    }

    /// The character at `position`, or [`END`] past the end of the line.
    pub fn peek_at(&self, position: usize) -> char {
        self.line
            .get(position..)
            .unwrap_or("")
            .chars()
            .next()
            .unwrap_or(END)
    }

    /// The first position at or after `position` that is not whitespace.
    pub fn skip_whitespace(&self, position: usize) -> usize {
        let rest = match self
            .line
            .get(position..)
        {
            Some(rest) => rest,
            None => return position,
        };
        let trimmed = rest.trim_start_matches(char::is_whitespace);
        position + (rest.len() - trimmed.len())
    }

    pub fn match_start(&self) -> usize {
        self.match_start
    }

    pub fn match_length(&self) -> usize {
        self.match_length
    }

    /// Text of the most recent successful match.
    pub fn matched(&self) -> &'i str {
        self.line
            .get(self.match_start..self.match_start + self.match_length)
            .unwrap_or("")
    }

    pub fn fail_position(&self) -> Option<usize> {
        self.fail_position
    }

    pub fn fail_detail(&self) -> Option<&str> {
        self.fail_detail
            .as_deref()
    }

    /// Diagnostic text of the last hard error raised in this session.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Source location of the most recent `accept`/`expect` call.
    pub fn last_probe(&self) -> Option<&'static Location<'static>> {
        self.probe
    }

    /// Record a failed match that stopped at `position`. Never moves the
    /// cursor.
    pub fn fail(&mut self, position: usize) -> bool {
        self.fail_position = Some(position);
        false
    }

    /// As [`fail`](Self::fail), attaching a note the caller may surface.
    pub fn fail_with(&mut self, position: usize, detail: impl Into<String>) -> bool {
        self.fail_detail = Some(detail.into());
        self.fail(position)
    }

    /// Commit the cursor to `position`, the end of a successful match.
    pub fn success(&mut self, position: usize) -> bool {
        debug_assert!(position >= self.cursor, "cursor must not move backwards");
        self.match_length = position.saturating_sub(self.match_start);
        self.cursor = position;
        true
    }

    /// 1-based character position of the last failure point, or of the
    /// cursor when nothing has failed yet.
    pub fn error_position(&self) -> usize {
        let offset = self
            .fail_position
            .unwrap_or(self.cursor);
        self.prefix(offset)
            .chars()
            .count()
            + 1
    }

    // The line up to `offset`, clamped to the end of the line and back to
    // the nearest character boundary.
    fn prefix(&self, offset: usize) -> &'i str {
        let mut offset = offset.min(
            self.line
                .len(),
        );
        while !self
            .line
            .is_char_boundary(offset)
        {
            offset -= 1;
        }
        &self.line[..offset]
    }

    pub(crate) fn reset_attempt(&mut self) {
        self.fail_position = None;
        self.fail_detail = None;
        self.message
            .clear();
    }
}

impl fmt::Debug for ScanState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanState")
            .field("line", &self.line)
            .field("cursor", &self.cursor)
            .field("match_start", &self.match_start)
            .field("match_length", &self.match_length)
            .field("fail_position", &self.fail_position)
            .field("fail_detail", &self.fail_detail)
            .field("message", &self.message)
            .field(
                "cleanup",
                &self
                    .cleanup
                    .is_some(),
            )
            .finish()
    }
}

#[cfg(test)]
mod check {
    use super::*;

    fn empty() -> Registry {
        Registry::builder().build()
    }

    #[test]
    fn peeking_and_skipping() {
        let registry = empty();
        let state = ScanState::new(&registry, "  ab ");

        assert_eq!(state.skip_whitespace(0), 2);
        assert_eq!(state.peek_at(2), 'a');
        assert_eq!(state.peek_at(5), END);
        assert_eq!(state.skip_whitespace(4), 5);
        assert!(!state.is_finished());
    }

    #[test]
    fn success_commits_and_fail_does_not() {
        let registry = empty();
        let mut state = ScanState::new(&registry, "hello world");

        assert!(!state.fail(3));
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.fail_position(), Some(3));

        state.match_start = 0;
        assert!(state.success(5));
        assert_eq!(state.cursor(), 5);
        assert_eq!(state.matched(), "hello");
        assert_eq!(state.remaining(), " world");
    }

    #[test]
    fn failure_detail_is_kept() {
        let registry = empty();
        let mut state = ScanState::new(&registry, "abc");

        state.fail_with(1, "not a digit");
        assert_eq!(state.fail_detail(), Some("not a digit"));

        state.reset_attempt();
        assert_eq!(state.fail_detail(), None);
        assert_eq!(state.fail_position(), None);
    }

    #[test]
    fn error_positions_are_one_based_characters() {
        let registry = empty();
        let mut state = ScanState::new(&registry, "12x");

        assert_eq!(state.error_position(), 1);
        state.fail(2);
        assert_eq!(state.error_position(), 3);

        let mut state = ScanState::new(&registry, "6 ÷ x");
        state.fail(5);
        assert_eq!(state.error_position(), 5);
    }

    #[test]
    fn out_of_range_offsets_do_not_panic() {
        let registry = empty();
        let mut state = ScanState::new(&registry, "a÷b");

        state.fail(40);
        assert_eq!(state.error_position(), 4);

        // inside the two bytes of '÷'
        state.fail(2);
        assert_eq!(state.error_position(), 2);

        state.match_start = 2;
        state.match_length = 1;
        assert_eq!(state.matched(), "");

        state.match_start = 3;
        state.match_length = 9;
        assert_eq!(state.matched(), "");
        assert_eq!(state.peek_at(12), END);
    }

    #[test]
    fn reset_starts_a_new_session() {
        let registry = empty();
        let mut state = ScanState::new(&registry, "first");
        state.match_start = 0;
        state.success(5);
        state.fail(5);

        state.reset("second");
        assert_eq!(state.line(), "second");
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.fail_position(), None);
    }
}
