//! The operations grammar code calls: optional probes (`accept`), mandatory
//! probes (`expect`), and the all-or-nothing `accept_all`.

use std::panic::Location;

use tracing::trace;

use super::error::ScanError;
use super::state::{ScanState, Value};
use super::terminal::Terminal;

impl<'i> ScanState<'i> {
    /// Try to match `terminal` at the cursor. On failure the cursor is left
    /// exactly where it was. Only a terminal's own scanning function can
    /// produce an `Err` here.
    #[track_caller]
    pub fn accept<'t>(&mut self, terminal: impl Into<Terminal<'t>>) -> Result<bool, ScanError> {
        self.probe(terminal.into(), None, Location::caller())
    }

    /// As [`accept`](Self::accept), writing the converted value into `slot`
    /// on success.
    #[track_caller]
    pub fn accept_into<'t>(
        &mut self,
        terminal: impl Into<Terminal<'t>>,
        slot: &mut Value,
    ) -> Result<bool, ScanError> {
        self.probe(terminal.into(), Some(slot), Location::caller())
    }

    /// Match every terminal in order, or none of them. If any one fails the
    /// cursor goes back to where it was before the first.
    #[track_caller]
    pub fn accept_all(&mut self, terminals: &[Terminal<'_>]) -> Result<bool, ScanError> {
        let location = Location::caller();
        let before = self.cursor;

        for terminal in terminals {
            match self.probe(*terminal, None, location) {
                Ok(true) => continue,
                Ok(false) => {
                    self.cursor = before;
                    return Ok(false);
                }
                Err(error) => {
                    self.cursor = before;
                    return Err(error);
                }
            }
        }
        Ok(true)
    }

    /// Match `terminal` or raise "expected ... at position n".
    #[track_caller]
    pub fn expect<'t>(&mut self, terminal: impl Into<Terminal<'t>>) -> Result<(), ScanError> {
        self.require(terminal.into(), None, None, Location::caller())
    }

    #[track_caller]
    pub fn expect_into<'t>(
        &mut self,
        terminal: impl Into<Terminal<'t>>,
        slot: &mut Value,
    ) -> Result<(), ScanError> {
        self.require(terminal.into(), Some(slot), None, Location::caller())
    }

    /// As [`expect`](Self::expect), but the diagnostic reads
    /// "<message> at position n" instead.
    #[track_caller]
    pub fn expect_or<'t>(
        &mut self,
        terminal: impl Into<Terminal<'t>>,
        message: &str,
    ) -> Result<(), ScanError> {
        self.require(terminal.into(), None, Some(message), Location::caller())
    }

    #[track_caller]
    pub fn expect_into_or<'t>(
        &mut self,
        terminal: impl Into<Terminal<'t>>,
        slot: &mut Value,
        message: &str,
    ) -> Result<(), ScanError> {
        self.require(terminal.into(), Some(slot), Some(message), Location::caller())
    }

    fn probe(
        &mut self,
        terminal: Terminal<'_>,
        slot: Option<&mut Value>,
        location: &'static Location<'static>,
    ) -> Result<bool, ScanError> {
        self.probe = Some(location);
        self.reset_attempt();

        let before = self.cursor;
        let last_match = (self.match_start, self.match_length);

        trace!(
            ?terminal,
            remaining = self.remaining(),
            at = %location,
            "probe"
        );

        let result = match terminal {
            Terminal::Literal(text) => Ok(self.match_literal(text, slot)),
            Terminal::Char(c) => Ok(self.match_char(c, slot)),
            Terminal::Defined(id) => self.match_terminal(id, slot),
        };

        match result {
            Ok(true) => Ok(true),
            Ok(false) => {
                self.cursor = before;
                (self.match_start, self.match_length) = last_match;
                Ok(false)
            }
            Err(error) => {
                self.cursor = before;
                (self.match_start, self.match_length) = last_match;
                Err(error)
            }
        }
    }

    fn require(
        &mut self,
        terminal: Terminal<'_>,
        slot: Option<&mut Value>,
        message: Option<&str>,
        location: &'static Location<'static>,
    ) -> Result<(), ScanError> {
        if self.probe(terminal, slot, location)? {
            return Ok(());
        }

        let position = self.error_position();
        let mut text = match message {
            Some(message) => format!("{} at position {}", message, position),
            None => format!(
                "expected {} at position {}",
                terminal.describe(self.registry),
                position
            ),
        };
        if let Some(detail) = &self.fail_detail {
            text.push_str(&format!(" ({})", detail));
        }

        Err(self.raise(text))
    }
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::scanning::state::store;
    use crate::scanning::terminal::{Registry, TerminalId, END};

    fn scan_number(
        state: &mut ScanState<'_>,
        position: usize,
        slot: Option<&mut Value>,
    ) -> Result<bool, ScanError> {
        let rest = &state.line()[position..];
        let width = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if width == 0 {
            return Ok(state.fail(position));
        }
        match rest[..width].parse::<i64>() {
            Ok(n) => store(slot, Value::Integer(n)),
            Err(_) => return Ok(state.fail_with(position, "too many digits")),
        }
        Ok(state.success(position + width))
    }

    fn scan_eol(
        state: &mut ScanState<'_>,
        position: usize,
        _slot: Option<&mut Value>,
    ) -> Result<bool, ScanError> {
        if state.peek_at(position) == END {
            Ok(state.success(position))
        } else {
            Ok(state.fail(position))
        }
    }

    fn setup() -> (Registry, TerminalId, TerminalId) {
        let mut builder = Registry::builder();
        let number = builder.terminal("number", scan_number);
        let eol = builder.terminal("end of line", scan_eol);
        (builder.build(), number, eol)
    }

    #[test]
    fn accept_dispatches_by_category() {
        let (registry, number, _) = setup();
        let mut state = ScanState::new(&registry, "let x = 42");

        assert_eq!(state.accept("let"), Ok(true));
        assert_eq!(state.accept('x'), Ok(true));
        assert_eq!(state.accept("=="), Ok(false));
        assert_eq!(state.accept('='), Ok(true));

        let mut slot = Value::Empty;
        assert_eq!(state.accept_into(number, &mut slot), Ok(true));
        assert_eq!(slot, Value::Integer(42));
        assert!(state.is_finished());
    }

    #[test]
    fn accept_all_is_atomic() {
        let (registry, number, eol) = setup();
        let mut state = ScanState::new(&registry, "if ( 1 ]");

        let sequence = [
            Terminal::from("if"),
            Terminal::from('('),
            Terminal::from(number),
            Terminal::from(')'),
        ];
        assert_eq!(state.accept_all(&sequence), Ok(false));
        assert_eq!(state.cursor(), 0);

        let sequence = [
            Terminal::from("if"),
            Terminal::from('('),
            Terminal::from(number),
            Terminal::from(']'),
            Terminal::from(eol),
        ];
        assert_eq!(state.accept_all(&sequence), Ok(true));
        assert_eq!(state.cursor(), 8);
    }

    #[test]
    fn expect_default_messages() {
        let (registry, number, eol) = setup();

        let mut state = ScanState::new(&registry, "12x");
        assert_eq!(state.expect(number), Ok(()));
        let error = state
            .expect(eol)
            .unwrap_err();
        assert_eq!(error.message, "expected end of line at position 3");
        assert_eq!(error.position, 3);
        assert_eq!(state.message(), "expected end of line at position 3");
        assert_eq!(state.cursor(), 2);

        let mut state = ScanState::new(&registry, "  then");
        let error = state
            .expect("else")
            .unwrap_err();
        assert_eq!(error.message, "expected \"else\" at position 3");

        let mut state = ScanState::new(&registry, "(1");
        state
            .expect('(')
            .unwrap();
        state
            .expect(number)
            .unwrap();
        let error = state
            .expect(')')
            .unwrap_err();
        assert_eq!(error.message, "expected ')' at position 3");
    }

    #[test]
    fn expect_with_override_and_detail() {
        let (registry, number, _) = setup();
        let mut state = ScanState::new(&registry, "99999999999999999999");

        let mut slot = Value::Empty;
        let error = state
            .expect_into_or(number, &mut slot, "wanted a count")
            .unwrap_err();
        assert_eq!(
            error.message,
            "wanted a count at position 1 (too many digits)"
        );
        assert_eq!(slot, Value::Empty);
        assert_eq!(state.cursor(), 0);

        let mut state = ScanState::new(&registry, "7");
        assert_eq!(state.expect_into(number, &mut slot), Ok(()));
        assert_eq!(slot, Value::Integer(7));
    }

    #[test]
    fn expect_or_without_detail() {
        let (registry, _, _) = setup();
        let mut state = ScanState::new(&registry, "a b");

        state
            .expect('a')
            .unwrap();
        let error = state
            .expect_or(',', "missing separator")
            .unwrap_err();
        assert_eq!(error.message, "missing separator at position 3");
    }

    #[test]
    fn probes_record_their_call_site() {
        let (registry, _, _) = setup();
        let mut state = ScanState::new(&registry, "x");

        let line = line!() + 1;
        let _ = state.accept('y');
        let location = state
            .last_probe()
            .unwrap();
        assert_eq!(location.file(), file!());
        assert_eq!(location.line(), line);
    }

    #[test]
    fn failed_probes_keep_the_last_match() {
        let (registry, number, _) = setup();

        let mut state = ScanState::new(&registry, "hello world");
        assert_eq!(state.accept("hello"), Ok(true));
        assert_eq!(state.accept(number), Ok(false));
        assert_eq!(state.matched(), "hello");

        let mut state = ScanState::new(&registry, "hello x");
        assert_eq!(state.accept("hello"), Ok(true));
        assert_eq!(state.accept(number), Ok(false));
        assert_eq!(state.accept('y'), Ok(false));
        assert_eq!(state.accept("xyz"), Ok(false));
        assert_eq!(state.matched(), "hello");
        assert_eq!(state.match_start(), 0);
        assert_eq!(state.match_length(), 5);
    }

    #[test]
    fn new_probe_clears_previous_failure() {
        let (registry, _, _) = setup();
        let mut state = ScanState::new(&registry, "a");

        assert_eq!(state.accept('z'), Ok(false));
        assert_eq!(state.fail_position(), Some(0));

        assert_eq!(state.accept('a'), Ok(true));
        assert_eq!(state.fail_position(), None);
    }
}
