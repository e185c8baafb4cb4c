//! The three matching strategies behind `accept`.
//!
//! Each one either commits the cursor past what it matched, or records where
//! matching stopped and leaves the cursor untouched.

use super::error::ScanError;
use super::state::{store, ScanState, Value};
use super::terminal::{TerminalId, END};

// A literal ending in a letter must not be followed by a letter, and one
// ending in a digit must not be followed by a digit. Mixed classes and
// punctuation are a boundary.
fn runs_together(last: char, next: char) -> bool {
    (last.is_alphabetic() && next.is_alphabetic()) || (last.is_numeric() && next.is_numeric())
}

impl<'i> ScanState<'i> {
    pub(crate) fn match_char(&mut self, wanted: char, slot: Option<&mut Value>) -> bool {
        let position = self.cursor;

        // asking for whitespace means exactly one whitespace character, with
        // no skipping beforehand
        if wanted.is_whitespace() {
            let c = self.peek_at(position);
            if !c.is_whitespace() {
                return self.fail(position);
            }
            self.match_start = position;
            store(slot, Value::Character(c));
            return self.success(position + c.len_utf8());
        }

        let position = self.skip_whitespace(position);
        let c = self.peek_at(position);
        if c != wanted {
            return self.fail(position);
        }

        self.match_start = position;
        store(slot, Value::Character(c));

        if position
            == self
                .line()
                .len()
        {
            // matched END; don't step past the end of the line
            return self.success(position);
        }
        self.success(position + c.len_utf8())
    }

    pub(crate) fn match_literal(&mut self, wanted: &str, slot: Option<&mut Value>) -> bool {
        let position = self.cursor;

        if wanted.is_empty() {
            self.match_start = position;
            store(slot, Value::Offset(position));
            return self.success(position);
        }

        let position = if wanted.starts_with(char::is_whitespace) {
            position
        } else {
            self.skip_whitespace(position)
        };

        if !self.line()[position..].starts_with(wanted) {
            return self.fail(position);
        }

        let end = position + wanted.len();
        let last = wanted
            .chars()
            .next_back()
            .unwrap_or(END);
        if runs_together(last, self.peek_at(end)) {
            return self.fail(position);
        }

        self.match_start = position;
        store(slot, Value::Offset(position));
        self.success(end)
    }

    pub(crate) fn match_terminal(
        &mut self,
        id: TerminalId,
        slot: Option<&mut Value>,
    ) -> Result<bool, ScanError> {
        let registry = self.registry;
        let position = self.skip_whitespace(self.cursor);

        self.match_start = position;
        self.fail_position = None;
        self.fail_detail = None;

        let descriptor = match registry.get(id) {
            Some(descriptor) => descriptor,
            None => return Ok(self.fail_with(position, "unregistered terminal")),
        };

        let matched = (descriptor.scan)(self, position, slot)?;
        if !matched && self.fail_position.is_none() {
            self.fail_position = Some(position);
        }
        Ok(matched)
    }
}
