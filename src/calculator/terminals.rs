//! Terminals of the calculator grammar.

use std::sync::OnceLock;

use crate::raise;
use crate::scanning::{Registry, ScanError, ScanState, TerminalId, Value, END};

#[derive(Debug)]
pub struct Terminals {
    pub registry: Registry,
    pub identifier: TerminalId,
    pub integer: TerminalId,
    pub end_of_line: TerminalId,
}

/// The calculator's terminal table, built on first use and shared by every
/// session thereafter.
pub fn terminals() -> &'static Terminals {
    static TERMINALS: OnceLock<Terminals> = OnceLock::new();
    TERMINALS.get_or_init(|| {
        let mut builder = Registry::builder();
        let identifier = builder.terminal("identifier", scan_identifier);
        let integer = builder.terminal("integer", scan_integer);
        let end_of_line = builder.terminal("end of line", scan_end_of_line);
        Terminals {
            registry: builder.build(),
            identifier,
            integer,
            end_of_line,
        }
    })
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn scan_identifier(
    state: &mut ScanState<'_>,
    position: usize,
    slot: Option<&mut Value>,
) -> Result<bool, ScanError> {
    if !is_identifier_start(state.peek_at(position)) {
        return Ok(state.fail(position));
    }

    let rest = &state.line()[position..];
    let width = rest
        .find(|c: char| !is_identifier_char(c))
        .unwrap_or(rest.len());

    if let Some(slot) = slot {
        *slot = Value::Text(rest[..width].to_string());
    }
    Ok(state.success(position + width))
}

// Signs are scanned separately by the grammar.
fn scan_integer(
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

    let mut value: i64 = 0;
    for (i, b) in rest[..width]
        .bytes()
        .enumerate()
    {
        let digit = i64::from(b - b'0');
        value = match value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit))
        {
            Some(v) => v,
            None => {
                state.fail(position + i);
                raise!(state, "integer overflow")
            }
        };
    }

    if let Some(slot) = slot {
        *slot = Value::Integer(value);
    }
    Ok(state.success(position + width))
}

fn scan_end_of_line(
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
