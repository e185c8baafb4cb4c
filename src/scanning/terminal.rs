//! Terminals, and the registry of application-defined ones.

use std::fmt;

use super::error::ScanError;
use super::state::{ScanState, Value};

/// End of input. A line is treated as if it were followed by this character,
/// so `accept(END)` succeeds once nothing but whitespace remains.
pub const END: char = '\0';

/// Handle to a terminal registered with a [`Registry`]. Identifiers are dense
/// and handed out in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalId(usize);

impl TerminalId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Scanning function for an application-defined terminal.
///
/// It is called with `position` already past any leading whitespace. On a
/// match it must commit with [`ScanState::success`] and may fill in the
/// result slot; otherwise it reports [`ScanState::fail`] and leaves the
/// cursor alone. Returning `Err` raises a hard error.
pub type ScanFn = fn(&mut ScanState<'_>, usize, Option<&mut Value>) -> Result<bool, ScanError>;

/// Something a grammar asks the scanner to recognize at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal<'t> {
    Literal(&'t str),
    Char(char),
    Defined(TerminalId),
}

impl<'t> From<&'t str> for Terminal<'t> {
    fn from(text: &'t str) -> Self {
        Terminal::Literal(text)
    }
}

impl<'t> From<&'t String> for Terminal<'t> {
    fn from(text: &'t String) -> Self {
        Terminal::Literal(text.as_str())
    }
}

impl From<char> for Terminal<'_> {
    fn from(c: char) -> Self {
        Terminal::Char(c)
    }
}

impl From<TerminalId> for Terminal<'_> {
    fn from(id: TerminalId) -> Self {
        Terminal::Defined(id)
    }
}

impl<'t> Terminal<'t> {
    /// How this terminal is named in an "expected ..." diagnostic.
    pub fn describe(&self, registry: &Registry) -> String {
        match self {
            Terminal::Literal(text) => format!("\"{}\"", text),
            Terminal::Char(END) => "end of input".to_string(),
            Terminal::Char(c) => {
                if c.is_control() {
                    format!("{:#04x}", *c as u32)
                } else {
                    format!("'{}'", c)
                }
            }
            Terminal::Defined(id) => registry
                .name(*id)
                .unwrap_or("unregistered terminal")
                .to_string(),
        }
    }
}

#[derive(Clone)]
pub struct Descriptor {
    pub id: TerminalId,
    pub name: String,
    pub scan: ScanFn,
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Immutable table of application-defined terminals. Build one with
/// [`Registry::builder`] before any session starts.
#[derive(Debug, Clone)]
pub struct Registry {
    terminals: Vec<Descriptor>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            terminals: Vec::new(),
        }
    }

    pub fn get(&self, id: TerminalId) -> Option<&Descriptor> {
        self.terminals
            .get(id.0)
    }

    pub fn name(&self, id: TerminalId) -> Option<&str> {
        self.get(id)
            .map(|descriptor| descriptor.name.as_str())
    }

    pub fn lookup(&self, name: &str) -> Option<TerminalId> {
        self.terminals
            .iter()
            .find(|descriptor| descriptor.name == name)
            .map(|descriptor| descriptor.id)
    }

    pub fn len(&self) -> usize {
        self.terminals
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminals
            .is_empty()
    }
}

#[derive(Debug)]
pub struct RegistryBuilder {
    terminals: Vec<Descriptor>,
}

impl RegistryBuilder {
    /// Append a terminal, returning the identifier grammar code uses to
    /// probe for it.
    pub fn terminal(&mut self, name: impl Into<String>, scan: ScanFn) -> TerminalId {
        let id = TerminalId(
            self.terminals
                .len(),
        );
        self.terminals
            .push(Descriptor {
                id,
                name: name.into(),
                scan,
            });
        id
    }

    pub fn build(self) -> Registry {
        Registry {
            terminals: self.terminals,
        }
    }
}
