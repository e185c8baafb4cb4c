//! An integer calculator built on the scanning engine.
//!
//! ```text
//! expr:     term eol
//! term:     factor { ("+" | "-") factor }
//! factor:   primary { ("*" | "/" | "÷") primary }
//! primary:  identifier "(" [ term { "," term } ] ")"
//!           | identifier
//!           | integer
//!           | "(" term ")"
//!           | "-" primary | "+" primary
//! ```

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::scanning::{self, Registry, ScanError};

mod builtins;
mod grammar;
mod terminals;

pub use terminals::{terminals, Terminals};

/// The type all calculations are done in.
pub type Number = i64;

pub struct Calculator {
    terminals: &'static Terminals,
    symbols: HashMap<String, Number>,
    rng: StdRng,
}

impl Calculator {
    pub fn new() -> Calculator {
        Calculator::with_rng(StdRng::from_entropy())
    }

    /// A calculator whose `rand()` produces a repeatable sequence.
    pub fn seeded(seed: u64) -> Calculator {
        Calculator::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Calculator {
        Calculator {
            terminals: terminals(),
            symbols: HashMap::new(),
            rng,
        }
    }

    /// Define a symbol. Defined symbols are looked up before the process
    /// environment.
    pub fn define(&mut self, name: impl Into<String>, value: Number) {
        self.symbols
            .insert(name.into(), value);
    }

    pub fn registry(&self) -> &'static Registry {
        &self
            .terminals
            .registry
    }

    /// Evaluate one line in a session of its own.
    pub fn evaluate(&mut self, line: &str) -> Result<Number, ScanError> {
        let registry = self.registry();
        scanning::run(registry, line, |s| self.expression(s))
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Calculator::new()
    }
}
