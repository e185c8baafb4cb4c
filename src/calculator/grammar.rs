use tracing::trace;

use super::builtins;
use super::{Calculator, Number};
use crate::raise;
use crate::scanning::{ScanError, ScanState, Value, END};

const LPAREN: char = '(';
const RPAREN: char = ')';
const PLUS: char = '+';
const MINUS: char = '-';
const COMMA: char = ',';
const MUL: char = '*';
const DIV1: char = '/';
const DIV2: &str = "÷";

const MAX_ARGUMENTS: usize = 10;

fn checked(s: &mut ScanState<'_>, result: Option<Number>) -> Result<Number, ScanError> {
    match result {
        Some(n) => Ok(n),
        None => raise!(s, "arithmetic overflow"),
    }
}

impl Calculator {
    /// A whole line: one term, then nothing else.
    pub fn expression(&mut self, s: &mut ScanState<'_>) -> Result<Number, ScanError> {
        let n = self.term(s)?;
        s.expect(
            self.terminals
                .end_of_line,
        )?;
        Ok(n)
    }

    fn term(&mut self, s: &mut ScanState<'_>) -> Result<Number, ScanError> {
        let mut n = self.factor(s)?;

        loop {
            if s.accept(PLUS)? {
                let rhs = self.factor(s)?;
                n = checked(s, n.checked_add(rhs))?;
            } else if s.accept(MINUS)? {
                let rhs = self.factor(s)?;
                n = checked(s, n.checked_sub(rhs))?;
            } else {
                return Ok(n);
            }
        }
    }

    fn factor(&mut self, s: &mut ScanState<'_>) -> Result<Number, ScanError> {
        let mut n = self.primary(s)?;

        loop {
            if s.accept(MUL)? {
                let rhs = self.primary(s)?;
                n = checked(s, n.checked_mul(rhs))?;
            } else if s.accept(DIV1)? || s.accept(DIV2)? {
                let rhs = self.primary(s)?;
                if rhs == 0 {
                    raise!(s, "division by zero");
                }
                n = checked(s, n.checked_div(rhs))?;
            } else {
                return Ok(n);
            }
        }
    }

    fn primary(&mut self, s: &mut ScanState<'_>) -> Result<Number, ScanError> {
        let terminals = self.terminals;

        if s.accept(terminals.identifier)? {
            let name = s.matched();

            if s.accept(LPAREN)? {
                return self.call(s, name);
            }
            return self.symbol(s, name);
        }

        if s.accept(LPAREN)? {
            let n = self.term(s)?;
            s.expect(RPAREN)?;
            return Ok(n);
        }

        if s.accept(MINUS)? {
            let n = self.primary(s)?;
            return checked(s, n.checked_neg());
        }

        if s.accept(PLUS)? {
            return self.primary(s);
        }

        let mut value = Value::Empty;
        if s.accept_into(terminals.integer, &mut value)? {
            if let Some(n) = value.as_integer() {
                return Ok(n);
            }
        }

        let position = s.error_position();
        raise!(s, "syntax error at position {}", position)
    }

    fn call(&mut self, s: &mut ScanState<'_>, name: &str) -> Result<Number, ScanError> {
        let mut arguments = Vec::new();

        if !s.accept(RPAREN)? {
            loop {
                if s.accept(END)? {
                    raise!(s, "unclosed paren on function call {}", name);
                }
                if arguments.len() == MAX_ARGUMENTS {
                    raise!(s, "function {}: too many args", name);
                }

                arguments.push(self.term(s)?);

                if s.accept(RPAREN)? {
                    break;
                }
                if s.accept(END)? {
                    raise!(s, "unclosed paren on function call {}", name);
                }
                s.expect_or(COMMA, &format!("expected ',' or ')' in call to {}", name))?;
            }
        }

        let builtin = match builtins::lookup(name) {
            Some(builtin) => builtin,
            None => raise!(s, "unknown function {}", name),
        };

        trace!(name, ?arguments, "calling builtin");

        match (builtin.exec)(&arguments, &mut self.rng) {
            Ok(n) => Ok(n),
            Err(message) => Err(s.raise(message)),
        }
    }

    // A real interpreter would have a symbol table; here the defined symbols
    // are consulted and then the process environment.
    fn symbol(&mut self, s: &mut ScanState<'_>, name: &str) -> Result<Number, ScanError> {
        if let Some(n) = self
            .symbols
            .get(name)
        {
            return Ok(*n);
        }

        match std::env::var(name) {
            Ok(text) => match text
                .trim()
                .parse::<Number>()
            {
                Ok(n) => Ok(n),
                Err(_) => raise!(s, "{} is not an integer", name),
            },
            Err(_) => raise!(s, "{} not found in environment", name),
        }
    }
}
