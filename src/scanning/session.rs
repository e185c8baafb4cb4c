//! Sessions: one parse of one line, with a single recovery point.

use tracing::debug;

use super::error::ScanError;
use super::state::ScanState;
use super::terminal::Registry;

/// Run `grammar` over `line` in a fresh [`ScanState`]. This is the catch
/// boundary: a hard error raised at any depth of the grammar arrives here as
/// the `Err`.
pub fn run<'i, T, G>(registry: &'i Registry, line: &'i str, grammar: G) -> Result<T, ScanError>
where
    G: FnOnce(&mut ScanState<'i>) -> Result<T, ScanError>,
{
    let mut state = ScanState::new(registry, line);
    let result = grammar(&mut state);

    if let Err(error) = &result {
        debug!(message = %error.message, position = error.position, "session aborted");
    }
    result
}

/// Drives one session per unit of input, sending every hard error to the
/// recovery handler installed when the driver was made.
pub struct Driver<'r, H>
where
    H: FnMut(&ScanError, &str),
{
    registry: &'r Registry,
    recovery: H,
    sessions: usize,
    failures: usize,
}

impl<'r, H> Driver<'r, H>
where
    H: FnMut(&ScanError, &str),
{
    pub fn new(registry: &'r Registry, recovery: H) -> Self {
        Driver {
            registry,
            recovery,
            sessions: 0,
            failures: 0,
        }
    }

    /// Parse `line` with `grammar`. Returns the grammar's result, or `None`
    /// after the recovery handler has seen the error.
    pub fn scan<'i, T, G>(&mut self, line: &'i str, grammar: G) -> Option<T>
    where
        'r: 'i,
        G: FnOnce(&mut ScanState<'i>) -> Result<T, ScanError>,
    {
        self.sessions += 1;

        match run(self.registry, line, grammar) {
            Ok(value) => Some(value),
            Err(error) => {
                self.failures += 1;
                (self.recovery)(&error, line);
                None
            }
        }
    }

    pub fn sessions(&self) -> usize {
        self.sessions
    }

    pub fn failures(&self) -> usize {
        self.failures
    }
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::raise;

    fn nested(s: &mut ScanState<'_>, depth: usize) -> Result<usize, ScanError> {
        if s.accept('(')? {
            let inner = nested(s, depth + 1)?;
            s.expect(')')?;
            return Ok(inner);
        }
        if s.accept('!')? {
            raise!(s, "bang at depth {}", depth)
        }
        Ok(depth)
    }

    #[test]
    fn run_returns_grammar_result() {
        let registry = Registry::builder().build();
        assert_eq!(run(&registry, "((()))", |s| nested(s, 0)), Ok(3));
    }

    #[test]
    fn hard_error_unwinds_to_run() {
        let registry = Registry::builder().build();

        let error = run(&registry, "((( ! )))", |s| nested(s, 0)).unwrap_err();
        assert_eq!(error.message, "bang at depth 3");

        let error = run(&registry, "(((", |s| nested(s, 0)).unwrap_err();
        assert_eq!(error.message, "expected ')' at position 4");
    }

    #[test]
    fn recovery_point_reached_once_per_failure() {
        let registry = Registry::builder().build();
        let mut reports = Vec::new();

        {
            let mut driver = Driver::new(&registry, |error: &ScanError, line: &str| {
                reports.push(format!("{}: {}", line, error))
            });

            assert_eq!(driver.scan("(())", |s| nested(s, 0)), Some(2));
            assert_eq!(driver.scan("(!)", |s| nested(s, 0)), None);
            assert_eq!(driver.scan("()", |s| nested(s, 0)), Some(1));
            assert_eq!(driver.sessions(), 3);
            assert_eq!(driver.failures(), 1);
        }

        assert_eq!(reports, vec!["(!): bang at depth 1".to_string()]);
    }
}
