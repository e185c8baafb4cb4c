//! Functions callable from calculator expressions.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::warn;

use super::Number;

pub struct Builtin {
    pub name: &'static str,
    pub exec: fn(&[Number], &mut StdRng) -> Result<Number, String>,
}

static BUILTINS: &[Builtin] = &[
    Builtin {
        name: "min",
        exec: builtin_min,
    },
    Builtin {
        name: "max",
        exec: builtin_max,
    },
    Builtin {
        name: "rand",
        exec: builtin_rand,
    },
];

pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS
        .iter()
        .find(|builtin| builtin.name == name)
}

fn builtin_min(arguments: &[Number], _rng: &mut StdRng) -> Result<Number, String> {
    arguments
        .iter()
        .copied()
        .min()
        .ok_or_else(|| "function min: expected at least one argument".to_string())
}

fn builtin_max(arguments: &[Number], _rng: &mut StdRng) -> Result<Number, String> {
    arguments
        .iter()
        .copied()
        .max()
        .ok_or_else(|| "function max: expected at least one argument".to_string())
}

fn builtin_rand(arguments: &[Number], rng: &mut StdRng) -> Result<Number, String> {
    if !arguments.is_empty() {
        warn!("arguments in rand() ignored");
    }
    Ok(rng.gen_range(0..=Number::from(i32::MAX)))
}
