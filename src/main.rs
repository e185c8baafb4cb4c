use std::io::{self, BufRead};

use clap::{value_parser, Arg, ArgAction, Command};
use owo_colors::OwoColorize;
use serde::Serialize;
use tinytemplate::TinyTemplate;
use tracing::{debug, Level};

use scanline::calculator::{Calculator, Number};
use scanline::error::Report;
use scanline::scanning::{Driver, ScanError};

static TEMPLATE: &'static str = " = {value}";

#[derive(Serialize)]
struct Context<'a> {
    line: &'a str,
    value: Number,
}

fn parse_definition(argument: &str) -> Result<(String, Number), String> {
    let (name, value) = argument
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, not \"{}\"", argument))?;
    let value = value
        .trim()
        .parse::<Number>()
        .map_err(|error| format!("value of {}: {}", name, error))?;
    Ok((
        name.trim()
            .to_string(),
        value,
    ))
}

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("scanline")
        .version(VERSION)
        .about("Evaluate integer expressions with a tokenless recursive descent scanner.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log more detail to standard error. Repeat for a trace of every probe."),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Seed for rand() so that results are repeatable."),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .default_value(TEMPLATE)
                .help("Template for each result line. Fields available are {line} and {value}."),
        )
        .arg(
            Arg::new("define")
                .short('D')
                .long("define")
                .action(ArgAction::Append)
                .value_parser(parse_definition)
                .help("Define a symbol as NAME=VALUE. Checked before the environment."),
        )
        .arg(
            Arg::new("expression")
                .help("Expression to evaluate. If omitted, lines are read from standard input."),
        )
        .get_matches();

    let level = match matches.get_count("verbose") {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let mut calculator = match matches.get_one::<u64>("seed") {
        Some(seed) => Calculator::seeded(*seed),
        None => Calculator::new(),
    };

    if let Some(definitions) = matches.get_many::<(String, Number)>("define") {
        for (name, value) in definitions {
            debug!(%name, value, "defining symbol");
            calculator.define(name.clone(), *value);
        }
    }

    let template = matches
        .get_one::<String>("output")
        .map(String::as_str)
        .unwrap_or(TEMPLATE);

    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    if let Err(error) = tt.add_template("result", template) {
        eprintln!("{}: invalid output template: {}", "error".bright_red(), error);
        std::process::exit(2);
    }

    match matches.get_one::<String>("expression") {
        Some(expression) => {
            if evaluate_argument(&mut calculator, &tt, expression).is_none() {
                std::process::exit(1);
            }
        }
        None => read_eval_print(&mut calculator, &tt),
    }
}

fn show_result(tt: &TinyTemplate, line: &str, value: Number) {
    let context = Context { line, value };
    match tt.render("result", &context) {
        Ok(rendered) => println!("{}", rendered),
        Err(error) => eprintln!("{}: {}", "error".bright_red(), error),
    }
}

fn evaluate_argument(calculator: &mut Calculator, tt: &TinyTemplate, expression: &str) -> Option<()> {
    let mut driver = Driver::new(calculator.registry(), |error: &ScanError, line: &str| {
        eprintln!("{}", Report::new(error, "<argument>", line).full_details());
    });

    let value = driver.scan(expression, |s| calculator.expression(s))?;
    show_result(tt, expression, value);
    Some(())
}

fn read_eval_print(calculator: &mut Calculator, tt: &TinyTemplate) {
    // The recovery point: report the error, then carry on with the next line.
    let mut driver = Driver::new(calculator.registry(), |error: &ScanError, line: &str| {
        eprintln!("{}", Report::new(error, "<stdin>", line).full_details());
    });

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                debug!(?error);
                break;
            }
        };

        if let Some(value) = driver.scan(&line, |s| calculator.expression(s)) {
            show_result(tt, &line, value);
        }
    }

    debug!(
        sessions = driver.sessions(),
        failures = driver.failures(),
        "end of input"
    );
}
