//! Tokenless scanning of lexical elements for hand-written recursive descent
//! parsers, and a small calculator built on top of it.

pub mod calculator;
pub mod error;
pub mod scanning;
