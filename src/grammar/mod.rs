//! # Grammar parser
//!
//! This module turns a grammar's text into a [syntax tree](crate::ast::Grammar).
//!
//! ```text
//! {
//!   // Initializer, handed to the host before each parse
//! }
//!
//! start "expression" = head:term tail:(_ ("+" / "-") _ term)* { fold }
//! term = $[0-9]+ / "(" _ start _ ")"
//! _ = [ \t]*
//! ```
//!
//! Whitespaces and comments (`// ...` and `/* ... */`) are insignificant between tokens.
//! Rules may optionally be terminated by a semicolon.

mod errors;
mod parser;
mod singles;
pub(crate) mod utils;

pub use errors::*;
pub use parser::parse_grammar;
