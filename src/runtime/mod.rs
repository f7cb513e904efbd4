//! # Runtime
//!
//! This module runs [compiled grammars](CompiledGrammar) against inputs.
//!
//! Matching is an ordered-choice backtracking descent: the first alternative which succeeds
//! wins, and failures only move the parser back to where the failing expression started.
//! When no match is found, the error reports the furthest offset any expression reached,
//! along with everything which would have been accepted there.
//!
//! Code blocks of the grammar are run by a [`Host`]. Use [`NoHost`] for grammars without any code.

mod compiled;
mod data;
mod errors;
mod executor;
mod host;
mod parser;
mod tracer;

pub use compiled::CompiledGrammar;
pub(crate) use compiled::{ClassMatcher, CompiledRule, LiteralMatcher, Node};
pub use data::*;
pub use errors::*;
pub use host::*;
pub use parser::*;
pub use tracer::*;
