//! # Generators
//!
//! This module turns [grammar syntax trees](crate::ast::Grammar) back into text.

mod grammar;

pub use grammar::{gen_expression, gen_grammar};
pub(crate) use grammar::{escape_class, escape_literal};
