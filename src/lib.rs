//! # pegc
//!
//! pegc is a parser generator based on Parsing Expression Grammars (PEG).
//!
//! It provides functions to [parse text-based grammars](`grammar::parse_grammar`), to [check and
//! transform them](`compiler::compile`) and to [run them](`runtime::Parser`) against inputs.
//!
//! Code blocks embedded in grammars (actions, predicates and the initializer) are never run by
//! this crate: they are handed to a [host](`runtime::Host`) provided by the caller.
//!
//! ## Usage
//!
//! ```rust
//! use pegc::compiler::CompilerOptions;
//! use pegc::runtime::{NoHost, ParseError};
//!
//! // 1. Define the grammar
//! static GRAMMAR: &str = r#"
//! greeting = hello _ world _ excl*
//!
//! hello = "Hello"i
//! world = $[a-z]+
//! excl  = "!"
//! _     = " "*
//! "#;
//!
//! // 2. Compile the grammar
//! let parser = pegc::generate_parser(GRAMMAR, CompilerOptions::new())
//!     .unwrap_or_else(|err| panic!("{}", err.pretty(GRAMMAR)));
//!
//! // 3. Match inputs against it
//! assert!(parser.parse("hello world !!", &mut NoHost).is_ok());
//!
//! match parser.parse("Hello World", &mut NoHost) {
//!     Err(ParseError::Syntax(err)) => {
//!         assert_eq!(err.message(), "Expected \" \" or [a-z] but \"W\" found.");
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

#![forbid(unsafe_code)]
#![forbid(unused_must_use)]

pub mod ast;
pub mod compiler;
pub mod generators;
pub mod grammar;
pub mod location;
pub mod report;
pub mod runtime;

use compiler::{Artifact, CompilerOptions, GrammarError, Passes};
use grammar::GrammarSyntaxError;
use log::debug;
use runtime::Parser;
use thiserror::Error;

/// Error raised while turning a grammar's text into an artifact
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] GrammarSyntaxError),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("compilation produced a source artifact instead of a parser")]
    NotAParser,
}

impl Error {
    /// Format the error in a human-readable way, showing the faulty line of the grammar
    pub fn pretty(&self, grammar: &str) -> String {
        match self {
            Self::Syntax(err) => err.pretty(grammar),
            Self::Grammar(err) => err.pretty(grammar),
            Self::NotAParser => format!("ERROR: {}", self),
        }
    }
}

/// Parse and compile a grammar with the default passes
///
/// Plugins listed in the options are applied in order before compilation starts.
pub fn generate(grammar: &str, mut options: CompilerOptions) -> Result<Artifact, Error> {
    let tree = grammar::parse_grammar(grammar)?;

    let mut passes = Passes::default();

    for plugin in std::mem::take(&mut options.plugins) {
        plugin.apply(&mut passes, &mut options);
    }

    debug!(
        "Compiling grammar with {} rule(s) and {} pass(es)",
        tree.rules.len(),
        passes.iter().count()
    );

    Ok(compiler::compile(&tree, &passes, &options)?)
}

/// Parse and compile a grammar into a [`Parser`]
pub fn generate_parser(grammar: &str, options: CompilerOptions) -> Result<Parser, Error> {
    generate(grammar, options)?
        .into_parser()
        .ok_or(Error::NotAParser)
}
