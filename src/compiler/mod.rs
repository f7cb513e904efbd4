//! # Compiler
//!
//! This module turns a [grammar's syntax tree](crate::ast::Grammar) into an [`Artifact`].
//!
//! Compilation runs a list of [passes](Passes) in order: the `check` passes report semantic
//! errors, the `transform` passes return simplified grammars. The resulting grammar is then
//! annotated for the [runtime](crate::runtime).

pub(crate) mod analysis;
mod errors;
mod generate;
mod options;
pub mod passes;

pub use errors::*;
pub use generate::generate_compiled;
pub use options::*;

use crate::ast::Grammar;
use crate::generators::gen_grammar;
use crate::runtime::Parser;
use log::debug;
use std::collections::BTreeMap;

/// A step of the compilation pipeline
///
/// Passes take the grammar by value and return the grammar handed to the next pass,
/// so the same input always leads to the same output.
pub trait Pass {
    /// Name of the pass, used for logging
    fn name(&self) -> &str;

    /// Check or transform a grammar
    fn run(&self, grammar: Grammar, options: &CompilerOptions) -> Result<Grammar, GrammarError>;
}

impl<F> Pass for F
where
    F: Fn(Grammar, &CompilerOptions) -> Result<Grammar, GrammarError>,
{
    fn name(&self) -> &str {
        std::any::type_name::<F>()
    }

    fn run(&self, grammar: Grammar, options: &CompilerOptions) -> Result<Grammar, GrammarError> {
        self(grammar, options)
    }
}

/// A boxed, shareable pass
pub type BoxedPass = Box<dyn Pass + Send + Sync>;

/// Ordered list of passes used by [`compile`]
pub struct Passes {
    /// Passes reporting semantic errors
    pub check: Vec<BoxedPass>,

    /// Passes simplifying the grammar
    pub transform: Vec<BoxedPass>,
}

impl Passes {
    /// Create an empty list of passes
    pub fn empty() -> Self {
        Self {
            check: vec![],
            transform: vec![],
        }
    }

    /// Iterate over all passes, in execution order
    pub fn iter(&self) -> impl Iterator<Item = &BoxedPass> {
        self.check.iter().chain(self.transform.iter())
    }

    /// Remove a pass by its name, returning whether it was found
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.check.len() + self.transform.len();

        self.check.retain(|pass| pass.name() != name);
        self.transform.retain(|pass| pass.name() != name);

        before != self.check.len() + self.transform.len()
    }
}

impl Default for Passes {
    fn default() -> Self {
        Self {
            check: vec![
                Box::new(passes::ReportDuplicateRules),
                Box::new(passes::ReportUndefinedRules),
                Box::new(passes::ReportStartRules),
                Box::new(passes::ReportDuplicateLabels),
                Box::new(passes::ReportInfiniteRecursion),
                Box::new(passes::ReportInfiniteRepetition),
            ],
            transform: vec![
                Box::new(passes::RemoveProxyRules),
                Box::new(passes::Simplify),
            ],
        }
    }
}

/// Extension contributing passes or tweaking options
///
/// Plugins are applied in order by [`crate::generate`], before compilation starts.
pub trait Plugin {
    fn apply(&self, passes: &mut Passes, options: &mut CompilerOptions);
}

/// Result of a compilation
#[derive(Debug, Clone)]
pub enum Artifact {
    /// A parser ready to be used
    Parser(Parser),

    /// Grammar source, to be packaged by an external tool
    Source(SourceArtifact),
}

impl Artifact {
    /// Get the parser, if the artifact is one
    pub fn into_parser(self) -> Option<Parser> {
        match self {
            Self::Parser(parser) => Some(parser),
            Self::Source(_) => None,
        }
    }

    /// Get the source, if the artifact is one
    pub fn into_source(self) -> Option<SourceArtifact> {
        match self {
            Self::Parser(_) => None,
            Self::Source(source) => Some(source),
        }
    }
}

/// Textual artifact, along with the packaging options it was requested with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArtifact {
    /// The compiled grammar, in grammar notation
    pub text: String,

    pub format: Format,
    pub export_var: Option<String>,
    pub dependencies: BTreeMap<String, String>,
}

/// Compile a grammar using the provided passes
///
/// Compilation stops at the first error; no artifact is produced in that case.
pub fn compile(
    grammar: &Grammar,
    passes: &Passes,
    options: &CompilerOptions,
) -> Result<Artifact, GrammarError> {
    let mut grammar = grammar.clone();

    for pass in passes.iter() {
        debug!("Running pass '{}' on {} rule(s)", pass.name(), grammar.rules.len());
        grammar = pass.run(grammar, options)?;
    }

    Ok(match options.output {
        Output::Parser => Artifact::Parser(Parser::new(generate_compiled(&grammar, options)?)),
        Output::Source => Artifact::Source(SourceArtifact {
            text: gen_grammar(&grammar)?,
            format: options.format,
            export_var: options.export_var.clone(),
            dependencies: options.dependencies.clone(),
        }),
    })
}
