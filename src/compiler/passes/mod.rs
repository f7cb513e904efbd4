//! # Compiler passes
//!
//! The default pipeline (see [`Passes::default`](super::Passes)) runs the `Report*` passes first,
//! which never change the grammar, then [`RemoveProxyRules`] and [`Simplify`].
//!
//! Passes can also be used on their own, which is useful to inspect what a single one does.

mod duplicate_labels;
mod duplicate_rules;
mod infinite_recursion;
mod infinite_repetition;
mod proxy_rules;
mod simplify;
mod start_rules;
mod undefined_rules;

pub use duplicate_labels::ReportDuplicateLabels;
pub use duplicate_rules::ReportDuplicateRules;
pub use infinite_recursion::ReportInfiniteRecursion;
pub use infinite_repetition::ReportInfiniteRepetition;
pub use proxy_rules::RemoveProxyRules;
pub use simplify::Simplify;
pub use start_rules::ReportStartRules;
pub use undefined_rules::ReportUndefinedRules;

#[cfg(test)]
pub(crate) mod testing {
    use crate::ast::Grammar;
    use crate::compiler::{CompilerOptions, GrammarError, Pass};
    use crate::grammar::parse_grammar;

    /// Run a single pass with the default options
    pub fn run(pass: impl Pass, grammar: &str) -> Result<Grammar, GrammarError> {
        run_with(pass, grammar, &CompilerOptions::new())
    }

    pub fn run_with(
        pass: impl Pass,
        grammar: &str,
        options: &CompilerOptions,
    ) -> Result<Grammar, GrammarError> {
        pass.run(parse_grammar(grammar).unwrap(), options)
    }
}
