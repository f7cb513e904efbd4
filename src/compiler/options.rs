use super::Plugin;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Options consumed by the [compiler](super::compile)
///
/// Options can be loaded from JSON documents using the camelCase names
/// (`allowedStartRules`, `exportVar`, ...), every field being optional.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Rules the parser may be started from. Defaults to the grammar's first rule.
    pub allowed_start_rules: Vec<String>,

    /// Memoize rule results per input offset during a parse
    pub cache: bool,

    /// External modules required by the host code, passed through to the source artifact
    pub dependencies: BTreeMap<String, String>,

    /// Name of the variable the parser is exported as, passed through to the source artifact
    pub export_var: Option<String>,

    /// Module convention of the source artifact
    pub format: Format,

    pub optimize: Optimize,

    pub output: Output,

    /// Extensions contributing passes, applied by [`crate::generate`]
    #[serde(skip)]
    pub plugins: Vec<Arc<dyn Plugin + Send + Sync>>,

    /// Make parsers report rule entries and exits to a [tracer](crate::runtime::Tracer)
    pub trace: bool,
}

impl CompilerOptions {
    /// Create the default set of options
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_start_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_start_rules = rules.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_optimize(mut self, optimize: Optimize) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    pub fn with_plugin(mut self, plugin: impl Plugin + Send + Sync + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Get the allowed start rules, without duplicates, falling back to the given first rule
    pub fn start_rules<'a>(&'a self, first_rule: Option<&'a str>) -> Vec<&'a str> {
        if self.allowed_start_rules.is_empty() {
            return first_rule.into_iter().collect();
        }

        let mut rules: Vec<&str> = vec![];

        for rule in &self.allowed_start_rules {
            if !rules.contains(&rule.as_str()) {
                rules.push(rule);
            }
        }

        rules
    }
}

impl fmt::Debug for CompilerOptions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CompilerOptions")
            .field("allowed_start_rules", &self.allowed_start_rules)
            .field("cache", &self.cache)
            .field("dependencies", &self.dependencies)
            .field("export_var", &self.export_var)
            .field("format", &self.format)
            .field("optimize", &self.optimize)
            .field("output", &self.output)
            .field("plugins", &self.plugins.len())
            .field("trace", &self.trace)
            .finish()
    }
}

/// Module convention of a source artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Amd,
    #[default]
    Bare,
    Commonjs,
    Es,
    Globals,
    Umd,
}

/// Optimization hint. Never changes what a parser matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Optimize {
    #[default]
    Speed,
    Size,
}

/// Kind of [artifact](super::Artifact) produced by the compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    #[default]
    Parser,
    Source,
}
