#![allow(dead_code)]

use pegc::compiler::CompilerOptions;
use pegc::runtime::{CodeContext, CodeError, Host, ParseError, Parser, SyntaxError, Value};
use std::fmt::Debug;

/// Compile a grammar with the default options, panicking on errors
pub fn compile(grammar: &str) -> Parser {
    compile_with(grammar, CompilerOptions::new())
}

pub fn compile_with(grammar: &str, options: CompilerOptions) -> Parser {
    pegc::generate_parser(grammar, options)
        .unwrap_or_else(|err| panic!("{}", err.pretty(grammar)))
}

/// Get the syntax error of a failed parse
pub fn syntax_error<T: Debug, E: Debug>(result: Result<T, ParseError<E>>) -> SyntaxError {
    match result {
        Err(ParseError::Syntax(err)) => err,
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

/// Deterministic host, code blocks being keywords
///
/// Actions:
/// * `fail` raises a host error, `message` and `expected` raise syntax errors
/// * `labels` lists the labels in scope
/// * anything else is recorded along with its offset, and returns the matched text
///
/// Predicates: `true`, `false`, `fail`, or the name of a label which must be in scope.
#[derive(Debug, Default)]
pub struct TestHost {
    pub calls: Vec<String>,
    pub initialized: usize,
}

impl Host for TestHost {
    type Value = String;
    type Error = String;

    fn initialize(
        &mut self,
        _: &str,
        _: &CodeContext<'_, Self::Value>,
    ) -> Result<(), CodeError<Self::Error>> {
        self.initialized += 1;
        Ok(())
    }

    fn action(
        &mut self,
        code: &str,
        ctx: &CodeContext<'_, Self::Value>,
    ) -> Result<Value<Self::Value>, CodeError<Self::Error>> {
        match code {
            "fail" => Err(CodeError::Host("boom".to_string())),
            "message" => Err(ctx.error("custom failure")),
            "expected" => Err(ctx.expected("a number")),
            "labels" => Ok(Value::Host(
                ctx.labels()
                    .map(|(label, value)| format!("{}={}", label, value.concat()))
                    .collect::<Vec<_>>()
                    .join(","),
            )),
            _ => {
                self.calls.push(format!("{}@{}", code, ctx.offset()));
                Ok(Value::Host(ctx.text().to_string()))
            }
        }
    }

    fn predicate(
        &mut self,
        code: &str,
        ctx: &CodeContext<'_, Self::Value>,
    ) -> Result<bool, CodeError<Self::Error>> {
        match code {
            "true" => Ok(true),
            "false" => Ok(false),
            "fail" => Err(CodeError::Host("boom".to_string())),
            label => Ok(ctx.label(label).is_some()),
        }
    }
}
