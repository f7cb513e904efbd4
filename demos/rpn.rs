//! This file demonstrates how to make a simple Reverse Polish Notation (RPN) evaluator using pegc
//!
//! Actions are evaluated by a host computing floating-point numbers.

use log::LevelFilter;
use pegc::compiler::CompilerOptions;
use pegc::runtime::{CodeContext, CodeError, Host, ParseError, Value};
use std::time::Instant;

static RPN_GRAMMAR: &str = r#"
main      = _ e:expr _ { inner }

expr      = operation / operand
operation = left:operand _ right:operand _ op:operator { apply }
operand   = number / "(" _ e:expr _ ")" { inner }

number "number" = [0-9]+ ([.,] [0-9]+)? { number }
operator  = [+\-*/]

_ "whitespace" = [ \t]*
"#;

static TEST_SUBJECT: &str = r"(3 (9.3 3 /) +) (5 (2 3 /) /) /";

/// Host evaluating the grammar's actions
struct Calculator;

impl Calculator {
    fn operand(ctx: &CodeContext<'_, f64>, label: &str) -> Result<f64, CodeError<String>> {
        ctx.label(label)
            .and_then(Value::as_host)
            .copied()
            .ok_or_else(|| CodeError::Host(format!("label '{}' is not a number", label)))
    }
}

impl Host for Calculator {
    type Value = f64;
    type Error = String;

    fn action(
        &mut self,
        code: &str,
        ctx: &CodeContext<'_, f64>,
    ) -> Result<Value<f64>, CodeError<String>> {
        let result = match code {
            "inner" => Self::operand(ctx, "e")?,

            "number" => ctx
                .text()
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|err| ctx.error(format!("invalid number: {}", err)))?,

            "apply" => {
                let left = Self::operand(ctx, "left")?;
                let right = Self::operand(ctx, "right")?;

                match ctx.label("op").and_then(Value::as_str) {
                    Some("+") => left + right,
                    Some("-") => left - right,
                    Some("*") => left * right,
                    Some("/") if right == 0.0 => return Err(ctx.error("division by zero")),
                    Some("/") => left / right,
                    _ => return Err(CodeError::Host("unknown operator".to_string())),
                }
            }

            _ => return Err(CodeError::Host(format!("unknown action: {}", code))),
        };

        Ok(Value::Host(result))
    }

    fn predicate(&mut self, code: &str, _: &CodeContext<'_, f64>) -> Result<bool, CodeError<String>> {
        Err(CodeError::Host(format!("unknown predicate: {}", code)))
    }
}

fn main() {
    simplelog::TermLogger::init(
        LevelFilter::Debug,
        simplelog::ConfigBuilder::new()
            .set_time_level(LevelFilter::Off)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    )
    .unwrap();

    // Measure performances
    let now = Instant::now();

    // Compile the grammar
    let parser = pegc::generate_parser(RPN_GRAMMAR, CompilerOptions::new().with_cache(true))
        .unwrap_or_else(|err| {
            eprintln!("{}", err.pretty(RPN_GRAMMAR));
            panic!("Failed to compile RPN grammar");
        });

    let elapsed = now.elapsed();

    println!(
        "Grammar in: {}.{:#003} ms{}",
        elapsed.as_millis(),
        elapsed.subsec_micros(),
        if cfg!(debug_assertions) {
            " [WARNING: debug mode heavily impacts performances]"
        } else {
            ""
        }
    );

    let now = Instant::now();

    // Evaluate the expression
    let result = match parser.parse(TEST_SUBJECT, &mut Calculator) {
        Ok(value) => value.into_host().unwrap(),
        Err(ParseError::Syntax(err)) => {
            eprintln!("{}", err.pretty(TEST_SUBJECT));
            panic!("Failed to match RPN grammar against a RPN expression");
        }
        Err(err) => panic!("Failed to evaluate RPN expression: {}", err),
    };

    let elapsed = now.elapsed();

    println!("Expression: {}", TEST_SUBJECT);

    println!(
        "Parse time: {}.{:#003} ms{}",
        elapsed.as_millis(),
        elapsed.subsec_micros(),
        if cfg!(debug_assertions) {
            " [WARNING: debug mode heavily impacts performances]"
        } else {
            ""
        }
    );

    println!("Result    : {}", result);

    // Ensure the result is correct
    assert!((result - 0.8133333333333332).abs() < 1e-9);
}
