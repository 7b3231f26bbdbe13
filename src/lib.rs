/// Contains the `Affine` type for linear combinations of named variables plus a constant.
pub mod affine;
/// Contains the Result Formatter that turns parsed clauses into answers.
pub mod answer;
/// Contains the `Atom` trait that lets the parser evaluate into different value types.
pub mod atom;
/// Contains error types for different errors that this crate may throw.
pub mod errors;
/// Contains the tokenizer for single input lines.
pub mod lexer;
/// Contains a recursive-descent parser that evaluates clauses as it goes.
pub mod parser;

use tracing::debug;

use affine::Affine;
use answer::format_result;
use atom::Atom;
use errors::ParseError;
use lexer::tokenize;
use parser::{parse, ParseResult};

/// Tokenizes and parses a line into values of type `T`. Use `f64` for
/// strict numeric evaluation, where identifiers are rejected.
///
/// # Example
/// ```
/// use affine_calc::parse_line_with;
///
/// let results = parse_line_with::<f64>("(3+(4-1))*5").unwrap();
/// assert_eq!(results[0].atom, 30.0);
///
/// let err = parse_line_with::<f64>("2*x").unwrap_err();
/// assert_eq!(err.message, "backend can't handle variables");
/// assert_eq!(err.position, 2);
/// ```
pub fn parse_line_with<T: Atom>(line: &str) -> Result<Vec<ParseResult<T>>, ParseError>
{
    let tokens = tokenize(line);
    debug!(tokens = tokens.len(), "tokenized line");

    match parse(&tokens)
    {
        Ok(results) => {
            debug!(clauses = results.len(), "parsed line");
            Ok(results)
        },
        Err(e) => {
            debug!(message = %e.message, position = e.position, "failed to parse line");
            Err(e)
        },
    }
}

/// Tokenizes and parses a line into affine values, one per comma-separated
/// clause.
///
/// # Example
/// ```
/// use affine_calc::parse_line;
/// use affine_calc::affine::Affine;
///
/// let results = parse_line("2*x+0.5=1").unwrap();
///
/// assert!(results[0].is_equation);
/// assert_eq!(results[0].atom, Affine::term(2.0, "x") - Affine::constant(0.5));
/// ```
pub fn parse_line(line: &str) -> Result<Vec<ParseResult<Affine>>, ParseError>
{
    parse_line_with(line)
}

/// Evaluates a line and renders every clause as an answer. On failure the
/// returned error wraps a `ParseError`, recoverable with `downcast_ref`.
///
/// # Example
/// ```
/// use affine_calc::answer_line_with;
///
/// let answers = answer_line_with::<f64>("1 + 1 = 2, 2^10").unwrap();
///
/// assert_eq!(answers, vec!["True.", "1024"]);
/// ```
pub fn answer_line_with<T: Atom>(line: &str) -> anyhow::Result<Vec<String>>
{
    let results = parse_line_with::<T>(line)?;
    Ok(results.iter().map(format_result).collect())
}

/// Evaluates a line over affine values and renders every clause as an answer.
///
/// # Example
/// ```
/// use affine_calc::answer_line;
///
/// let answers = answer_line("x - x = 0, 2*x = 4").unwrap();
///
/// assert_eq!(answers, vec!["True.    This holds for any x.", "x = 2"]);
/// ```
pub fn answer_line(line: &str) -> anyhow::Result<Vec<String>>
{
    answer_line_with::<Affine>(line)
}
