use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// More concise syntax for implementing `Error` and `Display` for enums
/// with one fixed message per variant
macro_rules! impl_err {
    ($s:ty, $($p:path, $e:expr),*) => {
        impl Error for $s {}
        impl Display for $s {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                match self {
                    $($p => write!(f, $e),)*
                }
            }
        }
    };
}

/// Raised by value-level arithmetic when the result cannot be represented
/// by the value type in use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AffineError {
    OrderTooHigh,
    PolynomialFraction,
    DivisionByZero,
    LogOfPolynomial,
    PowerOfPolynomial,
    PolynomialExponent,
    VariablesUnsupported,
}
impl_err! {
    AffineError,
    AffineError::OrderTooHigh, "polynomial of order > 1 not allowed",
    AffineError::PolynomialFraction, "polynomial fraction not allowed",
    AffineError::DivisionByZero, "division by zero",
    AffineError::LogOfPolynomial, "log of polynomial not allowed",
    AffineError::PowerOfPolynomial, "power of polynomial not allowed",
    AffineError::PolynomialExponent, "polynomial exponent not allowed",
    AffineError::VariablesUnsupported, "backend can't handle variables"
}

/// Structural grammar violations found by the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxError {
    MissingOperand,
    MissingLeftParenthesis,
    MissingRightParenthesis,
    UnexpectedInput,
    InvalidNumber,
    UnterminatedTokens,
    NestingTooDeep,
}
impl_err! {
    SyntaxError,
    SyntaxError::MissingOperand, "missing operand",
    SyntaxError::MissingLeftParenthesis, "missing left parenthesis",
    SyntaxError::MissingRightParenthesis, "missing right parenthesis",
    SyntaxError::UnexpectedInput, "unexpected input",
    SyntaxError::InvalidNumber, "invalid number",
    SyntaxError::UnterminatedTokens, "token stream is not terminated",
    SyntaxError::NestingTooDeep, "expression nested too deeply"
}

/// A failure to parse one input line, pinned to the character offset of
/// the token that caused it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError
{
    pub message: String,
    pub position: usize,
}

impl ParseError
{
    /// Builds a `ParseError` from any displayable error at `position`.
    ///
    /// # Example
    /// ```
    /// use affine_calc::errors::{ParseError, SyntaxError};
    ///
    /// let err = ParseError::at(SyntaxError::MissingOperand, 3);
    ///
    /// assert_eq!(err.message, "missing operand");
    /// assert_eq!(err.position, 3);
    /// ```
    pub fn at(err: impl Display, position: usize) -> ParseError
    {
        ParseError
        {
            message: err.to_string(),
            position,
        }
    }

    /// Keeps the message but moves the error to `position`.
    pub fn moved_to(self, position: usize) -> ParseError
    {
        ParseError
        {
            message: self.message,
            position,
        }
    }
}

impl Error for ParseError {}
impl Display for ParseError
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        write!(f, "{}", self.message)
    }
}

#[test]
fn test_error_messages()
{
    assert_eq!(AffineError::OrderTooHigh.to_string(), "polynomial of order > 1 not allowed");
    assert_eq!(AffineError::VariablesUnsupported.to_string(), "backend can't handle variables");
    assert_eq!(SyntaxError::MissingRightParenthesis.to_string(), "missing right parenthesis");
}

#[test]
fn test_parse_error_keeps_message_when_moved()
{
    let err = ParseError::at(AffineError::DivisionByZero, 7).moved_to(2);

    assert_eq!(err.message, "division by zero");
    assert_eq!(err.position, 2);
    assert_eq!(err.to_string(), "division by zero");
}
