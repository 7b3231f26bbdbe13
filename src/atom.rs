use std::fmt::Debug;

use crate::affine::{fmt_real, Affine};
use crate::answer::describe_equation;
use crate::errors::AffineError;

/// The value type a line is evaluated into. The parser only ever talks to
/// values through this trait, so the same grammar runs over plain reals
/// (which reject variables) and over affine polynomials.
pub trait Atom: Clone + Debug + Sized
{
    fn from_number(value: f64) -> Self;

    /// Value of a bare identifier.
    fn from_identifier(name: &str) -> Result<Self, AffineError>;

    fn plus(&self, rhs: &Self) -> Result<Self, AffineError>;
    fn minus(&self, rhs: &Self) -> Result<Self, AffineError>;
    fn times(&self, rhs: &Self) -> Result<Self, AffineError>;
    fn over(&self, rhs: &Self) -> Result<Self, AffineError>;
    fn negated(&self) -> Result<Self, AffineError>;
    fn natural_log(&self) -> Result<Self, AffineError>;
    fn raised_to(&self, exponent: &Self) -> Result<Self, AffineError>;

    /// Renders the value itself as an answer.
    fn describe(&self) -> String;

    /// Renders the statement `self = 0` as an answer.
    fn describe_equation(&self) -> String;
}

impl Atom for Affine
{
    fn from_number(value: f64) -> Self
    {
        Affine::constant(value)
    }

    fn from_identifier(name: &str) -> Result<Self, AffineError>
    {
        Ok(Affine::variable(name))
    }

    fn plus(&self, rhs: &Self) -> Result<Self, AffineError>
    {
        Ok(self + rhs)
    }

    fn minus(&self, rhs: &Self) -> Result<Self, AffineError>
    {
        Ok(self - rhs)
    }

    fn times(&self, rhs: &Self) -> Result<Self, AffineError>
    {
        self.try_mul(rhs)
    }

    fn over(&self, rhs: &Self) -> Result<Self, AffineError>
    {
        self.try_div(rhs)
    }

    fn negated(&self) -> Result<Self, AffineError>
    {
        Ok(-self.clone())
    }

    fn natural_log(&self) -> Result<Self, AffineError>
    {
        self.ln()
    }

    fn raised_to(&self, exponent: &Self) -> Result<Self, AffineError>
    {
        self.pow(exponent)
    }

    fn describe(&self) -> String
    {
        self.to_string()
    }

    fn describe_equation(&self) -> String
    {
        describe_equation(self)
    }
}

/// Strict numeric mode: plain reals, no variables.
impl Atom for f64
{
    fn from_number(value: f64) -> Self
    {
        value
    }

    fn from_identifier(_name: &str) -> Result<Self, AffineError>
    {
        Err(AffineError::VariablesUnsupported)
    }

    fn plus(&self, rhs: &Self) -> Result<Self, AffineError>
    {
        Ok(self + rhs)
    }

    fn minus(&self, rhs: &Self) -> Result<Self, AffineError>
    {
        Ok(self - rhs)
    }

    fn times(&self, rhs: &Self) -> Result<Self, AffineError>
    {
        Ok(self * rhs)
    }

    fn over(&self, rhs: &Self) -> Result<Self, AffineError>
    {
        if *rhs == 0.0
        {
            return Err(AffineError::DivisionByZero);
        }
        Ok(self / rhs)
    }

    fn negated(&self) -> Result<Self, AffineError>
    {
        Ok(-self)
    }

    fn natural_log(&self) -> Result<Self, AffineError>
    {
        Ok(f64::ln(*self))
    }

    fn raised_to(&self, exponent: &Self) -> Result<Self, AffineError>
    {
        Ok(f64::powf(*self, *exponent))
    }

    fn describe(&self) -> String
    {
        fmt_real(*self)
    }

    fn describe_equation(&self) -> String
    {
        let answer = if *self == 0.0 { "True." } else { "Not true." };
        answer.to_owned()
    }
}

#[test]
fn test_numeric_backend_rejects_variables()
{
    assert_eq!(<f64 as Atom>::from_identifier("x"), Err(AffineError::VariablesUnsupported));
    assert_eq!(<f64 as Atom>::over(&1.0, &0.0), Err(AffineError::DivisionByZero));
    assert_eq!(<f64 as Atom>::raised_to(&2.0, &3.0), Ok(8.0));
}

#[test]
fn test_numeric_equations()
{
    assert_eq!(0.0_f64.describe_equation(), "True.");
    assert_eq!(1.5_f64.describe_equation(), "Not true.");
    assert_eq!((-0.0_f64).describe(), "0");
}

#[test]
fn test_affine_backend_accepts_variables()
{
    let x = <Affine as Atom>::from_identifier("x").unwrap();
    let two = Affine::from_number(2.0);

    assert_eq!(x.times(&two).unwrap(), Affine::term(2.0, "x"));
    assert_eq!(x.times(&x), Err(AffineError::OrderTooHigh));
    assert_eq!(x.natural_log(), Err(AffineError::LogOfPolynomial));
}
