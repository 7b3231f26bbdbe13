use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use crate::errors::AffineError;

/// An affine polynomial `c1*v1 + c2*v2 + ... + d` over named variables.
///
/// A term whose coefficient is exactly 0 counts as absent everywhere except
/// in `free_variables`, which reports names that were mentioned and then
/// cancelled out.
#[derive(Clone, Debug, Default)]
pub struct Affine
{
    pub terms: BTreeMap<String, f64>,
    pub constant: f64,
}

/// Formats a real for display, folding `-0` into `0`.
pub(crate) fn fmt_real(value: f64) -> String
{
    if value == 0.0
    {
        return "0".to_owned();
    }
    value.to_string()
}

impl Affine
{
    /// A value with no variable terms.
    pub fn constant(d: f64) -> Affine
    {
        Affine
        {
            terms: BTreeMap::new(),
            constant: d,
        }
    }

    /// A single variable term `coefficient*name`.
    pub fn term(coefficient: f64, name: &str) -> Affine
    {
        Affine
        {
            terms: BTreeMap::from([(name.to_owned(), coefficient)]),
            constant: 0.0,
        }
    }

    /// The bare variable `name`.
    pub fn variable(name: &str) -> Affine
    {
        Affine::term(1.0, name)
    }

    /// Whether every variable term has a zero coefficient.
    pub fn is_constant(&self) -> bool
    {
        self.terms.values().all(|&c| c == 0.0)
    }

    /// Coefficient of `name`, 0 if it is absent.
    pub fn coefficient(&self, name: &str) -> f64
    {
        self.terms.get(name).copied().unwrap_or(0.0)
    }

    /// Variables with a nonzero coefficient, in name order.
    pub fn fixed_variables(&self) -> impl Iterator<Item = (&str, f64)>
    {
        self.terms
            .iter()
            .filter(|&(_, &c)| c != 0.0)
            .map(|(name, &c)| (name.as_str(), c))
    }

    /// Variables that are present with a zero coefficient, in name order.
    pub fn free_variables(&self) -> impl Iterator<Item = &str>
    {
        self.terms
            .iter()
            .filter(|&(_, &c)| c == 0.0)
            .map(|(name, _)| name.as_str())
    }

    fn scaled(&self, factor: f64) -> Affine
    {
        Affine
        {
            terms: self.terms
                .iter()
                .map(|(name, &c)| (name.clone(), c * factor))
                .collect(),
            constant: self.constant * factor,
        }
    }

    /// Multiplies two values, as long as at least one of them is constant.
    ///
    /// # Example
    /// ```
    /// use affine_calc::affine::Affine;
    /// use affine_calc::errors::AffineError;
    ///
    /// let x = Affine::variable("x");
    ///
    /// assert_eq!(x.try_mul(&Affine::constant(3.0)).unwrap(), Affine::term(3.0, "x"));
    /// assert_eq!(x.try_mul(&Affine::variable("y")).unwrap_err(), AffineError::OrderTooHigh);
    /// ```
    pub fn try_mul(&self, rhs: &Affine) -> Result<Affine, AffineError>
    {
        if self.is_constant()
        {
            Ok(rhs.scaled(self.constant))
        }
        else if rhs.is_constant()
        {
            Ok(self.scaled(rhs.constant))
        }
        else
        {
            Err(AffineError::OrderTooHigh)
        }
    }

    /// Divides by a nonzero constant.
    pub fn try_div(&self, rhs: &Affine) -> Result<Affine, AffineError>
    {
        if !rhs.is_constant()
        {
            return Err(AffineError::PolynomialFraction);
        }
        if rhs.constant == 0.0
        {
            return Err(AffineError::DivisionByZero);
        }
        Ok(self.scaled(1.0 / rhs.constant))
    }

    /// Natural logarithm of a constant value.
    pub fn ln(&self) -> Result<Affine, AffineError>
    {
        if !self.is_constant()
        {
            return Err(AffineError::LogOfPolynomial);
        }
        Ok(Affine::constant(self.constant.ln()))
    }

    /// Raises a constant value to a constant exponent.
    pub fn pow(&self, exponent: &Affine) -> Result<Affine, AffineError>
    {
        if !exponent.is_constant()
        {
            return Err(AffineError::PolynomialExponent);
        }
        if !self.is_constant()
        {
            return Err(AffineError::PowerOfPolynomial);
        }
        Ok(Affine::constant(self.constant.powf(exponent.constant)))
    }
}

impl From<f64> for Affine
{
    fn from(value: f64) -> Self
    {
        Affine::constant(value)
    }
}

impl Add for &Affine
{
    type Output = Affine;

    fn add(self, rhs: &Affine) -> Affine
    {
        let mut res = self.clone();
        res.constant += rhs.constant;
        for (name, c) in &rhs.terms
        {
            *res.terms.entry(name.clone()).or_insert(0.0) += c;
        }
        res
    }
}

impl Sub for &Affine
{
    type Output = Affine;

    fn sub(self, rhs: &Affine) -> Affine
    {
        let mut res = self.clone();
        res.constant -= rhs.constant;
        for (name, c) in &rhs.terms
        {
            *res.terms.entry(name.clone()).or_insert(0.0) -= c;
        }
        res
    }
}

impl Add for Affine
{
    type Output = Affine;

    fn add(self, rhs: Affine) -> Affine
    {
        &self + &rhs
    }
}

impl Sub for Affine
{
    type Output = Affine;

    fn sub(self, rhs: Affine) -> Affine
    {
        &self - &rhs
    }
}

impl Neg for Affine
{
    type Output = Affine;

    fn neg(self) -> Affine
    {
        &Affine::constant(0.0) - &self
    }
}

impl PartialEq for Affine
{
    fn eq(&self, other: &Self) -> bool
    {
        let diff = self - other;
        diff.is_constant() && diff.constant == 0.0
    }
}

impl fmt::Display for Affine
{
    /// Renders terms in name order, then the constant. The constant is
    /// dropped when it is 0 and some term was already written.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        let mut is_first = true;
        for (name, c) in self.fixed_variables()
        {
            let shown = if is_first { c } else { c.abs() };
            if !is_first
            {
                write!(f, "{}", if c < 0.0 { " - " } else { " + " })?;
            }

            if shown == 1.0
            {
                write!(f, "{name}")?;
            }
            else if shown == -1.0
            {
                write!(f, "-{name}")?;
            }
            else
            {
                write!(f, "{}*{name}", fmt_real(shown))?;
            }
            is_first = false;
        }

        let d = self.constant;
        if is_first
        {
            write!(f, "{}", fmt_real(d))?;
        }
        else if d != 0.0
        {
            write!(f, "{}{}", if d < 0.0 { " - " } else { " + " }, fmt_real(d.abs()))?;
        }
        Ok(())
    }
}

#[test]
fn test_construct()
{
    let a = Affine::constant(5.0);
    assert_eq!(a.constant, 5.0);
    assert!(a.terms.is_empty());

    let x = Affine::term(7.0, "x");
    assert_eq!(x.constant, 0.0);
    assert_eq!(x.coefficient("x"), 7.0);
    assert_eq!(x.coefficient("y"), 0.0);
}

#[test]
fn test_add_sub()
{
    let r = Affine::term(3.0, "x") + Affine::constant(4.0);
    assert_eq!(r.coefficient("x"), 3.0);
    assert_eq!(r.constant, 4.0);

    let r = Affine::term(8.0, "z") - Affine::constant(1.0);
    assert_eq!(r.coefficient("z"), 8.0);
    assert_eq!(r.constant, -1.0);

    let r = -Affine::term(2.0, "y");
    assert_eq!(r.coefficient("y"), -2.0);
}

#[test]
fn test_mul_div()
{
    let r = Affine::term(8.0, "y").try_mul(&Affine::constant(7.0)).unwrap();
    assert_eq!(r.coefficient("y"), 56.0);
    assert_eq!(r.constant, 0.0);

    let r = Affine::term(8.0, "y").try_div(&Affine::constant(4.0)).unwrap();
    assert_eq!(r.coefficient("y"), 2.0);

    assert_eq!(
        Affine::variable("x").try_div(&Affine::constant(0.0)),
        Err(AffineError::DivisionByZero)
    );
    assert_eq!(
        Affine::constant(1.0).try_div(&(Affine::variable("x") + Affine::constant(2.0))),
        Err(AffineError::PolynomialFraction)
    );
}

#[test]
fn test_cancelled_terms_count_as_constant()
{
    let zero_x = Affine::variable("x") - Affine::variable("x");
    assert!(zero_x.is_constant());

    // x - x carries no degree, so it can multiply a variable
    let r = zero_x.try_mul(&Affine::variable("y")).unwrap();
    assert_eq!(r, Affine::constant(0.0));
    assert_eq!(zero_x.free_variables().collect::<Vec<_>>(), vec!["x"]);
}

#[test]
fn test_ln_and_pow()
{
    assert_eq!(Affine::constant(1.0).ln().unwrap(), Affine::constant(0.0));
    assert_eq!(Affine::variable("x").ln(), Err(AffineError::LogOfPolynomial));

    assert_eq!(Affine::constant(2.0).pow(&Affine::constant(10.0)).unwrap(), Affine::constant(1024.0));
    assert_eq!(Affine::variable("x").pow(&Affine::constant(2.0)), Err(AffineError::PowerOfPolynomial));
    assert_eq!(Affine::variable("x").pow(&Affine::variable("y")), Err(AffineError::PolynomialExponent));
}

#[test]
fn test_display()
{
    assert_eq!(Affine::constant(0.0).to_string(), "0");
    assert_eq!(Affine::constant(-2.5).to_string(), "-2.5");
    assert_eq!(Affine::variable("x").to_string(), "x");
    assert_eq!(Affine::term(-1.0, "x").to_string(), "-x");

    let a = Affine::term(2.0, "y") - Affine::variable("x") + Affine::constant(-0.5);
    assert_eq!(a.to_string(), "-x + 2*y - 0.5");

    let b = Affine::term(3.0, "a") - Affine::variable("b") - Affine::term(2.0, "c") + Affine::constant(4.0);
    assert_eq!(b.to_string(), "3*a - b - 2*c + 4");

    // cancelled terms are not printed
    let c = Affine::variable("x") - Affine::variable("x") + Affine::variable("y");
    assert_eq!(c.to_string(), "y");
    assert_eq!((-Affine::constant(0.0)).to_string(), "0");
}
