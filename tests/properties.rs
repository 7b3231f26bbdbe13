use proptest::prelude::*;

use affine_calc::affine::Affine;
use affine_calc::errors::AffineError;
use affine_calc::lexer::{tokenize, Token, TokenKind};

fn small_real() -> impl Strategy<Value = f64>
{
    // integers keep the additive laws exact in floating point
    (-1000i32..1000).prop_map(f64::from)
}

fn affine_value() -> impl Strategy<Value = Affine>
{
    (
        proptest::collection::btree_map("[a-d]", small_real(), 0..4),
        small_real(),
    )
        .prop_map(|(terms, constant)| Affine { terms, constant })
}

fn non_constant() -> impl Strategy<Value = Affine>
{
    (affine_value(), "[a-d]", 1i32..100).prop_map(|(mut a, name, c)| {
        a.terms.insert(name, f64::from(c));
        a
    })
}

proptest! {
    #[test]
    fn plain_numerals_are_one_token(int in 0u32..1_000_000, frac in 0u32..1_000_000)
    {
        let text = format!("{int}.{frac}");
        prop_assert_eq!(
            tokenize(&text),
            vec![
                Token::new(TokenKind::Number, &text, 0),
                Token::new(TokenKind::EndOfInput, "", text.len()),
            ]
        );
    }

    #[test]
    fn addition_commutes(a in affine_value(), b in affine_value())
    {
        prop_assert_eq!(&a + &b, &b + &a);
    }

    #[test]
    fn addition_associates(a in affine_value(), b in affine_value(), c in affine_value())
    {
        prop_assert_eq!(&(&a + &b) + &c, &a + &(&b + &c));
    }

    #[test]
    fn difference_with_self_is_zero(a in affine_value())
    {
        prop_assert_eq!(&a - &a, Affine::constant(0.0));
    }

    #[test]
    fn nonzero_constant_divides_to_one(d in small_real())
    {
        prop_assume!(d != 0.0);
        let a = Affine::constant(d);
        prop_assert_eq!(a.try_div(&a), Ok(Affine::constant(1.0)));
    }

    #[test]
    fn product_of_non_constants_fails(a in non_constant(), b in non_constant())
    {
        prop_assert_eq!(a.try_mul(&b), Err(AffineError::OrderTooHigh));
        prop_assert_eq!(Affine::constant(1.0).try_div(&b), Err(AffineError::PolynomialFraction));
    }

    #[test]
    fn triple_product_with_two_variables_fails(a in non_constant(), b in non_constant(), c in small_real())
    {
        let c = Affine::constant(c);
        let ab = a.try_mul(&b);
        prop_assert!(ab.is_err());
        let ac_b = a.try_mul(&c).and_then(|ac| ac.try_mul(&b));
        prop_assume!(c.constant != 0.0);
        prop_assert_eq!(ac_b, Err(AffineError::OrderTooHigh));
    }

    #[test]
    fn division_by_zero_constant_fails(a in affine_value())
    {
        prop_assert_eq!(a.try_div(&Affine::constant(0.0)), Err(AffineError::DivisionByZero));
    }
}
