use crate::affine::{fmt_real, Affine};
use crate::atom::Atom;
use crate::parser::ParseResult;

/// Renders one parsed clause the way it is shown after `Answer: `.
/// Expressions print their value; equations print their solution.
///
/// # Example
/// ```
/// use affine_calc::answer::format_result;
/// use affine_calc::parse_line;
///
/// let results = parse_line("2*x = 4, 1 + y").unwrap();
///
/// assert_eq!(format_result(&results[0]), "x = 2");
/// assert_eq!(format_result(&results[1]), "y + 1");
/// ```
pub fn format_result<T: Atom>(result: &ParseResult<T>) -> String
{
    if result.is_equation
    {
        result.atom.describe_equation()
    }
    else
    {
        result.atom.describe()
    }
}

/// Describes the equation `atom = 0`:
///
/// * no variable with a nonzero coefficient: `True.` or `Not true.`
/// * exactly one: its value, `x = 2`
/// * more than one: the normal form, `x + y - 3 = 0`
///
/// Variables that cancelled out to a zero coefficient are listed after
/// the answer as holding for any value.
pub fn describe_equation(atom: &Affine) -> String
{
    let fixed: Vec<(&str, f64)> = atom.fixed_variables().collect();
    let free: Vec<&str> = atom.free_variables().collect();
    let d = atom.constant;

    let mut answer = match fixed.as_slice()
    {
        [] if d == 0.0 => "True.".to_owned(),
        [] => "Not true.".to_owned(),
        [(name, c)] => format!("{name} = {}", fmt_real(-d / c)),
        _ => format!("{atom} = 0"),
    };

    if !free.is_empty()
    {
        answer += &format!("    This holds for any {}.", free.join(","));
    }
    answer
}

#[test]
fn test_tautology_with_free_variable()
{
    let atom = Affine::variable("x") - Affine::variable("x");
    assert_eq!(describe_equation(&atom), "True.    This holds for any x.");
}

#[test]
fn test_contradiction()
{
    assert_eq!(describe_equation(&Affine::constant(1.0)), "Not true.");
    assert_eq!(describe_equation(&Affine::constant(0.0)), "True.");
}

#[test]
fn test_single_fixed_variable()
{
    let atom = Affine::term(2.0, "x") - Affine::constant(4.0);
    assert_eq!(describe_equation(&atom), "x = 2");

    // 2*x = 0 solves to 0, not -0
    assert_eq!(describe_equation(&Affine::term(2.0, "x")), "x = 0");
}

#[test]
fn test_several_fixed_variables()
{
    let atom = Affine::variable("x") + Affine::variable("y") - Affine::constant(3.0);
    assert_eq!(describe_equation(&atom), "x + y - 3 = 0");
}

#[test]
fn test_free_variables_listed_in_order()
{
    let atom = Affine::variable("b") - Affine::variable("b")
        + Affine::variable("a") - Affine::variable("a")
        + Affine::term(4.0, "y") - Affine::constant(2.0);
    assert_eq!(describe_equation(&atom), "y = 0.5    This holds for any a,b.");
}

#[test]
fn test_format_expression()
{
    let expr = ParseResult { atom: Affine::term(-1.0, "z") + Affine::constant(2.0), is_equation: false };
    assert_eq!(format_result(&expr), "-z + 2");

    let numeric = ParseResult { atom: 30.0_f64, is_equation: false };
    assert_eq!(format_result(&numeric), "30");
}
