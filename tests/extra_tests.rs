use float_cmp::approx_eq;

use affine_calc::affine::Affine;
use affine_calc::answer::format_result;
use affine_calc::errors::ParseError;
use affine_calc::{answer_line, answer_line_with, parse_line, parse_line_with};

#[test]
fn test_equation_from_source_line()
{
    let results = parse_line("  2 * x + 0.5 = 1  ").unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].is_equation);
    assert_eq!(results[0].atom, Affine::term(2.0, "x") - Affine::constant(0.5));
}

#[test]
fn test_nested_parentheses()
{
    let results = parse_line("(3+(4-1))*5").unwrap();

    assert!(!results[0].is_equation);
    assert_eq!(results[0].atom, Affine::constant(30.0));
}

#[test]
fn test_answers()
{
    assert_eq!(answer_line("x - x = 0").unwrap(), vec!["True.    This holds for any x."]);
    assert_eq!(answer_line("2*x = 4").unwrap(), vec!["x = 2"]);
    assert_eq!(answer_line("1 = 2").unwrap(), vec!["Not true."]);
    assert_eq!(answer_line("x + 2*y = 3 - y").unwrap(), vec!["x + 3*y - 3 = 0"]);
    assert_eq!(answer_line("3*(x + 1) - x/2").unwrap(), vec!["2.5*x + 3"]);
    assert_eq!(answer_line("").unwrap(), Vec::<String>::new());
}

#[test]
fn test_free_variable_must_be_mentioned()
{
    // y never appears, so only the cancelled x is reported
    assert_eq!(answer_line("x + 1 = x + 1").unwrap(), vec!["True.    This holds for any x."]);
    assert_eq!(answer_line("z + x = x + 2").unwrap(), vec!["z = 2    This holds for any x."]);
    assert_eq!(answer_line("x + 1 = x + 2").unwrap(), vec!["Not true.    This holds for any x."]);
}

#[test]
fn test_solution_value()
{
    let results = parse_line("3*t - 1 = 0").unwrap();
    let atom = &results[0].atom;
    let c = atom.coefficient("t");

    assert!(approx_eq!(f64, -atom.constant / c, 1.0 / 3.0, ulps = 2));
    assert_eq!(format_result(&results[0]), format!("t = {}", 1.0_f64 / 3.0));
}

#[test]
fn test_log_and_power_of_constants()
{
    let results = parse_line_with::<f64>("log(2^3) / log(2)").unwrap();
    assert!(approx_eq!(f64, results[0].atom, 3.0, epsilon = 1e-12));

    let results = parse_line("x * log(1) + 2^0.5^2").unwrap();
    assert!(approx_eq!(f64, results[0].atom.constant, 2.0_f64.powf(0.25), ulps = 2));
    assert_eq!(results[0].atom.free_variables().collect::<Vec<_>>(), vec!["x"]);
}

#[test]
fn test_trailing_operator_is_missing_operand()
{
    let err = parse_line("1 +").unwrap_err();
    assert_eq!(err.message, "missing operand");
    assert_eq!(err.position, 3);

    let err = parse_line("1 + 2,").unwrap_err();
    assert_eq!(err.message, "missing operand");
    assert_eq!(err.position, 6);
}

#[test]
fn test_failing_clause_discards_line()
{
    let err = parse_line("1, 2, x*y, 4").unwrap_err();
    assert_eq!(err, ParseError { message: "polynomial of order > 1 not allowed".to_owned(), position: 7 });
}

#[test]
fn test_answer_line_error_downcasts()
{
    let err = answer_line("x / y").unwrap_err();
    let pe = err.downcast_ref::<ParseError>().unwrap();

    assert_eq!(pe.message, "polynomial fraction not allowed");
    assert_eq!(pe.position, 2);
}

#[test]
fn test_numeric_mode()
{
    assert_eq!(answer_line_with::<f64>("2 * 3 = 6, 7 / 2").unwrap(), vec!["True.", "3.5"]);

    assert_eq!(answer_line_with::<f64>("log(0)").unwrap(), vec!["-inf"]);

    let err = parse_line_with::<f64>("x = 1").unwrap_err();
    assert_eq!(err.message, "backend can't handle variables");
    assert_eq!(err.position, 0);

    let err = parse_line_with::<f64>("1 = 2 / 0").unwrap_err();
    assert_eq!(err.message, "division by zero");
    assert_eq!(err.position, 2);
}
