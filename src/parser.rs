use tracing::trace;

use crate::atom::Atom;
use crate::errors::{AffineError, ParseError, SyntaxError};
use crate::lexer::{Token, TokenKind};

/// One comma-separated clause of a line. When `is_equation` is set, the
/// clause was `lhs = rhs` and `atom` holds `lhs - rhs`, i.e. the statement
/// `atom = 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseResult<T>
{
    pub atom: T,
    pub is_equation: bool,
}

/// Re-signals an arithmetic failure at the operator token that asked for it.
fn at_operator<T>(res: Result<T, AffineError>, op: &Token) -> Result<T, ParseError>
{
    res.map_err(|e| ParseError::at(e, op.position))
}

/// Deepest nesting of parentheses, prefix signs and exponents accepted on
/// one line.
const MAX_DEPTH: usize = 256;

/// Recursive-descent cursor over a token slice that is known to end with
/// `EndOfInput`. The cursor never moves past that last token.
struct Parser<'t>
{
    tokens: &'t [Token],
    cursor: usize,
    depth: usize,
}

impl <'t> Parser<'t>
{
    fn peek(&self) -> &'t Token
    {
        &self.tokens[self.cursor]
    }

    fn advance(&mut self) -> &'t Token
    {
        let tok = self.peek();
        if tok.kind != TokenKind::EndOfInput
        {
            self.cursor += 1;
        }
        tok
    }

    /// Goes one nesting level deeper, failing at the current token once
    /// `MAX_DEPTH` is reached. Callers step back out with `leave`.
    fn enter(&mut self) -> Result<(), ParseError>
    {
        if self.depth >= MAX_DEPTH
        {
            return Err(ParseError::at(SyntaxError::NestingTooDeep, self.peek().position));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self)
    {
        self.depth -= 1;
    }

    // clause := additive ('=' additive)?
    fn clause<T: Atom>(&mut self) -> Result<ParseResult<T>, ParseError>
    {
        let lhs: T = self.additive()?;

        if !self.peek().is_punct("=")
        {
            return Ok(ParseResult { atom: lhs, is_equation: false });
        }
        let op = self.advance();

        // failures on the right-hand side are reported at the `=`
        let rhs: T = self.additive()
            .map_err(|e| e.moved_to(op.position))?;

        Ok(ParseResult
        {
            atom: at_operator(lhs.minus(&rhs), op)?,
            is_equation: true,
        })
    }

    // additive := multiplicative (('+'|'-') multiplicative)*
    fn additive<T: Atom>(&mut self) -> Result<T, ParseError>
    {
        let mut value: T = self.multiplicative()?;
        loop
        {
            let op = self.peek();
            if op.is_punct("+")
            {
                self.advance();
                let rhs = self.multiplicative()?;
                value = at_operator(value.plus(&rhs), op)?;
            }
            else if op.is_punct("-")
            {
                self.advance();
                let rhs = self.multiplicative()?;
                value = at_operator(value.minus(&rhs), op)?;
            }
            else
            {
                return Ok(value);
            }
        }
    }

    // multiplicative := unary (('*'|'/') unary)*
    fn multiplicative<T: Atom>(&mut self) -> Result<T, ParseError>
    {
        let mut value: T = self.unary()?;
        loop
        {
            let op = self.peek();
            if op.is_punct("*")
            {
                self.advance();
                let rhs = self.unary()?;
                value = at_operator(value.times(&rhs), op)?;
            }
            else if op.is_punct("/")
            {
                self.advance();
                let rhs = self.unary()?;
                value = at_operator(value.over(&rhs), op)?;
            }
            else
            {
                return Ok(value);
            }
        }
    }

    // unary := ('+'|'-') unary | power
    fn unary<T: Atom>(&mut self) -> Result<T, ParseError>
    {
        let op = self.peek();
        if op.is_punct("-")
        {
            self.enter()?;
            self.advance();
            let operand: T = self.unary()?;
            self.leave();
            at_operator(operand.negated(), op)
        }
        else if op.is_punct("+")
        {
            self.enter()?;
            self.advance();
            let operand = self.unary()?;
            self.leave();
            Ok(operand)
        }
        else
        {
            self.power()
        }
    }

    // power := primary ('^' unary)?
    fn power<T: Atom>(&mut self) -> Result<T, ParseError>
    {
        let base: T = self.primary()?;

        let op = self.peek();
        if !op.is_punct("^")
        {
            return Ok(base);
        }
        self.enter()?;
        self.advance();

        let exponent = self.unary()?;
        self.leave();
        at_operator(base.raised_to(&exponent), op)
    }

    // primary := NUMBER | 'log' paren_group | IDENTIFIER | paren_group
    fn primary<T: Atom>(&mut self) -> Result<T, ParseError>
    {
        let tok = self.peek();
        match tok.kind
        {
            TokenKind::Number => {
                let value = match tok.text.parse::<f64>()
                {
                    Ok(num) if num.is_finite() => num,
                    _ => return Err(ParseError::at(SyntaxError::InvalidNumber, tok.position)),
                };
                self.advance();
                Ok(T::from_number(value))
            },

            TokenKind::Identifier if tok.text == "log" => {
                self.advance();
                let arg: T = self.paren_group()?;
                at_operator(arg.natural_log(), tok)
            },

            TokenKind::Identifier => {
                let value = at_operator(T::from_identifier(&tok.text), tok)?;
                self.advance();
                Ok(value)
            },

            _ if tok.is_punct("(") => self.paren_group(),

            _ => Err(ParseError::at(SyntaxError::MissingOperand, tok.position)),
        }
    }

    // paren_group := '(' additive ')'
    fn paren_group<T: Atom>(&mut self) -> Result<T, ParseError>
    {
        if !self.peek().is_punct("(")
        {
            return Err(ParseError::at(SyntaxError::MissingLeftParenthesis, self.peek().position));
        }
        self.enter()?;
        self.advance();

        let value = self.additive()?;

        if !self.peek().is_punct(")")
        {
            return Err(ParseError::at(SyntaxError::MissingRightParenthesis, self.peek().position));
        }
        self.advance();
        self.leave();

        Ok(value)
    }
}

/// Parses a token sequence ending in `EndOfInput` into one `ParseResult`
/// per comma-separated clause, evaluating each clause into the value type
/// `T` as it goes. An empty line gives an empty `Vec`.
///
/// Any failure aborts the whole line.
///
/// # Example
/// ```
/// use affine_calc::affine::Affine;
/// use affine_calc::lexer::tokenize;
/// use affine_calc::parser::parse;
///
/// let results = parse::<Affine>(&tokenize("2*x+0.5=1, 3")).unwrap();
///
/// assert_eq!(results.len(), 2);
/// assert!(results[0].is_equation);
/// assert_eq!(results[0].atom, Affine::term(2.0, "x") - Affine::constant(0.5));
/// assert_eq!(results[1].atom, Affine::constant(3.0));
/// ```
pub fn parse<T: Atom>(tokens: &[Token]) -> Result<Vec<ParseResult<T>>, ParseError>
{
    match tokens.last()
    {
        Some(last) if last.kind == TokenKind::EndOfInput => (),
        Some(last) => {
            let end = last.position + last.text.chars().count();
            return Err(ParseError::at(SyntaxError::UnterminatedTokens, end));
        },
        None => return Err(ParseError::at(SyntaxError::UnterminatedTokens, 0)),
    }

    let mut parser = Parser { tokens, cursor: 0, depth: 0 };
    let mut results = Vec::new();

    if parser.peek().kind == TokenKind::EndOfInput
    {
        return Ok(results);
    }

    loop
    {
        let clause = parser.clause::<T>()?;
        trace!(clause = results.len(), is_equation = clause.is_equation, "parsed clause");
        results.push(clause);

        let tok = parser.advance();
        if tok.kind == TokenKind::EndOfInput
        {
            return Ok(results);
        }
        if !tok.is_punct(",")
        {
            return Err(ParseError::at(SyntaxError::UnexpectedInput, tok.position));
        }
    }
}

#[cfg(test)]
fn parse_affine(line: &str) -> Result<Vec<ParseResult<crate::affine::Affine>>, ParseError>
{
    parse(&crate::lexer::tokenize(line))
}

#[cfg(test)]
fn parse_err(line: &str) -> (String, usize)
{
    let err = parse_affine(line).unwrap_err();
    (err.message, err.position)
}

#[test]
fn test_empty()
{
    let empty = vec![Token::new(TokenKind::EndOfInput, "", 0)];
    assert!(parse::<f64>(&empty).unwrap().is_empty());
    assert!(parse_affine("   ").unwrap().is_empty());
}

#[test]
fn test_hand_built_tokens()
{
    // (3+(4-1))*5
    let tokens = vec![
        Token::new(TokenKind::Punctuation, "(", 0),
        Token::new(TokenKind::Number, "3", 1),
        Token::new(TokenKind::Punctuation, "+", 2),
        Token::new(TokenKind::Punctuation, "(", 3),
        Token::new(TokenKind::Number, "4", 4),
        Token::new(TokenKind::Punctuation, "-", 5),
        Token::new(TokenKind::Number, "1", 6),
        Token::new(TokenKind::Punctuation, ")", 7),
        Token::new(TokenKind::Punctuation, ")", 8),
        Token::new(TokenKind::Punctuation, "*", 9),
        Token::new(TokenKind::Number, "5", 10),
        Token::new(TokenKind::EndOfInput, "", 11),
    ];
    let results = parse::<f64>(&tokens).unwrap();
    assert_eq!(results, vec![ParseResult { atom: 30.0, is_equation: false }]);
}

#[test]
fn test_unterminated_tokens()
{
    let tokens = vec![Token::new(TokenKind::Number, "12", 0)];
    let err = parse::<f64>(&tokens).unwrap_err();
    assert_eq!(err, ParseError::at(SyntaxError::UnterminatedTokens, 2));
}

#[test]
fn test_precedence()
{
    assert_eq!(parse::<f64>(&crate::lexer::tokenize("1 + 2 * 3")).unwrap()[0].atom, 7.0);
    assert_eq!(parse::<f64>(&crate::lexer::tokenize("2 ^ 3 ^ 2")).unwrap()[0].atom, 512.0);
    assert_eq!(parse::<f64>(&crate::lexer::tokenize("-2 ^ 2")).unwrap()[0].atom, -4.0);
    assert_eq!(parse::<f64>(&crate::lexer::tokenize("2 ^ -1")).unwrap()[0].atom, 0.5);
    assert_eq!(parse::<f64>(&crate::lexer::tokenize("8 / 4 / 2")).unwrap()[0].atom, 1.0);
    assert_eq!(parse::<f64>(&crate::lexer::tokenize("--+3")).unwrap()[0].atom, 3.0);
    assert_eq!(parse::<f64>(&crate::lexer::tokenize("log(1)")).unwrap()[0].atom, 0.0);
}

#[test]
fn test_equation_clauses()
{
    let results = parse_affine("2*x+0.5=1").unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].is_equation);
    assert_eq!(results[0].atom.coefficient("x"), 2.0);
    assert_eq!(results[0].atom.constant, -0.5);

    let results = parse_affine("x, y = 2, 4").unwrap();
    let flags: Vec<bool> = results.iter().map(|r| r.is_equation).collect();
    assert_eq!(flags, vec![false, true, false]);
}

#[test]
fn test_syntax_errors()
{
    assert_eq!(parse_err("1 +"), ("missing operand".to_owned(), 3));
    assert_eq!(parse_err("1,"), ("missing operand".to_owned(), 2));
    assert_eq!(parse_err("(1 + 2"), ("missing right parenthesis".to_owned(), 6));
    assert_eq!(parse_err("log 2"), ("missing left parenthesis".to_owned(), 4));
    assert_eq!(parse_err("1 2"), ("unexpected input".to_owned(), 2));
    assert_eq!(parse_err("x = y = 1"), ("unexpected input".to_owned(), 6));
    assert_eq!(parse_err("3 # 4"), ("unexpected input".to_owned(), 2));
    assert_eq!(parse_err("1e999"), ("invalid number".to_owned(), 0));
}

#[test]
fn test_arithmetic_errors_point_at_operator()
{
    assert_eq!(parse_err("1 + x * y"), ("polynomial of order > 1 not allowed".to_owned(), 6));
    assert_eq!(parse_err("2 / (x + 1)"), ("polynomial fraction not allowed".to_owned(), 2));
    assert_eq!(parse_err("2 / (1 - 1)"), ("division by zero".to_owned(), 2));
    assert_eq!(parse_err("x ^ 2"), ("power of polynomial not allowed".to_owned(), 2));
    assert_eq!(parse_err("2 ^ x"), ("polynomial exponent not allowed".to_owned(), 2));
    assert_eq!(parse_err(" log(x)"), ("log of polynomial not allowed".to_owned(), 1));
    assert_eq!(parse_err("(x * (y * z))"), ("polynomial of order > 1 not allowed".to_owned(), 8));
}

#[test]
fn test_rhs_errors_point_at_equals()
{
    assert_eq!(parse_err("x = y * z"), ("polynomial of order > 1 not allowed".to_owned(), 2));
    assert_eq!(parse_err("x = 1 +"), ("missing operand".to_owned(), 2));
}

#[test]
fn test_numeric_backend_rejects_identifiers()
{
    let err = parse::<f64>(&crate::lexer::tokenize("1 + foo")).unwrap_err();
    assert_eq!(err, ParseError::at(AffineError::VariablesUnsupported, 4));
}

#[test]
fn test_deep_parentheses_fail_instead_of_overflowing()
{
    let line = "(".repeat(100_000);
    assert_eq!(parse_err(&line), ("expression nested too deeply".to_owned(), MAX_DEPTH));

    let line = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
    assert_eq!(parse_err(&line), ("expression nested too deeply".to_owned(), MAX_DEPTH));
}

#[test]
fn test_long_sign_runs_fail_instead_of_overflowing()
{
    let line = format!("{}1", "-".repeat(100_000));
    assert_eq!(parse_err(&line), ("expression nested too deeply".to_owned(), MAX_DEPTH));

    let line = format!("x = {}1", "+-".repeat(50_000));
    assert_eq!(parse_err(&line), ("expression nested too deeply".to_owned(), 2));
}

#[test]
fn test_nesting_up_to_the_limit_is_accepted()
{
    let line = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
    assert_eq!(parse_affine(&line).unwrap()[0].atom, crate::affine::Affine::constant(1.0));

    // depth is released when a group closes
    let group = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
    let line = vec![group; 3].join(" + ");
    assert_eq!(parse::<f64>(&crate::lexer::tokenize(&line)).unwrap()[0].atom, 3.0);

    let line = format!("{}2", "-".repeat(MAX_DEPTH));
    assert_eq!(parse::<f64>(&crate::lexer::tokenize(&line)).unwrap()[0].atom, 2.0);
}

#[test]
fn test_long_exponent_chains_fail_instead_of_overflowing()
{
    let line = format!("{}2", "2^".repeat(100_000));
    assert_eq!(parse_err(&line), ("expression nested too deeply".to_owned(), 2 * MAX_DEPTH + 1));

    let line = format!("{}1", "1^".repeat(MAX_DEPTH));
    assert_eq!(parse::<f64>(&crate::lexer::tokenize(&line)).unwrap()[0].atom, 1.0);
}
