use lazy_static::lazy_static;
use regex::Regex;

/// The four kinds of token a source line breaks down into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind
{
    Number,
    Identifier,
    Punctuation,
    EndOfInput,
}

/// A single token, with the character offset where it starts in the source line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token
{
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token
{
    pub fn new(kind: TokenKind, text: &str, position: usize) -> Token
    {
        Token
        {
            kind,
            text: text.to_owned(),
            position,
        }
    }

    /// Whether this is the punctuation token `p`.
    pub fn is_punct(&self, p: &str) -> bool
    {
        self.kind == TokenKind::Punctuation && self.text == p
    }
}

fn match_number(rest: &str) -> Option<&str>
{
    lazy_static!
    {
        static ref RE: Regex = Regex::new(r"^(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?").unwrap();
    }
    RE.find(rest).map(|m| m.as_str())
}

fn match_identifier(rest: &str) -> Option<&str>
{
    lazy_static!
    {
        static ref RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9]*").unwrap();
    }
    RE.find(rest).map(|m| m.as_str())
}

/// Splits a line into tokens. Never fails: characters that start neither a
/// number nor an identifier each become a one-character punctuation token,
/// leaving it to the parser to complain about them. The result always ends
/// with exactly one `EndOfInput` token positioned at the length of the line.
///
/// # Example
/// ```
/// use affine_calc::lexer::{tokenize, Token, TokenKind};
///
/// let tokens = tokenize("2*x");
///
/// assert_eq!(tokens, vec![
///     Token::new(TokenKind::Number, "2", 0),
///     Token::new(TokenKind::Punctuation, "*", 1),
///     Token::new(TokenKind::Identifier, "x", 2),
///     Token::new(TokenKind::EndOfInput, "", 3),
/// ]);
/// ```
pub fn tokenize(line: &str) -> Vec<Token>
{
    let mut tokens = Vec::new();
    let mut byte = 0;
    let mut position = 0; // in chars, for diagnostics

    while let Some(c) = line[byte..].chars().next()
    {
        let rest = &line[byte..];

        let (kind, text) = if c.is_whitespace()
        {
            byte += c.len_utf8();
            position += 1;
            continue;
        }
        else if let Some(num) = match_number(rest)
        {
            (TokenKind::Number, num)
        }
        else if let Some(id) = match_identifier(rest)
        {
            (TokenKind::Identifier, id)
        }
        else
        {
            (TokenKind::Punctuation, &rest[..c.len_utf8()])
        };

        tokens.push(Token::new(kind, text, position));
        byte += text.len();
        position += text.chars().count();
    }

    tokens.push(Token::new(TokenKind::EndOfInput, "", position));
    tokens
}

#[test]
fn test_empty_line()
{
    assert_eq!(tokenize(""), vec![Token::new(TokenKind::EndOfInput, "", 0)]);
    assert_eq!(tokenize("   "), vec![Token::new(TokenKind::EndOfInput, "", 3)]);
}

#[test]
fn test_exponent_number()
{
    assert_eq!(
        tokenize("1.125e-1"),
        vec![
            Token::new(TokenKind::Number, "1.125e-1", 0),
            Token::new(TokenKind::EndOfInput, "", 8),
        ]
    );
    assert_eq!(tokenize(".1e+1")[0], Token::new(TokenKind::Number, ".1e+1", 0));
    assert_eq!(tokenize("5.")[0], Token::new(TokenKind::Number, "5.", 0));
}

#[test]
fn test_lone_dot_is_punctuation()
{
    assert_eq!(
        tokenize("."),
        vec![
            Token::new(TokenKind::Punctuation, ".", 0),
            Token::new(TokenKind::EndOfInput, "", 1),
        ]
    );
    assert_eq!(
        tokenize("..5"),
        vec![
            Token::new(TokenKind::Punctuation, ".", 0),
            Token::new(TokenKind::Number, ".5", 1),
            Token::new(TokenKind::EndOfInput, "", 3),
        ]
    );
}

#[test]
fn test_incomplete_exponent_is_left_alone()
{
    assert_eq!(
        tokenize("2e+x"),
        vec![
            Token::new(TokenKind::Number, "2", 0),
            Token::new(TokenKind::Identifier, "e", 1),
            Token::new(TokenKind::Punctuation, "+", 2),
            Token::new(TokenKind::Identifier, "x", 3),
            Token::new(TokenKind::EndOfInput, "", 4),
        ]
    );
}

#[test]
fn test_identifiers_and_punctuation()
{
    let tokens = tokenize(" log(x2) = a_b");
    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["log", "(", "x2", ")", "=", "a", "_", "b", ""]);
    assert_eq!(tokens[0].position, 1);
    assert_eq!(tokens[4], Token::new(TokenKind::Punctuation, "=", 9));
    assert_eq!(tokens[6], Token::new(TokenKind::Punctuation, "_", 12));
}

#[test]
fn test_positions_count_chars()
{
    let tokens = tokenize("é+1");
    assert_eq!(tokens[0], Token::new(TokenKind::Punctuation, "é", 0));
    assert_eq!(tokens[1].position, 1);
    assert_eq!(tokens[2], Token::new(TokenKind::Number, "1", 2));
    assert_eq!(tokens[3].position, 3);
}
