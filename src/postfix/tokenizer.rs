use crate::error::{EvalError, Result};
use crate::postfix::Operator;

/// What the tokenizer recognised at the current offset.
#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme {
    Number(f64),
    Identifier(String),
    /// `name(` with no space between the name and the parenthesis.
    FunctionStart(String),
    Operator(Operator),
    /// A `-` where an operand is expected.
    Negate,
    OpenParen,
    CloseParen,
    Comma,
}

impl Lexeme {
    /// Lexemes that begin an operand. Seen where an operator is expected,
    /// they mean implicit multiplication.
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            Lexeme::Number(_) | Lexeme::Identifier(_) | Lexeme::FunctionStart(_) | Lexeme::OpenParen
        )
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c.is_ascii_whitespace()
        || matches!(c, '%' | '+' | '*' | '^' | '/' | '(' | ')' | '.' | ',' | '-')
}

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Prefix matcher over an infix expression. It never moves on its own: the
/// converter peeks at the next lexeme and decides whether to consume it.
pub struct Tokenizer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Result<Self> {
        if let Some(c) = input.chars().find(|c| !is_allowed(*c)) {
            return Err(EvalError::IllegalCharacter(c));
        }
        let mut tokenizer = Self { input, position: 0 };
        tokenizer.skip_whitespace();
        Ok(tokenizer)
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Consumes `width` bytes and any whitespace after them.
    pub fn advance(&mut self, width: usize) {
        self.position = (self.position + width).min(self.input.len());
        self.skip_whitespace();
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while self.position < bytes.len() && bytes[self.position].is_ascii_whitespace() {
            self.position += 1;
        }
    }

    /// Classifies the lexeme at the current offset and returns it with its
    /// width in bytes.
    pub fn peek(&self, expecting_operator: bool) -> Result<(Lexeme, usize)> {
        let rest = &self.input.as_bytes()[self.position..];
        let first = match rest.first() {
            Some(b) => *b,
            None => return Err(EvalError::UnexpectedToken("end of input".to_string())),
        };

        if first == b'-' && !expecting_operator {
            return Ok((Lexeme::Negate, 1));
        }
        if first == b'_' {
            return Err(EvalError::IllegalCharacter('_'));
        }
        if first.is_ascii_alphabetic() {
            let len = rest.iter().take_while(|b| is_word(**b)).count();
            let name = self.input[self.position..self.position + len].to_string();
            if rest.get(len) == Some(&b'(') {
                return Ok((Lexeme::FunctionStart(name), len + 1));
            }
            return Ok((Lexeme::Identifier(name), len));
        }
        if let Some(len) = Self::number_width(rest) {
            let text = &self.input[self.position..self.position + len];
            let value = text
                .parse::<f64>()
                .map_err(|_| EvalError::UnexpectedToken(text.to_string()))?;
            return Ok((Lexeme::Number(value), len));
        }

        match first {
            b'(' => Ok((Lexeme::OpenParen, 1)),
            b')' => Ok((Lexeme::CloseParen, 1)),
            b',' => Ok((Lexeme::Comma, 1)),
            _ => match Operator::try_from(first as char) {
                Ok(op) => Ok((Lexeme::Operator(op), 1)),
                Err(_) => Err(EvalError::UnexpectedToken((first as char).to_string())),
            },
        }
    }

    /// Width of `\d+(\.\d+)?` or `\.\d+` at the start of `rest`.
    fn number_width(rest: &[u8]) -> Option<usize> {
        let digits = |from: usize| {
            rest[from.min(rest.len())..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
        };

        let integer = digits(0);
        if integer > 0 {
            if rest.get(integer) == Some(&b'.') {
                let fraction = digits(integer + 1);
                if fraction > 0 {
                    return Some(integer + 1 + fraction);
                }
            }
            return Some(integer);
        }
        if rest.first() == Some(&b'.') {
            let fraction = digits(1);
            if fraction > 0 {
                return Some(1 + fraction);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(input: &str) -> Result<Vec<Lexeme>> {
        let mut tokenizer = Tokenizer::new(input)?;
        let mut lexemes = Vec::new();
        let mut expecting_operator = false;
        while !tokenizer.is_finished() {
            let (lexeme, width) = tokenizer.peek(expecting_operator)?;
            expecting_operator = matches!(
                lexeme,
                Lexeme::Number(_) | Lexeme::Identifier(_) | Lexeme::CloseParen
            );
            tokenizer.advance(width);
            lexemes.push(lexeme);
        }
        Ok(lexemes)
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            lex_all("12 3.25 .5").unwrap(),
            vec![
                Lexeme::Number(12.0),
                Lexeme::Number(3.25),
                Lexeme::Number(0.5)
            ]
        );
    }

    #[test]
    fn test_identifiers_and_function_starts() {
        assert_eq!(
            lex_all("sin(x_1) max (").unwrap(),
            vec![
                Lexeme::FunctionStart("sin".to_string()),
                Lexeme::Identifier("x_1".to_string()),
                Lexeme::CloseParen,
                Lexeme::Identifier("max".to_string()),
                Lexeme::OpenParen,
            ]
        );
    }

    #[test]
    fn test_minus_depends_on_context() {
        assert_eq!(
            lex_all("-a--2").unwrap(),
            vec![
                Lexeme::Negate,
                Lexeme::Identifier("a".to_string()),
                Lexeme::Operator(Operator::Subtract),
                Lexeme::Negate,
                Lexeme::Number(2.0),
            ]
        );
    }

    #[test]
    fn test_illegal_characters() {
        assert_eq!(
            Tokenizer::new("2 $ 3").err(),
            Some(EvalError::IllegalCharacter('$'))
        );
        assert_eq!(
            Tokenizer::new("x = 3").err(),
            Some(EvalError::IllegalCharacter('='))
        );
        assert_eq!(
            Tokenizer::new("2 ÷ 3").err(),
            Some(EvalError::IllegalCharacter('÷'))
        );
        assert_eq!(lex_all("_x").err(), Some(EvalError::IllegalCharacter('_')));
    }

    #[test]
    fn test_lone_dot_is_unexpected() {
        assert_eq!(
            lex_all("3 . 4").err(),
            Some(EvalError::UnexpectedToken(".".to_string()))
        );
    }

    #[test]
    fn test_leading_whitespace_is_skipped() {
        let tokenizer = Tokenizer::new("   7").unwrap();
        assert!(!tokenizer.is_finished());
        assert_eq!(tokenizer.peek(false).unwrap(), (Lexeme::Number(7.0), 1));
    }
}
