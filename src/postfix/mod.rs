use crate::error::{EvalError, Result};
use std::collections::HashMap;
use std::fmt;

mod converter;
mod evaluator;
mod tokenizer;

pub use converter::{Arity, Converter, FunctionTable};
pub use evaluator::Evaluator;
pub use tokenizer::{Lexeme, Tokenizer};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    /// Unary minus. Never typed by the user; `_` is reserved for it.
    Negate,
}

impl Operator {
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 0,
            Operator::Multiply | Operator::Divide | Operator::Modulo | Operator::Negate => 1,
            Operator::Power => 2,
        }
    }

    pub fn is_right_associative(&self) -> bool {
        matches!(self, Operator::Power)
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Modulo => '%',
            Operator::Power => '^',
            Operator::Negate => '_',
        }
    }

    /// Whether an operator already sitting on the conversion stack has to be
    /// emitted before `self` is pushed.
    pub fn yields_to(&self, top: &Operator) -> bool {
        if self.is_right_associative() {
            self.precedence() < top.precedence()
        } else {
            self.precedence() <= top.precedence()
        }
    }

    pub fn apply(&self, left: f64, right: f64) -> Result<f64> {
        match self {
            Operator::Add => Ok(left + right),
            Operator::Subtract => Ok(left - right),
            Operator::Multiply => Ok(left * right),
            Operator::Divide => {
                if right == 0.0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(left / right)
                }
            }
            Operator::Modulo => {
                let divisor = right as i64;
                if divisor == 0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok((left as i64).wrapping_rem(divisor) as f64)
                }
            }
            Operator::Power => Ok(left.powf(right)),
            Operator::Negate => Ok(-right),
        }
    }
}

impl TryFrom<char> for Operator {
    type Error = EvalError;

    fn try_from(value: char) -> Result<Self> {
        match value {
            '+' => Ok(Operator::Add),
            '-' => Ok(Operator::Subtract),
            '*' => Ok(Operator::Multiply),
            '/' => Ok(Operator::Divide),
            '%' => Ok(Operator::Modulo),
            '^' => Ok(Operator::Power),
            _ => Err(EvalError::UnexpectedToken(value.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One element of a postfix program.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Identifier(String),
    Operator(Operator),
    /// Call of a built-in or user-defined function with the number of
    /// arguments written at the call site; those arguments are the values
    /// already on the evaluation stack.
    Function { name: String, arg_count: usize },
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{}", value),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Function { name, .. } => write!(f, "{}()", name),
        }
    }
}

/// Tokens in postfix order, as produced by the [`Converter`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostfixProgram {
    tokens: Vec<Token>,
}

impl PostfixProgram {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Names of the bare identifiers the program reads, in order of first use.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for token in &self.tokens {
            if let Token::Identifier(name) = token {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Replaces every identifier that is not one of `parameters` with its
    /// current value from `context`, so the program no longer depends on it.
    pub fn resolve_identifiers(
        &self,
        parameters: &[String],
        context: &HashMap<String, f64>,
    ) -> Result<PostfixProgram> {
        if let Some(missing) = self
            .identifiers()
            .into_iter()
            .find(|name| !parameters.iter().any(|p| p == name) && !context.contains_key(*name))
        {
            return Err(EvalError::UndefinedVariable(missing.to_string()));
        }

        let tokens = self
            .tokens
            .iter()
            .map(|token| match token {
                Token::Identifier(name) if !parameters.contains(name) => {
                    context.get(name).map_or_else(|| token.clone(), |v| Token::Number(*v))
                }
                other => other.clone(),
            })
            .collect();
        Ok(PostfixProgram { tokens })
    }
}

impl fmt::Display for PostfixProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}
