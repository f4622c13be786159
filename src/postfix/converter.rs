use crate::error::{EvalError, Result};
use crate::postfix::{Lexeme, Operator, PostfixProgram, Token, Tokenizer};
use crate::stack::{Stack, StackValue};
use log::debug;
use std::collections::HashMap;

/// How many arguments a known function takes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Arity {
    /// Built-ins are always unary.
    Builtin,
    Exactly(usize),
}

/// Lookup of the functions a call like `name(` may refer to.
pub trait FunctionTable {
    fn arity(&self, name: &str) -> Option<Arity>;
}

impl FunctionTable for HashMap<String, Arity> {
    fn arity(&self, name: &str) -> Option<Arity> {
        self.get(name).copied()
    }
}

/// Entries of the conversion stack.
#[derive(Debug, Clone, PartialEq)]
enum Pending {
    Operator(Operator),
    OpenParen,
    /// An open `name(`; doubles as the parenthesis marker for its arguments.
    FunctionCall { name: String, arg_count: usize },
}

impl StackValue for Pending {}

impl Pending {
    fn opens_group(&self) -> bool {
        matches!(self, Pending::OpenParen | Pending::FunctionCall { .. })
    }
}

/// Shunting-yard conversion of an infix expression into a [`PostfixProgram`].
pub struct Converter<'a, F: FunctionTable + ?Sized> {
    functions: &'a F,
    precision: u32,
}

impl<'a, F: FunctionTable + ?Sized> Converter<'a, F> {
    pub fn new(functions: &'a F, precision: u32) -> Self {
        Self {
            functions,
            precision,
        }
    }

    pub fn convert(&self, expression: &str) -> Result<PostfixProgram> {
        let mut tokenizer = Tokenizer::new(expression)?;
        if tokenizer.is_finished() {
            return Err(EvalError::EmptyExpression);
        }

        let mut stack: Stack<Pending> = Stack::new(self.precision);
        let mut output = Vec::new();
        let mut expecting_operator = false;
        let mut dangling: Option<char> = None;

        while !tokenizer.is_finished() {
            let (lexeme, width) = tokenizer.peek(expecting_operator)?;
            dangling = None;

            match lexeme {
                Lexeme::Negate => {
                    stack.push(Pending::Operator(Operator::Negate));
                    tokenizer.advance(width);
                    dangling = Some('-');
                }
                lexeme
                    if expecting_operator
                        && (lexeme.starts_operand() || matches!(lexeme, Lexeme::Operator(_))) =>
                {
                    let op = match lexeme {
                        Lexeme::Operator(op) => {
                            tokenizer.advance(width);
                            dangling = Some(op.symbol());
                            op
                        }
                        // Implicit multiplication: the operand is scanned
                        // again on the next pass, now that an operand is due.
                        _ => Operator::Multiply,
                    };
                    Self::push_operator(op, &mut stack, &mut output);
                    expecting_operator = false;
                }
                Lexeme::CloseParen if expecting_operator => {
                    self.close_parenthesis(&mut stack, &mut output)?;
                    tokenizer.advance(width);
                }
                Lexeme::Comma if expecting_operator => {
                    Self::next_argument(&mut stack, &mut output)?;
                    tokenizer.advance(width);
                    expecting_operator = false;
                }
                Lexeme::OpenParen => {
                    stack.push(Pending::OpenParen);
                    tokenizer.advance(width);
                }
                Lexeme::Number(value) => {
                    output.push(Token::Number(value));
                    tokenizer.advance(width);
                    expecting_operator = true;
                }
                Lexeme::Identifier(name) => {
                    output.push(Token::Identifier(name));
                    tokenizer.advance(width);
                    expecting_operator = true;
                }
                Lexeme::FunctionStart(name) => {
                    if self.functions.arity(&name).is_some() {
                        stack.push(Pending::FunctionCall {
                            name,
                            arg_count: 1,
                        });
                        tokenizer.advance(width);
                    } else {
                        // Not a function: a variable followed by a group.
                        tokenizer.advance(name.len());
                        output.push(Token::Identifier(name));
                        expecting_operator = true;
                    }
                }
                Lexeme::CloseParen => {
                    return Err(if stack.iter().any(Pending::opens_group) {
                        EvalError::UnexpectedToken(")".to_string())
                    } else {
                        EvalError::UnmatchedParenthesis
                    });
                }
                Lexeme::Operator(op) => {
                    return Err(EvalError::UnexpectedToken(op.symbol().to_string()));
                }
                Lexeme::Comma => return Err(EvalError::UnexpectedToken(",".to_string())),
            }
        }

        if let Some(symbol) = dangling {
            return Err(EvalError::OperatorLacksOperand(symbol));
        }

        while let Some(pending) = stack.pop() {
            match pending {
                Pending::Operator(op) => output.push(Token::Operator(op)),
                _ => return Err(EvalError::UnbalancedParenthesis),
            }
        }

        let program = PostfixProgram::new(output);
        debug!("Postfix for '{}': {}", expression, program);
        Ok(program)
    }

    fn push_operator(op: Operator, stack: &mut Stack<Pending>, output: &mut Vec<Token>) {
        while let Some(Pending::Operator(top)) = stack.peek(1) {
            if !op.yields_to(top) {
                break;
            }
            let top = *top;
            stack.pop();
            output.push(Token::Operator(top));
        }
        stack.push(Pending::Operator(op));
    }

    fn close_parenthesis(&self, stack: &mut Stack<Pending>, output: &mut Vec<Token>) -> Result<()> {
        loop {
            match stack.pop() {
                None => return Err(EvalError::UnmatchedParenthesis),
                Some(Pending::Operator(op)) => output.push(Token::Operator(op)),
                Some(Pending::OpenParen) => return Ok(()),
                Some(Pending::FunctionCall { name, arg_count }) => {
                    self.check_arity(&name, arg_count)?;
                    output.push(Token::Function { name, arg_count });
                    return Ok(());
                }
            }
        }
    }

    fn next_argument(stack: &mut Stack<Pending>, output: &mut Vec<Token>) -> Result<()> {
        loop {
            match stack.pop() {
                None | Some(Pending::OpenParen) => {
                    return Err(EvalError::UnexpectedToken(",".to_string()))
                }
                Some(Pending::Operator(op)) => output.push(Token::Operator(op)),
                Some(Pending::FunctionCall { name, arg_count }) => {
                    stack.push(Pending::FunctionCall {
                        name,
                        arg_count: arg_count + 1,
                    });
                    return Ok(());
                }
            }
        }
    }

    fn check_arity(&self, name: &str, given: usize) -> Result<()> {
        match self.functions.arity(name) {
            Some(Arity::Builtin) if given > 1 => Err(EvalError::TooManyArguments {
                function: name.to_string(),
                given,
            }),
            Some(Arity::Exactly(expected)) if expected != given => {
                Err(EvalError::WrongArgumentCount {
                    function: name.to_string(),
                    given,
                    expected,
                })
            }
            Some(_) => Ok(()),
            None => Err(EvalError::UnknownFunction(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn functions() -> HashMap<String, Arity> {
        HashMap::from([
            ("sin".to_string(), Arity::Builtin),
            ("cos".to_string(), Arity::Builtin),
            ("sqrt".to_string(), Arity::Builtin),
            ("f".to_string(), Arity::Exactly(2)),
        ])
    }

    fn postfix(expression: &str) -> Result<String> {
        let table = functions();
        Converter::new(&table, 6)
            .convert(expression)
            .map(|program| program.to_string())
    }

    #[test]
    fn test_precedence() {
        assert_eq!(postfix("2 + 3 * 2").unwrap(), "2 3 2 * +");
        assert_eq!(postfix("(4 + 2) * 3").unwrap(), "4 2 + 3 *");
        assert_eq!(postfix("10-a%(b+c*d)").unwrap(), "10 a b c d * + % -");
        assert_eq!(postfix("8 / 4 / 2").unwrap(), "8 4 / 2 /");
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(postfix("2^3^2").unwrap(), "2 3 2 ^ ^");
    }

    #[test]
    fn test_negation() {
        assert_eq!(postfix("a+b*c--d").unwrap(), "a b c * + d _ -");
        assert_eq!(postfix("2 * -2.5").unwrap(), "2 2.5 _ *");
        assert_eq!(postfix("-2^2").unwrap(), "2 2 ^ _");
        assert_eq!(postfix("-8*(5/2)^2").unwrap(), "8 _ 5 2 / 2 ^ *");
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(postfix("2x").unwrap(), "2 x *");
        assert_eq!(postfix("2 x").unwrap(), "2 x *");
        assert_eq!(postfix("2(3 + 1)").unwrap(), "2 3 1 + *");
        assert_eq!(postfix("(1)(2)").unwrap(), "1 2 *");
        assert_eq!(postfix("3 sin(0)").unwrap(), "3 0 sin() *");
        assert_eq!(postfix("2^3 x").unwrap(), "2 3 ^ x *");
    }

    #[test]
    fn test_function_calls() {
        assert_eq!(postfix("sin(cos(0))").unwrap(), "0 cos() sin()");
        assert_eq!(postfix("f(1, 3)").unwrap(), "1 3 f()");
        assert_eq!(postfix("f(1 + 2, sqrt(4) * 2)").unwrap(), "1 2 + 4 sqrt() 2 * f()");
    }

    #[test]
    fn test_unknown_call_is_variable_times_group() {
        assert_eq!(postfix("g(2)").unwrap(), "g 2 *");
    }

    #[test]
    fn test_argument_counts() {
        assert_eq!(
            postfix("sin(1, 2)"),
            Err(EvalError::TooManyArguments {
                function: "sin".to_string(),
                given: 2
            })
        );
        assert_eq!(
            postfix("f(1)"),
            Err(EvalError::WrongArgumentCount {
                function: "f".to_string(),
                given: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(postfix("1 +"), Err(EvalError::OperatorLacksOperand('+')));
        assert_eq!(postfix("2 * -"), Err(EvalError::OperatorLacksOperand('-')));
        assert_eq!(postfix(")"), Err(EvalError::UnmatchedParenthesis));
        assert_eq!(postfix("1)"), Err(EvalError::UnmatchedParenthesis));
        assert_eq!(postfix("()"), Err(EvalError::UnexpectedToken(")".to_string())));
        assert_eq!(postfix("(1"), Err(EvalError::UnbalancedParenthesis));
        assert_eq!(postfix("sin("), Err(EvalError::UnbalancedParenthesis));
        assert_eq!(postfix("* 2"), Err(EvalError::UnexpectedToken("*".to_string())));
        assert_eq!(postfix("1, 2"), Err(EvalError::UnexpectedToken(",".to_string())));
        assert_eq!(postfix("(1, 2)"), Err(EvalError::UnexpectedToken(",".to_string())));
        assert_eq!(postfix("1 @ 2"), Err(EvalError::IllegalCharacter('@')));
        assert_eq!(postfix("   "), Err(EvalError::EmptyExpression));
    }
}
