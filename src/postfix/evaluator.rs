use crate::config::EngineConfig;
use crate::error::{EvalError, Result};
use crate::functions::Builtins;
use crate::postfix::{Operator, PostfixProgram, Token};
use crate::stack::Stack;
use crate::store::DefinitionStore;
use log::trace;
use std::collections::HashMap;

/// Stack machine running a [`PostfixProgram`] against a definition store.
pub struct Evaluator<'a> {
    store: &'a DefinitionStore,
    config: EngineConfig,
}

impl<'a> Evaluator<'a> {
    pub fn new(store: &'a DefinitionStore, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Evaluates `program`. `locals` shadow the store's variables; they hold
    /// the parameters when the program is a function body.
    pub fn evaluate(&self, program: &PostfixProgram, locals: &HashMap<String, f64>) -> Result<f64> {
        self.run(program, locals, 0)
    }

    fn run(&self, program: &PostfixProgram, locals: &HashMap<String, f64>, depth: usize) -> Result<f64> {
        let mut stack: Stack<f64> = Stack::new(self.config.precision);

        for token in program.tokens() {
            match token {
                Token::Number(value) => stack.push(*value),
                Token::Identifier(name) => stack.push(self.resolve(name, locals)?),
                Token::Operator(Operator::Negate) => {
                    let value = Self::pop_operand(&mut stack, "_")?;
                    stack.push(-value);
                }
                Token::Operator(op) => {
                    let symbol = op.symbol().to_string();
                    let right = Self::pop_operand(&mut stack, &symbol)?;
                    let left = Self::pop_operand(&mut stack, &symbol)?;
                    stack.push(op.apply(left, right)?);
                }
                Token::Function { name, arg_count } => {
                    let result = self.call(name, *arg_count, &mut stack, depth)?;
                    stack.push(result);
                }
            }
            trace!("{:>10} | {:?}", token.to_string(), stack.iter().collect::<Vec<_>>());
        }

        if stack.len() != 1 {
            return Err(EvalError::InconsistentStack(stack.len()));
        }
        stack.pop().ok_or(EvalError::InconsistentStack(0))
    }

    fn resolve(&self, name: &str, locals: &HashMap<String, f64>) -> Result<f64> {
        locals
            .get(name)
            .copied()
            .or_else(|| self.store.value(name))
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))
    }

    fn call(
        &self,
        name: &str,
        arg_count: usize,
        stack: &mut Stack<f64>,
        depth: usize,
    ) -> Result<f64> {
        if Builtins::is_builtin(name) {
            if arg_count > 1 {
                return Err(EvalError::TooManyArguments {
                    function: name.to_string(),
                    given: arg_count,
                });
            }
            let argument = Self::pop_operand(stack, name)?;
            return self.store.builtins().call(name, &[argument]);
        }

        let definition = self
            .store
            .function(name)
            .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
        // The call site may predate a redefinition with another arity.
        if arg_count != definition.parameters().len() {
            return Err(EvalError::WrongArgumentCount {
                function: name.to_string(),
                given: arg_count,
                expected: definition.parameters().len(),
            });
        }
        if depth >= self.config.recursion_limit {
            return Err(EvalError::RecursionLimitExceeded {
                function: name.to_string(),
                limit: self.config.recursion_limit,
            });
        }

        // Arguments sit on the stack in call order, the last one on top.
        let mut arguments = Vec::with_capacity(definition.parameters().len());
        for _ in definition.parameters() {
            arguments.push(Self::pop_operand(stack, name)?);
        }
        arguments.reverse();

        let frame: HashMap<String, f64> = definition
            .parameters()
            .iter()
            .cloned()
            .zip(arguments)
            .collect();
        trace!("Calling {} with {:?}", definition.signature(), frame);
        self.run(definition.body(), &frame, depth + 1)
    }

    fn pop_operand(stack: &mut Stack<f64>, consumer: &str) -> Result<f64> {
        stack
            .pop()
            .ok_or_else(|| EvalError::InsufficientOperands(consumer.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postfix::Converter;
    use crate::store::FunctionDefinition;

    fn run(store: &DefinitionStore, expression: &str) -> Result<f64> {
        let program = Converter::new(store, 6).convert(expression)?;
        Evaluator::new(store, EngineConfig::default()).evaluate(&program, &HashMap::new())
    }

    fn define(store: &mut DefinitionStore, name: &str, parameters: &[&str], body: &str) {
        let parameters: Vec<String> = parameters.iter().map(|p| p.to_string()).collect();
        let program = Converter::new(&*store, 6).convert(body).unwrap();
        let frozen = program
            .resolve_identifiers(&parameters, store.bindings())
            .unwrap();
        store
            .define_function(FunctionDefinition::new(name, parameters, frozen))
            .unwrap();
    }

    #[test]
    fn test_arithmetic() {
        let store = DefinitionStore::new();
        assert_eq!(run(&store, "2 + 2"), Ok(4.0));
        assert_eq!(run(&store, "2 * -2.5"), Ok(-5.0));
        assert_eq!(run(&store, "2^3^2"), Ok(512.0));
        assert_eq!(run(&store, "-8*(5/2)^2*(1-sqrt(4))-8"), Ok(42.0));
        assert_eq!(run(&store, "10-10%(7-2*2)"), Ok(9.0));
        assert_eq!(run(&store, "sqrt(4.45)"), Ok(2.109502));
        assert_eq!(run(&store, "2.11 ^ 2"), Ok(4.4521));
    }

    #[test]
    fn test_constants_and_builtins() {
        let store = DefinitionStore::new();
        assert_eq!(run(&store, "pi"), Ok(3.141593));
        assert_eq!(run(&store, "e"), Ok(2.718282));
        assert_eq!(run(&store, "ln(e)"), Ok(1.0));
        assert_eq!(run(&store, "arccos(1)"), Ok(0.0));
        assert_eq!(run(&store, "floor(2.7) + ceil(2.2) + abs(-1)"), Ok(6.0));
        assert_eq!(run(&store, "2pi"), Ok(6.283186));
    }

    #[test]
    fn test_errors() {
        let store = DefinitionStore::new();
        assert_eq!(run(&store, "1 / 0"), Err(EvalError::DivisionByZero));
        assert_eq!(run(&store, "5 % 0.2"), Err(EvalError::DivisionByZero));
        assert_eq!(
            run(&store, "x + 1"),
            Err(EvalError::UndefinedVariable("x".to_string()))
        );
    }

    #[test]
    fn test_malformed_programs_are_internal_errors() {
        let store = DefinitionStore::new();
        let evaluator = Evaluator::new(&store, EngineConfig::default());
        let locals = HashMap::new();

        let two_values = PostfixProgram::new(vec![Token::Number(1.0), Token::Number(2.0)]);
        assert_eq!(
            evaluator.evaluate(&two_values, &locals),
            Err(EvalError::InconsistentStack(2))
        );

        let lonely_plus = PostfixProgram::new(vec![
            Token::Number(1.0),
            Token::Operator(Operator::Add),
        ]);
        let error = evaluator.evaluate(&lonely_plus, &locals).unwrap_err();
        assert_eq!(error, EvalError::InsufficientOperands("+".to_string()));
        assert!(error.is_internal());

        assert_eq!(
            evaluator.evaluate(&PostfixProgram::default(), &locals),
            Err(EvalError::InconsistentStack(0))
        );
    }

    #[test]
    fn test_user_function_binds_arguments_in_order() {
        let mut store = DefinitionStore::new();
        define(&mut store, "f", &["a", "b"], "a + b*2");
        assert_eq!(run(&store, "f(1, 3)"), Ok(7.0));
        assert_eq!(run(&store, "f(3, 1)"), Ok(5.0));
        assert_eq!(run(&store, "f(f(1, 1), 0.5) * 2"), Ok(8.0));
    }

    #[test]
    fn test_locals_shadow_globals() {
        let mut store = DefinitionStore::new();
        store.set_variable("x", 100.0).unwrap();
        define(&mut store, "g", &["x"], "x + 1");
        assert_eq!(run(&store, "g(1)"), Ok(2.0));
        assert_eq!(run(&store, "x"), Ok(100.0));
    }

    #[test]
    fn test_call_site_arity_is_checked_at_run_time() {
        let mut store = DefinitionStore::new();
        define(&mut store, "f", &["x"], "x + 1");
        define(&mut store, "g", &["x"], "f(x) * 2");
        define(&mut store, "f", &["x", "y"], "x * y");

        let error = run(&store, "g(1)").unwrap_err();
        assert_eq!(
            error,
            EvalError::WrongArgumentCount {
                function: "f".to_string(),
                given: 1,
                expected: 2
            }
        );
        assert!(!error.is_internal());

        let evaluator = Evaluator::new(&store, EngineConfig::default());
        let forged = PostfixProgram::new(vec![
            Token::Number(1.0),
            Token::Number(2.0),
            Token::Function {
                name: "sqrt".to_string(),
                arg_count: 2,
            },
        ]);
        assert_eq!(
            evaluator.evaluate(&forged, &HashMap::new()),
            Err(EvalError::TooManyArguments {
                function: "sqrt".to_string(),
                given: 2
            })
        );
    }

    #[test]
    fn test_recursion_limit() {
        let mut store = DefinitionStore::new();
        define(&mut store, "loop", &["n"], "n");
        define(&mut store, "loop", &["n"], "loop(n + 1)");

        let program = Converter::new(&store, 6).convert("loop(0)").unwrap();
        let config = EngineConfig::default().with_recursion_limit(16);
        let result = Evaluator::new(&store, config).evaluate(&program, &HashMap::new());
        assert_eq!(
            result,
            Err(EvalError::RecursionLimitExceeded {
                function: "loop".to_string(),
                limit: 16
            })
        );
    }
}
