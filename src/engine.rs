use crate::config::EngineConfig;
use crate::error::{EvalError, Result};
use crate::functions::Builtins;
use crate::postfix::{Converter, Evaluator, PostfixProgram};
use crate::statement::Statement;
use crate::store::{DefinitionStore, FunctionDefinition};
use log::{debug, error};
use std::collections::HashMap;

/// What a successfully evaluated statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Value(f64),
    Assigned { name: String, value: f64 },
    Defined { name: String, parameters: Vec<String> },
}

impl Evaluation {
    /// The numeric result, if the statement had one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Evaluation::Value(value) | Evaluation::Assigned { value, .. } => Some(*value),
            Evaluation::Defined { .. } => None,
        }
    }
}

/// Expression engine with its own variables and user-defined functions.
///
/// Statements mutate the engine, so concurrent callers must serialise every
/// `evaluate` call themselves.
pub struct EvalMath {
    config: EngineConfig,
    store: DefinitionStore,
}

impl EvalMath {
    pub fn new(precision: u32) -> Self {
        Self::with_config(EngineConfig::default().with_precision(precision))
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            store: DefinitionStore::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluates one statement: a variable assignment (`x = 2`), a function
    /// definition (`f(a, b) = a * b`) or a plain expression.
    ///
    /// A failed statement leaves every variable and function untouched.
    pub fn evaluate(&mut self, statement: &str) -> Result<Evaluation> {
        let result = Self::prepare(statement).and_then(|input| self.dispatch(input));
        if let Err(err) = &result {
            error!("Failed to evaluate '{}': {}", statement, err);
        }
        result
    }

    /// Evaluates a plain expression without touching the engine's state.
    pub fn evaluate_expression(&self, expression: &str) -> Result<f64> {
        let result = Self::prepare(expression).and_then(|input| self.compute(input));
        if let Err(err) = &result {
            error!("Failed to evaluate '{}': {}", expression, err);
        }
        result
    }

    /// User variables and their values; `pi` and `e` are left out.
    pub fn user_variables(&self) -> HashMap<String, f64> {
        self.store.user_variables()
    }

    /// Signatures of user functions, e.g. `f(a,b)`.
    pub fn user_functions(&self) -> Vec<String> {
        self.store.user_functions()
    }

    /// Converts an expression to postfix without evaluating it.
    pub fn compile(&self, expression: &str) -> Result<PostfixProgram> {
        let input = Self::prepare(expression)?;
        self.converter().convert(input)
    }

    fn prepare(statement: &str) -> Result<&str> {
        let trimmed = statement.trim();
        let trimmed = trimmed.strip_suffix(';').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(EvalError::EmptyExpression);
        }
        Ok(trimmed)
    }

    fn converter(&self) -> Converter<'_, DefinitionStore> {
        Converter::new(&self.store, self.config.precision)
    }

    fn dispatch(&mut self, input: &str) -> Result<Evaluation> {
        match Statement::classify(input) {
            Statement::VariableAssignment { name, expression } => {
                self.assign_variable(name, expression)
            }
            Statement::FunctionAssignment {
                name,
                parameters,
                expression,
            } => self.define_function(name, &parameters, expression),
            Statement::Expression(expression) => self.compute(expression).map(Evaluation::Value),
        }
    }

    fn compute(&self, expression: &str) -> Result<f64> {
        let program = self.converter().convert(expression)?;
        Evaluator::new(&self.store, self.config).evaluate(&program, &HashMap::new())
    }

    fn assign_variable(&mut self, name: &str, expression: &str) -> Result<Evaluation> {
        if DefinitionStore::is_constant(name) {
            return Err(EvalError::ConstantAssignment(name.to_string()));
        }
        let value = self.compute(expression)?;
        if value.is_nan() {
            return Err(EvalError::NonNumericResult(name.to_string()));
        }
        self.store.set_variable(name, value)?;
        debug!("Assigned {} = {}", name, value);
        Ok(Evaluation::Assigned {
            name: name.to_string(),
            value,
        })
    }

    fn define_function(
        &mut self,
        name: &str,
        parameters: &[&str],
        expression: &str,
    ) -> Result<Evaluation> {
        if Builtins::is_builtin(name) {
            return Err(EvalError::BuiltinRedefinition(name.to_string()));
        }
        if parameters.is_empty() {
            return Err(EvalError::MissingParameters(name.to_string()));
        }
        let mut declared: Vec<String> = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            if declared.iter().any(|p| p == parameter) {
                return Err(EvalError::DuplicateParameter {
                    function: name.to_string(),
                    parameter: parameter.to_string(),
                });
            }
            declared.push(parameter.to_string());
        }

        let program = self.converter().convert(expression)?;
        let body = program.resolve_identifiers(&declared, self.store.bindings())?;
        debug!("Defined {}({}) as {}", name, declared.join(","), body);
        self.store
            .define_function(FunctionDefinition::new(name, declared.clone(), body))?;
        Ok(Evaluation::Defined {
            name: name.to_string(),
            parameters: declared,
        })
    }
}

impl Default for EvalMath {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}
