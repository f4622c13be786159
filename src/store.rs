use crate::error::{EvalError, Result};
use crate::functions::Builtins;
use crate::postfix::{Arity, FunctionTable, PostfixProgram};
use std::collections::{BTreeMap, HashMap};

/// Reserved names, bound at construction and never reassigned.
pub const CONSTANTS: [&str; 2] = ["pi", "e"];

/// A user-defined function. The body has its free variables already
/// replaced by their values, so only parameters remain as identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    name: String,
    parameters: Vec<String>,
    body: PostfixProgram,
}

impl FunctionDefinition {
    pub fn new(name: &str, parameters: Vec<String>, body: PostfixProgram) -> Self {
        Self {
            name: name.to_string(),
            parameters,
            body,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn body(&self) -> &PostfixProgram {
        &self.body
    }

    /// `name(a,b)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.parameters.join(","))
    }
}

/// Variables, constants and user functions of one engine.
///
/// Not synchronised: share it across threads only behind a lock held for
/// the whole statement.
pub struct DefinitionStore {
    variables: HashMap<String, f64>,
    functions: BTreeMap<String, FunctionDefinition>,
    builtins: Builtins,
}

impl DefinitionStore {
    pub fn new() -> Self {
        let variables = HashMap::from([
            ("pi".to_string(), std::f64::consts::PI),
            ("e".to_string(), std::f64::consts::E),
        ]);
        Self {
            variables,
            functions: BTreeMap::new(),
            builtins: Builtins::standard(),
        }
    }

    pub fn is_constant(name: &str) -> bool {
        CONSTANTS.contains(&name)
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }

    /// Variables and constants together.
    pub fn bindings(&self) -> &HashMap<String, f64> {
        &self.variables
    }

    pub fn set_variable(&mut self, name: &str, value: f64) -> Result<()> {
        if Self::is_constant(name) {
            return Err(EvalError::ConstantAssignment(name.to_string()));
        }
        self.variables.insert(name.to_string(), value);
        Ok(())
    }

    pub fn user_variables(&self) -> HashMap<String, f64> {
        self.variables
            .iter()
            .filter(|(name, _)| !Self::is_constant(name))
            .map(|(name, value)| (name.clone(), *value))
            .collect()
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(name)
    }

    pub fn define_function(&mut self, definition: FunctionDefinition) -> Result<()> {
        if Builtins::is_builtin(definition.name()) {
            return Err(EvalError::BuiltinRedefinition(definition.name().to_string()));
        }
        self.functions
            .insert(definition.name().to_string(), definition);
        Ok(())
    }

    /// Signatures of the user functions, sorted by name.
    pub fn user_functions(&self) -> Vec<String> {
        self.functions.values().map(|f| f.signature()).collect()
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionTable for DefinitionStore {
    fn arity(&self, name: &str) -> Option<Arity> {
        if Builtins::is_builtin(name) {
            Some(Arity::Builtin)
        } else {
            self.functions
                .get(name)
                .map(|f| Arity::Exactly(f.parameters().len()))
        }
    }
}
