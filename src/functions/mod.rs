pub mod elementary;
pub mod trig;

use crate::error::{EvalError, Result};
use std::collections::HashMap;

pub type BuiltinFn = fn(&[f64]) -> Result<f64>;

/// Every name the parser accepts as a built-in call, aliases included.
pub const BUILTIN_NAMES: [&str; 25] = [
    "sin", "sinh", "arcsin", "asin", "arcsinh", "asinh", "cos", "cosh", "arccos", "acos",
    "arccosh", "acosh", "tan", "tanh", "arctan", "atan", "arctanh", "atanh", "sqrt", "abs", "ln",
    "log", "log10", "floor", "ceil",
];

/// Registry of the elementary functions, keyed by canonical name.
pub struct Builtins {
    functions: HashMap<String, BuiltinFn>,
}

impl Builtins {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// The registry with every standard function registered.
    pub fn standard() -> Self {
        let mut builtins = Self::new();
        trig::register(&mut builtins);
        elementary::register(&mut builtins);
        builtins
    }

    pub fn register(&mut self, name: &str, function: BuiltinFn) {
        self.functions.insert(name.to_string(), function);
    }

    pub fn is_builtin(name: &str) -> bool {
        BUILTIN_NAMES.contains(&name)
    }

    /// `arcX` is `aX` and `ln` is `log`.
    pub fn canonical_name(name: &str) -> String {
        match name {
            "ln" => "log".to_string(),
            _ => match name.strip_prefix("arc") {
                Some(rest) => format!("a{}", rest),
                None => name.to_string(),
            },
        }
    }

    pub fn call(&self, name: &str, args: &[f64]) -> Result<f64> {
        let function = self
            .functions
            .get(&Self::canonical_name(name))
            .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
        function(args)
    }
}

impl Default for Builtins {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_resolves() {
        let builtins = Builtins::standard();
        for name in BUILTIN_NAMES {
            assert!(builtins.call(name, &[0.5]).is_ok(), "{} is not callable", name);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!(Builtins::canonical_name("arcsinh"), "asinh");
        assert_eq!(Builtins::canonical_name("ln"), "log");
        assert_eq!(Builtins::canonical_name("log10"), "log10");

        let builtins = Builtins::standard();
        assert_eq!(builtins.call("arctan", &[1.0]), builtins.call("atan", &[1.0]));
        assert_eq!(builtins.call("ln", &[1.0]), Ok(0.0));
    }

    #[test]
    fn test_unknown_function() {
        let builtins = Builtins::new();
        assert_eq!(
            builtins.call("sin", &[1.0]),
            Err(EvalError::UnknownFunction("sin".to_string()))
        );
        assert!(!Builtins::is_builtin("max"));
    }
}
