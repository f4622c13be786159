use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Input expression cannot be empty")]
    EmptyExpression,

    #[error("Illegal character '{0}'")]
    IllegalCharacter(char),

    #[error("Unexpected '{0}'")]
    UnexpectedToken(String),

    #[error("Unmatched ')'")]
    UnmatchedParenthesis,

    #[error("Expecting ')'")]
    UnbalancedParenthesis,

    #[error("Operator '{0}' lacks operand")]
    OperatorLacksOperand(char),

    #[error("Too many arguments for '{function}()' ({given} given, 1 expected)")]
    TooManyArguments { function: String, given: usize },

    #[error("Wrong number of arguments for '{function}()' ({given} given, {expected} expected)")]
    WrongArgumentCount {
        function: String,
        given: usize,
        expected: usize,
    },

    #[error("Undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    #[error("Cannot assign to constant '{0}'")]
    ConstantAssignment(String),

    #[error("Cannot redefine built-in function '{0}()'")]
    BuiltinRedefinition(String),

    #[error("Function '{0}' must have at least one argument")]
    MissingParameters(String),

    #[error("Parameter '{parameter}' of '{function}()' is declared more than once")]
    DuplicateParameter { function: String, parameter: String },

    #[error("Failed to assign variable '{0}', value must be numeric")]
    NonNumericResult(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Internal error: Insufficient operands for '{0}'")]
    InsufficientOperands(String),

    #[error("Internal error: Inconsistent stack state at the end of evaluation ({0} values left)")]
    InconsistentStack(usize),

    #[error("Recursion limit of {limit} exceeded while calling '{function}()'")]
    RecursionLimitExceeded { function: String, limit: usize },
}

impl EvalError {
    /// Errors that can only come out of a converter or evaluator bug, never
    /// out of user input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            EvalError::InsufficientOperands(_) | EvalError::InconsistentStack(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;
