/// Settings fixed for the lifetime of an engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Decimal places every intermediate value is rounded to.
    pub precision: u32,
    /// Deepest allowed nesting of user-defined function calls.
    pub recursion_limit: usize,
}

impl EngineConfig {
    pub const DEFAULT_PRECISION: u32 = 6;
    pub const DEFAULT_RECURSION_LIMIT: usize = 256;

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_recursion_limit(mut self, recursion_limit: usize) -> Self {
        self.recursion_limit = recursion_limit;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            precision: Self::DEFAULT_PRECISION,
            recursion_limit: Self::DEFAULT_RECURSION_LIMIT,
        }
    }
}
