/// Values that can live on a [`Stack`]. Numeric entries are rounded to the
/// stack precision on every push; markers pass through untouched.
pub trait StackValue: Sized {
    fn normalize(self, _precision: u32) -> Self {
        self
    }
}

impl StackValue for f64 {
    fn normalize(self, precision: u32) -> Self {
        round_to_precision(self, precision)
    }
}

/// Rounds half away from zero to `precision` decimal places.
pub fn round_to_precision(value: f64, precision: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(i32::try_from(precision).unwrap_or(i32::MAX));
    let scaled = value * factor;
    // Past 2^53 every f64 is already an integer at this scale.
    if !scaled.is_finite() || scaled.abs() >= 9_007_199_254_740_992.0 {
        return value;
    }
    scaled.round() / factor
}

#[derive(Debug, Clone)]
pub struct Stack<T> {
    precision: u32,
    items: Vec<T>,
}

impl<T: StackValue> Stack<T> {
    pub fn new(precision: u32) -> Self {
        Self {
            precision,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value.normalize(self.precision));
    }

    /// Empty is not an error here; the caller decides what it means.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// `peek(1)` is the top of the stack, `peek(2)` the entry below it.
    pub fn peek(&self, depth: usize) -> Option<&T> {
        if depth == 0 || depth > self.items.len() {
            return None;
        }
        self.items.get(self.items.len() - depth)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
