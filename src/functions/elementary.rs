use crate::functions::Builtins;
use evalmath_macros::builtin_fn;

pub fn register(builtins: &mut Builtins) {
    builtins.register("sqrt", sqrt);
    builtins.register("abs", abs);
    builtins.register("log", natural_log);
    builtins.register("log10", log10);
    builtins.register("floor", floor);
    builtins.register("ceil", ceil);
}

#[builtin_fn]
fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

#[builtin_fn]
fn abs(x: f64) -> f64 {
    x.abs()
}

#[builtin_fn]
fn natural_log(x: f64) -> f64 {
    x.ln()
}

#[builtin_fn]
fn log10(x: f64) -> f64 {
    x.log10()
}

#[builtin_fn]
fn floor(x: f64) -> f64 {
    x.floor()
}

#[builtin_fn]
fn ceil(x: f64) -> f64 {
    x.ceil()
}
