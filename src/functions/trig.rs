use crate::functions::Builtins;
use evalmath_macros::builtin_fn;

pub fn register(builtins: &mut Builtins) {
    builtins.register("sin", sin);
    builtins.register("cos", cos);
    builtins.register("tan", tan);
    builtins.register("asin", asin);
    builtins.register("acos", acos);
    builtins.register("atan", atan);
    builtins.register("sinh", sinh);
    builtins.register("cosh", cosh);
    builtins.register("tanh", tanh);
    builtins.register("asinh", asinh);
    builtins.register("acosh", acosh);
    builtins.register("atanh", atanh);
}

#[builtin_fn]
fn sin(x: f64) -> f64 {
    x.sin()
}

#[builtin_fn]
fn cos(x: f64) -> f64 {
    x.cos()
}

#[builtin_fn]
fn tan(x: f64) -> f64 {
    x.tan()
}

#[builtin_fn]
fn asin(x: f64) -> f64 {
    x.asin()
}

#[builtin_fn]
fn acos(x: f64) -> f64 {
    x.acos()
}

#[builtin_fn]
fn atan(x: f64) -> f64 {
    x.atan()
}

#[builtin_fn]
fn sinh(x: f64) -> f64 {
    x.sinh()
}

#[builtin_fn]
fn cosh(x: f64) -> f64 {
    x.cosh()
}

#[builtin_fn]
fn tanh(x: f64) -> f64 {
    x.tanh()
}

#[builtin_fn]
fn asinh(x: f64) -> f64 {
    x.asinh()
}

#[builtin_fn]
fn acosh(x: f64) -> f64 {
    x.acosh()
}

#[builtin_fn]
fn atanh(x: f64) -> f64 {
    x.atanh()
}
