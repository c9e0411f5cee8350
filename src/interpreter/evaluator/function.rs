use num_rational::BigRational;
use num_traits::Signed;

use crate::{
    error::EvalError,
    interpreter::{
        evaluator::{
            binary,
            core::EvalResult,
            time::{self, components},
        },
        value::core::Value,
    },
    util::num::{rat_from_f64, rat_round_half_even, rat_to_f64},
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the already-evaluated argument values and returns
/// the resulting value.
type BuiltinFn = fn(&[Value]) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
#[derive(Clone, Copy)]
enum Arity {
    /// Exactly `n` arguments.
    Exact(usize),
    /// Any arity in the listed set.
    OneOf(&'static [usize]),
}

impl Arity {
    fn check(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::OneOf(set) => set.contains(&n),
        }
    }
}

/// Defines builtin functions by generating a lookup table.
///
/// Each entry provides the name, an arity specification with its
/// human-readable description (used in arity-mismatch messages), and a
/// handler.
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                expects: $expects:literal,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:    &'static str,
            arity:   Arity,
            expects: &'static str,
            func:    BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, expects: $expects, func: $func },
            )*
        ];
        /// The names of all builtin functions.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    // Time.
    "now"    => { arity: Arity::Exact(0), expects: "no arguments", func: time::now_value },
    "date"   => { arity: Arity::OneOf(&[3, 6]), expects: "3 or 6 arguments", func: time::date_value },
    "time"   => { arity: Arity::OneOf(&[2, 3]), expects: "2 or 3 arguments", func: time::time_value },
    "unix"   => { arity: Arity::Exact(1), expects: "1 argument", func: time::unix_value },
    // Extractors.
    "year"   => { arity: Arity::Exact(1), expects: "1 argument", func: |args| time::extract("year", args, components::year) },
    "month"  => { arity: Arity::Exact(1), expects: "1 argument", func: |args| time::extract("month", args, components::month) },
    "day"    => { arity: Arity::Exact(1), expects: "1 argument", func: |args| time::extract("day", args, components::day) },
    "hour"   => { arity: Arity::Exact(1), expects: "1 argument", func: |args| time::extract("hour", args, components::hour) },
    "minute" => { arity: Arity::Exact(1), expects: "1 argument", func: |args| time::extract("minute", args, components::minute) },
    "second" => { arity: Arity::Exact(1), expects: "1 argument", func: |args| time::extract("second", args, components::second) },
    // IEEE-754 math.
    "sin"    => { arity: Arity::Exact(1), expects: "1 argument", func: |args| math1("sin", args, f64::sin) },
    "cos"    => { arity: Arity::Exact(1), expects: "1 argument", func: |args| math1("cos", args, f64::cos) },
    "tan"    => { arity: Arity::Exact(1), expects: "1 argument", func: |args| math1("tan", args, f64::tan) },
    "asin"   => { arity: Arity::Exact(1), expects: "1 argument", func: |args| math1("asin", args, f64::asin) },
    "acos"   => { arity: Arity::Exact(1), expects: "1 argument", func: |args| math1("acos", args, f64::acos) },
    "atan"   => { arity: Arity::Exact(1), expects: "1 argument", func: |args| math1("atan", args, f64::atan) },
    "atan2"  => { arity: Arity::Exact(2), expects: "2 arguments", func: |args| math2("atan2", args, f64::atan2) },
    "sqrt"   => { arity: Arity::Exact(1), expects: "1 argument", func: |args| math1("sqrt", args, f64::sqrt) },
    "log"    => { arity: Arity::Exact(1), expects: "1 argument", func: |args| math1("log", args, f64::log10) },
    "ln"     => { arity: Arity::Exact(1), expects: "1 argument", func: |args| math1("ln", args, f64::ln) },
    "log2"   => { arity: Arity::Exact(1), expects: "1 argument", func: |args| math1("log2", args, f64::log2) },
    "pow"    => { arity: Arity::Exact(2), expects: "2 arguments", func: |args| binary::pow(&args[0], &args[1]) },
    // Exact rational math.
    "abs"    => { arity: Arity::Exact(1), expects: "1 argument", func: |args| rational1("abs", args, |r| r.abs()) },
    "ceil"   => { arity: Arity::Exact(1), expects: "1 argument", func: |args| rational1("ceil", args, num_rational::BigRational::ceil) },
    "floor"  => { arity: Arity::Exact(1), expects: "1 argument", func: |args| rational1("floor", args, num_rational::BigRational::floor) },
    "round"  => { arity: Arity::Exact(1), expects: "1 argument", func: |args| rational1("round", args, |r| rat_round_half_even(r)) },
    "min"    => { arity: Arity::Exact(2), expects: "2 arguments", func: |args| rational2("min", args, |a, b| Ok(a.clone().min(b.clone()))) },
    "max"    => { arity: Arity::Exact(2), expects: "2 arguments", func: |args| rational2("max", args, |a, b| Ok(a.clone().max(b.clone()))) },
    "mod"    => { arity: Arity::Exact(2), expects: "2 arguments", func: |args| rational2("mod", args, rat_mod) },
    // Finance.
    "fv"     => { arity: Arity::Exact(3), expects: "3 arguments", func: |args| finance3("fv", args, |rate, n, pmt| pmt * ((1.0 + rate).powf(n) - 1.0) / rate) },
    "pv"     => { arity: Arity::Exact(3), expects: "3 arguments", func: |args| finance3("pv", args, |rate, n, pmt| pmt * (1.0 - (1.0 + rate).powf(-n)) / rate) },
    // Utility.
    "num"    => { arity: Arity::Exact(1), expects: "1 argument", func: |args| Ok(Value::dimensionless(args[0].display_rat())) },
}

/// Evaluates a builtin function call.
///
/// Looks the name up in the builtin table, verifies arity, and runs the
/// handler.
///
/// # Errors
/// - [`EvalError::UnknownFunction`] for names not in the table.
/// - [`EvalError::ArityMismatch`] for a wrong argument count.
/// - Whatever the handler itself raises.
pub fn call(name: &str, args: &[Value]) -> EvalResult<Value> {
    let Some(def) = BUILTIN_TABLE.iter().find(|def| def.name == name) else {
        return Err(EvalError::UnknownFunction { name: name.to_string() });
    };
    if !def.arity.check(args.len()) {
        return Err(EvalError::ArityMismatch { name:     name.to_string(),
                                              expected: def.expects, });
    }
    (def.func)(args)
}

/// Adapter for one-argument f64 functions. The input must be
/// dimensionless; the result is re-wrapped as a rational and rendered as
/// a decimal.
fn math1(name: &str, args: &[Value], f: fn(f64) -> f64) -> EvalResult<Value> {
    let x = dimensionless_arg(name, &args[0])?;
    finite_decimal(name, f(rat_to_f64(&x)))
}

/// Adapter for two-argument f64 functions.
fn math2(name: &str, args: &[Value], f: fn(f64, f64) -> f64) -> EvalResult<Value> {
    let a = dimensionless_arg(name, &args[0])?;
    let b = dimensionless_arg(name, &args[1])?;
    finite_decimal(name, f(rat_to_f64(&a), rat_to_f64(&b)))
}

/// Adapter for one-argument exact rational functions.
fn rational1(name: &str,
             args: &[Value],
             f: impl Fn(&BigRational) -> BigRational)
             -> EvalResult<Value> {
    let x = dimensionless_arg(name, &args[0])?;
    Ok(Value::dimensionless(f(&x)))
}

/// Adapter for two-argument exact rational functions.
fn rational2(name: &str,
             args: &[Value],
             f: impl Fn(&BigRational, &BigRational) -> EvalResult<BigRational>)
             -> EvalResult<Value> {
    let a = dimensionless_arg(name, &args[0])?;
    let b = dimensionless_arg(name, &args[1])?;
    Ok(Value::dimensionless(f(&a, &b)?))
}

/// Adapter for the three-argument finance formulas, computed in f64.
fn finance3(name: &str, args: &[Value], f: fn(f64, f64, f64) -> f64) -> EvalResult<Value> {
    let rate = dimensionless_arg(name, &args[0])?;
    let n = dimensionless_arg(name, &args[1])?;
    let pmt = dimensionless_arg(name, &args[2])?;
    finite_decimal(name, f(rat_to_f64(&rate), rat_to_f64(&n), rat_to_f64(&pmt)))
}

/// Floored modulo: `a - floor(a/b) * b`.
fn rat_mod(a: &BigRational, b: &BigRational) -> EvalResult<BigRational> {
    use num_traits::Zero;
    if b.is_zero() {
        return Err(EvalError::DivisionByZero);
    }
    Ok(a - (a / b).floor() * b)
}

fn dimensionless_arg(name: &str, v: &Value) -> EvalResult<BigRational> {
    if !v.is_dimensionless() {
        return Err(EvalError::TypeMismatch { details:
                                                 format!("{name}() requires a dimensionless value") });
    }
    Ok(v.effective_rat())
}

fn finite_decimal(name: &str, result: f64) -> EvalResult<Value> {
    let r = rat_from_f64(result).ok_or_else(|| EvalError::OutOfRange { name: name.to_string() })?;
    Ok(Value::decimal(r))
}
