use std::collections::HashMap;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{
    ast::{Expr, UnaryOp},
    error::{Error, EvalError},
    interpreter::{
        evaluator::{binary, convert, function, time},
        parser::core::parse_line,
        units::lookup_unit,
        value::core::{DisplayHint, UnitVal, Value},
    },
    util::num::rat_from_f64,
};

/// The variable environment: names (and `#N` line references) to values.
pub type Env = HashMap<String, Value>;

/// Result type used throughout the evaluator.
pub type EvalResult<T> = Result<T, EvalError>;

/// Evaluates an AST node in the given environment.
///
/// The dispatcher is a single exhaustive match; each arm delegates to the
/// module owning that operation's semantics. Assignments write into the
/// environment and also yield their value.
///
/// # Errors
/// Returns an [`EvalError`] from the innermost failing site.
pub fn eval(expr: &Expr, env: &mut Env) -> EvalResult<Value> {
    match expr {
        Expr::Number { value } => Ok(Value::dimensionless(value.clone())),
        Expr::Variable { name } => eval_variable(name, env),
        Expr::Unary { op, operand } => {
            let value = eval(operand, env)?;
            match op {
                UnaryOp::Neg => Ok(binary::neg(&value)),
                UnaryOp::BitNot => binary::bitwise_not(&value),
            }
        },
        Expr::Binary { op, left, right } => {
            let left = eval(left, env)?;
            let right = eval(right, env)?;
            binary::apply(*op, &left, &right)
        },
        Expr::Unit { expr, unit } => {
            let value = eval(expr, env)?;
            convert::apply_unit(&value, *unit)
        },
        Expr::Assign { name, expr } => {
            let value = eval(expr, env)?;
            env.insert(name.clone(), value.clone());
            Ok(value)
        },
        Expr::Call { name, args } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval(arg, env)?);
            }
            function::call(name, &values)
        },
        Expr::TimeOfDay { raw } => time::eval_time_of_day(raw),
        Expr::ZoneIn { expr, zone } => {
            let value = eval(expr, env)?;
            time::apply_input_zone(&value, zone)
        },
        Expr::AmPm { expr, is_pm } => {
            let value = eval(expr, env)?;
            time::apply_am_pm(&value, *is_pm)
        },
        Expr::Percent { expr } => {
            let value = eval(expr, env)?;
            Ok(binary::percent(&value))
        },
        Expr::Factorial { expr } => {
            let value = eval(expr, env)?;
            binary::factorial(&value)
        },
        Expr::Convert { expr, target } => {
            let value = eval(expr, env)?;
            convert::eval_conversion(&value, *target)
        },
    }
}

/// Resolves a name: environment first, then the built-in constants, then
/// the bare-unit fallback that reads a unit name as one of that unit
/// (`gallon` → `1 gal`, enabling `10 miles / gallon`).
fn eval_variable(name: &str, env: &Env) -> EvalResult<Value> {
    if let Some(value) = env.get(name) {
        return Ok(value.clone());
    }

    match name {
        "pi" => return constant_rational("pi", std::f64::consts::PI),
        "e" => return constant_rational("e", std::f64::consts::E),
        "c" => {
            let metre = lookup_unit("m").ok_or_else(|| undefined(name))?;
            let second = lookup_unit("s").ok_or_else(|| undefined(name))?;
            return Ok(Value { num:     UnitVal { mag:  BigRational::from_integer(
                                                     BigInt::from(299_792_458_u32)),
                                                 unit: metre, },
                              den:     UnitVal { mag:  BigRational::from_integer(BigInt::from(1)),
                                                 unit: second, },
                              display: DisplayHint::None, });
        },
        _ => {},
    }

    if let Some(unit) = lookup_unit(name) {
        // Offset units store display values, so a bare `celsius` is 1 as
        // written; everything else stores one display unit in base terms.
        let mag = if unit.has_offset() {
            BigRational::from_integer(BigInt::from(1))
        } else {
            unit.to_base.clone()
        };
        return Ok(Value::with_unit(mag, unit));
    }

    Err(undefined(name))
}

fn undefined(name: &str) -> EvalError {
    EvalError::UndefinedVariable { name: name.to_string() }
}

fn constant_rational(name: &str, f: f64) -> EvalResult<Value> {
    let r = rat_from_f64(f).ok_or_else(|| EvalError::OutOfRange { name: name.to_string() })?;
    Ok(Value::decimal(r))
}

/// Lexes, parses, and evaluates a single line against an environment.
///
/// Returns `Ok(None)` for blank lines. Assignments bind into `env` and
/// return their value.
///
/// # Errors
/// Returns [`Error::Parse`] or [`Error::Eval`] from the failing phase.
///
/// # Example
/// ```
/// use ratcalc::{Env, eval_line};
///
/// let mut env = Env::new();
/// let v = eval_line("x = 1/3 + 1/6", &mut env).unwrap().unwrap();
/// assert_eq!(v.to_string(), "1/2");
/// let v = eval_line("x * 2", &mut env).unwrap().unwrap();
/// assert_eq!(v.to_string(), "1");
/// ```
pub fn eval_line(line: &str, env: &mut Env) -> Result<Option<Value>, Error> {
    let Some(node) = parse_line(line)? else {
        return Ok(None);
    };
    Ok(Some(eval(&node, env)?))
}
