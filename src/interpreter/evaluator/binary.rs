use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::{
    ast::BinaryOp,
    error::EvalError,
    interpreter::{
        evaluator::core::EvalResult,
        units::{CompoundUnit, Unit, number_unit, seconds_unit},
        value::core::{DisplayHint, UnitVal, Value},
    },
    util::num::{rat_from_f64, rat_to_f64, rat_to_i64},
};

/// Dispatches a binary operator to its implementation.
pub fn apply(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => sub(left, right),
        BinaryOp::Mul => mul(left, right),
        BinaryOp::Div => div(left, right),
        BinaryOp::Pow => pow(left, right),
        BinaryOp::BitAnd => bitwise(left, right, "&"),
        BinaryOp::BitOr => bitwise(left, right, "|"),
        BinaryOp::BitXor => bitwise(left, right, "^"),
        BinaryOp::Shl => shift(left, right, true),
        BinaryOp::Shr => shift(left, right, false),
    }
}

/// Adds two values under the time and dimension rules.
///
/// Timestamp + duration keeps the timestamp's display zone; adding two
/// timestamps or a plain number to a timestamp is rejected. Unit-bearing
/// operands must match categories on both compound sides, and the result
/// carries the left operand's units.
pub fn add(a: &Value, b: &Value) -> EvalResult<Value> {
    if a.is_timestamp() && b.is_timestamp() {
        return Err(EvalError::TimestampPair { op: "add" });
    }
    if a.is_timestamp() {
        if b.is_duration() {
            let at = a.effective_rat() + b.effective_rat();
            return Ok(Value { display: a.display,
                              ..Value::timestamp(at) });
        }
        return Err(EvalError::TimestampNeedsDuration { op: "add to" });
    }
    if b.is_timestamp() {
        if a.is_duration() {
            let at = a.effective_rat() + b.effective_rat();
            return Ok(Value { display: b.display,
                              ..Value::timestamp(at) });
        }
        return Err(EvalError::TimestampNeedsDuration { op: "add to" });
    }

    linear_combine(a, b, "add", false)
}

/// Subtracts two values under the time and dimension rules.
///
/// Timestamp − timestamp yields a duration in seconds; timestamp −
/// duration stays a timestamp.
pub fn sub(a: &Value, b: &Value) -> EvalResult<Value> {
    if a.is_timestamp() && b.is_timestamp() {
        let diff = a.effective_rat() - b.effective_rat();
        return Ok(Value::with_unit(diff, seconds_unit()));
    }
    if a.is_timestamp() {
        if b.is_duration() {
            let at = a.effective_rat() - b.effective_rat();
            return Ok(Value { display: a.display,
                              ..Value::timestamp(at) });
        }
        return Err(EvalError::TimestampNeedsDuration { op: "subtract from" });
    }
    if b.is_timestamp() {
        return Err(EvalError::TimestampFromScalar);
    }

    linear_combine(a, b, "subtract", true)
}

/// Shared add/sub body for non-timestamp operands.
///
/// Offset-family (temperature) operands convert the right side with the
/// scale factor only: offsets apply to conversions, scale factors to
/// differences.
fn linear_combine(a: &Value, b: &Value, op: &'static str, negate: bool) -> EvalResult<Value> {
    let au = a.compound_unit();
    let bu = b.compound_unit();

    if au.is_empty() && bu.is_empty() {
        let b_eff = b.effective_rat();
        let rhs = if negate { -b_eff } else { b_eff };
        return Ok(Value::dimensionless(a.effective_rat() + rhs));
    }
    if au.is_empty() || bu.is_empty() {
        return Err(EvalError::MixedUnits { op });
    }
    if !au.compatible(&bu) {
        return Err(EvalError::UnitMismatch { op,
                                             left: au.display(),
                                             right: bu.display() });
    }

    let b_eff = if au.has_offset() || bu.has_offset() {
        b.effective_rat() * conversion_factor(&bu, &au)
    } else {
        b.effective_rat()
    };
    let rhs = if negate { -b_eff } else { b_eff };

    Ok(Value { num:     UnitVal { mag:  a.effective_rat() + rhs,
                                  unit: a.num.unit, },
               den:     UnitVal { mag:  BigRational::one(),
                                  unit: a.den.unit, },
               display: DisplayHint::None, })
}

/// Scale factor taking a display magnitude in `from` units to `to`
/// units. The `Number` sentinel's factor of one makes the formula
/// uniform across simple and compound shapes.
fn conversion_factor(from: &CompoundUnit, to: &CompoundUnit) -> BigRational {
    (&from.num.to_base / &to.num.to_base) * (&to.den.to_base / &from.den.to_base)
}

/// Multiplies two values, cancelling categories across the compound.
pub fn mul(a: &Value, b: &Value) -> EvalResult<Value> {
    if a.is_timestamp() || b.is_timestamp() {
        return Err(EvalError::TimestampScaling);
    }
    let (num_unit, den_unit) =
        cancel_units([a.num.unit, b.num.unit], [a.den.unit, b.den.unit])?;
    Ok(Value { num:     UnitVal { mag:  &a.num.mag * &b.num.mag,
                                  unit: num_unit, },
               den:     UnitVal { mag:  &a.den.mag * &b.den.mag,
                                  unit: den_unit, },
               display: DisplayHint::None, })
}

/// Divides two values, cancelling categories across the compound.
pub fn div(a: &Value, b: &Value) -> EvalResult<Value> {
    if a.is_timestamp() || b.is_timestamp() {
        return Err(EvalError::TimestampScaling);
    }
    if b.effective_rat().is_zero() {
        return Err(EvalError::DivisionByZero);
    }
    let (num_unit, den_unit) =
        cancel_units([a.num.unit, b.den.unit], [a.den.unit, b.num.unit])?;
    Ok(Value { num:     UnitVal { mag:  &a.num.mag * &b.den.mag,
                                  unit: num_unit, },
               den:     UnitVal { mag:  &a.den.mag * &b.num.mag,
                                  unit: den_unit, },
               display: DisplayHint::None, })
}

/// Category cancellation for multiplication and division.
///
/// The two units headed for the numerator and the two headed for the
/// denominator are reduced by removing one matching-category pair across
/// the sides. More than one surviving category per side cannot be
/// represented in a first-order compound and is rejected, as is any
/// temperature unit left in a compound position.
fn cancel_units(nums: [&'static Unit; 2],
                dens: [&'static Unit; 2])
                -> EvalResult<(&'static Unit, &'static Unit)> {
    let mut nums: Vec<&'static Unit> = nums.into_iter().filter(|u| !u.is_number()).collect();
    let mut dens: Vec<&'static Unit> = dens.into_iter().filter(|u| !u.is_number()).collect();

    let mut i = 0;
    while i < nums.len() {
        if let Some(j) = dens.iter().position(|d| d.category == nums[i].category) {
            nums.remove(i);
            dens.remove(j);
        } else {
            i += 1;
        }
    }

    if nums.len() > 1 || dens.len() > 1 {
        return Err(EvalError::CannotCombineUnits);
    }
    let num = nums.first().copied().unwrap_or_else(number_unit);
    let den = dens.first().copied().unwrap_or_else(number_unit);

    if den.has_offset() || (num.has_offset() && !den.is_number()) {
        return Err(EvalError::TemperatureInCompound);
    }
    Ok((num, den))
}

/// Exponentiation: exact for integer exponents, f64 otherwise. Both
/// operands must be dimensionless.
pub fn pow(a: &Value, b: &Value) -> EvalResult<Value> {
    if !a.is_dimensionless() || !b.is_dimensionless() {
        return Err(EvalError::TypeMismatch { details:
                                                 "** requires dimensionless values".to_string() });
    }
    let base = a.effective_rat();
    let exp = b.effective_rat();

    if exp.is_integer() {
        let e = rat_to_i64(&exp).ok_or_else(|| EvalError::OutOfRange { name: "**".to_string() })?;
        let abs = u32::try_from(e.unsigned_abs()).map_err(|_| {
                                                     EvalError::OutOfRange { name:
                                                                                 "**".to_string() }
                                                 })?;
        let mut r = BigRational::new(base.numer().pow(abs), base.denom().pow(abs));
        if e < 0 {
            if r.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            r = r.recip();
        }
        return Ok(Value::dimensionless(r));
    }

    let result = rat_to_f64(&base).powf(rat_to_f64(&exp));
    let r = rat_from_f64(result).ok_or_else(|| EvalError::OutOfRange { name: "**".to_string() })?;
    Ok(Value::decimal(r))
}

/// Bitwise AND / OR / XOR on integer display magnitudes.
pub fn bitwise(a: &Value, b: &Value, op: &'static str) -> EvalResult<Value> {
    let x = integer_operand(a, op)?;
    let y = integer_operand(b, op)?;
    let result = match op {
        "&" => x & y,
        "|" => x | y,
        _ => x ^ y,
    };
    Ok(Value::dimensionless(BigRational::from_integer(result)))
}

/// Bitwise NOT with two's-complement semantics on arbitrary-precision
/// integers: `~x = -x - 1`.
pub fn bitwise_not(a: &Value) -> EvalResult<Value> {
    let x = integer_operand(a, "~")?;
    Ok(Value::dimensionless(BigRational::from_integer(-x - BigInt::one())))
}

/// Left/right shift by a non-negative integer count.
pub fn shift(a: &Value, b: &Value, left: bool) -> EvalResult<Value> {
    let op = if left { "<<" } else { ">>" };
    let x = integer_operand(a, op)?;
    let count = rat_to_i64(&b.display_rat()).ok_or(EvalError::IntegerRequired { op })?;
    if count < 0 {
        return Err(EvalError::NegativeShift);
    }
    let count = u32::try_from(count).map_err(|_| EvalError::ShiftTooLarge)?;
    let result = if left {
        x << count
    } else {
        x >> count
    };
    Ok(Value::dimensionless(BigRational::from_integer(result)))
}

/// Arithmetic negation; units and display hints ride along.
#[must_use]
pub fn neg(a: &Value) -> Value {
    Value { num: UnitVal { mag:  -a.num.mag.clone(),
                           unit: a.num.unit, },
            ..a.clone() }
}

/// The percent postfix: divide by 100, dropping units, rendering as a
/// decimal.
#[must_use]
pub fn percent(a: &Value) -> Value {
    Value::decimal(a.effective_rat() / BigRational::from_integer(BigInt::from(100)))
}

/// Factorial of a non-negative integer, capped at 10000 to bound
/// allocation.
pub fn factorial(a: &Value) -> EvalResult<Value> {
    let r = a.display_rat();
    if !r.is_integer() || r.is_negative() {
        return Err(EvalError::InvalidFactorial);
    }
    let n = rat_to_i64(&r).ok_or(EvalError::FactorialTooLarge)?;
    if n > 10_000 {
        return Err(EvalError::FactorialTooLarge);
    }
    let mut result = BigInt::one();
    for i in 2..=n {
        result *= BigInt::from(i);
    }
    Ok(Value::dimensionless(BigRational::from_integer(result)))
}

fn integer_operand(v: &Value, op: &'static str) -> EvalResult<BigInt> {
    let r = v.display_rat();
    if !r.is_integer() {
        return Err(EvalError::IntegerRequired { op });
    }
    Ok(r.to_integer())
}
