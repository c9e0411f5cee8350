use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};

/// Builds a rational from a plain decimal digit run such as `"42"`.
///
/// # Parameters
/// - `digits`: The literal text, decimal digits only.
///
/// # Returns
/// `Some(BigRational)` on success, `None` if the text is not a digit run.
///
/// # Example
/// ```
/// use ratcalc::util::num::rat_from_digits;
///
/// let r = rat_from_digits("42").unwrap();
/// assert_eq!(r.to_string(), "42");
/// ```
#[must_use]
pub fn rat_from_digits(digits: &str) -> Option<BigRational> {
    let n = BigInt::parse_bytes(digits.as_bytes(), 10)?;
    Some(BigRational::from_integer(n))
}

/// Builds a rational from a prefixed integer literal: `0x…`, `0b…`, or
/// `0o…` (prefix letter case-insensitive).
///
/// # Parameters
/// - `literal`: The whole literal including the prefix.
///
/// # Returns
/// `Some(BigRational)` when the prefix and digits are valid, `None`
/// otherwise.
///
/// # Example
/// ```
/// use ratcalc::util::num::rat_from_prefixed;
///
/// assert_eq!(rat_from_prefixed("0xFF").unwrap().to_string(), "255");
/// assert_eq!(rat_from_prefixed("0b1010").unwrap().to_string(), "10");
/// assert_eq!(rat_from_prefixed("0o77").unwrap().to_string(), "63");
/// ```
#[must_use]
pub fn rat_from_prefixed(literal: &str) -> Option<BigRational> {
    let rest = literal.get(2..)?;
    let base = match literal.as_bytes().get(1)? {
        b'x' | b'X' => 16,
        b'b' | b'B' => 2,
        b'o' | b'O' => 8,
        _ => return None,
    };
    let n = BigInt::parse_bytes(rest.as_bytes(), base)?;
    Some(BigRational::from_integer(n))
}

/// Builds a rational from the two halves of a decimal literal, e.g.
/// `("3", "14")` for `3.14`.
///
/// # Returns
/// `Some(BigRational)` holding the exact decimal value, `None` when either
/// half fails to parse as digits.
///
/// # Example
/// ```
/// use ratcalc::util::num::rat_from_decimal;
///
/// assert_eq!(rat_from_decimal("3", "14").unwrap().to_string(), "157/50");
/// ```
#[must_use]
pub fn rat_from_decimal(int_part: &str, frac_part: &str) -> Option<BigRational> {
    let int = BigInt::parse_bytes(int_part.as_bytes(), 10)?;
    let frac = BigInt::parse_bytes(frac_part.as_bytes(), 10)?;
    let scale = BigInt::from(10u32).pow(u32::try_from(frac_part.len()).ok()?);
    Some(BigRational::new(int * &scale + frac, scale))
}

/// Converts an `f64` into an exact rational.
///
/// # Returns
/// `None` for NaN and infinities, `Some` otherwise.
#[must_use]
pub fn rat_from_f64(f: f64) -> Option<BigRational> {
    if !f.is_finite() {
        return None;
    }
    BigRational::from_float(f)
}

/// Converts a rational to the nearest `f64`.
///
/// Values outside the `f64` range come back as infinities, matching the
/// usual lossy-read semantics of transcendental call sites.
#[must_use]
pub fn rat_to_f64(r: &BigRational) -> f64 {
    r.to_f64().unwrap_or_else(|| {
                  if r.is_negative() {
                      f64::NEG_INFINITY
                  } else {
                      f64::INFINITY
                  }
              })
}

/// Extracts the value as an `i64` when the rational is an exact integer in
/// range, `None` otherwise.
#[must_use]
pub fn rat_to_i64(r: &BigRational) -> Option<i64> {
    if !r.is_integer() {
        return None;
    }
    r.numer().to_i64()
}

/// Rounds half-to-even (banker's rounding) to the nearest integer.
///
/// # Example
/// ```
/// use num_rational::BigRational;
/// use ratcalc::util::num::rat_round_half_even;
///
/// let half = |n: i64| BigRational::new(n.into(), 2.into());
/// assert_eq!(rat_round_half_even(&half(7)).to_string(), "4");  // 3.5 → 4
/// assert_eq!(rat_round_half_even(&half(9)).to_string(), "4");  // 4.5 → 4
/// assert_eq!(rat_round_half_even(&half(-7)).to_string(), "-4");
/// ```
#[must_use]
pub fn rat_round_half_even(r: &BigRational) -> BigRational {
    if r.is_negative() {
        return -rat_round_half_even(&-r.clone());
    }
    let floor = r.floor();
    let frac = r - &floor;
    let half = BigRational::new(BigInt::one(), BigInt::from(2));
    match frac.cmp(&half) {
        std::cmp::Ordering::Less => floor,
        std::cmp::Ordering::Greater => floor + BigRational::one(),
        std::cmp::Ordering::Equal => {
            // Exactly .5: pick the even neighbour.
            if (floor.to_integer() % BigInt::from(2)).is_zero() {
                floor
            } else {
                floor + BigRational::one()
            }
        },
    }
}

/// Renders a rational as a decimal string with at most `max_frac` digits
/// after the point, trailing zeros trimmed. Integer values render without
/// a point.
///
/// Returns `None` when every emitted fractional digit is zero for a
/// nonzero fraction, i.e. the magnitude is too small for the requested
/// precision to show anything.
///
/// # Example
/// ```
/// use num_rational::BigRational;
/// use ratcalc::util::num::decimal_string;
///
/// let third = BigRational::new(1.into(), 3.into());
/// assert_eq!(decimal_string(&third, 10).unwrap(), "0.3333333333");
///
/// let quarter = BigRational::new(1.into(), 4.into());
/// assert_eq!(decimal_string(&quarter, 10).unwrap(), "0.25");
/// ```
#[must_use]
pub fn decimal_string(r: &BigRational, max_frac: usize) -> Option<String> {
    let neg = r.is_negative();
    let num = r.numer().abs();
    let den = r.denom().clone();

    let int_part = &num / &den;
    let mut remainder = &num % &den;

    if remainder.is_zero() {
        let s = int_part.to_string();
        return Some(if neg { format!("-{s}") } else { s });
    }

    let ten = BigInt::from(10);
    let mut digits = String::new();
    for _ in 0..max_frac {
        remainder *= &ten;
        let digit = &remainder / &den;
        remainder %= &den;
        digits.push(char::from(b'0' + digit.to_u8().unwrap_or(0)));
        if remainder.is_zero() {
            break;
        }
    }

    let trimmed = digits.trim_end_matches('0');
    if trimmed.is_empty() {
        // Nonzero fraction rounded away entirely — signal the caller.
        return None;
    }
    let s = format!("{int_part}.{trimmed}");
    Some(if neg { format!("-{s}") } else { s })
}

/// Renders a rational with exactly `frac` digits after the point, rounding
/// half-to-even. Used for currency display.
///
/// # Example
/// ```
/// use num_rational::BigRational;
/// use ratcalc::util::num::fixed_decimal_string;
///
/// let r = BigRational::new(161.into(), 2.into()); // 80.5
/// assert_eq!(fixed_decimal_string(&r, 2), "80.50");
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn fixed_decimal_string(r: &BigRational, frac: usize) -> String {
    let scale = BigRational::from_integer(BigInt::from(10u32).pow(frac as u32));
    let scaled = rat_round_half_even(&(r * &scale));
    let n = scaled.to_integer();
    let neg = n.is_negative();
    let digits = n.abs().to_string();
    let digits = if digits.len() <= frac {
        format!("{}{}", "0".repeat(frac + 1 - digits.len()), digits)
    } else {
        digits
    };
    let split = digits.len() - frac;
    let s = format!("{}.{}", &digits[..split], &digits[split..]);
    if neg && !scaled.is_zero() {
        format!("-{s}")
    } else {
        s
    }
}

/// Renders an integer in the given base with a `0x`/`0b`/`0o` prefix,
/// preserving sign.
///
/// # Example
/// ```
/// use num_bigint::BigInt;
/// use ratcalc::util::num::int_string_in_base;
///
/// assert_eq!(int_string_in_base(&BigInt::from(255), 16), "0xff");
/// assert_eq!(int_string_in_base(&BigInt::from(-10), 2), "-0b1010");
/// ```
#[must_use]
pub fn int_string_in_base(n: &BigInt, base: u32) -> String {
    let prefix = match base {
        16 => "0x",
        2 => "0b",
        _ => "0o",
    };
    let body = n.abs().to_str_radix(base);
    if n.is_negative() {
        format!("-{prefix}{body}")
    } else {
        format!("{prefix}{body}")
    }
}

/// Renders a rational in scientific notation, e.g. `1.23e+15`.
///
/// The mantissa keeps at most ten fractional digits with trailing zeros
/// trimmed; the exponent always carries a sign.
#[must_use]
pub fn scientific_string(r: &BigRational) -> String {
    if r.is_zero() {
        return "0".to_string();
    }
    let neg = r.is_negative();
    let abs = r.abs();
    let exp = decimal_exponent(&abs);
    let mantissa = abs / pow10(exp);
    let body = decimal_string(&mantissa, 10).unwrap_or_else(|| mantissa.to_integer().to_string());
    let sign = if exp < 0 { "-" } else { "+" };
    let s = format!("{body}e{sign}{}", exp.abs());
    if neg { format!("-{s}") } else { s }
}

/// Returns `10^exp` as a rational; `exp` may be negative.
#[must_use]
pub fn pow10(exp: i64) -> BigRational {
    let p = BigInt::from(10u32).pow(u32::try_from(exp.unsigned_abs()).unwrap_or(u32::MAX));
    if exp < 0 {
        BigRational::new(BigInt::one(), p)
    } else {
        BigRational::from_integer(p)
    }
}

/// Computes `floor(log10(r))` for a positive rational.
fn decimal_exponent(r: &BigRational) -> i64 {
    // Seed from bit lengths (log10(2) ≈ 0.30103), then correct by direct
    // comparison; the estimate is off by at most one.
    let bits = i64::try_from(r.numer().bits()).unwrap_or(i64::MAX)
               - i64::try_from(r.denom().bits()).unwrap_or(0);
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let mut exp = (bits as f64 * std::f64::consts::LOG10_2).floor() as i64 - 1;
    while r >= &pow10(exp + 1) {
        exp += 1;
    }
    while r < &pow10(exp) {
        exp -= 1;
    }
    exp
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat(n: i64, d: i64) -> BigRational {
        BigRational::new(n.into(), d.into())
    }

    #[test]
    fn decimal_strings_trim_and_truncate() {
        assert_eq!(decimal_string(&rat(1, 8), 10).unwrap(), "0.125");
        assert_eq!(decimal_string(&rat(-1, 8), 10).unwrap(), "-0.125");
        assert_eq!(decimal_string(&rat(5, 1), 10).unwrap(), "5");
        assert_eq!(decimal_string(&rat(1, 10_000_000_000_000), 10), None);
    }

    #[test]
    fn scientific_covers_both_directions() {
        let big = BigRational::from_integer(BigInt::from(1_230_000_000_000_000_u64));
        assert_eq!(scientific_string(&big), "1.23e+15");
        assert_eq!(scientific_string(&rat(1, 1_000_000)), "1e-6");
        assert_eq!(scientific_string(&rat(-25, 10_000_000)), "-2.5e-6");
    }

    #[test]
    fn bankers_rounding_prefers_even() {
        assert_eq!(rat_round_half_even(&rat(5, 2)).to_string(), "2");
        assert_eq!(rat_round_half_even(&rat(3, 2)).to_string(), "2");
        assert_eq!(rat_round_half_even(&rat(1, 3)).to_string(), "0");
    }

    #[test]
    fn fixed_decimals_pad_and_round() {
        assert_eq!(fixed_decimal_string(&rat(80, 1), 2), "80.00");
        assert_eq!(fixed_decimal_string(&rat(1, 3), 2), "0.33");
        assert_eq!(fixed_decimal_string(&rat(125, 1000), 2), "0.12");
        assert_eq!(fixed_decimal_string(&rat(-5, 2), 2), "-2.50");
    }
}
