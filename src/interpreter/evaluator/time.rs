use chrono::{DateTime, FixedOffset, TimeZone, Timelike, Utc};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive};

use crate::{
    error::EvalError,
    interpreter::{
        evaluator::core::EvalResult,
        timezone::Zone,
        value::core::{DisplayHint, Value},
    },
    util::num::rat_to_i64,
};

/// Evaluates a time-of-day literal such as `14:30` or `9:05:30`,
/// materializing it on today's UTC date.
pub fn eval_time_of_day(raw: &str) -> EvalResult<Value> {
    let invalid = || EvalError::InvalidTime { details: raw.to_string() };

    let mut fields = raw.split(':');
    let hour: u32 = fields.next().and_then(|f| f.parse().ok()).ok_or_else(invalid)?;
    let minute: u32 = fields.next().and_then(|f| f.parse().ok()).ok_or_else(invalid)?;
    let second: u32 = match fields.next() {
        Some(f) => f.parse().map_err(|_| invalid())?,
        None => 0,
    };
    clock_timestamp(hour, minute, second).ok_or_else(invalid)
}

/// Builds today's-date timestamp for validated clock components.
fn clock_timestamp(hour: u32, minute: u32, second: u32) -> Option<Value> {
    if hour > 23 || minute > 59 || second > 59 {
        return None;
    }
    let today = Utc::now().date_naive();
    let at = today.and_hms_opt(hour, minute, second)?;
    Some(Value::timestamp(BigRational::from_integer(BigInt::from(at.and_utc().timestamp()))))
}

/// Applies an AM/PM postfix to a timestamp: PM advances a morning hour
/// by twelve, AM pulls 12:xx back to 00:xx.
pub fn apply_am_pm(value: &Value, is_pm: bool) -> EvalResult<Value> {
    if !value.is_timestamp() {
        return Err(EvalError::NotATime { what: "AM/PM" });
    }
    let hour = utc_datetime(value)?.hour();
    let twelve_hours = BigRational::from_integer(BigInt::from(12 * 3600));

    let seconds = value.effective_rat();
    let adjusted = if is_pm && hour < 12 {
        seconds + twelve_hours
    } else if !is_pm && hour == 12 {
        seconds - twelve_hours
    } else {
        seconds
    };
    Ok(Value { display: value.display,
               ..Value::timestamp(adjusted) })
}

/// Applies an input-timezone postfix: the clock reading belongs to the
/// named zone, so the stored UTC instant shifts back by the zone offset,
/// and the zone is stamped for display.
pub fn apply_input_zone(value: &Value, zone: &'static Zone) -> EvalResult<Value> {
    if !value.is_timestamp() {
        return Err(EvalError::NotATime { what: "timezone" });
    }
    let shifted = value.effective_rat() - BigRational::from_integer(BigInt::from(zone.offset_seconds));
    Ok(Value { display: DisplayHint::Zone(zone),
               ..Value::timestamp(shifted) })
}

/// `now()`: the host clock in whole unix seconds.
pub fn now_value(_args: &[Value]) -> EvalResult<Value> {
    Ok(Value::timestamp(BigRational::from_integer(BigInt::from(Utc::now().timestamp()))))
}

/// `date(y, m, d)` / `date(y, m, d, h, min, s)`: a UTC calendar instant.
/// Components must be integers and must form a real date.
pub fn date_value(args: &[Value]) -> EvalResult<Value> {
    let parts = integer_args("date", args)?;
    let year = i32::try_from(parts[0]).map_err(|_| EvalError::InvalidDate)?;
    let fields: Vec<u32> = parts[1..].iter()
                                     .map(|&p| u32::try_from(p).map_err(|_| EvalError::InvalidDate))
                                     .collect::<EvalResult<_>>()?;
    let (hour, minute, second) = if fields.len() == 5 {
        (fields[2], fields[3], fields[4])
    } else {
        (0, 0, 0)
    };
    let instant = Utc.with_ymd_and_hms(year, fields[0], fields[1], hour, minute, second)
                     .single()
                     .ok_or(EvalError::InvalidDate)?;
    Ok(Value::timestamp(BigRational::from_integer(BigInt::from(instant.timestamp()))))
}

/// `time(h, m)` / `time(h, m, s)`: a clock reading on today's UTC date.
pub fn time_value(args: &[Value]) -> EvalResult<Value> {
    let parts = integer_args("time", args)?;
    let fields: Vec<u32> =
        parts.iter()
             .map(|&p| {
                 u32::try_from(p).map_err(|_| EvalError::InvalidTime { details:
                                                                           "time()".to_string() })
             })
             .collect::<EvalResult<_>>()?;
    let second = if fields.len() == 3 { fields[2] } else { 0 };
    clock_timestamp(fields[0], fields[1], second).ok_or_else(|| {
        EvalError::InvalidTime { details: format!("{:02}:{:02}:{second:02}", fields[0], fields[1]) }
    })
}

/// `unix(n)`: a timestamp from a unix count, auto-detecting seconds,
/// milliseconds, microseconds, or nanoseconds by magnitude.
pub fn unix_value(args: &[Value]) -> EvalResult<Value> {
    let v = &args[0];
    if !v.is_dimensionless() {
        return Err(EvalError::TypeMismatch { details:
                                                 "unix() value must be dimensionless".to_string() });
    }
    Ok(Value::timestamp(autodetect_unix_precision(&v.effective_rat())))
}

/// Scales a raw unix count down to seconds: below 1e12 it already is
/// seconds, below 1e15 milliseconds, below 1e18 microseconds, otherwise
/// nanoseconds.
fn autodetect_unix_precision(r: &BigRational) -> BigRational {
    let magnitude = r.abs();
    let threshold = |p: u128| BigRational::from_integer(BigInt::from(p));
    let divisor = if magnitude < threshold(1_000_000_000_000) {
        return r.clone();
    } else if magnitude < threshold(1_000_000_000_000_000) {
        1000u64
    } else if magnitude < threshold(1_000_000_000_000_000_000) {
        1_000_000
    } else {
        1_000_000_000
    };
    r / BigRational::from_integer(BigInt::from(divisor))
}

/// Shared body of the `year`/`month`/`day`/`hour`/`minute`/`second`
/// extractors: reads the instant in the value's display zone (UTC when
/// none) and returns the component as a dimensionless integer.
pub fn extract(name: &str, args: &[Value], component: fn(&DateTime<FixedOffset>) -> i64)
               -> EvalResult<Value> {
    let v = &args[0];
    if !v.is_timestamp() {
        return Err(EvalError::TypeMismatch { details: format!("{name}() requires a time value") });
    }
    let local = utc_datetime(v)?.with_timezone(&display_offset(v));
    Ok(Value::dimensionless(BigRational::from_integer(BigInt::from(component(&local)))))
}

/// The extractor component accessors, in builtin-table order.
pub mod components {
    use chrono::{DateTime, Datelike, FixedOffset, Timelike};

    pub fn year(dt: &DateTime<FixedOffset>) -> i64 {
        i64::from(dt.year())
    }
    pub fn month(dt: &DateTime<FixedOffset>) -> i64 {
        i64::from(dt.month())
    }
    pub fn day(dt: &DateTime<FixedOffset>) -> i64 {
        i64::from(dt.day())
    }
    pub fn hour(dt: &DateTime<FixedOffset>) -> i64 {
        i64::from(dt.hour())
    }
    pub fn minute(dt: &DateTime<FixedOffset>) -> i64 {
        i64::from(dt.minute())
    }
    pub fn second(dt: &DateTime<FixedOffset>) -> i64 {
        i64::from(dt.second())
    }
}

fn utc_datetime(value: &Value) -> EvalResult<DateTime<Utc>> {
    let secs = value.effective_rat()
                    .to_integer()
                    .to_i64()
                    .ok_or_else(|| EvalError::OutOfRange { name: "timestamp".to_string() })?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| EvalError::OutOfRange { name:
                                                                                "timestamp".to_string() })
}

fn display_offset(value: &Value) -> FixedOffset {
    value.display_zone()
         .map_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"),
                      Zone::fixed_offset)
}

fn integer_args(name: &str, args: &[Value]) -> EvalResult<Vec<i64>> {
    let mut parts = Vec::with_capacity(args.len());
    for arg in args {
        let eff = arg.effective_rat();
        let int = rat_to_i64(&eff).ok_or_else(|| EvalError::IntegerArguments { name:
                                                                                   name.to_string() })?;
        parts.push(int);
    }
    Ok(parts)
}
