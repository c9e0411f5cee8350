use std::fmt;

use chrono::{DateTime, FixedOffset};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::{
    interpreter::{
        units::{Category, symbol_for_currency},
        value::core::{DisplayHint, Value},
    },
    util::num::{decimal_string, fixed_decimal_string, int_string_in_base, scientific_string},
};

/// Default character budget for the numeric part of a rendered value.
///
/// Wide enough that `20!` still prints all nineteen digits; the host can
/// tighten or relax it per buffer through the incremental engine.
pub const DEFAULT_MAX_WIDTH: usize = 24;

impl Value {
    /// Renders the value with the given display-width budget.
    ///
    /// The budget only steers the fraction / decimal / scientific choice
    /// of the default path; timestamps, HMS, currency, and based integers
    /// have fixed shapes. It is a hint, not a hard cap.
    #[must_use]
    pub fn to_display_string(&self, max_width: usize) -> String {
        if self.is_timestamp() {
            return self.timestamp_string();
        }
        if self.display == DisplayHint::Hms {
            return hms_string(&self.effective_rat());
        }
        if self.num.unit.category == Category::Currency && self.den.unit.is_number() {
            return self.currency_string();
        }

        let dr = self.display_rat();
        if let DisplayHint::Base(base) = self.display
           && dr.is_integer()
        {
            // Units are stripped in based display.
            return int_string_in_base(dr.numer(), base);
        }

        let forced_decimal = self.display == DisplayHint::Decimal
                             || self.has_time_unit()
                             || self.num.unit.category == Category::Temperature;
        let body = if forced_decimal {
            decimal_string(&dr, 10).unwrap_or_else(|| scientific_string(&dr))
        } else {
            budgeted_string(&dr, max_width)
        };

        let unit = self.compound_unit().display();
        if unit.is_empty() {
            body
        } else {
            format!("{body} {unit}")
        }
    }

    /// Formats a timestamp as `YYYY-MM-DD HH:MM:SS ±HHMM`, in the display
    /// zone when one is stamped, UTC otherwise.
    fn timestamp_string(&self) -> String {
        let offset = self.display_zone().map_or(0, |z| z.offset_seconds);
        let Some(secs) = self.effective_rat().to_integer().to_i64() else {
            return "timestamp out of range".to_string();
        };
        let Some(zone) = FixedOffset::east_opt(offset) else {
            return "timestamp out of range".to_string();
        };
        let Some(utc) = DateTime::from_timestamp(secs, 0) else {
            return "timestamp out of range".to_string();
        };
        utc.with_timezone(&zone).format("%Y-%m-%d %H:%M:%S %z").to_string()
    }

    /// Formats a currency amount: two fractional digits, banker's-rounded,
    /// `$`/`€`/`£`/`¥` prefixed for the symbol currencies, code-suffixed
    /// otherwise.
    fn currency_string(&self) -> String {
        let dr = self.display_rat();
        match symbol_for_currency(self.num.unit) {
            Some(symbol) => {
                let sign = if dr.is_negative() { "-" } else { "" };
                format!("{sign}{symbol}{}", fixed_decimal_string(&dr.abs(), 2))
            },
            None => format!("{} {}", fixed_decimal_string(&dr, 2), self.num.unit.short),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string(DEFAULT_MAX_WIDTH))
    }
}

/// Picks fraction, then decimal, then scientific, whichever first fits
/// the width budget.
fn budgeted_string(r: &BigRational, max_width: usize) -> String {
    let fraction = if r.is_integer() {
        r.numer().to_string()
    } else {
        format!("{}/{}", r.numer(), r.denom())
    };
    if fraction.len() <= max_width {
        return fraction;
    }
    if let Some(dec) = decimal_string(r, 10)
       && dec.len() <= max_width
    {
        return dec;
    }
    scientific_string(r)
}

/// Renders seconds as `Hh Mm Ss`, dropping leading zero components, with
/// a leading `-` for negative durations.
fn hms_string(seconds: &BigRational) -> String {
    let neg = seconds.is_negative();
    let total = seconds.abs();
    let hour_len = BigRational::from_integer(BigInt::from(3600));
    let minute_len = BigRational::from_integer(BigInt::from(60));

    let hours = (&total / &hour_len).floor();
    let after_hours = &total - &hours * &hour_len;
    let minutes = (&after_hours / &minute_len).floor();
    let secs = after_hours - &minutes * &minute_len;

    let secs_text = decimal_string(&secs, 10).unwrap_or_else(|| "0".to_string());
    let body = if hours.is_zero() && minutes.is_zero() {
        format!("{secs_text}s")
    } else if hours.is_zero() {
        format!("{}m {secs_text}s", minutes.to_integer())
    } else {
        format!("{}h {}m {secs_text}s", hours.to_integer(), minutes.to_integer())
    };
    if neg { format!("-{body}") } else { body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::units::lookup_unit;

    fn rat(n: i64, d: i64) -> BigRational {
        BigRational::new(n.into(), d.into())
    }

    #[test]
    fn default_path_prefers_fractions() {
        assert_eq!(Value::dimensionless(rat(1, 2)).to_string(), "1/2");
        assert_eq!(Value::dimensionless(rat(10, 3)).to_string(), "10/3");
        assert_eq!(Value::dimensionless(rat(5, 1)).to_string(), "5");
    }

    #[test]
    fn decimal_hint_forces_decimal() {
        assert_eq!(Value::decimal(rat(1, 2)).to_string(), "0.5");
        assert_eq!(Value::decimal(rat(1, 10)).to_string(), "0.1");
    }

    #[test]
    fn narrow_budget_falls_back_to_scientific() {
        let v = Value::dimensionless(rat(1_230_000_000, 1));
        assert_eq!(v.to_display_string(6), "1.23e+9");
        assert_eq!(v.to_display_string(24), "1230000000");
    }

    #[test]
    fn timestamps_render_in_utc_by_default() {
        let v = Value::timestamp(rat(1_706_745_600, 1));
        assert_eq!(v.to_string(), "2024-02-01 00:00:00 +0000");
    }

    #[test]
    fn hms_drops_zero_components() {
        let hinted = |secs| Value { display: DisplayHint::Hms,
                                    ..Value::dimensionless(rat(secs, 1)) };
        assert_eq!(hinted(3700).to_string(), "1h 1m 40s");
        assert_eq!(hinted(90).to_string(), "1m 30s");
        assert_eq!(hinted(45).to_string(), "45s");
        assert_eq!(hinted(-90).to_string(), "-1m 30s");
    }

    #[test]
    fn currency_uses_symbols_and_codes() {
        let usd = Value::with_unit(rat(80, 1), lookup_unit("USD").unwrap());
        assert_eq!(usd.to_string(), "$80.00");
        let chf = Value::with_unit(rat(25, 2), lookup_unit("CHF").unwrap());
        assert_eq!(chf.to_string(), "12.50 CHF");
        let neg = Value::with_unit(rat(-5, 1), lookup_unit("USD").unwrap());
        assert_eq!(neg.to_string(), "-$5.00");
    }
}
