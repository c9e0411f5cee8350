use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::interpreter::{
    timezone::Zone,
    units::{Category, CompoundUnit, Unit, number_unit, timestamp_unit},
};

/// One side of a value: a magnitude paired with its unit.
///
/// For non-offset units the magnitude is stored in the unit's base (e.g.
/// metres, seconds); temperature stores the display value because its
/// arithmetic is offset-based; the `Number` sentinel stores the plain
/// rational.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitVal {
    /// The stored magnitude.
    pub mag:  BigRational,
    /// The unit this side carries.
    pub unit: &'static Unit,
}

impl UnitVal {
    /// A dimensionless side holding the given rational.
    #[must_use]
    pub fn plain(mag: BigRational) -> Self {
        Self { mag,
               unit: number_unit() }
    }

    /// The dimensionless side holding `1`, the identity denominator.
    #[must_use]
    pub fn one() -> Self {
        Self::plain(BigRational::one())
    }
}

/// A rendering hint that rides on a value without affecting arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayHint {
    /// No hint: the formatter picks fraction, decimal, or scientific.
    None,
    /// Force decimal rendering (results of f64 math, percentages,
    /// `to unix`).
    Decimal,
    /// Render the integer in this base (2, 8, or 16).
    Base(u32),
    /// Render a timestamp in this zone instead of UTC.
    Zone(&'static Zone),
    /// Render the seconds as `Hh Mm Ss`.
    Hms,
}

/// A runtime value: two unit-carrying rationals plus a display hint.
///
/// The effective numeric quantity is `num.mag / den.mag` and the
/// effective unit is `num.unit / den.unit`. Values are immutable once
/// produced; every operation yields a fresh value.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    /// Numerator magnitude and unit.
    pub num:     UnitVal,
    /// Denominator magnitude and unit.
    pub den:     UnitVal,
    /// Rendering hint.
    pub display: DisplayHint,
}

impl Value {
    /// Builds a dimensionless value.
    #[must_use]
    pub fn dimensionless(r: BigRational) -> Self {
        Self { num:     UnitVal::plain(r),
               den:     UnitVal::one(),
               display: DisplayHint::None, }
    }

    /// Builds a dimensionless value that renders as a decimal.
    #[must_use]
    pub fn decimal(r: BigRational) -> Self {
        Self { display: DisplayHint::Decimal,
               ..Self::dimensionless(r) }
    }

    /// Builds an absolute timestamp from unix seconds (possibly
    /// fractional).
    #[must_use]
    pub fn timestamp(unix_seconds: BigRational) -> Self {
        Self { num:     UnitVal { mag:  unix_seconds,
                                  unit: timestamp_unit(), },
               den:     UnitVal::one(),
               display: DisplayHint::None, }
    }

    /// Builds a value with a single numerator unit, magnitude already in
    /// the unit's stored form.
    #[must_use]
    pub fn with_unit(mag: BigRational, unit: &'static Unit) -> Self {
        Self { num:     UnitVal { mag, unit },
               den:     UnitVal::one(),
               display: DisplayHint::None, }
    }

    /// Returns `true` if the value is an absolute point in time.
    #[must_use]
    pub fn is_timestamp(&self) -> bool {
        self.num.unit.category == Category::Timestamp && self.den.unit.is_number()
    }

    /// Returns `true` if both sides are dimensionless.
    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.num.unit.is_number() && self.den.unit.is_number()
    }

    /// Returns `true` for a duration: a time-category numerator over a
    /// dimensionless denominator.
    #[must_use]
    pub fn is_duration(&self) -> bool {
        self.num.unit.category == Category::Time && self.den.unit.is_number()
    }

    /// Returns `true` if either side carries a time-category unit.
    #[must_use]
    pub fn has_time_unit(&self) -> bool {
        self.num.unit.category == Category::Time || self.den.unit.category == Category::Time
    }

    /// Reconstructs the compound unit for compatibility checks and
    /// display.
    #[must_use]
    pub fn compound_unit(&self) -> CompoundUnit {
        CompoundUnit { num: self.num.unit,
                       den: self.den.unit, }
    }

    /// The effective numeric quantity `num.mag / den.mag`, in stored
    /// (base) terms.
    #[must_use]
    pub fn effective_rat(&self) -> BigRational {
        if self.den.mag.is_zero() {
            return self.num.mag.clone();
        }
        &self.num.mag / &self.den.mag
    }

    /// The magnitude converted from stored units to display units.
    ///
    /// Divides out the numerator's to-base factor and multiplies the
    /// denominator's back in; offset-based units are stored in display
    /// form already and pass through, as do timestamps.
    #[must_use]
    pub fn display_rat(&self) -> BigRational {
        if self.is_timestamp() {
            return self.effective_rat();
        }
        let mut r = self.effective_rat();
        if !self.num.unit.is_number() && !self.num.unit.has_offset() {
            r /= &self.num.unit.to_base;
        }
        if !self.den.unit.is_number() && !self.den.unit.has_offset() {
            r *= &self.den.unit.to_base;
        }
        r
    }

    /// The display timezone, when one was stamped on the value.
    #[must_use]
    pub fn display_zone(&self) -> Option<&'static Zone> {
        match self.display {
            DisplayHint::Zone(z) => Some(z),
            _ => None,
        }
    }

    /// Result equality as the incremental engine defines it: same
    /// effective rational and same unit shape (category and short name on
    /// both sides). Display hints do not participate.
    #[must_use]
    pub fn same_result(&self, other: &Self) -> bool {
        self.num.unit == other.num.unit
        && self.den.unit == other.den.unit
        && self.effective_rat() == other.effective_rat()
    }
}
