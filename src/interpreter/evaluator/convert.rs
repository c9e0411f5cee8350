use num_rational::BigRational;
use num_traits::One;

use crate::{
    ast::ConvTarget,
    error::EvalError,
    interpreter::{
        evaluator::core::EvalResult,
        units::{Category, CompoundUnit, offset_convert},
        value::core::{DisplayHint, UnitVal, Value},
    },
};

/// Attaches a unit to a bare value or converts a unit-bearing value.
///
/// First attachment scales the magnitude into base units (except for the
/// offset family, which stores display values). A conversion between
/// compatible non-offset units is a pure relabel because magnitudes are
/// already in base terms; temperature goes through the offset formula;
/// cross-currency conversion is refused with the `__forex__` sentinel.
pub fn apply_unit(value: &Value, target: CompoundUnit) -> EvalResult<Value> {
    let current = value.compound_unit();

    if !current.is_empty() {
        if !current.compatible(&target) {
            return Err(EvalError::IncompatibleUnits { from: current.display(),
                                                     to:   target.display(), });
        }
        if current.num.category == Category::Currency
           && target.num.category == Category::Currency
           && current.num.short != target.num.short
        {
            return Err(EvalError::ForexUnsupported);
        }
        if current.has_offset() || target.has_offset() {
            if !value.den.unit.is_number() || !target.den.is_number() {
                return Err(EvalError::TemperatureInCompound);
            }
            let converted = offset_convert(&value.effective_rat(), value.num.unit, target.num);
            return Ok(Value::with_unit(converted, target.num));
        }
        // Magnitudes are stored in base units; swap the display labels.
        return Ok(Value { num:     UnitVal { mag:  value.num.mag.clone(),
                                             unit: target.num, },
                          den:     UnitVal { mag:  value.den.mag.clone(),
                                             unit: target.den, },
                          display: value.display, });
    }

    let eff = value.effective_rat();
    if target.has_offset() {
        if !target.den.is_number() {
            return Err(EvalError::TemperatureInCompound);
        }
        // Offset units store the display value as written.
        return Ok(Value::with_unit(eff, target.num));
    }

    let num_mag = if target.num.is_number() {
        eff
    } else {
        eff * &target.num.to_base
    };
    let den_mag = if target.den.is_number() {
        BigRational::one()
    } else {
        target.den.to_base.clone()
    };
    Ok(Value { num:     UnitVal { mag:  num_mag,
                                  unit: target.num, },
               den:     UnitVal { mag:  den_mag,
                                  unit: target.den, },
               display: DisplayHint::None, })
}

/// Evaluates a trailing `to` conversion against its target.
pub fn eval_conversion(value: &Value, target: ConvTarget) -> EvalResult<Value> {
    match target {
        ConvTarget::Unit(unit) => apply_unit(value, unit),
        ConvTarget::Zone(zone) => {
            if !value.is_timestamp() {
                return Err(EvalError::NotATime { what: "timezone" });
            }
            // Display-only: the stored instant is unchanged.
            Ok(Value { display: DisplayHint::Zone(zone),
                       ..value.clone() })
        },
        ConvTarget::Unix => {
            if !value.is_timestamp() {
                return Err(EvalError::UnixRequiresTime);
            }
            Ok(Value::decimal(value.effective_rat()))
        },
        ConvTarget::Hex => based(value, 16, "to hex"),
        ConvTarget::Bin => based(value, 2, "to bin"),
        ConvTarget::Oct => based(value, 8, "to oct"),
        ConvTarget::Hms => {
            if !value.is_duration() && !value.is_dimensionless() {
                return Err(EvalError::HmsRequiresTime);
            }
            Ok(Value { display: DisplayHint::Hms,
                       ..Value::dimensionless(value.effective_rat()) })
        },
    }
}

/// Shared body of the integer-base display conversions; strips units.
fn based(value: &Value, base: u32, op: &'static str) -> EvalResult<Value> {
    let dr = value.display_rat();
    if !dr.is_integer() {
        return Err(EvalError::IntegerRequired { op });
    }
    Ok(Value { display: DisplayHint::Base(base),
               ..Value::dimensionless(dr) })
}
