use std::{collections::HashMap, sync::LazyLock};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

/// Groups units into dimensional categories.
///
/// Two units are convertible exactly when they share a category. `Number`
/// is the dimensionless sentinel category and `Timestamp` marks absolute
/// points in time; neither has catalogue entries beyond its sentinel unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Dimensionless sentinel.
    Number,
    /// Lengths, base metre.
    Length,
    /// Weights, base gram.
    Weight,
    /// Durations, base second.
    Time,
    /// Absolute unix instants.
    Timestamp,
    /// Volumes, base litre.
    Volume,
    /// Temperatures, base kelvin; the only offset-based family.
    Temperature,
    /// Pressures, base pascal.
    Pressure,
    /// Forces, base newton.
    Force,
    /// Energies, base joule.
    Energy,
    /// Power, base watt.
    Power,
    /// Voltages, base volt.
    Voltage,
    /// Currents, base ampere.
    Current,
    /// Resistances, base ohm.
    Resistance,
    /// Data sizes, base byte (SI and IEC multiples).
    Data,
    /// Currencies; every currency is its own base and conversion across
    /// currencies is rejected.
    Currency,
}

/// An immutable catalogue unit.
///
/// Conversion semantics: `value_in_base = (display_value + pre_offset) *
/// to_base`. The offset is non-zero only for the temperature family.
#[derive(Debug, Clone)]
pub struct Unit {
    /// Short symbol, e.g. `"km"`. Empty for the `Number` sentinel.
    pub short:      &'static str,
    /// Full singular name, e.g. `"kilometer"`.
    pub singular:   &'static str,
    /// Full plural name, e.g. `"kilometers"`.
    pub plural:     &'static str,
    /// Dimensional category.
    pub category:   Category,
    /// Exact factor to the category's base unit.
    pub to_base:    BigRational,
    /// Offset added before scaling; `None` means zero.
    pub pre_offset: Option<BigRational>,
}

impl Unit {
    /// Returns `true` if this unit converts through a non-zero offset.
    #[must_use]
    pub fn has_offset(&self) -> bool {
        self.pre_offset.as_ref().is_some_and(|o| !o.is_zero())
    }

    /// Returns the offset as a rational, zero when absent.
    #[must_use]
    pub fn offset(&self) -> BigRational {
        self.pre_offset.clone().unwrap_or_else(BigRational::zero)
    }

    /// Returns `true` for the dimensionless `Number` sentinel.
    #[must_use]
    pub fn is_number(&self) -> bool {
        self.category == Category::Number
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.short == other.short && self.category == other.category
    }
}

impl Eq for Unit {}

/// A first-order compound unit: one unit over another, with the `Number`
/// sentinel filling empty slots. `m/s`, `mi/gal`, `USD/1` and plain `m`
/// are all representable; `m*kg` is not, by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompoundUnit {
    /// Numerator unit.
    pub num: &'static Unit,
    /// Denominator unit.
    pub den: &'static Unit,
}

impl CompoundUnit {
    /// Builds a compound with the given numerator and a dimensionless
    /// denominator.
    #[must_use]
    pub fn simple(num: &'static Unit) -> Self {
        Self { num,
               den: number_unit() }
    }

    /// Builds the fully dimensionless compound.
    #[must_use]
    pub fn empty() -> Self {
        Self { num: number_unit(),
               den: number_unit() }
    }

    /// Returns `true` when both sides are the `Number` sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num.is_number() && self.den.is_number()
    }

    /// Returns `true` when either side is offset-based (temperature).
    #[must_use]
    pub fn has_offset(&self) -> bool {
        self.num.has_offset() || self.den.has_offset()
    }

    /// Checks add/sub and conversion compatibility: the categories must
    /// match on both sides.
    #[must_use]
    pub fn compatible(&self, other: &Self) -> bool {
        self.num.category == other.num.category && self.den.category == other.den.category
    }

    /// Formats the compound for display: `m`, `mi/gal`, or `1/s` when only
    /// the denominator carries a unit. Empty string when dimensionless.
    #[must_use]
    pub fn display(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        if self.den.is_number() {
            return self.num.short.to_string();
        }
        let num = if self.num.is_number() { "1" } else { self.num.short };
        format!("{num}/{}", self.den.short)
    }
}

fn rat(num: i128, den: i128) -> BigRational {
    BigRational::new(BigInt::from(num), BigInt::from(den))
}

fn unit(short: &'static str,
        singular: &'static str,
        plural: &'static str,
        category: Category,
        to_base: BigRational)
        -> Unit {
    Unit { short,
           singular,
           plural,
           category,
           to_base,
           pre_offset: None }
}

fn temperature(short: &'static str,
               name: &'static str,
               to_base: BigRational,
               pre_offset: BigRational)
               -> Unit {
    Unit { short,
           singular: name,
           plural: name,
           category: Category::Temperature,
           to_base,
           pre_offset: Some(pre_offset) }
}

fn currency(code: &'static str) -> Unit {
    Unit { short:      code,
           singular:   code,
           plural:     code,
           category:   Category::Currency,
           to_base:    rat(1, 1),
           pre_offset: None }
}

struct UnitTable {
    units:  Vec<Unit>,
    lookup: HashMap<&'static str, usize>,
}

static TABLE: LazyLock<UnitTable> = LazyLock::new(|| {
    use Category::{
        Current, Data, Energy, Force, Length, Power, Pressure, Resistance, Time, Voltage, Volume,
        Weight,
    };
    let units = vec![
        // Length (base: metres)
        unit("mm", "millimeter", "millimeters", Length, rat(1, 1000)),
        unit("cm", "centimeter", "centimeters", Length, rat(1, 100)),
        unit("m", "meter", "meters", Length, rat(1, 1)),
        unit("km", "kilometer", "kilometers", Length, rat(1000, 1)),
        unit("in", "inch", "inches", Length, rat(127, 5000)),
        unit("ft", "foot", "feet", Length, rat(381, 1250)),
        unit("yd", "yard", "yards", Length, rat(1143, 1250)),
        unit("mi", "mile", "miles", Length, rat(201_168, 125)),
        unit("au", "au", "au", Length, rat(149_597_870_700, 1)),
        // Weight (base: grams)
        unit("mg", "milligram", "milligrams", Weight, rat(1, 1000)),
        unit("g", "gram", "grams", Weight, rat(1, 1)),
        unit("kg", "kilogram", "kilograms", Weight, rat(1000, 1)),
        unit("oz", "ounce", "ounces", Weight, rat(45_359_237, 1_600_000)),
        unit("lb", "pound", "pounds", Weight, rat(45_359_237, 100_000)),
        // Time (base: seconds)
        unit("ms", "millisecond", "milliseconds", Time, rat(1, 1000)),
        unit("s", "second", "seconds", Time, rat(1, 1)),
        unit("min", "minute", "minutes", Time, rat(60, 1)),
        unit("hr", "hour", "hours", Time, rat(3600, 1)),
        unit("d", "day", "days", Time, rat(86_400, 1)),
        unit("wk", "week", "weeks", Time, rat(604_800, 1)),
        unit("yr", "year", "years", Time, rat(31_557_600, 1)),
        // Volume (base: litres)
        unit("mL", "milliliter", "milliliters", Volume, rat(1, 1000)),
        unit("L", "liter", "liters", Volume, rat(1, 1)),
        unit("floz", "floz", "floz", Volume, rat(473_176_473, 16_000_000_000)),
        unit("cup", "cup", "cups", Volume, rat(473_176_473, 2_000_000_000)),
        unit("pt", "pint", "pints", Volume, rat(473_176_473, 1_000_000_000)),
        unit("qt", "quart", "quarts", Volume, rat(473_176_473, 500_000_000)),
        unit("gal", "gallon", "gallons", Volume, rat(473_176_473, 125_000_000)),
        // Temperature (base: kelvin)
        temperature("K", "kelvin", rat(1, 1), rat(0, 1)),
        temperature("C", "celsius", rat(1, 1), rat(27_315, 100)),
        temperature("F", "fahrenheit", rat(5, 9), rat(45_967, 100)),
        // Pressure (base: pascals)
        unit("Pa", "pascal", "pascals", Pressure, rat(1, 1)),
        unit("kPa", "kilopascal", "kilopascals", Pressure, rat(1000, 1)),
        unit("bar", "bar", "bars", Pressure, rat(100_000, 1)),
        unit("atm", "atmosphere", "atmospheres", Pressure, rat(101_325, 1)),
        unit("psi", "psi", "psi", Pressure, rat(8_896_443_230_521, 1_290_320_000)),
        // Force (base: newtons)
        unit("N", "newton", "newtons", Force, rat(1, 1)),
        unit("kN", "kilonewton", "kilonewtons", Force, rat(1000, 1)),
        unit("lbf", "lbf", "lbf", Force, rat(8_896_443_230_521, 2_000_000_000_000)),
        // Energy (base: joules)
        unit("J", "joule", "joules", Energy, rat(1, 1)),
        unit("kJ", "kilojoule", "kilojoules", Energy, rat(1000, 1)),
        unit("Wh", "watt-hour", "watt-hours", Energy, rat(3600, 1)),
        unit("kWh", "kilowatt-hour", "kilowatt-hours", Energy, rat(3_600_000, 1)),
        unit("cal", "calorie", "calories", Energy, rat(4184, 1000)),
        unit("kcal", "kilocalorie", "kilocalories", Energy, rat(4184, 1)),
        unit("BTU", "BTU", "BTU", Energy, rat(52_752_792_631, 50_000_000)),
        // Power (base: watts)
        unit("W", "watt", "watts", Power, rat(1, 1)),
        unit("kW", "kilowatt", "kilowatts", Power, rat(1000, 1)),
        unit("MW", "megawatt", "megawatts", Power, rat(1_000_000, 1)),
        unit("hp", "horsepower", "horsepower", Power, rat(37_284_993_579_113_511, 50_000_000_000_000)),
        // Voltage (base: volts)
        unit("mV", "millivolt", "millivolts", Voltage, rat(1, 1000)),
        unit("V", "volt", "volts", Voltage, rat(1, 1)),
        unit("kV", "kilovolt", "kilovolts", Voltage, rat(1000, 1)),
        // Current (base: amperes)
        unit("mA", "milliampere", "milliamperes", Current, rat(1, 1000)),
        unit("A", "ampere", "amperes", Current, rat(1, 1)),
        // Resistance (base: ohms)
        unit("ohm", "ohm", "ohms", Resistance, rat(1, 1)),
        unit("kohm", "kilohm", "kilohms", Resistance, rat(1000, 1)),
        // Data (base: bytes; SI and IEC binary multiples)
        unit("B", "byte", "bytes", Data, rat(1, 1)),
        unit("KB", "kilobyte", "kilobytes", Data, rat(1000, 1)),
        unit("MB", "megabyte", "megabytes", Data, rat(1_000_000, 1)),
        unit("GB", "gigabyte", "gigabytes", Data, rat(1_000_000_000, 1)),
        unit("TB", "terabyte", "terabytes", Data, rat(1_000_000_000_000, 1)),
        unit("KiB", "kibibyte", "kibibytes", Data, rat(1024, 1)),
        unit("MiB", "mebibyte", "mebibytes", Data, rat(1_048_576, 1)),
        unit("GiB", "gibibyte", "gibibytes", Data, rat(1_073_741_824, 1)),
        unit("TiB", "tebibyte", "tebibytes", Data, rat(1_099_511_627_776, 1)),
        // Currencies (each its own base)
        currency("USD"),
        currency("EUR"),
        currency("GBP"),
        currency("JPY"),
        currency("CAD"),
        currency("AUD"),
        currency("CHF"),
    ];

    let mut lookup = HashMap::with_capacity(units.len() * 3);
    for (i, u) in units.iter().enumerate() {
        lookup.insert(u.short, i);
        lookup.insert(u.singular, i);
        lookup.insert(u.plural, i);
    }
    UnitTable { units, lookup }
});

static NUMBER: LazyLock<Unit> = LazyLock::new(|| Unit { short:      "",
                                                        singular:   "",
                                                        plural:     "",
                                                        category:   Category::Number,
                                                        to_base:    rat(1, 1),
                                                        pre_offset: None });

static TIMESTAMP: LazyLock<Unit> = LazyLock::new(|| Unit { short:      "timestamp",
                                                           singular:   "timestamp",
                                                           plural:     "timestamp",
                                                           category:   Category::Timestamp,
                                                           to_base:    rat(1, 1),
                                                           pre_offset: None });

/// Looks up a unit by short symbol, full singular, or full plural name
/// (case-sensitive).
///
/// # Example
/// ```
/// use ratcalc::interpreter::units::{Category, lookup_unit};
///
/// let km = lookup_unit("kilometers").unwrap();
/// assert_eq!(km.short, "km");
/// assert_eq!(km.category, Category::Length);
/// assert!(lookup_unit("furlong").is_none());
/// ```
#[must_use]
pub fn lookup_unit(name: &str) -> Option<&'static Unit> {
    let table = &*TABLE;
    table.lookup.get(name).map(|&i| &table.units[i])
}

/// Maps a currency symbol token to its unit: `$ € £ ¥` → USD, EUR, GBP,
/// JPY.
#[must_use]
pub fn currency_for_symbol(symbol: &str) -> Option<&'static Unit> {
    let code = match symbol {
        "$" => "USD",
        "€" => "EUR",
        "£" => "GBP",
        "¥" => "JPY",
        _ => return None,
    };
    lookup_unit(code)
}

/// Returns the display symbol for a currency unit, if it has one.
#[must_use]
pub fn symbol_for_currency(unit: &Unit) -> Option<&'static str> {
    match unit.short {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

/// The dimensionless `Number` sentinel unit.
#[must_use]
pub fn number_unit() -> &'static Unit {
    &NUMBER
}

/// The `Timestamp` sentinel marking absolute unix instants.
#[must_use]
pub fn timestamp_unit() -> &'static Unit {
    &TIMESTAMP
}

/// The seconds unit, the base of the time category.
///
/// # Panics
/// Never; the catalogue always contains `"s"`.
#[must_use]
pub fn seconds_unit() -> &'static Unit {
    lookup_unit("s").expect("catalogue contains seconds")
}

/// Converts a display magnitude between two non-offset units of the same
/// category: `value * from.to_base / to.to_base`.
#[must_use]
pub fn linear_convert(value: &BigRational, from: &Unit, to: &Unit) -> BigRational {
    value * &from.to_base / &to.to_base
}

/// Converts a display magnitude between offset-based units through the
/// base scale: `(value + from.offset) * from.to_base / to.to_base -
/// to.offset`.
#[must_use]
pub fn offset_convert(value: &BigRational, from: &Unit, to: &Unit) -> BigRational {
    (value + from.offset()) * &from.to_base / &to.to_base - to.offset()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_accepts_all_three_names() {
        for name in ["km", "kilometer", "kilometers"] {
            assert_eq!(lookup_unit(name).unwrap().short, "km");
        }
    }

    #[test]
    fn temperature_conversions_are_exact() {
        let c = lookup_unit("C").unwrap();
        let f = lookup_unit("F").unwrap();
        let boiling = offset_convert(&rat(100, 1), c, f);
        assert_eq!(boiling, rat(212, 1));
        let back = offset_convert(&boiling, f, c);
        assert_eq!(back, rat(100, 1));
    }

    #[test]
    fn sentinel_units_compare_by_identity_shape() {
        assert!(number_unit().is_number());
        assert!(!timestamp_unit().is_number());
        assert_eq!(CompoundUnit::empty().display(), "");
        assert_eq!(CompoundUnit::simple(lookup_unit("mi").unwrap()).display(), "mi");
    }

    #[test]
    fn currency_symbols_round_trip() {
        let usd = currency_for_symbol("$").unwrap();
        assert_eq!(usd.short, "USD");
        assert_eq!(symbol_for_currency(usd), Some("$"));
        assert_eq!(symbol_for_currency(lookup_unit("CHF").unwrap()), None);
    }
}
