use ratcalc::{Env, Value, eval_line};

/// Evaluates a single line in a fresh environment and returns the
/// rendered text.
fn check(input: &str, want: &str) {
    let mut env = Env::new();
    match eval_line(input, &mut env) {
        Ok(Some(value)) => {
            assert_eq!(value.to_string(), want, "eval_line({input:?})");
        },
        Ok(None) => panic!("eval_line({input:?}) produced no value, want {want:?}"),
        Err(e) => panic!("eval_line({input:?}) error: {e}"),
    }
}

/// Evaluates a line and asserts the rendered text contains every
/// fragment; used for today-relative results.
fn check_contains(input: &str, fragments: &[&str]) {
    let mut env = Env::new();
    let value = eval_line(input, &mut env).unwrap_or_else(|e| panic!("eval_line({input:?}): {e}"))
                                          .unwrap_or_else(|| panic!("eval_line({input:?}): empty"));
    let got = value.to_string();
    for fragment in fragments {
        assert!(got.contains(fragment),
                "eval_line({input:?}) = {got:?}, expected to contain {fragment:?}");
    }
}

/// Evaluates a line expecting an error, returning its message.
fn check_err(input: &str) -> String {
    let mut env = Env::new();
    match eval_line(input, &mut env) {
        Err(e) => e.to_string(),
        Ok(v) => panic!("eval_line({input:?}) succeeded with {v:?}, expected error"),
    }
}

fn eval_value(input: &str) -> Value {
    let mut env = Env::new();
    eval_line(input, &mut env).unwrap_or_else(|e| panic!("eval_line({input:?}): {e}"))
                              .unwrap_or_else(|| panic!("eval_line({input:?}): empty"))
}

#[test]
fn basic_arithmetic() {
    check("2 + 3", "5");
    check("10 - 3", "7");
    check("4 * 5", "20");
    check("10 / 3", "10/3");
    check("1/3 + 1/6", "1/2");
    check("-5", "-5");
    check("(2 + 3) * 4", "20");
    check("3.14", "157/50");
    check("1.5 + 2.5", "4");
    check("2024-01-31", "1992");
    check("2024 - 01 - 31", "1992");
}

#[test]
fn dates_and_datetimes() {
    check("@2024-01-31", "2024-01-31 00:00:00 +0000");
    check("@2024-01-31T10:30:00", "2024-01-31 10:30:00 +0000");
    check("date(2024, 1, 31)", "2024-01-31 00:00:00 +0000");
    check("unix(1706745600)", "2024-02-01 00:00:00 +0000");
    check("@1706745600", "2024-02-01 00:00:00 +0000");
    // Milliseconds, microseconds, and nanoseconds are auto-detected.
    check("unix(1706745600000)", "2024-02-01 00:00:00 +0000");
    check("unix(1706745600000000)", "2024-02-01 00:00:00 +0000");
    check("unix(1706745600000000000)", "2024-02-01 00:00:00 +0000");
}

#[test]
fn single_digit_date_components() {
    check("@2026-2-25", "2026-02-25 00:00:00 +0000");
    check("@2026-2-5", "2026-02-05 00:00:00 +0000");
    check("@2026-12-5", "2026-12-05 00:00:00 +0000");
    check("@2026-2-25T10:30:00", "2026-02-25 10:30:00 +0000");
    check("@2026-2-25 10:30:00", "2026-02-25 10:30:00 +0000");
}

#[test]
fn units_and_conversions() {
    check("5 m", "5 m");
    check("5 meters + 100 cm", "6 m");
    check("10 miles / gallon", "10 mi/gal");
    check("100 mi / 5 gal", "20 mi/gal");
    check("10 mi / 2 mi", "5");
    check("1 au to km", "1495978707/10 km");
    check("86400 s to hr", "24 hr");
    check("24 hr to d", "1 d");
    check("1 wk to d", "7 d");
}

#[test]
fn compound_unit_conversions() {
    let v = eval_value("40 mi / 1 gal to km/L");
    assert_eq!(v.compound_unit().display(), "km/L");

    let v = eval_value("100 km / 1 hr to mi/hr");
    assert_eq!(v.compound_unit().display(), "mi/hr");

    let v = eval_value("5 m + 300 cm to km");
    assert_eq!(v.compound_unit().display(), "km");
    assert!(v.to_string().contains("km"));
}

#[test]
fn time_arithmetic() {
    check("@2024-01-31 + 86400 s", "2024-02-01 00:00:00 +0000");
    check("@2024-01-31 + 24 hr", "2024-02-01 00:00:00 +0000");
    check("@2024-01-31 + 1 d", "2024-02-01 00:00:00 +0000");
    check("@2024-02-01 - 1 hr", "2024-01-31 23:00:00 +0000");
    check("@2024-02-01 - @2024-01-31", "86400 s");
    check("@2024-02-01 - @2024-01-31 to hr", "24 hr");
    check("@2024-02-01 - @2024-01-31 to d", "1 d");
}

#[test]
fn timezones_on_datetimes() {
    check("@2024-01-31 10:30:00 PST", "2024-01-31 10:30:00 -0800");
    check("@2024-01-31 02:30:00 -0800", "2024-01-31 10:30:00 +0000");
    check("@2024-01-31T10:30:00 to PST", "2024-01-31 02:30:00 -0800");
}

#[test]
fn unix_conversions() {
    check("@2024-02-01 to unix", "1706745600");
    check("(@2024-02-01 + 1/2 s) to unix", "1706745600.5");
}

#[test]
fn base_conversions() {
    check("0xFF", "255");
    check("0b1010", "10");
    check("0o77", "63");
    check("255 to hex", "0xff");
    check("10 to bin", "0b1010");
    check("63 to oct", "0o77");
    check("0xFF + 1", "256");
    check("0xFF + 1 to hex", "0x100");
}

#[test]
fn bitwise_and_shifts() {
    check("0xFF & 0x0F", "15");
    check("5 | 2", "7");
    check("5 ^ 3", "6");
    check("~0", "-1");
    check("1 << 10", "1024");
    check("16 >> 2", "4");
    assert!(check_err("1 << -1").contains("non-negative"));
    assert!(check_err("1.5 & 2").contains("integer"));
}

#[test]
fn exponentiation() {
    check("2 ** 10", "1024");
    check("2 ** -2", "1/4");
    check("-2 ** 2", "-4");
    check("3 ** 0", "1");
    assert!(eval_value("2 ** 0.5").to_string().starts_with("1.414"));
    assert!(check_err("0 ** -1").contains("division by zero"));
    assert!(check_err("(5 m) ** 2").contains("dimensionless"));
}

#[test]
fn factorials() {
    check("5!", "120");
    check("20!", "2432902008176640000");
    check("0!", "1");
    assert!(check_err("(-1)!").contains("non-negative"));
    assert!(check_err("20000!").contains("too large"));
}

#[test]
fn math_functions() {
    check("sin(pi / 2)", "1");
    check("cos(0)", "1");
    check("sqrt(4)", "2");
    check("log(100)", "2");
    check("ln(e)", "1");
    check("log2(8)", "3");
    check("abs(-5)", "5");
    check("ceil(3.2)", "4");
    check("floor(3.8)", "3");
    check("round(3.5)", "4");
    check("round(4.5)", "4");
    check("pow(2, 10)", "1024");
    check("mod(10, 3)", "1");
    check("min(3, 7)", "3");
    check("max(3, 7)", "7");
    assert!(check_err("sqrt(4 m)").contains("dimensionless"));
    assert!(check_err("mod(1, 0)").contains("division by zero"));
    assert!(check_err("sin(1, 2)").contains("takes 1 argument"));
}

#[test]
fn time_extraction() {
    check("year(@2024-06-15)", "2024");
    check("month(@2024-06-15)", "6");
    check("day(@2024-06-15)", "15");
    check("hour(@2024-06-15T10:30:00)", "10");
    check("minute(@2024-06-15T10:30:00)", "30");
    check("second(@2024-06-15T10:30:45)", "45");
    assert!(check_err("year(5)").contains("time value"));
}

#[test]
fn constants() {
    check("c", "299792458 m/s");
    assert!(eval_value("pi").to_string().starts_with("3.1415926535"));
    assert!(eval_value("e").to_string().starts_with("2.7182818284"));
}

#[test]
fn percentages() {
    check("50%", "0.5");
    check("100%", "1");
    check("10%", "0.1");
    check("200 * 10%", "20");
    check("1000 * 5%", "50");
}

#[test]
fn percentage_via_variable() {
    let mut env = Env::new();
    eval_line("rate = 5%", &mut env).unwrap();
    let v = eval_line("1000 * rate", &mut env).unwrap().unwrap();
    assert_eq!(v.to_string(), "50");
}

#[test]
fn temperature() {
    check("100 C to F", "212 F");
    check("0 C to K", "273.15 K");
    check("32 F to C", "0 C");
    check("212 F to C", "100 C");
    check("0 K to C", "-273.15 C");
    check("373.15 K to C", "100 C");
    check("100 C to K", "373.15 K");
    check("-40 F to C", "-40 C");
    assert!(check_err("100 C / s").contains("compound"));
    assert!(check_err("5 m to C").contains("cannot convert"));
}

#[test]
fn engineering_units() {
    check("1 kPa to Pa", "1000 Pa");
    check("1 bar to Pa", "100000 Pa");
    check("1 kN to N", "1000 N");
    check("1 kJ to J", "1000 J");
    check("1 kWh to J", "3600000 J");
    check("1 kcal to cal", "1000 cal");
    check("1 kW to W", "1000 W");
    check("1 MW to kW", "1000 kW");
    check("1 kV to V", "1000 V");
    check("1000 mV to V", "1 V");
    check("1000 mA to A", "1 A");
    check("1 kohm to ohm", "1000 ohm");
}

#[test]
fn data_units() {
    check("1 KB to B", "1000 B");
    check("1 MB to KB", "1000 KB");
    check("1 GB to MB", "1000 MB");
    check("1 KiB to B", "1024 B");
    check("1 MiB to KiB", "1024 KiB");
    check("1 GiB to MiB", "1024 MiB");
    check("1 TiB to GiB", "1024 GiB");
}

#[test]
fn approximate_conversions() {
    let cases: &[(&str, f64, f64, &str)] = &[("1 atm to psi", 14.69, 14.70, "psi"),
                                             ("100 W to hp", 0.134, 0.135, "hp"),
                                             ("1 GB to MiB", 953.67, 953.68, "MiB"),
                                             ("1 BTU to J", 1055.0, 1055.1, "J"),
                                             ("1 lbf to N", 4.44, 4.45, "N")];
    for (input, min, max, unit) in cases {
        let v = eval_value(input);
        assert_eq!(v.compound_unit().display(), *unit, "{input}");
        let f = ratcalc::util::num::rat_to_f64(&v.display_rat());
        assert!(f >= *min && f <= *max, "{input} = {f}, want [{min}, {max}]");
    }
}

#[test]
fn finance_functions() {
    let fv = ratcalc::util::num::rat_to_f64(&eval_value("fv(0.05, 10, 1000)").display_rat());
    assert!((fv - 12577.89).abs() < 1.0, "fv = {fv}");

    let pv = ratcalc::util::num::rat_to_f64(&eval_value("pv(0.05, 10, 1000)").display_rat());
    assert!((pv - 7721.73).abs() < 1.0, "pv = {pv}");
}

#[test]
fn currency() {
    check("$50 + $30", "$80.00");
    check("€5 * 3", "€15.00");
    check("50 USD to USD", "$50.00");
    check("12.5 CHF", "12.50 CHF");
    assert_eq!(check_err("$50 to EUR"), "__forex__");
}

#[test]
fn hms_display() {
    check("3700 s to hms", "1h 1m 40s");
    check("90 s to hms", "1m 30s");
    check("45 to hms", "45s");
    check("1 hr + 30 min to hms", "1h 30m 0s");
    assert!(check_err("5 m to hms").contains("hms"));
}

#[test]
fn variables() {
    let mut env = Env::new();
    for (input, want) in [("x = 10", "10"),
                          ("x + 5", "15"),
                          ("price = 42", "42"),
                          ("price * 2", "84")]
    {
        let v = eval_line(input, &mut env).unwrap().unwrap();
        assert_eq!(v.to_string(), want, "{input}");
    }
}

#[test]
fn bare_unit_fallback() {
    check("gallon", "1 gal");
    check("10 miles / gallon", "10 mi/gal");
}

#[test]
fn time_of_day_today() {
    check_contains("14:30", &["14:30:00", "+0000"]);
    check_contains("@14:30", &["14:30:00", "+0000"]);
    check_contains("time(14, 30)", &["14:30:00", "+0000"]);
    check_contains("12:00 PST", &["12:00:00", "-0800"]);
    check_contains("12:00 PST to UTC", &["20:00:00", "+0000"]);
    check_contains("12:00 UTC to PST", &["04:00:00", "-0800"]);
    check_contains("now()", &["+0000"]);
    check_contains("now() to EST", &["-0500"]);
}

#[test]
fn am_pm() {
    check_contains("3:30 PM", &["15:30:00", "+0000"]);
    check_contains("12:00 AM", &["00:00:00", "+0000"]);
    check_contains("12:00 PM", &["12:00:00", "+0000"]);
    check_contains("@3:30 PM", &["15:30:00", "+0000"]);
    check_contains("3:30 pm", &["15:30:00", "+0000"]);
    check_contains("3:30 PM PST", &["15:30:00", "-0800"]);
    check_contains("11:00 AM", &["11:00:00", "+0000"]);
    check_contains("12:30 PM", &["12:30:00", "+0000"]);
}

#[test]
fn now_arithmetic() {
    let v = eval_value("now() - @2024-01-01");
    assert!(!v.is_timestamp());
    assert_eq!(v.compound_unit().display(), "s");

    let v = eval_value("now() to unix");
    assert!(!v.is_timestamp());
    assert!(ratcalc::util::num::rat_to_f64(&v.display_rat()) > 0.0);
}

#[test]
fn invalid_times() {
    assert!(check_err("24:00").contains("invalid time"));
    assert!(check_err("time(12, 60)").contains("invalid time"));
    assert!(check_err("date(2024)").contains("takes 3 or 6 arguments"));
}

#[test]
fn time_arithmetic_violations() {
    assert!(check_err("@2024-01-31 + 86400").contains("time unit"));
    assert!(check_err("@2024-01-31 - 86400").contains("time unit"));
    assert!(check_err("@2024-01-31 + @2024-01-31").contains("two timestamps"));
    assert!(check_err("@2024-01-31 * 2").contains("timestamp"));
    assert!(check_err("@2024-01-31 / 2").contains("timestamp"));
}

#[test]
fn dimension_violations() {
    assert!(check_err("5 m + 3 kg").contains("cannot add"));
    assert!(check_err("5 m + 3").contains("with and without units"));
    assert!(check_err("5 m * 3 kg").contains("cannot combine units"));
    assert!(check_err("5 m to kg").contains("cannot convert"));
}

#[test]
fn division_by_zero() {
    assert_eq!(check_err("5 / 0"), "division by zero");
    assert_eq!(check_err("pow(0, -1)"), "division by zero");
}

#[test]
fn undefined_names() {
    assert!(check_err("nonsense + 1").contains("undefined variable"));
    assert!(check_err("blork(3)").contains("unknown function"));
}

#[test]
fn parse_failures() {
    assert!(check_err("(1 + 2").contains("expected ')'"));
    assert!(check_err("1 + + 2").contains("unexpected"));
    assert!(check_err("5 5").contains("unexpected token"));
}

#[test]
fn blank_lines_produce_nothing() {
    let mut env = Env::new();
    assert!(eval_line("", &mut env).unwrap().is_none());
    assert!(eval_line("   ", &mut env).unwrap().is_none());
}

#[test]
fn rational_exactness_round_trip() {
    // (a + b) - b renders identically to a for short decimals.
    for (a, b) in [("0.1", "0.2"), ("1.25", "3.5"), ("0.007", "1.003")] {
        let direct = eval_value(a).to_string();
        let round_trip = eval_value(&format!("({a} + {b}) - {b}")).to_string();
        assert_eq!(direct, round_trip, "({a} + {b}) - {b}");
    }
}

#[test]
fn unit_round_trip() {
    for (value, from, to) in [("5", "m", "ft"), ("12", "kg", "lb"), ("7", "gal", "L")] {
        let direct = eval_value(&format!("{value} {from}")).to_string();
        let round_trip = eval_value(&format!("{value} {from} to {to} to {from}")).to_string();
        assert_eq!(direct, round_trip, "{value} {from} via {to}");
    }
}

#[test]
fn temperature_round_trip() {
    for t in ["0", "100", "-40", "36.6"] {
        let direct = eval_value(&format!("{t} C")).to_string();
        let round_trip = eval_value(&format!("{t} C to F to C")).to_string();
        assert_eq!(direct, round_trip, "{t} C");
    }
}

#[test]
fn assignment_reuse() {
    // `x = e` then `x` renders exactly like `e`.
    for expr in ["1/3 + 1/6", "5 meters + 100 cm", "100 C to F", "255 to hex"] {
        let mut env = Env::new();
        let direct = eval_line(expr, &mut env).unwrap().unwrap().to_string();

        let mut env = Env::new();
        eval_line(&format!("x = {expr}"), &mut env).unwrap();
        let via_variable = eval_line("x", &mut env).unwrap().unwrap().to_string();
        assert_eq!(direct, via_variable, "{expr}");
    }
}

#[test]
fn num_strips_units() {
    check("num(5 km)", "5");
    check("num($80 + $20)", "100");
    check("num(2)", "2");
    check("atan2(0, 1)", "0");
}

#[test]
fn category_cancellation_is_dimensionless() {
    let v = eval_value("6 km / 3 m");
    assert!(v.is_dimensionless());
    assert_eq!(v.to_string(), "2000");
}
