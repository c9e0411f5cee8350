use chrono::FixedOffset;

/// A fixed-offset timezone abbreviation.
///
/// The core recognizes a closed table of abbreviations; there is no tz
/// database and no daylight-saving logic. Each name maps to a constant
/// UTC offset in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    /// The abbreviation, e.g. `"PST"`.
    pub name:           &'static str,
    /// Offset from UTC in seconds; positive is east.
    pub offset_seconds: i32,
}

impl Zone {
    /// Returns the zone as a `chrono` fixed offset.
    ///
    /// # Panics
    /// Never; every table entry is within ±24 h.
    #[must_use]
    pub fn fixed_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.offset_seconds).expect("table offsets are in range")
    }
}

/// The fixed abbreviation table.
static ZONES: &[Zone] = &[
    Zone { name: "UTC", offset_seconds: 0 },
    Zone { name: "GMT", offset_seconds: 0 },
    Zone { name: "EST", offset_seconds: -5 * 3600 },
    Zone { name: "EDT", offset_seconds: -4 * 3600 },
    Zone { name: "CST", offset_seconds: -6 * 3600 },
    Zone { name: "CDT", offset_seconds: -5 * 3600 },
    Zone { name: "MST", offset_seconds: -7 * 3600 },
    Zone { name: "MDT", offset_seconds: -6 * 3600 },
    Zone { name: "PST", offset_seconds: -8 * 3600 },
    Zone { name: "PDT", offset_seconds: -7 * 3600 },
    Zone { name: "CET", offset_seconds: 3600 },
    Zone { name: "CEST", offset_seconds: 2 * 3600 },
    Zone { name: "IST", offset_seconds: 5 * 3600 + 1800 },
    Zone { name: "JST", offset_seconds: 9 * 3600 },
    Zone { name: "AEST", offset_seconds: 10 * 3600 },
    Zone { name: "AEDT", offset_seconds: 11 * 3600 },
    Zone { name: "NZST", offset_seconds: 12 * 3600 },
    Zone { name: "NZDT", offset_seconds: 13 * 3600 },
];

/// Looks up a timezone abbreviation.
///
/// # Example
/// ```
/// use ratcalc::interpreter::timezone::lookup_timezone;
///
/// assert_eq!(lookup_timezone("PST").unwrap().offset_seconds, -8 * 3600);
/// assert!(lookup_timezone("XYZ").is_none());
/// ```
#[must_use]
pub fn lookup_timezone(name: &str) -> Option<&'static Zone> {
    ZONES.iter().find(|z| z.name == name)
}

/// Returns `true` if the name is a known timezone abbreviation.
#[must_use]
pub fn is_timezone(name: &str) -> bool {
    lookup_timezone(name).is_some()
}
