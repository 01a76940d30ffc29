//! Cell value types

use ahash::AHashMap;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// Represents the value stored in a cell
///
/// The tag is picked from the Rust type the caller hands in (see the
/// `From` impls below): strings become [`CellValue::Text`], numbers become
/// [`CellValue::Number`], chrono dates become [`CellValue::Date`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Empty cell (no value)
    #[default]
    Empty,

    /// Inline text
    Text(String),

    /// Numeric value
    Number(f64),

    /// Date stored as a 1900-system serial number
    Date(f64),

    /// Index into the workbook's shared-string table
    SharedTextRef(u32),
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Try to get the value as a number (dates yield their serial)
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) | CellValue::Date(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get inline text
    ///
    /// Shared-string references need the workbook to resolve; see
    /// `Workbook::resolve_text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as a calendar date-time
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Date(serial) => serial_to_datetime(*serial),
            _ => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Text(_) => "text",
            CellValue::Number(_) => "number",
            CellValue::Date(_) => "date",
            CellValue::SharedTextRef(_) => "shared_text",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Date(serial) => match serial_to_datetime(*serial) {
                Some(dt) if dt.time() == NaiveTime::MIN => write!(f, "{}", dt.date()),
                Some(dt) => write!(f, "{}", dt),
                None => write!(f, "{}", serial),
            },
            CellValue::SharedTextRef(i) => write!(f, "#shared:{}", i),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(date_to_serial(d.and_time(NaiveTime::MIN)))
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::Date(date_to_serial(dt))
    }
}

const SECONDS_PER_DAY: f64 = 86_400.0;

fn serial_epoch() -> NaiveDateTime {
    // Day 0 of the 1900 date system, shifted so that serials from
    // 1900-03-01 onward line up with the phantom 1900-02-29.
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}

/// Convert a date-time to a 1900-system serial number
///
/// Serial 1 is 1900-01-01. Serial 60 is the nonexistent 1900-02-29 kept
/// by spreadsheet applications, so dates before 1900-03-01 are one lower
/// than a plain day count would give.
pub fn date_to_serial(dt: NaiveDateTime) -> f64 {
    let delta = dt - serial_epoch();
    let mut serial = delta.num_milliseconds() as f64 / (SECONDS_PER_DAY * 1000.0);
    if dt.year() == 1900 && dt.month() <= 2 {
        serial -= 1.0;
    }
    serial
}

/// Convert a 1900-system serial number back to a date-time
///
/// Returns `None` for the phantom serial 60, negative serials, and values
/// outside chrono's range.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || (60.0..61.0).contains(&serial) {
        return None;
    }
    let adjusted = if serial < 60.0 { serial + 1.0 } else { serial };
    let millis = (adjusted * SECONDS_PER_DAY * 1000.0).round();
    if millis > i64::MAX as f64 {
        return None;
    }
    serial_epoch().checked_add_signed(Duration::milliseconds(millis as i64))
}

/// Workbook-wide table of shared strings
///
/// Cells holding [`CellValue::SharedTextRef`] point into this table.
/// Entries are append-only; interning the same text twice returns the
/// same index.
#[derive(Debug, Clone, Default)]
pub struct SharedStrings {
    strings: Vec<String>,
    index: AHashMap<String, u32>,
}

impl SharedStrings {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the index for `s`, appending it if it is new
    pub fn intern<S: AsRef<str>>(&mut self, s: S) -> u32 {
        let s = s.as_ref();
        if let Some(&i) = self.index.get(s) {
            return i;
        }
        let i = self.strings.len() as u32;
        self.strings.push(s.to_owned());
        self.index.insert(s.to_owned(), i);
        i
    }

    /// Append without deduplication (used when loading a table whose
    /// indices must be kept as-is)
    pub fn push<S: Into<String>>(&mut self, s: S) -> u32 {
        let s = s.into();
        let i = self.strings.len() as u32;
        self.index.entry(s.clone()).or_insert(i);
        self.strings.push(s);
        i
    }

    /// Look up a string by index
    pub fn get(&self, index: u32) -> Option<&str> {
        self.strings.get(index as usize).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterate entries in index order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_dispatch() {
        assert_eq!(CellValue::from("aaa A1"), CellValue::Text("aaa A1".into()));
        assert_eq!(CellValue::from(String::from("x")), CellValue::Text("x".into()));
        assert_eq!(CellValue::from(42), CellValue::Number(42.0));
        assert_eq!(CellValue::from(42u32), CellValue::Number(42.0));
        assert_eq!(CellValue::from(3.5), CellValue::Number(3.5));

        let d = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert!(matches!(CellValue::from(d), CellValue::Date(_)));
    }

    #[test]
    fn test_date_serials() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap().and_time(NaiveTime::MIN);
        assert_eq!(date_to_serial(d(1900, 1, 1)), 1.0);
        assert_eq!(date_to_serial(d(1900, 2, 28)), 59.0);
        assert_eq!(date_to_serial(d(1900, 3, 1)), 61.0);
        assert_eq!(date_to_serial(d(2024, 1, 15)), 45306.0);

        assert_eq!(serial_to_datetime(1.0), Some(d(1900, 1, 1)));
        assert_eq!(serial_to_datetime(61.0), Some(d(1900, 3, 1)));
        assert_eq!(serial_to_datetime(45306.0), Some(d(2024, 1, 15)));
        assert_eq!(serial_to_datetime(60.0), None);
        assert_eq!(serial_to_datetime(-1.0), None);
    }

    #[test]
    fn test_date_with_time_of_day() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let v = CellValue::from(dt);
        assert_eq!(v.as_number(), Some(45306.5));
        assert_eq!(v.as_datetime(), Some(dt));
        assert_eq!(v.to_string(), "2024-01-15 12:00:00");
    }

    #[test]
    fn test_shared_strings_dedup() {
        let mut table = SharedStrings::new();
        let a = table.intern("hello");
        let b = table.intern("world");
        let c = table.intern("hello");

        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(b), Some("world"));
        assert_eq!(table.get(9), None);
    }

    #[test]
    fn test_shared_strings_push_keeps_indices() {
        let mut table = SharedStrings::new();
        table.push("a");
        table.push("a");
        assert_eq!(table.len(), 2);
        assert_eq!(table.intern("a"), 0);
    }
}
