//! Predicate values and their literal rendering.
//!
//! Values are inlined into the query text. Text is escaped with backslashes
//! (`\` becomes `\\`, then `'` becomes `\'`) and wrapped in single quotes.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

/// Format used for date/time literals.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A value that can appear on the right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// `null`.
    Null,
    /// Boolean, rendered lowercase.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Double precision float.
    Float(f64),
    /// Single precision float, kept apart so it renders with its own precision.
    Real(f32),
    /// Fixed-point decimal.
    #[cfg(feature = "decimal")]
    Decimal(rust_decimal::Decimal),
    /// Text value.
    Text(String),
    /// Wall-clock date and time.
    DateTime(NaiveDateTime),
}

impl QueryValue {
    /// Returns the literal as it appears in the query text.
    ///
    /// `NaN` and infinite floats have no literal form and render as `null`.
    #[must_use]
    pub fn to_literal(&self) -> String {
        match self {
            Self::Null => String::from("null"),
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::UInt(n) => n.to_string(),
            Self::Float(f) if !f.is_finite() => String::from("null"),
            Self::Real(f) if !f.is_finite() => String::from("null"),
            Self::Float(f) => f.to_string(),
            Self::Real(f) => f.to_string(),
            #[cfg(feature = "decimal")]
            Self::Decimal(d) => d.to_string(),
            Self::Text(s) => format!("'{}'", escape_str(s)),
            Self::DateTime(dt) => format!("'{}'", dt.format(DATETIME_FORMAT)),
        }
    }
}

/// Escapes backslashes and single quotes for use inside a quoted literal.
#[must_use]
pub fn escape_str(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Trait for types that can be used as predicate values.
pub trait ToQueryValue {
    /// Converts the value to a `QueryValue`.
    fn to_query_value(self) -> QueryValue;
}

impl ToQueryValue for QueryValue {
    fn to_query_value(self) -> QueryValue {
        self
    }
}

impl ToQueryValue for bool {
    fn to_query_value(self) -> QueryValue {
        QueryValue::Bool(self)
    }
}

macro_rules! impl_signed {
    ($($ty:ty),+) => {
        $(
            impl ToQueryValue for $ty {
                fn to_query_value(self) -> QueryValue {
                    QueryValue::Int(i64::from(self))
                }
            }
        )+
    };
}

macro_rules! impl_unsigned {
    ($($ty:ty),+) => {
        $(
            impl ToQueryValue for $ty {
                fn to_query_value(self) -> QueryValue {
                    QueryValue::UInt(u64::from(self))
                }
            }
        )+
    };
}

impl_signed!(i8, i16, i32, i64);
impl_unsigned!(u8, u16, u32, u64);

impl ToQueryValue for f64 {
    fn to_query_value(self) -> QueryValue {
        QueryValue::Float(self)
    }
}

impl ToQueryValue for f32 {
    fn to_query_value(self) -> QueryValue {
        QueryValue::Real(self)
    }
}

#[cfg(feature = "decimal")]
impl ToQueryValue for rust_decimal::Decimal {
    fn to_query_value(self) -> QueryValue {
        QueryValue::Decimal(self)
    }
}

impl ToQueryValue for String {
    fn to_query_value(self) -> QueryValue {
        QueryValue::Text(self)
    }
}

impl ToQueryValue for &str {
    fn to_query_value(self) -> QueryValue {
        QueryValue::Text(String::from(self))
    }
}

impl ToQueryValue for &String {
    fn to_query_value(self) -> QueryValue {
        QueryValue::Text(self.clone())
    }
}

impl ToQueryValue for NaiveDateTime {
    fn to_query_value(self) -> QueryValue {
        QueryValue::DateTime(self)
    }
}

impl ToQueryValue for NaiveDate {
    fn to_query_value(self) -> QueryValue {
        QueryValue::DateTime(self.and_time(chrono::NaiveTime::MIN))
    }
}

impl<Tz: TimeZone> ToQueryValue for DateTime<Tz> {
    fn to_query_value(self) -> QueryValue {
        QueryValue::DateTime(self.naive_local())
    }
}

impl<T: ToQueryValue> ToQueryValue for Option<T> {
    fn to_query_value(self) -> QueryValue {
        match self {
            Some(v) => v.to_query_value(),
            None => QueryValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_text_escaping() {
        assert_eq!("S3".to_query_value().to_literal(), "'S3'");
        assert_eq!("O'Brien".to_query_value().to_literal(), r"'O\'Brien'");
        assert_eq!(r"C:\temp".to_query_value().to_literal(), r"'C:\\temp'");
    }

    #[test]
    fn test_escape_backslash_before_quote() {
        // The backslash added for the quote must not be doubled again.
        assert_eq!(escape_str(r"\'"), r"\\\'");
    }

    #[test]
    fn test_literal_non_finite_floats_are_null() {
        assert_eq!(f64::NAN.to_query_value().to_literal(), "null");
        assert_eq!(f64::INFINITY.to_query_value().to_literal(), "null");
        assert_eq!(f32::NEG_INFINITY.to_query_value().to_literal(), "null");
    }

    #[test]
    fn test_literal_bool_lowercase() {
        assert_eq!(true.to_query_value().to_literal(), "true");
        assert_eq!(false.to_query_value().to_literal(), "false");
    }

    #[test]
    fn test_literal_numbers() {
        assert_eq!(42_i32.to_query_value().to_literal(), "42");
        assert_eq!((-7_i64).to_query_value().to_literal(), "-7");
        assert_eq!(7_u64.to_query_value().to_literal(), "7");
        assert_eq!(1234.5_f64.to_query_value().to_literal(), "1234.5");
        assert_eq!(0.1_f32.to_query_value().to_literal(), "0.1");
        assert_eq!(100.0_f64.to_query_value().to_literal(), "100");
    }

    #[test]
    fn test_literal_datetime() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(7, 8, 9)
            .unwrap();
        assert_eq!(dt.to_query_value().to_literal(), "'2024-03-05 07:08:09'");

        let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        assert_eq!(date.to_query_value().to_literal(), "'1999-12-31 00:00:00'");

        let utc = chrono::Utc.from_utc_datetime(&dt);
        assert_eq!(utc.to_query_value().to_literal(), "'2024-03-05 07:08:09'");
    }

    #[test]
    fn test_literal_option() {
        assert_eq!(None::<i32>.to_query_value().to_literal(), "null");
        assert_eq!(Some("x").to_query_value().to_literal(), "'x'");
    }

    #[cfg(feature = "decimal")]
    #[test]
    fn test_literal_decimal() {
        let d = rust_decimal::Decimal::new(12345, 2);
        assert_eq!(d.to_query_value().to_literal(), "123.45");
    }
}
