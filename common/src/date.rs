//! Calendar date utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{fmt, str::FromStr};

#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{macros::format_description, Duration};

/// Calendar date without a time zone.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Returns the current UTC [`Date`].
    #[must_use]
    pub fn today() -> Self {
        Self(time::OffsetDateTime::now_utc().date())
    }

    /// Creates a new [`Date`] from the provided calendar components.
    ///
    /// [`None`] is returned if the components do not form a valid date.
    #[must_use]
    pub fn from_calendar(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Returns the signed number of days from this [`Date`] until the `other`
    /// one.
    #[must_use]
    pub fn days_until(&self, other: Self) -> i64 {
        (other.0 - self.0).whole_days()
    }

    /// Shifts this [`Date`] by the provided signed number of `days`.
    ///
    /// [`None`] is returned if the result is out of the supported range.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Option<Self> {
        self.0.checked_add(Duration::days(days)).map(Self)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Date {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s, format_description!("[year]-[month]-[day]"))
            .map(Self)
    }
}

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for Date {
    accepts!(DATE);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::Date::from_sql(ty, raw).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Date {
    accepts!(DATE);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.0.to_sql(ty, w)
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Calendar date in a `YYYY-MM-DD` format.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Date = super::Date;

    impl Date {
        fn to_output<S: ScalarValue>(d: &Date) -> Value<S> {
            Value::scalar(d.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Date` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Date` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::Date;

    #[test]
    fn parses_iso_dates() {
        let date = Date::from_str("2025-01-04").unwrap();
        assert_eq!(date, Date::from_calendar(2025, 1, 4).unwrap());
        assert_eq!(date.to_string(), "2025-01-04");

        assert!(Date::from_str("2025-02-30").is_err());
        assert!(Date::from_str("04.01.2025").is_err());
        assert!(Date::from_str("").is_err());
    }

    #[test]
    fn counts_days() {
        let jan1 = Date::from_calendar(2025, 1, 1).unwrap();
        let jan4 = Date::from_calendar(2025, 1, 4).unwrap();

        assert_eq!(jan1.days_until(jan4), 3);
        assert_eq!(jan4.days_until(jan1), -3);
        assert_eq!(jan1.days_until(jan1), 0);
        assert_eq!(jan1.add_days(3), Some(jan4));
        assert_eq!(jan4.add_days(-3), Some(jan1));
    }

    #[test]
    fn crosses_month_and_year() {
        let dec30 = Date::from_calendar(2024, 12, 30).unwrap();
        let jan2 = Date::from_calendar(2025, 1, 2).unwrap();

        assert_eq!(dec30.days_until(jan2), 3);
        assert!(Date::from_calendar(2025, 13, 1).is_none());
    }
}
