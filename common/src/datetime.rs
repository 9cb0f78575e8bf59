//! UTC timestamps with a microsecond precision, as stored by Postgres.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{cmp::Ordering, marker::PhantomData, ops, time::Duration};

use derive_more::{Debug, Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{format_description::well_known::Rfc3339, UtcOffset};

use crate::Date;

/// Timestamp of no particular meaning.
pub type DateTime = DateTimeOf;

/// UTC timestamp, tagged with what it records.
///
/// The `Of` tag prevents mixing up timestamps of different meaning, like the
/// creation and the modification of the same entity. Use
/// [`DateTimeOf::coerce()`] to retag a timestamp explicitly.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// UTC timestamp truncated to microseconds.
    utc: time::OffsetDateTime,

    /// Tag of this timestamp.
    #[debug(skip)]
    tag: PhantomData<Of>,
}

pub mod of {
    //! Tags of [`DateTimeOf`] timestamps.
    //!
    //! [`DateTimeOf`]: super::DateTimeOf

    /// Timestamp of an entity creation.
    #[derive(Clone, Copy, Debug)]
    pub struct Creation;

    /// Timestamp of the last entity modification.
    #[derive(Clone, Copy, Debug)]
    pub struct Modification;

    /// Timestamp an entity stops being valid at.
    #[derive(Clone, Copy, Debug)]
    pub struct Expiration;
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// Wraps the provided timestamp, converting it to UTC and truncating it
    /// to microseconds.
    fn from_utc(
        dt: time::OffsetDateTime,
    ) -> Result<Self, time::error::ComponentRange> {
        dt.to_offset(UtcOffset::UTC)
            .replace_microsecond(dt.microsecond())
            .map(|utc| Self {
                utc,
                tag: PhantomData,
            })
    }

    /// Returns the current timestamp.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn now() -> Self {
        Self::from_utc(time::OffsetDateTime::now_utc())
            .expect("current time fits into the supported range")
    }

    /// Creates a new [`DateTimeOf`] out of the provided Unix timestamp in
    /// seconds.
    ///
    /// [`None`] is returned if the timestamp is out of the supported range.
    #[must_use]
    pub fn from_unix_timestamp(secs: i64) -> Option<Self> {
        time::OffsetDateTime::from_unix_timestamp(secs)
            .ok()
            .map(|utc| Self {
                utc,
                tag: PhantomData,
            })
    }

    /// Returns the Unix timestamp of this [`DateTimeOf`] in seconds.
    #[must_use]
    pub fn unix_timestamp(&self) -> i64 {
        self.utc.unix_timestamp()
    }

    /// Returns the UTC calendar [`Date`] of this [`DateTimeOf`].
    #[must_use]
    pub fn date(&self) -> Date {
        self.utc.date().into()
    }

    /// Parses a [`DateTimeOf`] out of the provided [RFC 3339] string.
    ///
    /// # Errors
    ///
    /// If the string is not a valid [RFC 3339] timestamp.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        let dt = time::OffsetDateTime::parse(input, &Rfc3339)
            .map_err(ParseError::Parse)?;
        Self::from_utc(dt).map_err(ParseError::OutOfRange)
    }

    /// Formats this [`DateTimeOf`] as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.utc
            .format(&Rfc3339)
            .expect("UTC timestamp is always representable in RFC 3339")
    }

    /// Retags this [`DateTimeOf`].
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf {
            utc: self.utc,
            tag: PhantomData,
        }
    }
}

/// Error of parsing a [`DateTimeOf`] out of a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// String is not an RFC 3339 timestamp.
    #[display("malformed timestamp: {_0}")]
    Parse(time::error::Parse),

    /// Timestamp is out of the supported range.
    #[display("timestamp out of range: {_0}")]
    OutOfRange(time::error::ComponentRange),
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.utc == other.utc
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.utc.cmp(&other.utc)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> ops::Add<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self {
            utc: self.utc + rhs,
            tag: PhantomData,
        }
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> FromSql<'_> for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        let dt = time::OffsetDateTime::from_sql(ty, raw)?;
        Self::from_utc(dt).map_err(Box::from)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.utc.to_sql(ty, w)
    }
}

#[cfg(feature = "serde")]
pub mod serde {
    //! [`serde`] representations of [`DateTimeOf`].

    pub mod unix_timestamp {
        //! [`DateTimeOf`] as a Unix timestamp in seconds, as [JWT] claims
        //! carry it.
        //!
        //! [JWT]: https://datatracker.ietf.org/doc/html/rfc7519

        use serde::{de::Error as _, Deserialize as _, Deserializer, Serializer};

        use crate::DateTimeOf;

        /// Serializes the provided [`DateTimeOf`] as a Unix timestamp.
        ///
        /// # Errors
        ///
        /// If the `serializer` fails.
        pub fn serialize<Of, S>(
            dt: &DateTimeOf<Of>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
            Of: ?Sized,
        {
            serializer.serialize_i64(dt.unix_timestamp())
        }

        /// Deserializes a [`DateTimeOf`] out of a Unix timestamp.
        ///
        /// # Errors
        ///
        /// If the timestamp is malformed or out of the supported range.
        pub fn deserialize<'de, D, Of>(
            deserializer: D,
        ) -> Result<DateTimeOf<Of>, D::Error>
        where
            D: Deserializer<'de>,
            Of: ?Sized,
        {
            let secs = i64::deserialize(deserializer)?;
            DateTimeOf::from_unix_timestamp(secs).ok_or_else(|| {
                D::Error::custom(format!("timestamp out of range: {secs}"))
            })
        }
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! [`juniper`] scalar of [`DateTime`].

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// UTC timestamp in [RFC 3339] format with a microsecond precision.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[graphql_scalar(with = Self, parse_token(String))]
    type DateTime = crate::DateTime;

    impl DateTime {
        fn to_output<S: ScalarValue>(dt: &DateTime) -> Value<S> {
            Value::scalar(dt.to_rfc3339())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            let s = input.as_string_value().ok_or_else(|| {
                format!("Expected `DateTime` string, found: {input}")
            })?;
            Self::from_rfc3339(s)
                .map_err(|e| format!("Invalid `DateTime` string: {e}"))
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use super::DateTime;

    #[test]
    fn normalizes_to_utc_microseconds() {
        let dt = DateTime::from_rfc3339("2025-01-04T12:20:30.1234567+02:00")
            .unwrap();

        assert_eq!(dt.to_rfc3339(), "2025-01-04T10:20:30.123456Z");
        assert_eq!(dt.date().to_string(), "2025-01-04");
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(DateTime::from_rfc3339("2025-01-04").is_err());
        assert!(DateTime::from_rfc3339("yesterday").is_err());
    }

    #[test]
    fn shifts_by_duration() {
        let dt = DateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let later = dt + Duration::from_secs(60);

        assert!(later > dt);
        assert_eq!(later.unix_timestamp(), 1_700_000_060);
    }
}
