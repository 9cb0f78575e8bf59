//! [`Price`]-related definitions.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use rust_decimal::Decimal;

/// Positive amount of money with at most two decimal places.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Price(Decimal);

impl Price {
    /// Maximum number of decimal places a [`Price`] may have.
    pub const SCALE: u32 = 2;

    /// Largest amount a [`Price`] may have, fitting ten digits in total.
    pub const MAX: Decimal = Decimal::from_parts(0x540B_E3FF, 2, 0, false, 2);

    /// Creates a new [`Price`] from the provided `amount`.
    ///
    /// [`None`] is returned if the `amount` is not positive, has more than
    /// two significant decimal places or exceeds [`Price::MAX`].
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        let amount = amount.normalize();
        (amount.is_sign_positive()
            && !amount.is_zero()
            && amount.scale() <= Self::SCALE
            && amount <= Self::MAX)
            .then_some(Self(amount))
    }

    /// Returns the amount of this [`Price`].
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiplies this [`Price`] by the provided number of `units`.
    ///
    /// [`None`] is returned if `units` is zero or the result exceeds
    /// [`Price::MAX`].
    #[must_use]
    pub fn times(&self, units: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(units)).and_then(Self::new)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Error of parsing a [`Price`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// String is not a decimal number.
    #[display("invalid decimal number")]
    Decimal,

    /// Parsed number is not a valid [`Price`].
    #[display(
        "not a positive amount with at most 2 decimal places, up to \
         99999999.99"
    )]
    Amount,
}

impl FromStr for Price {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|_| ParseError::Decimal)?;
        Self::new(amount).ok_or(ParseError::Amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for Price {
    accepts!(NUMERIC);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        let amount = Decimal::from_sql(ty, raw)?;
        Self::new(amount)
            .ok_or_else(|| format!("invalid `Price` value: {amount}").into())
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Price {
    accepts!(NUMERIC);
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

    /// Positive decimal amount in `{major}.{minor}` format, where `minor` has
    /// at most two digits, up to `99999999.99`.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Price = super::Price;

    impl Price {
        fn to_output<S: ScalarValue>(p: &Price) -> Value<S> {
            Value::scalar(p.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Price` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Price` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::Price;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Price::from_str("123.45").unwrap().amount(),
            decimal("123.45"),
        );
        assert_eq!(Price::from_str("120").unwrap().amount(), decimal("120"));
        assert_eq!(
            Price::from_str("0.01").unwrap().amount(),
            decimal("0.01"),
        );
        assert!(Price::from_str("99.900").is_ok());

        assert!(Price::from_str("0").is_err());
        assert!(Price::from_str("0.00").is_err());
        assert!(Price::from_str("-5").is_err());
        assert!(Price::from_str("1.005").is_err());
        assert!(Price::from_str("abc").is_err());
        assert!(Price::from_str("").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(Price::from_str("123.45").unwrap().to_string(), "123.45");
        assert_eq!(Price::from_str("120").unwrap().to_string(), "120.00");
        assert_eq!(Price::from_str("95.5").unwrap().to_string(), "95.50");
    }

    #[test]
    fn times() {
        let price = Price::from_str("100").unwrap();
        assert_eq!(price.times(3).unwrap().amount(), decimal("300"));

        let price = Price::from_str("99.99").unwrap();
        assert_eq!(price.times(2).unwrap().amount(), decimal("199.98"));

        assert!(price.times(0).is_none());
    }

    #[test]
    fn fits_ten_digits() {
        assert_eq!(Price::MAX, decimal("99999999.99"));
        assert!(Price::from_str("99999999.99").is_ok());
        assert!(Price::from_str("100000000").is_err());
        assert!(Price::new(decimal("1000000000")).is_none());

        let price = Price::from_str("99999999.99").unwrap();
        assert!(price.times(1).is_some());
        assert!(price.times(30).is_none());
        assert!(Price::from_str("5000000").unwrap().times(20).is_some());
        assert!(Price::from_str("5000000").unwrap().times(21).is_none());
    }
}
