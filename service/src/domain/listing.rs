//! [`Listing`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{datetime::of, define_kind, DateTimeOf, Price};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

/// Travel property offered by a host for nightly stays.
#[derive(Clone, Debug)]
pub struct Listing {
    /// ID of this [`Listing`].
    pub id: Id,

    /// ID of the [`User`] hosting this [`Listing`].
    pub host_id: user::Id,

    /// [`Title`] of this [`Listing`].
    pub title: Title,

    /// [`Description`] of this [`Listing`].
    pub description: Description,

    /// [`Location`] of this [`Listing`].
    pub location: Location,

    /// [`Price`] of a single night in this [`Listing`].
    pub price_per_night: Price,

    /// Maximum number of guests this [`Listing`] accommodates.
    pub max_guests: MaxGuests,

    /// Number of bedrooms in this [`Listing`].
    pub bedrooms: RoomCount,

    /// Number of bathrooms in this [`Listing`].
    pub bathrooms: RoomCount,

    /// [`Amenities`] provided by this [`Listing`].
    pub amenities: Amenities,

    /// Indicator whether this [`Listing`] accepts new bookings.
    pub is_available: bool,

    /// [`Category`] of this [`Listing`].
    pub category: Category,

    /// [`DateTime`] when this [`Listing`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Listing`] was last modified.
    pub updated_at: ModificationDateTime,
}

/// ID of a [`Listing`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new time-ordered [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

/// Title of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `title` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title
            && !title.is_empty()
            && title.chars().count() <= 200
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Description of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `description` matches the
    /// format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    /// Creates a new [`Description`] if the given `description` is valid.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Option<Self> {
        let description = description.into();
        Self::check(&description).then_some(Self(description))
    }

    /// Checks whether the given `description` is a valid [`Description`].
    fn check(description: impl AsRef<str>) -> bool {
        let description = description.as_ref();
        !description.trim().is_empty() && description.len() <= 10_000
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Human-readable location of a [`Listing`], like `Seattle, WA`.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Location(String);

impl Location {
    /// Creates a new [`Location`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `location` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// Creates a new [`Location`] if the given `location` is valid.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Option<Self> {
        let location = location.into();
        Self::check(&location).then_some(Self(location))
    }

    /// Checks whether the given `location` is a valid [`Location`].
    fn check(location: impl AsRef<str>) -> bool {
        let location = location.as_ref();
        location.trim() == location
            && !location.is_empty()
            && location.chars().count() <= 100
    }
}

impl FromStr for Location {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Location`")
    }
}

/// Maximum number of guests a [`Listing`] accommodates, at least `1`.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
pub struct MaxGuests(u16);

impl MaxGuests {
    /// Creates a new [`MaxGuests`] if the given `num` is positive.
    #[must_use]
    pub const fn new(num: u16) -> Option<Self> {
        if num == 0 {
            None
        } else {
            Some(Self(num))
        }
    }

    /// Returns the number of guests as a [`u16`].
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

/// Number of rooms of some kind in a [`Listing`].
#[derive(
    Clone, Copy, Debug, Display, Eq, From, Hash, Into, Ord, PartialEq,
    PartialOrd,
)]
pub struct RoomCount(u16);

impl Default for RoomCount {
    fn default() -> Self {
        Self(1)
    }
}

/// Amenities provided by a [`Listing`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[expect(clippy::struct_excessive_bools, reason = "independent flags")]
pub struct Amenities {
    /// Wireless internet access.
    pub wifi: bool,

    /// Parking place.
    pub parking: bool,

    /// Swimming pool.
    pub pool: bool,

    /// Fully equipped kitchen.
    pub kitchen: bool,

    /// Air conditioning.
    pub air_conditioning: bool,
}

define_kind! {
    #[doc = "Category of a [`Listing`]."]
    enum Category {
        #[doc = "An apartment in a building."]
        Apartment = 1,

        #[doc = "A standalone house."]
        House = 2,

        #[doc = "A villa."]
        Villa = 3,

        #[doc = "A condominium unit."]
        Condo = 4,

        #[doc = "A cabin."]
        Cabin = 5,

        #[doc = "A studio."]
        Studio = 6,

        #[doc = "Anything else."]
        Other = 7,
    }
}

impl Category {
    /// Returns a human-readable title of this [`Category`].
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Apartment => "Apartment",
            Self::House => "House",
            Self::Villa => "Villa",
            Self::Condo => "Condo",
            Self::Cabin => "Cabin",
            Self::Studio => "Studio",
            Self::Other => "Other",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Apartment
    }
}

/// Validated pricing and capacity terms of a [`Listing`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Terms {
    /// [`Price`] of a single night.
    pub price_per_night: Price,

    /// Maximum number of guests.
    pub max_guests: MaxGuests,
}

impl Terms {
    /// Validates the raw pricing and capacity terms of a [`Listing`].
    ///
    /// # Errors
    ///
    /// - [`TermsError::NonPositivePrice`] if `price_per_night` is not
    ///   positive.
    /// - [`TermsError::PriceTooPrecise`] if `price_per_night` has more than
    ///   two decimal places.
    /// - [`TermsError::PriceTooHigh`] if `price_per_night` exceeds
    ///   [`Price::MAX`].
    /// - [`TermsError::NoGuestCapacity`] if `max_guests` is not positive.
    pub fn check(
        price_per_night: Decimal,
        max_guests: i32,
    ) -> Result<Self, TermsError> {
        if price_per_night <= Decimal::ZERO {
            return Err(TermsError::NonPositivePrice);
        }
        if price_per_night > Price::MAX {
            return Err(TermsError::PriceTooHigh);
        }
        let price_per_night =
            Price::new(price_per_night).ok_or(TermsError::PriceTooPrecise)?;

        let max_guests = u16::try_from(max_guests)
            .ok()
            .and_then(MaxGuests::new)
            .ok_or(TermsError::NoGuestCapacity)?;

        Ok(Self {
            price_per_night,
            max_guests,
        })
    }
}

/// Error of checking [`Terms`] of a [`Listing`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum TermsError {
    /// Price per night is zero or negative.
    #[display("Price per night must be greater than zero")]
    NonPositivePrice,

    /// Price per night has more than two decimal places.
    #[display("Price per night must have at most 2 decimal places")]
    PriceTooPrecise,

    /// Price per night exceeds [`Price::MAX`].
    #[display("Price per night must not exceed {}", Price::MAX)]
    PriceTooHigh,

    /// Maximum number of guests is zero, negative or too large.
    #[display("Maximum number of guests must be a positive number")]
    NoGuestCapacity,
}

/// [`DateTime`] when a [`Listing`] was created.
pub type CreationDateTime = DateTimeOf<(Listing, of::Creation)>;

/// [`DateTime`] when a [`Listing`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Listing, of::Modification)>;

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::{Category, Location, Terms, TermsError, Title};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn accepts_valid_terms() {
        let terms = Terms::check(decimal("120.00"), 4).unwrap();

        assert_eq!(terms.price_per_night.amount(), decimal("120"));
        assert_eq!(terms.max_guests.get(), 4);
        assert!(Terms::check(decimal("0.01"), 1).is_ok());
    }

    #[test]
    fn rejects_non_positive_price() {
        assert_eq!(
            Terms::check(Decimal::ZERO, 2),
            Err(TermsError::NonPositivePrice),
        );
        assert_eq!(
            Terms::check(decimal("-10"), 2),
            Err(TermsError::NonPositivePrice),
        );
        assert_eq!(
            Terms::check(decimal("10.001"), 2),
            Err(TermsError::PriceTooPrecise),
        );
    }

    #[test]
    fn rejects_price_above_column_range() {
        assert!(Terms::check(decimal("99999999.99"), 1).is_ok());
        assert_eq!(
            Terms::check(decimal("100000000"), 1),
            Err(TermsError::PriceTooHigh),
        );
        assert_eq!(
            Terms::check(decimal("1000000000"), 1),
            Err(TermsError::PriceTooHigh),
        );
    }

    #[test]
    fn rejects_missing_capacity() {
        assert_eq!(
            Terms::check(decimal("100"), 0),
            Err(TermsError::NoGuestCapacity),
        );
        assert_eq!(
            Terms::check(decimal("100"), -3),
            Err(TermsError::NoGuestCapacity),
        );
    }

    #[test]
    fn price_is_checked_before_capacity() {
        assert_eq!(
            Terms::check(Decimal::ZERO, 0),
            Err(TermsError::NonPositivePrice),
        );
    }

    #[test]
    fn text_fields_format() {
        assert!(Title::new("Cozy Downtown Apartment").is_some());
        assert!(Title::new("").is_none());
        assert!(Title::new("x".repeat(201)).is_none());

        assert!(Location::new("New York, NY").is_some());
        assert!(Location::new(" New York").is_none());
    }

    #[test]
    fn category_defaults_to_apartment() {
        assert_eq!(Category::default(), Category::Apartment);
        assert_eq!(Category::Villa.title(), "Villa");
        assert_eq!(Category::Condo.to_string(), "CONDO");
    }
}
