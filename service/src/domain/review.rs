//! [`Review`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{datetime::of, DateTimeOf};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::{Booking, Listing, User};
use crate::domain::{booking, listing, user};

/// Feedback left by a guest on a [`Listing`] after a completed [`Booking`].
#[derive(Clone, Debug)]
pub struct Review {
    /// ID of this [`Review`].
    pub id: Id,

    /// ID of the reviewed [`Listing`].
    pub listing_id: listing::Id,

    /// ID of the [`User`] who wrote this [`Review`].
    pub user_id: user::Id,

    /// ID of the [`Booking`] this [`Review`] originates from, if any.
    pub booking_id: Option<booking::Id>,

    /// [`Rating`] given by this [`Review`].
    pub rating: Rating,

    /// [`Comment`] of this [`Review`].
    pub comment: Comment,

    /// [`DateTime`] when this [`Review`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Review`] was last modified.
    pub updated_at: ModificationDateTime,
}

/// ID of a [`Review`].
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

/// Star rating of a [`Review`], from `1` to `5` inclusive.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
pub struct Rating(u8);

impl Rating {
    /// Lowest possible [`Rating`].
    pub const MIN: u8 = 1;

    /// Highest possible [`Rating`].
    pub const MAX: u8 = 5;

    /// Creates a new [`Rating`] if the given `stars` are in range.
    #[must_use]
    pub fn new(stars: i32) -> Option<Self> {
        u8::try_from(stars)
            .ok()
            .filter(|s| (Self::MIN..=Self::MAX).contains(s))
            .map(Self)
    }

    /// Returns the number of stars of this [`Rating`].
    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }
}

/// Text of a [`Review`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Comment(String);

impl Comment {
    /// Creates a new [`Comment`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Comment`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Comment`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.len() <= 5_000
    }
}

impl FromStr for Comment {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Comment`")
    }
}

/// Snapshot of what a [`User`] has already done on a [`Listing`], used to
/// decide whether a new [`Review`] is allowed.
#[derive(Clone, Debug, Default)]
pub struct History {
    /// IDs of the [`User`]'s completed [`Booking`]s of the [`Listing`], most
    /// recent first.
    pub completed_bookings: Vec<booking::Id>,

    /// ID of the [`User`]'s existing [`Review`] of the [`Listing`], if any.
    pub existing_review: Option<Id>,
}

impl History {
    /// Validates a new [`Review`] with the provided raw `stars` against this
    /// [`History`].
    ///
    /// # Errors
    ///
    /// Returns the first failed rule, checked in the following order:
    /// 1. [`ValidationError::NotEligible`];
    /// 2. [`ValidationError::Duplicate`];
    /// 3. [`ValidationError::RatingOutOfRange`].
    pub fn validate(&self, stars: i32) -> Result<Rating, ValidationError> {
        use ValidationError as E;

        if self.completed_bookings.is_empty() {
            return Err(E::NotEligible);
        }
        if let Some(id) = self.existing_review {
            return Err(E::Duplicate(id));
        }
        Rating::new(stars).ok_or(E::RatingOutOfRange(stars))
    }
}

/// Error of validating a new [`Review`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ValidationError {
    /// [`User`] has no completed [`Booking`] of the [`Listing`].
    #[display("You can only review listings you have completed bookings for")]
    NotEligible,

    /// [`User`] has already reviewed the [`Listing`].
    #[display("You have already reviewed this listing in `Review(id: {_0})`")]
    Duplicate(#[error(not(source))] Id),

    /// Rating is outside of the allowed range.
    #[display("Rating `{_0}` must be between 1 and 5")]
    RatingOutOfRange(#[error(not(source))] i32),
}

/// [`DateTime`] when a [`Review`] was created.
pub type CreationDateTime = DateTimeOf<(Review, of::Creation)>;

/// [`DateTime`] when a [`Review`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Review, of::Modification)>;

#[cfg(test)]
mod spec {
    use crate::domain::booking;

    use super::{History, Id, Rating, ValidationError};

    fn eligible() -> History {
        History {
            completed_bookings: vec![booking::Id::new()],
            existing_review: None,
        }
    }

    #[test]
    fn rating_range() {
        assert_eq!(Rating::new(1).map(Rating::stars), Some(1));
        assert_eq!(Rating::new(5).map(Rating::stars), Some(5));

        assert!(Rating::new(0).is_none());
        assert!(Rating::new(6).is_none());
        assert!(Rating::new(-1).is_none());
        assert!(Rating::new(261).is_none());
    }

    #[test]
    fn accepts_eligible_review() {
        assert_eq!(eligible().validate(4).map(Rating::stars), Ok(4));
    }

    #[test]
    fn rejects_without_completed_booking() {
        assert_eq!(
            History::default().validate(5),
            Err(ValidationError::NotEligible),
        );
    }

    #[test]
    fn rejects_second_review() {
        let existing = Id::new();
        let history = History {
            existing_review: Some(existing),
            ..eligible()
        };

        assert_eq!(
            history.validate(5),
            Err(ValidationError::Duplicate(existing)),
        );
    }

    #[test]
    fn rejects_out_of_range_rating() {
        assert_eq!(
            eligible().validate(0),
            Err(ValidationError::RatingOutOfRange(0)),
        );
        assert_eq!(
            eligible().validate(6),
            Err(ValidationError::RatingOutOfRange(6)),
        );
    }

    #[test]
    fn checks_rules_in_order() {
        let history = History {
            completed_bookings: vec![],
            existing_review: Some(Id::new()),
        };
        assert_eq!(history.validate(9), Err(ValidationError::NotEligible));

        let history = History {
            existing_review: Some(Id::new()),
            ..eligible()
        };
        assert!(matches!(
            history.validate(9),
            Err(ValidationError::Duplicate(_)),
        ));
    }
}
