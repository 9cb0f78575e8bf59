//! [`Booking`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{datetime::of, define_kind, Date, DateTimeOf, Price};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::User;
use crate::domain::{listing, user, Listing};

/// Reservation of a [`Listing`] by a guest for a [`Stay`].
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the booked [`Listing`].
    pub listing_id: listing::Id,

    /// ID of the [`User`] who made this [`Booking`].
    pub user_id: user::Id,

    /// [`Stay`] this [`Booking`] reserves.
    pub stay: Stay,

    /// Number of guests staying.
    pub num_guests: NumGuests,

    /// Total [`Price`] of this [`Booking`].
    pub total_price: Price,

    /// Current [`Status`] of this [`Booking`].
    pub status: Status,

    /// [`SpecialRequests`] of the guest, if any.
    pub special_requests: Option<SpecialRequests>,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Booking`] was last modified.
    pub updated_at: ModificationDateTime,
}

impl Booking {
    /// Returns the number of nights this [`Booking`] lasts.
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        self.stay.nights()
    }
}

/// ID of a [`Booking`].
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

/// Half-open range of nights `[check_in, check_out)`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Stay {
    /// [`Date`] of the arrival.
    pub check_in: Date,

    /// [`Date`] of the departure.
    pub check_out: Date,
}

impl Stay {
    /// Returns the number of nights in this [`Stay`].
    ///
    /// Negative or zero for a [`Stay`] not ending after it starts.
    #[must_use]
    pub fn nights(&self) -> i64 {
        self.check_in.days_until(self.check_out)
    }

    /// Indicates whether this [`Stay`] ends strictly after it starts.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.check_out > self.check_in
    }

    /// Indicates whether this [`Stay`] shares at least one night with the
    /// `other` one.
    ///
    /// A departure on the day of another arrival is not an overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

/// Number of guests of a [`Booking`], at least `1`.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
pub struct NumGuests(u16);

impl NumGuests {
    /// Creates a new [`NumGuests`] if the given `num` is positive.
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

/// Free-form special requests of a guest.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct SpecialRequests(String);

impl SpecialRequests {
    /// Creates a new [`SpecialRequests`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`SpecialRequests`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`SpecialRequests`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.len() <= 2_000
    }
}

impl FromStr for SpecialRequests {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `SpecialRequests`")
    }
}

define_kind! {
    #[doc = "Status of a [`Booking`]."]
    enum Status {
        #[doc = "Awaiting host confirmation."]
        Pending = 1,

        #[doc = "Confirmed by the host."]
        Confirmed = 2,

        #[doc = "Cancelled by the host or the guest."]
        Cancelled = 3,

        #[doc = "Stay has taken place."]
        Completed = 4,
    }
}

impl Status {
    /// Indicates whether a [`Booking`] in this [`Status`] holds its [`Stay`].
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Indicates whether a [`Booking`] in this [`Status`] can't change
    /// anymore.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Checks whether the provided [`Party`] may move a [`Booking`] from this
    /// [`Status`] into the `next` one.
    ///
    /// # Errors
    ///
    /// - [`TransitionError::Final`] if this [`Status`] is final.
    /// - [`TransitionError::Unreachable`] if the `next` [`Status`] can't
    ///   follow this one.
    /// - [`TransitionError::NotPermitted`] if the [`Party`] is not allowed to
    ///   perform the transition.
    pub fn transition(
        self,
        next: Self,
        by: Party,
    ) -> Result<Self, TransitionError> {
        use Status as S;

        if self.is_final() {
            return Err(TransitionError::Final(self));
        }

        let reachable = matches!(
            (self, next),
            (S::Pending, S::Confirmed | S::Cancelled)
                | (S::Confirmed, S::Cancelled | S::Completed)
        );
        if !reachable {
            return Err(TransitionError::Unreachable {
                from: self,
                to: next,
            });
        }

        match by {
            Party::Host => Ok(next),
            Party::Guest if next == S::Cancelled => Ok(next),
            Party::Guest => Err(TransitionError::NotPermitted(next)),
        }
    }
}

/// Party of a [`Booking`] acting upon it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Party {
    /// Host of the booked [`Listing`].
    Host,

    /// [`User`] who made the [`Booking`].
    Guest,
}

/// Error of a [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum TransitionError {
    /// [`Booking`] is in a final [`Status`].
    #[display("`Booking` is already {_0} and can't change")]
    Final(#[error(not(source))] Status),

    /// Requested [`Status`] can't follow the current one.
    #[display("`Booking` can't move from {from} to {to}")]
    Unreachable {
        /// Current [`Status`].
        from: Status,

        /// Requested [`Status`].
        to: Status,
    },

    /// Acting [`Party`] is not allowed to set the requested [`Status`].
    #[display("Only the host may set {_0} status")]
    NotPermitted(#[error(not(source))] Status),
}

/// Requested parameters of a new [`Booking`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Candidate {
    /// Requested [`Stay`].
    pub stay: Stay,

    /// Requested number of guests.
    pub num_guests: NumGuests,
}

impl Candidate {
    /// Validates this [`Candidate`] against the provided [`Listing`] snapshot.
    ///
    /// `active` are the [`Stay`]s of the [`Listing`] held by active
    /// [`Booking`]s.
    ///
    /// # Errors
    ///
    /// Returns the first failed rule, checked in the following order:
    /// 1. [`ValidationError::InvalidDateRange`];
    /// 2. [`ValidationError::CheckInInPast`];
    /// 3. [`ValidationError::CapacityExceeded`];
    /// 4. [`ValidationError::ListingUnavailable`];
    /// 5. [`ValidationError::Overlap`].
    pub fn validate<'s>(
        &self,
        listing: &Listing,
        today: Date,
        active: impl IntoIterator<Item = &'s Stay>,
    ) -> Result<(), ValidationError> {
        use ValidationError as E;

        if !self.stay.is_ordered() {
            return Err(E::InvalidDateRange(self.stay));
        }
        if self.stay.check_in < today {
            return Err(E::CheckInInPast(self.stay.check_in));
        }
        if self.num_guests.get() > listing.max_guests.get() {
            return Err(E::CapacityExceeded {
                requested: self.num_guests,
                max: listing.max_guests,
            });
        }
        if !listing.is_available {
            return Err(E::ListingUnavailable(listing.id));
        }
        if let Some(taken) = active.into_iter().find(|s| s.overlaps(&self.stay))
        {
            return Err(E::Overlap(*taken));
        }

        Ok(())
    }
}

/// Computes the total [`Price`] of the provided [`Stay`].
///
/// [`None`] is returned if the [`Stay`] has no nights.
#[must_use]
pub fn quote(price_per_night: Price, stay: Stay) -> Option<Price> {
    u32::try_from(stay.nights())
        .ok()
        .and_then(|n| price_per_night.times(n))
}

/// Error of validating a [`Candidate`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ValidationError {
    /// Check-out is not after check-in.
    #[display("Check-out date must be after check-in date")]
    InvalidDateRange(#[error(not(source))] Stay),

    /// Check-in is before today.
    #[display("Check-in date `{_0}` is in the past")]
    CheckInInPast(#[error(not(source))] Date),

    /// More guests than the [`Listing`] accommodates.
    #[display("Number of guests ({requested}) exceeds maximum ({max})")]
    CapacityExceeded {
        /// Requested number of guests.
        requested: NumGuests,

        /// Maximum number of guests of the [`Listing`].
        max: listing::MaxGuests,
    },

    /// [`Listing`] doesn't accept bookings.
    #[display("`Listing(id: {_0})` is not available for booking")]
    ListingUnavailable(#[error(not(source))] listing::Id),

    /// Requested [`Stay`] intersects an active [`Booking`].
    #[display(
        "`Listing` is already booked from {} to {}",
        _0.check_in,
        _0.check_out,
    )]
    Overlap(#[error(not(source))] Stay),
}

/// [`DateTime`] when a [`Booking`] was created.
pub type CreationDateTime = DateTimeOf<(Booking, of::Creation)>;

/// [`DateTime`] when a [`Booking`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Booking, of::Modification)>;

#[cfg(test)]
mod spec {
    use common::{Date, DateTime, Price};

    use crate::domain::{listing, user, Listing};

    use super::{
        quote, Candidate, NumGuests, Party, Stay, Status, TransitionError,
        ValidationError,
    };

    const NO_STAYS: [Stay; 0] = [];

    fn date(day: u8) -> Date {
        Date::from_calendar(2030, 1, day).unwrap()
    }

    fn stay(from: u8, to: u8) -> Stay {
        Stay {
            check_in: date(from),
            check_out: date(to),
        }
    }

    fn listing(price: &str, max_guests: u16) -> Listing {
        Listing {
            id: listing::Id::new(),
            host_id: user::Id::new(),
            title: listing::Title::new("Test").unwrap(),
            description: listing::Description::new("Test place").unwrap(),
            location: listing::Location::new("Test, TS").unwrap(),
            price_per_night: price.parse::<Price>().unwrap(),
            max_guests: listing::MaxGuests::new(max_guests).unwrap(),
            bedrooms: listing::RoomCount::default(),
            bathrooms: listing::RoomCount::default(),
            amenities: listing::Amenities::default(),
            is_available: true,
            category: listing::Category::default(),
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        }
    }

    fn candidate(from: u8, to: u8, guests: u16) -> Candidate {
        Candidate {
            stay: stay(from, to),
            num_guests: NumGuests::new(guests).unwrap(),
        }
    }

    #[test]
    fn quotes_price_per_night() {
        let s = stay(1, 4);

        assert_eq!(s.nights(), 3);
        assert_eq!(
            quote("100".parse().unwrap(), s).unwrap(),
            "300".parse::<Price>().unwrap(),
        );
        assert!(quote("100".parse().unwrap(), stay(4, 4)).is_none());
        assert!(quote("100".parse().unwrap(), stay(4, 1)).is_none());
    }

    #[test]
    fn refuses_quote_above_max_price() {
        let nightly = "99999999.99".parse::<Price>().unwrap();

        assert_eq!(quote(nightly, stay(1, 2)), Some(nightly));
        assert_eq!(quote(nightly, stay(1, 31)), None);
        assert_eq!(quote("4000000".parse().unwrap(), stay(1, 31)), None);
    }

    #[test]
    fn detects_overlaps() {
        assert!(stay(1, 5).overlaps(&stay(3, 6)));
        assert!(stay(3, 6).overlaps(&stay(1, 5)));
        assert!(stay(1, 10).overlaps(&stay(3, 4)));
        assert!(stay(1, 5).overlaps(&stay(1, 5)));

        assert!(!stay(1, 5).overlaps(&stay(5, 8)));
        assert!(!stay(5, 8).overlaps(&stay(1, 5)));
        assert!(!stay(1, 2).overlaps(&stay(10, 12)));
    }

    #[test]
    fn accepts_valid_candidate() {
        let l = listing("100", 4);
        let active = [stay(1, 3), stay(10, 12)];

        assert_eq!(candidate(3, 10, 4).validate(&l, date(1), &active), Ok(()));
    }

    #[test]
    fn rejects_unordered_dates() {
        let l = listing("100", 4);

        assert_eq!(
            candidate(5, 5, 1).validate(&l, date(1), &NO_STAYS),
            Err(ValidationError::InvalidDateRange(stay(5, 5))),
        );
        assert_eq!(
            candidate(6, 5, 1).validate(&l, date(1), &NO_STAYS),
            Err(ValidationError::InvalidDateRange(stay(6, 5))),
        );
    }

    #[test]
    fn rejects_check_in_in_past() {
        let l = listing("100", 4);

        assert_eq!(
            candidate(2, 5, 1).validate(&l, date(3), &NO_STAYS),
            Err(ValidationError::CheckInInPast(date(2))),
        );
        assert_eq!(candidate(3, 5, 1).validate(&l, date(3), &NO_STAYS), Ok(()));
    }

    #[test]
    fn rejects_too_many_guests() {
        let l = listing("100", 2);

        assert!(matches!(
            candidate(2, 5, 3).validate(&l, date(1), &NO_STAYS),
            Err(ValidationError::CapacityExceeded { requested, max })
                if requested.get() == 3 && max.get() == 2,
        ));
        assert_eq!(candidate(2, 5, 2).validate(&l, date(1), &NO_STAYS), Ok(()));
    }

    #[test]
    fn rejects_unavailable_listing() {
        let mut l = listing("100", 2);
        l.is_available = false;

        assert_eq!(
            candidate(2, 5, 1).validate(&l, date(1), &NO_STAYS),
            Err(ValidationError::ListingUnavailable(l.id)),
        );
    }

    #[test]
    fn rejects_overlapping_stay() {
        let l = listing("100", 4);
        let confirmed = [stay(1, 5)];

        assert_eq!(
            candidate(3, 6, 2).validate(&l, date(1), &confirmed),
            Err(ValidationError::Overlap(stay(1, 5))),
        );
        assert_eq!(
            candidate(5, 8, 2).validate(&l, date(1), &confirmed),
            Ok(()),
        );
    }

    #[test]
    fn checks_rules_in_order() {
        let mut l = listing("100", 1);
        l.is_available = false;
        let active = [stay(1, 10)];

        assert!(matches!(
            candidate(4, 2, 5).validate(&l, date(3), &active),
            Err(ValidationError::InvalidDateRange(_)),
        ));
        assert!(matches!(
            candidate(2, 4, 5).validate(&l, date(3), &active),
            Err(ValidationError::CheckInInPast(_)),
        ));
        assert!(matches!(
            candidate(4, 6, 5).validate(&l, date(3), &active),
            Err(ValidationError::CapacityExceeded { .. }),
        ));
        assert!(matches!(
            candidate(4, 6, 1).validate(&l, date(3), &active),
            Err(ValidationError::ListingUnavailable(_)),
        ));

        l.is_available = true;
        assert!(matches!(
            candidate(4, 6, 1).validate(&l, date(3), &active),
            Err(ValidationError::Overlap(_)),
        ));
    }

    #[test]
    fn host_moves_status_forward() {
        use Status as S;

        for (from, to) in [
            (S::Pending, S::Confirmed),
            (S::Pending, S::Cancelled),
            (S::Confirmed, S::Completed),
            (S::Confirmed, S::Cancelled),
        ] {
            assert_eq!(from.transition(to, Party::Host), Ok(to));
        }

        assert!(matches!(
            S::Pending.transition(S::Completed, Party::Host),
            Err(TransitionError::Unreachable { .. }),
        ));
        assert!(matches!(
            S::Confirmed.transition(S::Pending, Party::Host),
            Err(TransitionError::Unreachable { .. }),
        ));
    }

    #[test]
    fn guest_may_only_cancel() {
        use Status as S;

        assert_eq!(
            S::Pending.transition(S::Cancelled, Party::Guest),
            Ok(S::Cancelled),
        );
        assert_eq!(
            S::Confirmed.transition(S::Cancelled, Party::Guest),
            Ok(S::Cancelled),
        );
        assert_eq!(
            S::Pending.transition(S::Confirmed, Party::Guest),
            Err(TransitionError::NotPermitted(S::Confirmed)),
        );
    }

    #[test]
    fn final_statuses_are_immutable() {
        use Status as S;

        for next in S::ALL {
            assert_eq!(
                S::Cancelled.transition(*next, Party::Host),
                Err(TransitionError::Final(S::Cancelled)),
            );
            assert_eq!(
                S::Completed.transition(*next, Party::Host),
                Err(TransitionError::Final(S::Completed)),
            );
        }
        assert!(S::Pending.is_active() && S::Confirmed.is_active());
        assert!(!S::Cancelled.is_active() && !S::Completed.is_active());
    }
}
