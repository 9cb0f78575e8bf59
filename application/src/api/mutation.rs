//! GraphQL [`Mutation`]s definitions.

use common::{Date, Price};
use juniper::graphql_object;
use service::{command, domain, Command as _};

use crate::{
    api::{self, scalar},
    define_error, AsError, Context, Error,
};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `User` with the provided credentials and personal info,
    /// and signs them in.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USERNAME_OCCUPIED` - provided `Username` is occupied by another
    ///                         `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUser",
            otel.name = Self::SPAN_NAME,
            username = %username,
        ),
    )]
    pub async fn create_user(
        username: api::user::Username,
        password: api::user::Password,
        first_name: Option<api::user::Name>,
        last_name: Option<api::user::Name>,
        email: Option<api::user::Email>,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let user = ctx
            .service()
            .execute(command::CreateUser {
                username: username.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
                first_name: first_name.map(Into::into),
                last_name: last_name.map(Into::into),
                email: email.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByUserId(user.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session((&output).into()).await;

        Ok(output.into())
    }

    /// Creates a new `User` session with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials does not match any `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUserSession",
            otel.name = Self::SPAN_NAME,
            username = %username,
        ),
    )]
    pub async fn create_user_session(
        username: api::user::Username,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByCredentials {
                username: username.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session((&output).into()).await;

        Ok(output.into())
    }

    /// Creates a new `Listing` hosted by the authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NON_POSITIVE_PRICE` - `pricePerNight` is not greater than zero;
    /// - `PRICE_TOO_PRECISE` - `pricePerNight` has more than 2 decimal places;
    /// - `PRICE_TOO_HIGH` - `pricePerNight` exceeds `99999999.99`;
    /// - `NO_GUEST_CAPACITY` - `maxGuests` is not a positive number;
    /// - `INVALID_ROOM_COUNT` - `bedrooms` or `bathrooms` is negative.
    #[tracing::instrument(
        skip_all,
        fields(
            category = ?category,
            gql.name = "createListing",
            location = %location,
            otel.name = Self::SPAN_NAME,
            price_per_night = %price_per_night,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    pub async fn create_listing(
        title: api::listing::Title,
        description: api::listing::Description,
        location: api::listing::Location,
        price_per_night: scalar::Decimal,
        max_guests: i32,
        bedrooms: Option<i32>,
        bathrooms: Option<i32>,
        amenities: Option<api::listing::AmenitiesInput>,
        is_available: Option<bool>,
        category: Option<api::listing::Category>,
        ctx: &Context,
    ) -> Result<api::Listing, Error> {
        let my_id = ctx.my_id().await?;

        let bedrooms = bedrooms
            .map(|n| room_count(n, InputError::Bedrooms))
            .transpose()
            .map_err(ctx.error())?
            .unwrap_or_default();
        let bathrooms = bathrooms
            .map(|n| room_count(n, InputError::Bathrooms))
            .transpose()
            .map_err(ctx.error())?
            .unwrap_or_default();

        ctx.service()
            .execute(command::CreateListing {
                host_id: my_id,
                title: title.into(),
                description: description.into(),
                location: location.into(),
                price_per_night: price_per_night.into(),
                max_guests,
                bedrooms,
                bathrooms,
                amenities: amenities.map(Into::into).unwrap_or_default(),
                is_available: is_available.unwrap_or(true),
                category: category.map(Into::into).unwrap_or_default(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the provided fields of the `Listing` hosted by the
    /// authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LISTING_NOT_EXISTS` - the `Listing` with the provided ID does not
    ///                          exist;
    /// - `NOT_HOST` - the authenticated `User` is not the host of the
    ///                `Listing`;
    /// - `NON_POSITIVE_PRICE` - `pricePerNight` is not greater than zero;
    /// - `PRICE_TOO_PRECISE` - `pricePerNight` has more than 2 decimal places;
    /// - `PRICE_TOO_HIGH` - `pricePerNight` exceeds `99999999.99`;
    /// - `NO_GUEST_CAPACITY` - `maxGuests` is not a positive number;
    /// - `INVALID_ROOM_COUNT` - `bedrooms` or `bathrooms` is negative.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateListing",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    pub async fn update_listing(
        id: api::listing::Id,
        title: Option<api::listing::Title>,
        description: Option<api::listing::Description>,
        location: Option<api::listing::Location>,
        price_per_night: Option<scalar::Decimal>,
        max_guests: Option<i32>,
        bedrooms: Option<i32>,
        bathrooms: Option<i32>,
        amenities: Option<api::listing::AmenitiesInput>,
        is_available: Option<bool>,
        category: Option<api::listing::Category>,
        ctx: &Context,
    ) -> Result<api::Listing, Error> {
        let my_id = ctx.my_id().await?;

        let bedrooms = bedrooms
            .map(|n| room_count(n, InputError::Bedrooms))
            .transpose()
            .map_err(ctx.error())?;
        let bathrooms = bathrooms
            .map(|n| room_count(n, InputError::Bathrooms))
            .transpose()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpdateListing {
                listing_id: id.into(),
                initiator_id: my_id,
                title: title.map(Into::into),
                description: description.map(Into::into),
                location: location.map(Into::into),
                price_per_night: price_per_night.map(Into::into),
                max_guests,
                bedrooms,
                bathrooms,
                amenities: amenities.map(Into::into),
                is_available,
                category: category.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Listing` hosted by the authenticated `User`, along with
    /// all its `Booking`s and `Review`s.
    ///
    /// Returns the ID of the deleted `Listing`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LISTING_NOT_EXISTS` - the `Listing` with the provided ID does not
    ///                          exist;
    /// - `NOT_HOST` - the authenticated `User` is not the host of the
    ///                `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteListing",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_listing(
        id: api::listing::Id,
        ctx: &Context,
    ) -> Result<api::listing::Id, Error> {
        let my_id = ctx.my_id().await?;

        ctx.service()
            .execute(command::DeleteListing {
                listing_id: id.into(),
                initiator_id: my_id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|listing| listing.id.into())
    }

    /// Books the `Listing` for the authenticated `User`.
    ///
    /// If `totalPrice` is omitted, then it's computed as the `Listing` price
    /// per night multiplied by the number of nights.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LISTING_NOT_EXISTS` - the `Listing` with the provided ID does not
    ///                          exist;
    /// - `USER_IS_HOST` - the authenticated `User` hosts the `Listing`;
    /// - `INVALID_NUM_GUESTS` - `numGuests` is not a positive number;
    /// - `INVALID_DATE_RANGE` - `checkOutDate` is not after `checkInDate`;
    /// - `CHECK_IN_IN_PAST` - `checkInDate` is before today;
    /// - `CAPACITY_EXCEEDED` - `numGuests` exceeds the `Listing` capacity;
    /// - `LISTING_UNAVAILABLE` - the `Listing` doesn't accept bookings;
    /// - `BOOKING_OVERLAP` - the dates intersect an active `Booking`;
    /// - `TOTAL_PRICE_OVERFLOW` - the computed `totalPrice` is too large;
    /// - `CONFLICT` - the `Booking` conflicts with a concurrent change.
    #[tracing::instrument(
        skip_all,
        fields(
            check_in_date = %check_in_date,
            check_out_date = %check_out_date,
            gql.name = "createBooking",
            listing_id = %listing_id,
            num_guests = %num_guests,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_booking(
        listing_id: api::listing::Id,
        check_in_date: Date,
        check_out_date: Date,
        num_guests: i32,
        total_price: Option<Price>,
        special_requests: Option<api::booking::SpecialRequests>,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let my_id = ctx.my_id().await?;

        let num_guests = u16::try_from(num_guests)
            .ok()
            .and_then(domain::booking::NumGuests::new)
            .ok_or_else(|| InputError::NumGuests.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateBooking {
                listing_id: listing_id.into(),
                user_id: my_id,
                stay: domain::booking::Stay {
                    check_in: check_in_date,
                    check_out: check_out_date,
                },
                num_guests,
                total_price,
                special_requests: special_requests.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Moves the `Booking` into the provided `BookingStatus`.
    ///
    /// The host of the booked `Listing` may confirm, cancel and complete the
    /// `Booking`, while its guest may only cancel it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the provided ID does not
    ///                          exist;
    /// - `NOT_PARTY` - the authenticated `User` is neither the guest nor the
    ///                 host of the `Booking`;
    /// - `BOOKING_FINAL` - the `Booking` is cancelled or completed already;
    /// - `INVALID_TRANSITION` - the `status` can't follow the current one;
    /// - `NOT_PERMITTED` - only the host may set the `status`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateBookingStatus",
            id = %id,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn update_booking_status(
        id: api::booking::Id,
        status: api::booking::Status,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let my_id = ctx.my_id().await?;

        ctx.service()
            .execute(command::UpdateBookingStatus {
                booking_id: id.into(),
                initiator_id: my_id,
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Reviews the `Listing` on behalf of the authenticated `User`.
    ///
    /// If `bookingId` is omitted, then the most recent completed `Booking` of
    /// the `User` on the `Listing` is attached.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LISTING_NOT_EXISTS` - the `Listing` with the provided ID does not
    ///                          exist;
    /// - `USER_IS_HOST` - the authenticated `User` hosts the `Listing`;
    /// - `BOOKING_NOT_ELIGIBLE` - the `Booking` with the provided ID is not a
    ///                            completed one of the `User` on the
    ///                            `Listing`;
    /// - `REVIEW_NOT_ELIGIBLE` - the `User` has no completed `Booking`s of
    ///                           the `Listing`;
    /// - `REVIEW_DUPLICATE` - the `User` has reviewed the `Listing` already;
    /// - `RATING_OUT_OF_RANGE` - `rating` is not between 1 and 5.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = ?booking_id,
            gql.name = "createReview",
            listing_id = %listing_id,
            otel.name = Self::SPAN_NAME,
            rating = %rating,
        ),
    )]
    pub async fn create_review(
        listing_id: api::listing::Id,
        rating: i32,
        comment: api::review::Comment,
        booking_id: Option<api::booking::Id>,
        ctx: &Context,
    ) -> Result<api::Review, Error> {
        let my_id = ctx.my_id().await?;

        ctx.service()
            .execute(command::CreateReview {
                listing_id: listing_id.into(),
                user_id: my_id,
                booking_id: booking_id.map(Into::into),
                rating,
                comment: comment.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Converts the provided raw number into a [`domain::listing::RoomCount`],
/// reporting the provided [`InputError`] if it's negative.
fn room_count(
    num: i32,
    err: InputError,
) -> Result<domain::listing::RoomCount, Error> {
    u16::try_from(num).map(Into::into).map_err(|_| err.into())
}

define_error! {
    enum InputError {
        #[code = "INVALID_ROOM_COUNT"]
        #[status = BAD_REQUEST]
        #[field = "bathrooms"]
        #[message = "Number of bathrooms must not be negative"]
        Bathrooms,

        #[code = "INVALID_ROOM_COUNT"]
        #[status = BAD_REQUEST]
        #[field = "bedrooms"]
        #[message = "Number of bedrooms must not be negative"]
        Bedrooms,

        #[code = "INVALID_NUM_GUESTS"]
        #[status = BAD_REQUEST]
        #[field = "numGuests"]
        #[message = "Number of guests must be a positive number"]
        NumGuests,
    }
}

/// Name of the database constraint preventing active `Booking`s overlap.
const BOOKING_OVERLAP_CONSTRAINT: &str = "bookings_no_active_overlap";

/// Names of the database constraints preventing duplicated `Review`s.
const REVIEW_UNIQUE_CONSTRAINTS: [&str; 2] =
    ["unique_user_listing_review", "unique_booking_review"];

define_error! {
    enum ListingError {
        #[code = "LISTING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[field = "listingId"]
        #[message = "`Listing` with the provided ID does not exist"]
        NotExists,

        #[code = "NOT_HOST"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` is not the host of the `Listing`"]
        NotHost,

        #[code = "USER_IS_HOST"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` is the host of the `Listing`"]
        UserIsHost,
    }
}

define_error! {
    enum ConflictError {
        #[code = "CONFLICT"]
        #[status = CONFLICT]
        #[message = "Request conflicts with a concurrent change, retry it"]
        Conflict,
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "USERNAME_OCCUPIED"]
                #[status = CONFLICT]
                #[field = "username"]
                #[message = "`Username` is occupied by another `User`"]
                UsernameOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::UsernameOccupied(_) => Some(Error::UsernameOccupied.into()),
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = FORBIDDEN]
                #[message = "Provided credentials does not match any `User`"]
                WrongCredentials,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Signing(_) => None,
            Self::UserNotExists(_) | Self::WrongCredentials => {
                Some(Error::WrongCredentials.into())
            }
        }
    }
}

impl AsError for domain::listing::TermsError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NON_POSITIVE_PRICE"]
                #[status = BAD_REQUEST]
                #[field = "pricePerNight"]
                #[message = "Price per night must be greater than zero"]
                NonPositivePrice,

                #[code = "PRICE_TOO_PRECISE"]
                #[status = BAD_REQUEST]
                #[field = "pricePerNight"]
                #[message = "Price per night must have at most 2 decimal \
                             places"]
                PriceTooPrecise,

                #[code = "PRICE_TOO_HIGH"]
                #[status = BAD_REQUEST]
                #[field = "pricePerNight"]
                #[message = "Price per night must not exceed 99999999.99"]
                PriceTooHigh,

                #[code = "NO_GUEST_CAPACITY"]
                #[status = BAD_REQUEST]
                #[field = "maxGuests"]
                #[message = "Maximum number of guests must be a positive \
                             number"]
                NoGuestCapacity,
            }
        }

        Some(match self {
            Self::NonPositivePrice => Error::NonPositivePrice.into(),
            Self::PriceTooPrecise => Error::PriceTooPrecise.into(),
            Self::PriceTooHigh => Error::PriceTooHigh.into(),
            Self::NoGuestCapacity => Error::NoGuestCapacity.into(),
        })
    }
}

impl AsError for command::create_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::HostNotExists(_) => {
                Some(api::query::UserError::NotExists.into())
            }
            Self::Terms(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ListingNotExists(_) => Some(ListingError::NotExists.into()),
            Self::NotHost(_) => Some(ListingError::NotHost.into()),
            Self::Terms(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::delete_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ListingNotExists(_) => Some(ListingError::NotExists.into()),
            Self::NotHost(_) => Some(ListingError::NotHost.into()),
        }
    }
}

impl AsError for domain::booking::ValidationError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_DATE_RANGE"]
                #[status = BAD_REQUEST]
                #[field = "checkOutDate"]
                #[message = "Check-out date must be after check-in date"]
                InvalidDateRange,

                #[code = "CHECK_IN_IN_PAST"]
                #[status = BAD_REQUEST]
                #[field = "checkInDate"]
                #[message = "Check-in date is in the past"]
                CheckInInPast,

                #[code = "CAPACITY_EXCEEDED"]
                #[status = BAD_REQUEST]
                #[field = "numGuests"]
                #[message = "Number of guests exceeds the `Listing` capacity"]
                CapacityExceeded,

                #[code = "LISTING_UNAVAILABLE"]
                #[status = CONFLICT]
                #[message = "`Listing` is not available for booking"]
                ListingUnavailable,

                #[code = "BOOKING_OVERLAP"]
                #[status = CONFLICT]
                #[message = "`Listing` is already booked for these dates"]
                Overlap,
            }
        }

        let err: crate::Error = match self {
            Self::InvalidDateRange(_) => Error::InvalidDateRange.into(),
            Self::CheckInInPast(_) => Error::CheckInInPast.into(),
            Self::CapacityExceeded { .. } => Error::CapacityExceeded.into(),
            Self::ListingUnavailable(_) => Error::ListingUnavailable.into(),
            Self::Overlap(_) => Error::Overlap.into(),
        };
        Some(err.with_message(self))
    }
}

impl AsError for command::create_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_OVERLAP"]
                #[status = CONFLICT]
                #[message = "`Listing` is already booked for these dates"]
                Overlap,

                #[code = "TOTAL_PRICE_OVERFLOW"]
                #[status = BAD_REQUEST]
                #[field = "totalPrice"]
                #[message = "Total price of the `Booking` is too large"]
                TotalPriceOverflow,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ListingNotExists(_) => ListingError::NotExists.into(),
            Self::UserNotExists(_) => api::query::UserError::NotExists.into(),
            Self::UserIsHost(_) => ListingError::UserIsHost.into(),
            Self::Validation(e) => return e.try_as_error(),
            Self::TotalPriceOverflow => Error::TotalPriceOverflow.into(),
            Self::Conflict(c) if c == BOOKING_OVERLAP_CONSTRAINT => {
                Error::Overlap.into()
            }
            Self::Conflict(_) => ConflictError::Conflict.into(),
        })
    }
}

impl AsError for command::update_booking_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use domain::booking::TransitionError as T;

        define_error! {
            enum Error {
                #[code = "BOOKING_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[field = "id"]
                #[message = "`Booking` with the provided ID does not exist"]
                BookingNotExists,

                #[code = "NOT_PARTY"]
                #[status = FORBIDDEN]
                #[message = "Authenticated `User` is neither the guest nor \
                             the host of the `Booking`"]
                NotParty,

                #[code = "BOOKING_FINAL"]
                #[status = CONFLICT]
                #[message = "`Booking` is cancelled or completed already"]
                Final,

                #[code = "INVALID_TRANSITION"]
                #[status = BAD_REQUEST]
                #[field = "status"]
                #[message = "Requested status can't follow the current one"]
                InvalidTransition,

                #[code = "NOT_PERMITTED"]
                #[status = FORBIDDEN]
                #[field = "status"]
                #[message = "Only the host may set the requested status"]
                NotPermitted,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::BookingNotExists(_) => Error::BookingNotExists.into(),
            Self::NotParty(_) => Error::NotParty.into(),
            Self::Transition(e @ T::Final(_)) => {
                crate::Error::from(Error::Final).with_message(e)
            }
            Self::Transition(e @ T::Unreachable { .. }) => {
                crate::Error::from(Error::InvalidTransition).with_message(e)
            }
            Self::Transition(e @ T::NotPermitted(_)) => {
                crate::Error::from(Error::NotPermitted).with_message(e)
            }
        })
    }
}

impl AsError for domain::review::ValidationError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "REVIEW_NOT_ELIGIBLE"]
                #[status = FORBIDDEN]
                #[message = "You can only review listings you have completed \
                             bookings for"]
                NotEligible,

                #[code = "REVIEW_DUPLICATE"]
                #[status = CONFLICT]
                #[message = "You have already reviewed this listing"]
                Duplicate,

                #[code = "RATING_OUT_OF_RANGE"]
                #[status = BAD_REQUEST]
                #[field = "rating"]
                #[message = "Rating must be between 1 and 5"]
                RatingOutOfRange,
            }
        }

        Some(match self {
            Self::NotEligible => Error::NotEligible.into(),
            Self::Duplicate(_) => Error::Duplicate.into(),
            Self::RatingOutOfRange(_) => Error::RatingOutOfRange.into(),
        })
    }
}

impl AsError for command::create_review::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_NOT_ELIGIBLE"]
                #[status = BAD_REQUEST]
                #[field = "bookingId"]
                #[message = "`Booking` with the provided ID is not a \
                             completed one of the authenticated `User` on \
                             the `Listing`"]
                BookingNotEligible,

                #[code = "REVIEW_DUPLICATE"]
                #[status = CONFLICT]
                #[message = "You have already reviewed this listing"]
                Duplicate,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ListingNotExists(_) => ListingError::NotExists.into(),
            Self::UserIsHost(_) => ListingError::UserIsHost.into(),
            Self::BookingNotEligible(_) => Error::BookingNotEligible.into(),
            Self::Validation(e) => return e.try_as_error(),
            Self::Conflict(c)
                if REVIEW_UNIQUE_CONSTRAINTS.contains(&c.as_str()) =>
            {
                Error::Duplicate.into()
            }
            Self::Conflict(_) => ConflictError::Conflict.into(),
        })
    }
}

#[cfg(test)]
mod spec {
    use common::Date;
    use service::{
        command,
        domain::{booking, listing, review, user},
    };

    use crate::AsError as _;

    fn date(day: u8) -> Date {
        Date::from_calendar(2030, 1, day).unwrap()
    }

    fn stay(check_in: u8, check_out: u8) -> booking::Stay {
        booking::Stay {
            check_in: date(check_in),
            check_out: date(check_out),
        }
    }

    #[test]
    fn maps_booking_validation_errors_to_fields() {
        use booking::ValidationError as E;

        let cases = [
            (
                E::InvalidDateRange(stay(4, 4)),
                "INVALID_DATE_RANGE",
                Some("checkOutDate"),
            ),
            (
                E::CheckInInPast(date(1)),
                "CHECK_IN_IN_PAST",
                Some("checkInDate"),
            ),
            (
                E::CapacityExceeded {
                    requested: booking::NumGuests::new(5).unwrap(),
                    max: listing::MaxGuests::new(4).unwrap(),
                },
                "CAPACITY_EXCEEDED",
                Some("numGuests"),
            ),
            (
                E::ListingUnavailable(listing::Id::new()),
                "LISTING_UNAVAILABLE",
                None,
            ),
            (E::Overlap(stay(1, 5)), "BOOKING_OVERLAP", None),
        ];

        for (validation, code, field) in cases {
            let err = command::create_booking::ExecutionError::Validation(
                validation,
            )
            .try_as_error()
            .unwrap();

            assert_eq!(err.code, code, "{validation}");
            assert_eq!(err.field, field, "{validation}");
            assert_eq!(err.message, validation.to_string());
        }
    }

    #[test]
    fn reports_capacity_in_message() {
        let err = command::create_booking::ExecutionError::Validation(
            booking::ValidationError::CapacityExceeded {
                requested: booking::NumGuests::new(6).unwrap(),
                max: listing::MaxGuests::new(4).unwrap(),
            },
        )
        .try_as_error()
        .unwrap();

        assert_eq!(err.message, "Number of guests (6) exceeds maximum (4)");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn maps_booking_preconditions() {
        use command::create_booking::ExecutionError as E;

        let err = E::ListingNotExists(listing::Id::new())
            .try_as_error()
            .unwrap();
        assert_eq!(err.code, "LISTING_NOT_EXISTS");
        assert_eq!(err.field, Some("listingId"));
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);

        let err = E::UserIsHost(user::Id::new()).try_as_error().unwrap();
        assert_eq!(err.code, "USER_IS_HOST");
        assert_eq!(err.field, None);

        let err = E::TotalPriceOverflow.try_as_error().unwrap();
        assert_eq!(err.code, "TOTAL_PRICE_OVERFLOW");
        assert_eq!(err.field, Some("totalPrice"));
    }

    #[test]
    fn maps_booking_conflicts_by_constraint() {
        use command::create_booking::ExecutionError as E;

        let err = E::Conflict("bookings_no_active_overlap".into())
            .try_as_error()
            .unwrap();
        assert_eq!(err.code, "BOOKING_OVERLAP");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);

        let err = E::Conflict("positive_num_guests".into())
            .try_as_error()
            .unwrap();
        assert_eq!(err.code, "CONFLICT");
        assert_eq!(err.field, None);
    }

    #[test]
    fn maps_status_transitions() {
        use booking::{Status as S, TransitionError as T};
        use command::update_booking_status::ExecutionError as E;

        let err = E::Transition(T::Final(S::Completed))
            .try_as_error()
            .unwrap();
        assert_eq!(err.code, "BOOKING_FINAL");

        let err = E::Transition(T::Unreachable {
            from: S::Pending,
            to: S::Completed,
        })
        .try_as_error()
        .unwrap();
        assert_eq!(err.code, "INVALID_TRANSITION");
        assert_eq!(err.field, Some("status"));

        let err = E::Transition(T::NotPermitted(S::Confirmed))
            .try_as_error()
            .unwrap();
        assert_eq!(err.code, "NOT_PERMITTED");
        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);

        let err = E::NotParty(user::Id::new()).try_as_error().unwrap();
        assert_eq!(err.code, "NOT_PARTY");
    }

    #[test]
    fn maps_review_errors() {
        use command::create_review::ExecutionError as E;
        use review::ValidationError as V;

        let err = E::Validation(V::NotEligible).try_as_error().unwrap();
        assert_eq!(err.code, "REVIEW_NOT_ELIGIBLE");
        assert_eq!(err.field, None);

        let err = E::Validation(V::Duplicate(review::Id::new()))
            .try_as_error()
            .unwrap();
        assert_eq!(err.code, "REVIEW_DUPLICATE");

        let err = E::Validation(V::RatingOutOfRange(6))
            .try_as_error()
            .unwrap();
        assert_eq!(err.code, "RATING_OUT_OF_RANGE");
        assert_eq!(err.field, Some("rating"));

        let err = E::Conflict("unique_user_listing_review".into())
            .try_as_error()
            .unwrap();
        assert_eq!(err.code, "REVIEW_DUPLICATE");

        let err = E::BookingNotEligible(booking::Id::new())
            .try_as_error()
            .unwrap();
        assert_eq!(err.code, "BOOKING_NOT_ELIGIBLE");
        assert_eq!(err.field, Some("bookingId"));
    }

    #[test]
    fn maps_listing_terms_to_fields() {
        use command::create_listing::ExecutionError as E;
        use listing::TermsError as T;

        let err = E::Terms(T::NonPositivePrice).try_as_error().unwrap();
        assert_eq!(err.code, "NON_POSITIVE_PRICE");
        assert_eq!(err.field, Some("pricePerNight"));

        let err = E::Terms(T::PriceTooHigh).try_as_error().unwrap();
        assert_eq!(err.code, "PRICE_TOO_HIGH");
        assert_eq!(err.field, Some("pricePerNight"));

        let err = E::Terms(T::NoGuestCapacity).try_as_error().unwrap();
        assert_eq!(err.code, "NO_GUEST_CAPACITY");
        assert_eq!(err.field, Some("maxGuests"));

        let err = command::update_listing::ExecutionError::NotHost(
            user::Id::new(),
        )
        .try_as_error()
        .unwrap();
        assert_eq!(err.code, "NOT_HOST");
        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn maps_user_errors() {
        use command::create_user_session::ExecutionError as E;

        let err = E::UserNotExists(user::Id::new()).try_as_error().unwrap();
        assert_eq!(err.code, "WRONG_CREDENTIALS");

        let err = command::create_user::ExecutionError::UsernameOccupied(
            "guest".parse().unwrap(),
        )
        .try_as_error()
        .unwrap();
        assert_eq!(err.code, "USERNAME_OCCUPIED");
        assert_eq!(err.field, Some("username"));
    }
}
