//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{domain, query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.my_id().await?;
        ctx.service()
            .execute(query::user::ById::by(my_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `User` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "user",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn user(
        id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        ctx.service()
            .execute(query::user::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Listing` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LISTING_NOT_EXISTS` - the `Listing` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "listing",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn listing(
        id: api::listing::Id,
        ctx: &Context,
    ) -> Result<api::Listing, Error> {
        ctx.service()
            .execute(query::listing::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ListingError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Listing`s in the order of their creation.
    ///
    /// `location` is matched fuzzily, tolerating typos, with the closest
    /// matches going first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            available_only = ?available_only,
            before = ?before,
            category = ?category,
            first = ?first,
            gql.name = "listings",
            host_id = ?host_id,
            last = ?last,
            location = ?location.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    pub async fn listings(
        first: Option<i32>,
        after: Option<api::listing::list::Cursor>,
        last: Option<i32>,
        before: Option<api::listing::list::Cursor>,
        location: Option<api::listing::Location>,
        category: Option<api::listing::Category>,
        available_only: Option<bool>,
        host_id: Option<api::user::Id>,
        ctx: &Context,
    ) -> Result<api::listing::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        let filter = read::listing::list::Filter {
            location: location.map(Into::into),
            category: category.map(Into::into),
            host_id: host_id.map(Into::into),
            available_only: available_only.unwrap_or_default(),
        };

        ctx.service()
            .execute(query::listings::List::by(
                read::listing::list::Selector {
                    arguments: read::listing::list::Arguments::new(
                        first,
                        after.map(Into::into),
                        last,
                        before.map(Into::into),
                        DEFAULT_PAGE_SIZE,
                    )
                    .ok_or_else(|| api::PaginationError::Ambiguous.into())
                    .map_err(ctx.error())?,
                    filter: filter.clone(),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|page| api::listing::list::Connection::new(page, filter))
    }

    /// Returns the `Booking` with the specified ID.
    ///
    /// Visible to its guest and to the host of the booked `Listing` only.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist or is not visible to the authenticated
    ///                          `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "booking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let my_id = ctx.my_id().await?;

        let booking = ctx
            .service()
            .execute(query::booking::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| BookingError::NotExists.into())
            .map_err(ctx.error())?;
        if booking.user_id != my_id
            && host_of(booking.listing_id, ctx).await? != my_id
        {
            return Err(BookingError::NotExists.into()).map_err(ctx.error());
        }

        Ok(booking.into())
    }

    /// Fetches the page of `Booking`s in the order of their creation.
    ///
    /// If `listingId` is specified, then the `Booking`s of that `Listing` are
    /// returned, which requires the authenticated `User` to be its host.
    /// Otherwise, the `Booking`s made by the authenticated `User` are
    /// returned.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous;
    /// - `LISTING_NOT_EXISTS` - the `Listing` with the specified ID does not
    ///                          exist;
    /// - `NOT_HOST` - the authenticated `User` is not the host of the
    ///                `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "bookings",
            last = ?last,
            listing_id = ?listing_id,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    pub async fn bookings(
        first: Option<i32>,
        after: Option<api::booking::list::Cursor>,
        last: Option<i32>,
        before: Option<api::booking::list::Cursor>,
        listing_id: Option<api::listing::Id>,
        status: Option<api::booking::Status>,
        ctx: &Context,
    ) -> Result<api::booking::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        let arguments = read::booking::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        let my_id = ctx.my_id().await?;
        let filter = if let Some(listing_id) = listing_id.map(Into::into) {
            if host_of(listing_id, ctx).await? != my_id {
                return Err(ListingError::NotHost.into()).map_err(ctx.error());
            }
            read::booking::list::Filter {
                listing_id: Some(listing_id),
                user_id: None,
                status: status.map(Into::into),
            }
        } else {
            read::booking::list::Filter {
                listing_id: None,
                user_id: Some(my_id),
                status: status.map(Into::into),
            }
        };

        ctx.service()
            .execute(query::bookings::List::by(
                read::booking::list::Selector { arguments, filter },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|page| api::booking::list::Connection::new(page, filter))
    }

    /// Fetches the page of `Review`s in the order of their creation.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "reviews",
            last = ?last,
            listing_id = ?listing_id,
            otel.name = Self::SPAN_NAME,
            user_id = ?user_id,
        ),
    )]
    pub async fn reviews(
        first: Option<i32>,
        after: Option<api::review::list::Cursor>,
        last: Option<i32>,
        before: Option<api::review::list::Cursor>,
        listing_id: Option<api::listing::Id>,
        user_id: Option<api::user::Id>,
        ctx: &Context,
    ) -> Result<api::review::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        let filter = read::review::list::Filter {
            listing_id: listing_id.map(Into::into),
            user_id: user_id.map(Into::into),
        };

        ctx.service()
            .execute(query::reviews::List::by(read::review::list::Selector {
                arguments: read::review::list::Arguments::new(
                    first,
                    after.map(Into::into),
                    last,
                    before.map(Into::into),
                    DEFAULT_PAGE_SIZE,
                )
                .ok_or_else(|| api::PaginationError::Ambiguous.into())
                .map_err(ctx.error())?,
                filter,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|page| api::review::list::Connection::new(page, filter))
    }
}

/// Returns the ID of the `User` hosting the [`domain::Listing`] with the
/// provided ID.
///
/// # Errors
///
/// Errors if the [`domain::Listing`] doesn't exist.
async fn host_of(
    listing_id: domain::listing::Id,
    ctx: &Context,
) -> Result<domain::user::Id, Error> {
    ctx.service()
        .execute(query::listing::ById::by(listing_id))
        .await
        .map_err(AsError::into_error)
        .map_err(ctx.error())?
        .map(|listing| listing.host_id)
        .ok_or_else(|| ListingError::NotExists.into())
        .map_err(ctx.error())
}

define_error! {
    enum BookingError {
        #[code = "BOOKING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Booking` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum ListingError {
        #[code = "LISTING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Listing` with the specified ID does not exist"]
        NotExists,

        #[code = "NOT_HOST"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` is not the host of the `Listing`"]
        NotHost,
    }
}

define_error! {
    enum ReviewError {
        #[code = "REVIEW_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Review` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}
