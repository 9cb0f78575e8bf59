//! [`Booking`]-related definitions.

use std::future;

use common::{Date, DateTime, Handler as _, Price};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A reservation of a `Listing` for a range of nights.
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    id: Id,

    /// Underlying [`domain::Booking`].
    booking: OnceCell<domain::Booking>,
}

impl From<domain::Booking> for Booking {
    fn from(booking: domain::Booking) -> Self {
        Self {
            id: booking.id.into(),
            booking: OnceCell::new_with(Some(booking)),
        }
    }
}

impl Booking {
    /// Creates a new [`Booking`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Booking`] with the provided ID exists,
    /// otherwise accessing this [`Booking`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            booking: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Booking`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Booking`] doesn't exist.
    async fn booking(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Booking, Error> {
        let id = self.id.into();
        self.booking
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::booking::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|b| {
                        future::ready(b.ok_or_else(|| {
                            api::query::BookingError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A reservation of a `Listing` for a range of nights.
#[graphql_object(context = Context)]
impl Booking {
    /// Unique identifier of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Booked `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.listing",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn listing(&self, ctx: &Context) -> Result<api::Listing, Error> {
        let listing_id = self.booking(ctx).await?.listing_id;
        #[expect(unsafe_code, reason = "foreign key guarantees existence")]
        let listing = unsafe { api::Listing::new_unchecked(listing_id) };
        Ok(listing)
    }

    /// Guest `User` who made this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.user",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn user(&self, ctx: &Context) -> Result<api::User, Error> {
        let user_id = self.booking(ctx).await?.user_id;
        #[expect(unsafe_code, reason = "foreign key guarantees existence")]
        let user = unsafe { api::User::new_unchecked(user_id) };
        Ok(user)
    }

    /// `Date` of the arrival.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.checkInDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn check_in_date(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.booking(ctx).await?.stay.check_in)
    }

    /// `Date` of the departure.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.checkOutDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn check_out_date(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.booking(ctx).await?.stay.check_out)
    }

    /// Number of nights of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.durationDays",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn duration_days(&self, ctx: &Context) -> Result<i32, Error> {
        i32::try_from(self.booking(ctx).await?.duration_days())
            .map_err(AsError::into_error)
    }

    /// Number of guests staying.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.numGuests",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn num_guests(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.booking(ctx).await?.num_guests.get().into())
    }

    /// Total price of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.totalPrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total_price(&self, ctx: &Context) -> Result<Price, Error> {
        Ok(self.booking(ctx).await?.total_price)
    }

    /// Current status of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.booking(ctx).await?.status.into())
    }

    /// Special requests of the guest.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.specialRequests",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn special_requests(
        &self,
        ctx: &Context,
    ) -> Result<Option<SpecialRequests>, Error> {
        Ok(self
            .booking(ctx)
            .await?
            .special_requests
            .clone()
            .map(Into::into))
    }

    /// `DateTime` when this `Booking` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.booking(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Booking` was last modified.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.booking(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of a `Booking`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::booking::Id)]
#[into(domain::booking::Id)]
#[graphql(name = "BookingId", transparent)]
pub struct Id(Uuid);

/// Special requests of a `Booking` guest.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "BookingSpecialRequests",
    with = scalar::Via::<domain::booking::SpecialRequests>,
)]
pub struct SpecialRequests(domain::booking::SpecialRequests);

/// Status of a `Booking`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "BookingStatus")]
pub enum Status {
    /// Awaiting host confirmation.
    Pending,

    /// Confirmed by the host.
    Confirmed,

    /// Cancelled by the host or the guest.
    Cancelled,

    /// Stay has taken place.
    Completed,
}

impl From<domain::booking::Status> for Status {
    fn from(status: domain::booking::Status) -> Self {
        use domain::booking::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Confirmed => Self::Confirmed,
            S::Cancelled => Self::Cancelled,
            S::Completed => Self::Completed,
        }
    }
}

impl From<Status> for domain::booking::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => Self::Pending,
            Status::Confirmed => Self::Confirmed,
            Status::Cancelled => Self::Cancelled,
            Status::Completed => Self::Completed,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Booking`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Booking, Id};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Booking` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::booking::list::Cursor)]
    #[graphql(
        name = "BookingListCursor",
        with = scalar::Via::<read::booking::list::Cursor>,
    )]
    pub struct Cursor(pub read::booking::list::Cursor);

    /// Edge in the [`Booking`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::booking::list::Edge);

    /// Edge in the `Booking` list.
    #[graphql_object(name = "BookingListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `BookingListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `BookingListEdge`.
        #[must_use]
        pub fn node(&self) -> Booking {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Booking` existence"
            )]
            unsafe {
                Booking::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Booking`] list.
    #[derive(Clone, Debug)]
    pub struct Connection {
        /// Underlying [`read::booking::list::Connection`].
        page: read::booking::list::Connection,

        /// [`read::booking::list::Filter`] the page was selected with.
        filter: read::booking::list::Filter,
    }

    impl Connection {
        /// Creates a new [`Connection`] out of the provided page selected
        /// with the provided [`read::booking::list::Filter`].
        #[must_use]
        pub const fn new(
            page: read::booking::list::Connection,
            filter: read::booking::list::Filter,
        ) -> Self {
            Self { page, filter }
        }
    }

    /// Connection of the `Booking` list.
    #[graphql_object(name = "BookingListConnection", context = Context)]
    impl Connection {
        /// Edges of this `BookingListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.page.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.page.page_info(),
                start_cursor: self.page.edges.first().map(|e| e.cursor.into()),
                end_cursor: self.page.edges.last().map(|e| e.cursor.into()),
                filter: self.filter,
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Copy, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::booking::list::PageInfo`].
        info: read::booking::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,

        /// [`read::booking::list::Filter`] the page was selected with.
        filter: read::booking::list::Filter,
    }

    /// Information about a `BookingListConnection` page.
    #[graphql_object(name = "BookingListPageInfo", context = Context)]
    impl PageInfo {
        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.info.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.info.has_previous_page
        }

        /// Start cursor of the page.
        #[must_use]
        pub fn start_cursor(&self) -> &Option<Cursor> {
            &self.start_cursor
        }

        /// End cursor of the page.
        #[must_use]
        pub fn end_cursor(&self) -> &Option<Cursor> {
            &self.end_cursor
        }

        /// Total count of `Booking`s matching the same filter.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::bookings::TotalCount::by(self.filter))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
