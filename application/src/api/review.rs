//! [`Review`]-related definitions.

use std::future;

use common::{DateTime, Handler as _};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A guest's rating of a `Listing`.
#[derive(Clone, Debug)]
pub struct Review {
    /// ID of this [`Review`].
    id: Id,

    /// Underlying [`domain::Review`].
    review: OnceCell<domain::Review>,
}

impl From<domain::Review> for Review {
    fn from(review: domain::Review) -> Self {
        Self {
            id: review.id.into(),
            review: OnceCell::new_with(Some(review)),
        }
    }
}

impl Review {
    /// Creates a new [`Review`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Review`] with the provided ID exists,
    /// otherwise accessing this [`Review`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            review: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Review`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Review`] doesn't exist.
    async fn review(&self, ctx: &Context) -> Result<&domain::Review, Error> {
        let id = self.id.into();
        self.review
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::review::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|r| {
                        future::ready(r.ok_or_else(|| {
                            api::query::ReviewError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A guest's rating of a `Listing`, left after a completed stay.
#[graphql_object(context = Context)]
impl Review {
    /// Unique identifier of this `Review`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Reviewed `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.listing",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn listing(&self, ctx: &Context) -> Result<api::Listing, Error> {
        let listing_id = self.review(ctx).await?.listing_id;
        #[expect(unsafe_code, reason = "foreign key guarantees existence")]
        let listing = unsafe { api::Listing::new_unchecked(listing_id) };
        Ok(listing)
    }

    /// `User` who wrote this `Review`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.user",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn user(&self, ctx: &Context) -> Result<api::User, Error> {
        let user_id = self.review(ctx).await?.user_id;
        #[expect(unsafe_code, reason = "foreign key guarantees existence")]
        let user = unsafe { api::User::new_unchecked(user_id) };
        Ok(user)
    }

    /// Completed `Booking` this `Review` is attached to, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.booking",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Booking>, Error> {
        let booking_id = self.review(ctx).await?.booking_id;
        #[expect(unsafe_code, reason = "foreign key guarantees existence")]
        let booking =
            booking_id.map(|id| unsafe { api::Booking::new_unchecked(id) });
        Ok(booking)
    }

    /// Rating of this `Review`, from 1 to 5.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.rating",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rating(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.review(ctx).await?.rating.stars().into())
    }

    /// Text of this `Review`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.comment",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn comment(&self, ctx: &Context) -> Result<Comment, Error> {
        Ok(self.review(ctx).await?.comment.clone().into())
    }

    /// `DateTime` when this `Review` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.review(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Review` was last modified.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.review(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of a `Review`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::review::Id)]
#[into(domain::review::Id)]
#[graphql(name = "ReviewId", transparent)]
pub struct Id(Uuid);

/// Text of a `Review`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ReviewComment",
    with = scalar::Via::<domain::review::Comment>,
)]
pub struct Comment(domain::review::Comment);

pub mod list {
    //! Definitions related to the [`Review`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Review};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Review` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::review::list::Cursor)]
    #[graphql(
        name = "ReviewListCursor",
        with = scalar::Via::<read::review::list::Cursor>,
    )]
    pub struct Cursor(pub read::review::list::Cursor);

    /// Edge in the [`Review`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::review::list::Edge);

    /// Edge in the `Review` list.
    #[graphql_object(name = "ReviewListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `ReviewListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `ReviewListEdge`.
        #[must_use]
        pub fn node(&self) -> Review {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Review` existence"
            )]
            unsafe {
                Review::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Review`] list.
    #[derive(Clone, Debug)]
    pub struct Connection {
        /// Underlying [`read::review::list::Connection`].
        page: read::review::list::Connection,

        /// [`read::review::list::Filter`] the page was selected with.
        filter: read::review::list::Filter,
    }

    impl Connection {
        /// Creates a new [`Connection`] out of the provided page selected
        /// with the provided [`read::review::list::Filter`].
        #[must_use]
        pub const fn new(
            page: read::review::list::Connection,
            filter: read::review::list::Filter,
        ) -> Self {
            Self { page, filter }
        }
    }

    /// Connection of the `Review` list.
    #[graphql_object(name = "ReviewListConnection", context = Context)]
    impl Connection {
        /// Edges of this `ReviewListConnection`.
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
        /// Underlying [`read::review::list::PageInfo`].
        info: read::review::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,

        /// [`read::review::list::Filter`] the page was selected with.
        filter: read::review::list::Filter,
    }

    /// Information about a `ReviewListConnection` page.
    #[graphql_object(name = "ReviewListPageInfo", context = Context)]
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

        /// Total count of `Review`s matching the same filter.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::reviews::TotalCount::by(self.filter))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
