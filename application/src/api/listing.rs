//! [`Listing`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Price};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject,
    GraphQLScalar,
};
use service::{domain, query, read};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A travel property offered for nightly stays.
#[derive(Clone, Debug)]
pub struct Listing {
    /// ID of this [`Listing`].
    id: Id,

    /// Underlying [`domain::Listing`].
    listing: OnceCell<domain::Listing>,

    /// [`read::listing::RatingSummary`] of this [`Listing`].
    ratings: OnceCell<read::listing::RatingSummary>,
}

impl From<domain::Listing> for Listing {
    fn from(listing: domain::Listing) -> Self {
        Self {
            id: listing.id.into(),
            listing: OnceCell::new_with(Some(listing)),
            ratings: OnceCell::new(),
        }
    }
}

impl Listing {
    /// Creates a new [`Listing`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Listing`] with the provided ID exists,
    /// otherwise accessing this [`Listing`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            listing: OnceCell::new(),
            ratings: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Listing`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Listing`] doesn't exist.
    async fn listing(&self, ctx: &Context) -> Result<&domain::Listing, Error> {
        let id = self.id.into();
        self.listing
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::listing::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|l| {
                        future::ready(l.ok_or_else(|| {
                            api::query::ListingError::NotExists.into()
                        }))
                    })
            })
            .await
    }

    /// Returns the [`read::listing::RatingSummary`] of this [`Listing`].
    async fn ratings(
        &self,
        ctx: &Context,
    ) -> Result<&read::listing::RatingSummary, Error> {
        let id = self.id.into();
        self.ratings
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::listing::RatingSummary::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
            })
            .await
    }
}

/// A travel property offered for nightly stays.
#[graphql_object(context = Context)]
impl Listing {
    /// Unique identifier of this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `User` hosting this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.host",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn host(&self, ctx: &Context) -> Result<api::User, Error> {
        let host_id = self.listing(ctx).await?.host_id;
        #[expect(unsafe_code, reason = "foreign key guarantees existence")]
        let host = unsafe { api::User::new_unchecked(host_id) };
        Ok(host)
    }

    /// Title of this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.title",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn title(&self, ctx: &Context) -> Result<Title, Error> {
        Ok(self.listing(ctx).await?.title.clone().into())
    }

    /// Description of this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Description, Error> {
        Ok(self.listing(ctx).await?.description.clone().into())
    }

    /// Location of this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.location",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn location(&self, ctx: &Context) -> Result<Location, Error> {
        Ok(self.listing(ctx).await?.location.clone().into())
    }

    /// Price of a single night in this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.pricePerNight",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price_per_night(
        &self,
        ctx: &Context,
    ) -> Result<Price, Error> {
        Ok(self.listing(ctx).await?.price_per_night)
    }

    /// Maximum number of guests this `Listing` accommodates.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.maxGuests",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn max_guests(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.listing(ctx).await?.max_guests.get().into())
    }

    /// Number of bedrooms in this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.bedrooms",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn bedrooms(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(u16::from(self.listing(ctx).await?.bedrooms).into())
    }

    /// Number of bathrooms in this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.bathrooms",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn bathrooms(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(u16::from(self.listing(ctx).await?.bathrooms).into())
    }

    /// Amenities provided by this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.amenities",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn amenities(&self, ctx: &Context) -> Result<Amenities, Error> {
        Ok(self.listing(ctx).await?.amenities.into())
    }

    /// Indicator whether this `Listing` accepts new bookings.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.isAvailable",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_available(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.listing(ctx).await?.is_available)
    }

    /// Category of this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.category",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn category(&self, ctx: &Context) -> Result<Category, Error> {
        Ok(self.listing(ctx).await?.category.into())
    }

    /// Mean rating of this `Listing`'s reviews, rounded to one decimal place.
    ///
    /// `0` if this `Listing` has no reviews.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.averageRating",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn average_rating(
        &self,
        ctx: &Context,
    ) -> Result<scalar::Decimal, Error> {
        Ok(self.ratings(ctx).await?.average_rating().into())
    }

    /// Number of reviews of this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.totalReviews",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total_reviews(&self, ctx: &Context) -> Result<i32, Error> {
        i32::try_from(self.ratings(ctx).await?.total_reviews)
            .map_err(AsError::into_error)
    }

    /// `DateTime` when this `Listing` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.listing(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Listing` was last modified.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.listing(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of a `Listing`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::listing::Id)]
#[into(domain::listing::Id)]
#[graphql(name = "ListingId", transparent)]
pub struct Id(Uuid);

/// Title of a `Listing`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ListingTitle",
    with = scalar::Via::<domain::listing::Title>,
)]
pub struct Title(domain::listing::Title);

/// Description of a `Listing`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ListingDescription",
    with = scalar::Via::<domain::listing::Description>,
)]
pub struct Description(domain::listing::Description);

/// Human-readable location of a `Listing`, like `Seattle, WA`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ListingLocation",
    with = scalar::Via::<domain::listing::Location>,
)]
pub struct Location(domain::listing::Location);

/// Amenities provided by a `Listing`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "ListingAmenities")]
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

impl From<domain::listing::Amenities> for Amenities {
    fn from(amenities: domain::listing::Amenities) -> Self {
        let domain::listing::Amenities {
            wifi,
            parking,
            pool,
            kitchen,
            air_conditioning,
        } = amenities;
        Self {
            wifi,
            parking,
            pool,
            kitchen,
            air_conditioning,
        }
    }
}

/// Amenities to be provided by a `Listing`.
///
/// Omitted amenities are not provided.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "ListingAmenitiesInput")]
pub struct AmenitiesInput {
    /// Wireless internet access.
    #[graphql(default)]
    pub wifi: bool,

    /// Parking place.
    #[graphql(default)]
    pub parking: bool,

    /// Swimming pool.
    #[graphql(default)]
    pub pool: bool,

    /// Fully equipped kitchen.
    #[graphql(default)]
    pub kitchen: bool,

    /// Air conditioning.
    #[graphql(default)]
    pub air_conditioning: bool,
}

impl From<AmenitiesInput> for domain::listing::Amenities {
    fn from(input: AmenitiesInput) -> Self {
        let AmenitiesInput {
            wifi,
            parking,
            pool,
            kitchen,
            air_conditioning,
        } = input;
        Self {
            wifi,
            parking,
            pool,
            kitchen,
            air_conditioning,
        }
    }
}

/// Category of a `Listing`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ListingCategory")]
pub enum Category {
    /// An apartment in a building.
    Apartment,

    /// A standalone house.
    House,

    /// A villa.
    Villa,

    /// A condominium unit.
    Condo,

    /// A cabin.
    Cabin,

    /// A studio.
    Studio,

    /// Anything else.
    Other,
}

impl From<domain::listing::Category> for Category {
    fn from(category: domain::listing::Category) -> Self {
        use domain::listing::Category as C;
        match category {
            C::Apartment => Self::Apartment,
            C::House => Self::House,
            C::Villa => Self::Villa,
            C::Condo => Self::Condo,
            C::Cabin => Self::Cabin,
            C::Studio => Self::Studio,
            C::Other => Self::Other,
        }
    }
}

impl From<Category> for domain::listing::Category {
    fn from(category: Category) -> Self {
        match category {
            Category::Apartment => Self::Apartment,
            Category::House => Self::House,
            Category::Villa => Self::Villa,
            Category::Condo => Self::Condo,
            Category::Cabin => Self::Cabin,
            Category::Studio => Self::Studio,
            Category::Other => Self::Other,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Listing`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Listing};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Listing` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::listing::list::Cursor)]
    #[graphql(
        name = "ListingListCursor",
        with = scalar::Via::<read::listing::list::Cursor>,
    )]
    pub struct Cursor(pub read::listing::list::Cursor);

    /// Edge in the [`Listing`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::listing::list::Edge);

    /// Edge in the `Listing` list.
    #[graphql_object(name = "ListingListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `ListingListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `ListingListEdge`.
        #[must_use]
        pub fn node(&self) -> Listing {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Listing` existence"
            )]
            unsafe {
                Listing::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Listing`] list.
    #[derive(Clone, Debug)]
    pub struct Connection {
        /// Underlying [`read::listing::list::Connection`].
        page: read::listing::list::Connection,

        /// [`read::listing::list::Filter`] the page was selected with.
        filter: read::listing::list::Filter,
    }

    impl Connection {
        /// Creates a new [`Connection`] out of the provided page selected
        /// with the provided [`read::listing::list::Filter`].
        #[must_use]
        pub const fn new(
            page: read::listing::list::Connection,
            filter: read::listing::list::Filter,
        ) -> Self {
            Self { page, filter }
        }
    }

    /// Connection of the `Listing` list.
    #[graphql_object(name = "ListingListConnection", context = Context)]
    impl Connection {
        /// Edges of this `ListingListConnection`.
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
                filter: self.filter.clone(),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::listing::list::PageInfo`].
        info: read::listing::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,

        /// [`read::listing::list::Filter`] the page was selected with.
        filter: read::listing::list::Filter,
    }

    /// Information about a `ListingListConnection` page.
    #[graphql_object(name = "ListingListPageInfo", context = Context)]
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

        /// Total count of `Listing`s matching the same filter.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::listings::TotalCount::by(self.filter.clone()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}

