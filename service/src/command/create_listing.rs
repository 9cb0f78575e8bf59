//! [`Command`] for creating a new [`Listing`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::listing::{
    Amenities, Category, Description, Location, MaxGuests, Title,
};
use crate::{
    domain::{
        listing::{self, Terms, TermsError},
        user, Listing, User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Listing`].
#[derive(Clone, Debug)]
pub struct CreateListing {
    /// ID of the [`User`] hosting a new [`Listing`].
    pub host_id: user::Id,

    /// [`Title`] of a new [`Listing`].
    pub title: listing::Title,

    /// [`Description`] of a new [`Listing`].
    pub description: listing::Description,

    /// [`Location`] of a new [`Listing`].
    pub location: listing::Location,

    /// Requested price of a single night in a new [`Listing`].
    pub price_per_night: Decimal,

    /// Requested [`MaxGuests`] of a new [`Listing`].
    pub max_guests: i32,

    /// Number of bedrooms in a new [`Listing`].
    pub bedrooms: listing::RoomCount,

    /// Number of bathrooms in a new [`Listing`].
    pub bathrooms: listing::RoomCount,

    /// [`Amenities`] of a new [`Listing`].
    pub amenities: listing::Amenities,

    /// Indicator whether a new [`Listing`] accepts bookings right away.
    pub is_available: bool,

    /// [`Category`] of a new [`Listing`].
    pub category: listing::Category,
}

impl<Db> Command<CreateListing> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Listing>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateListing,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateListing {
            host_id,
            title,
            description,
            location,
            price_per_night,
            max_guests,
            bedrooms,
            bathrooms,
            amenities,
            is_available,
            category,
        } = cmd;

        let Terms {
            price_per_night,
            max_guests,
        } = Terms::check(price_per_night, max_guests)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        self.database()
            .execute(Select(By::<Option<User>, _>::new(host_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::HostNotExists(host_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let now = DateTime::now();
        let listing = Listing {
            id: listing::Id::new(),
            host_id,
            title,
            description,
            location,
            price_per_night,
            max_guests,
            bedrooms,
            bathrooms,
            amenities,
            is_available,
            category,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(listing.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(listing)
    }
}

/// Error of [`CreateListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Hosting [`User`] doesn't exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    HostNotExists(#[error(not(source))] user::Id),

    /// [`Terms`] of the [`Listing`] are invalid.
    #[display("Invalid `Listing` terms: {_0}")]
    Terms(TermsError),
}
