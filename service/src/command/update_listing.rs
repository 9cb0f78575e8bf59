//! [`Command`] for updating an existing [`Listing`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{
        listing::{self, Terms, TermsError},
        user, Listing,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Listing`].
///
/// Only the provided fields are changed.
#[derive(Clone, Debug)]
pub struct UpdateListing {
    /// ID of the [`Listing`] to update.
    pub listing_id: listing::Id,

    /// ID of the [`User`] performing the update.
    pub initiator_id: user::Id,

    /// New [`listing::Title`].
    pub title: Option<listing::Title>,

    /// New [`listing::Description`].
    pub description: Option<listing::Description>,

    /// New [`listing::Location`].
    pub location: Option<listing::Location>,

    /// New price of a single night.
    pub price_per_night: Option<Decimal>,

    /// New maximum number of guests.
    pub max_guests: Option<i32>,

    /// New number of bedrooms.
    pub bedrooms: Option<listing::RoomCount>,

    /// New number of bathrooms.
    pub bathrooms: Option<listing::RoomCount>,

    /// New [`listing::Amenities`].
    pub amenities: Option<listing::Amenities>,

    /// New availability of the [`Listing`].
    pub is_available: Option<bool>,

    /// New [`listing::Category`].
    pub category: Option<listing::Category>,
}

impl<Db> Command<UpdateListing> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Listing, listing::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Listing>, listing::Id>>,
            Ok = Option<Listing>,
            Err = Traced<database::Error>,
        > + Database<Update<Listing>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateListing,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateListing {
            listing_id,
            initiator_id,
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

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Listing`.
        tx.execute(Lock(By::new(listing_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut listing = tx
            .execute(Select(By::<Option<Listing>, _>::new(listing_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ListingNotExists(listing_id))
            .map_err(tracerr::wrap!())?;
        if listing.host_id != initiator_id {
            return Err(tracerr::new!(E::NotHost(initiator_id)));
        }

        let terms = Terms::check(
            price_per_night
                .unwrap_or_else(|| listing.price_per_night.amount()),
            max_guests
                .unwrap_or_else(|| i32::from(listing.max_guests.get())),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;
        listing.price_per_night = terms.price_per_night;
        listing.max_guests = terms.max_guests;

        if let Some(title) = title {
            listing.title = title;
        }
        if let Some(description) = description {
            listing.description = description;
        }
        if let Some(location) = location {
            listing.location = location;
        }
        if let Some(bedrooms) = bedrooms {
            listing.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = bathrooms {
            listing.bathrooms = bathrooms;
        }
        if let Some(amenities) = amenities {
            listing.amenities = amenities;
        }
        if let Some(is_available) = is_available {
            listing.is_available = is_available;
        }
        if let Some(category) = category {
            listing.category = category;
        }
        listing.updated_at = DateTime::now().coerce();

        tx.execute(Update(listing.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(listing)
    }
}

/// Error of [`UpdateListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Listing`] doesn't exist.
    #[display("`Listing(id: {_0})` does not exist")]
    #[from(ignore)]
    ListingNotExists(#[error(not(source))] listing::Id),

    /// [`User`] is not the host of the [`Listing`].
    #[display("`User(id: {_0})` is not the host of the `Listing`")]
    #[from(ignore)]
    NotHost(#[error(not(source))] user::Id),

    /// New [`Terms`] of the [`Listing`] are invalid.
    #[display("Invalid `Listing` terms: {_0}")]
    Terms(TermsError),
}
