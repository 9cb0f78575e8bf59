//! [`Command`] for changing a [`booking::Status`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{
        booking::{self, Party, TransitionError},
        listing, user, Booking, Listing,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for changing a [`booking::Status`].
#[derive(Clone, Copy, Debug)]
pub struct UpdateBookingStatus {
    /// ID of the [`Booking`] to update.
    pub booking_id: booking::Id,

    /// ID of the [`User`] performing the update.
    pub initiator_id: user::Id,

    /// Requested [`booking::Status`].
    pub status: booking::Status,
}

impl<Db> Command<UpdateBookingStatus> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Booking, booking::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Listing>, listing::Id>>,
            Ok = Option<Listing>,
            Err = Traced<database::Error>,
        > + Database<Update<Booking>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateBookingStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateBookingStatus {
            booking_id,
            initiator_id,
            status,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Booking`.
        tx.execute(Lock(By::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        let listing = tx
            .execute(Select(By::<Option<Listing>, _>::new(booking.listing_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;

        let party = if listing.host_id == initiator_id {
            Party::Host
        } else if booking.user_id == initiator_id {
            Party::Guest
        } else {
            return Err(tracerr::new!(E::NotParty(initiator_id)));
        };

        booking.status = booking
            .status
            .transition(status, party)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        booking.updated_at = DateTime::now().coerce();

        tx.execute(Update(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(booking)
    }
}

/// Error of [`UpdateBookingStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Booking`] doesn't exist.
    #[display("`Booking(id: {_0})` does not exist")]
    #[from(ignore)]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`User`] is neither the guest nor the host of the [`Booking`].
    #[display("`User(id: {_0})` is not a party of the `Booking`")]
    #[from(ignore)]
    NotParty(#[error(not(source))] user::Id),

    /// Requested [`booking::Status`] change is not allowed.
    #[display("{_0}")]
    Transition(TransitionError),
}
