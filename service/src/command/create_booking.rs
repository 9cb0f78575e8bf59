//! [`Command`] for creating a new [`Booking`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    Date, DateTime, Price,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::booking::Status;
use crate::{
    domain::{
        booking::{self, Candidate, Stay, ValidationError},
        listing, user, Booking, Listing, User,
    },
    infra::{database, Database},
    read, Service,
};

use super::{conflict_or, Command};

/// [`Command`] for creating a new [`Booking`].
///
/// A new [`Booking`] is always [`Status::Pending`].
#[derive(Clone, Debug)]
pub struct CreateBooking {
    /// ID of the [`Listing`] to book.
    pub listing_id: listing::Id,

    /// ID of the guest [`User`] making the [`Booking`].
    pub user_id: user::Id,

    /// Requested [`Stay`].
    pub stay: Stay,

    /// Number of guests staying.
    pub num_guests: booking::NumGuests,

    /// Explicit total [`Price`] of the [`Booking`].
    ///
    /// If [`None`], then it's quoted from the [`Listing`] price per night.
    pub total_price: Option<Price>,

    /// [`booking::SpecialRequests`] of the guest.
    pub special_requests: Option<booking::SpecialRequests>,
}

impl<Db> Command<CreateBooking> for Service<Db>
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
        > + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::booking::ActiveStays, listing::Id>>,
            Ok = read::booking::ActiveStays,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBooking {
            listing_id,
            user_id,
            stay,
            num_guests,
            total_price,
            special_requests,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serialize concurrent bookings of the same `Listing`.
        tx.execute(Lock(By::new(listing_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let listing = tx
            .execute(Select(By::<Option<Listing>, _>::new(listing_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ListingNotExists(listing_id))
            .map_err(tracerr::wrap!())?;
        let guest = tx
            .execute(Select(By::<Option<User>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(user_id))
            .map_err(tracerr::wrap!())?;
        if listing.host_id == guest.id {
            return Err(tracerr::new!(E::UserIsHost(guest.id)));
        }

        let read::booking::ActiveStays(active) = tx
            .execute(Select(By::<read::booking::ActiveStays, _>::new(
                listing.id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        Candidate { stay, num_guests }
            .validate(&listing, Date::today(), &active)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let total_price = match total_price {
            Some(price) => price,
            None => booking::quote(listing.price_per_night, stay)
                .ok_or(E::TotalPriceOverflow)
                .map_err(tracerr::wrap!())?,
        };

        let now = DateTime::now();
        let booking = Booking {
            id: booking::Id::new(),
            listing_id: listing.id,
            user_id: guest.id,
            stay,
            num_guests,
            total_price,
            status: booking::Status::Pending,
            special_requests,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };
        tx.execute(Insert(booking.clone()))
            .await
            .map_err(conflict_or(E::Conflict))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(conflict_or(E::Conflict))
            .map(drop)?;

        Ok(booking)
    }
}

/// Error of [`CreateBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Listing`] doesn't exist.
    #[display("`Listing(id: {_0})` does not exist")]
    #[from(ignore)]
    ListingNotExists(#[error(not(source))] listing::Id),

    /// Guest [`User`] doesn't exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] tries to book the [`Listing`] they host.
    #[display("`User(id: {_0})` can't book their own `Listing`")]
    #[from(ignore)]
    UserIsHost(#[error(not(source))] user::Id),

    /// Requested [`Booking`] breaks a booking rule.
    #[display("{_0}")]
    Validation(ValidationError),

    /// Quoted total price doesn't fit into a [`Price`].
    #[display("Total price of the `Booking` is too large")]
    TotalPriceOverflow,

    /// Persisting the [`Booking`] violated a database constraint.
    #[display("`Booking` conflicts with existing data: `{_0}` violated")]
    #[from(ignore)]
    Conflict(#[error(not(source))] String),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{Date, DateTime, Price};
    use futures::executor::block_on;

    use crate::{
        domain::{
            booking::{self, Stay, ValidationError},
            listing, user, Booking, Listing, User,
        },
        infra::database::memory::{Memory, Tables},
        Command as _, Config, Service,
    };

    use super::{CreateBooking, ExecutionError};

    fn service(tables: Tables) -> (Service<Memory>, Memory) {
        let db = Memory::new(tables);
        let conf = Config::with_secret(b"secret", Duration::from_secs(60));
        (Service::new(conf, db.clone()), db)
    }

    fn user(name: &str) -> User {
        User {
            id: user::Id::new(),
            username: user::Username::new(name).unwrap(),
            first_name: None,
            last_name: None,
            password_hash: user::PasswordHash::new(&"password".into()),
            email: None,
            created_at: DateTime::now().coerce(),
        }
    }

    fn listing(host: &User, price: &str) -> Listing {
        Listing {
            id: listing::Id::new(),
            host_id: host.id,
            title: listing::Title::new("Cabin").unwrap(),
            description: listing::Description::new("Cabin in woods").unwrap(),
            location: listing::Location::new("Aspen, CO").unwrap(),
            price_per_night: price.parse::<Price>().unwrap(),
            max_guests: listing::MaxGuests::new(4).unwrap(),
            bedrooms: listing::RoomCount::default(),
            bathrooms: listing::RoomCount::default(),
            amenities: listing::Amenities::default(),
            is_available: true,
            category: listing::Category::default(),
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        }
    }

    /// [`Stay`] between the provided numbers of days from today.
    fn stay(from: i64, to: i64) -> Stay {
        let today = Date::today();
        Stay {
            check_in: today.add_days(from).unwrap(),
            check_out: today.add_days(to).unwrap(),
        }
    }

    fn booked(
        listing: &Listing,
        guest: &User,
        stay: Stay,
        status: booking::Status,
    ) -> Booking {
        Booking {
            id: booking::Id::new(),
            listing_id: listing.id,
            user_id: guest.id,
            stay,
            num_guests: booking::NumGuests::new(1).unwrap(),
            total_price: "100".parse().unwrap(),
            status,
            special_requests: None,
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        }
    }

    fn cmd(listing: &Listing, guest: &User, stay: Stay) -> CreateBooking {
        CreateBooking {
            listing_id: listing.id,
            user_id: guest.id,
            stay,
            num_guests: booking::NumGuests::new(2).unwrap(),
            total_price: None,
            special_requests: None,
        }
    }

    #[test]
    fn quotes_total_price_from_nights() {
        let (host, guest) = (user("host"), user("guest"));
        let place = listing(&host, "120.50");
        let (service, db) = service(Tables {
            listings: vec![place.clone()],
            users: vec![host, guest.clone()],
            ..Tables::default()
        });

        let booking =
            block_on(service.execute(cmd(&place, &guest, stay(10, 13))))
                .unwrap();

        assert_eq!(booking.total_price, "361.50".parse::<Price>().unwrap());
        assert_eq!(booking.status, booking::Status::Pending);
        assert_eq!(booking.user_id, guest.id);
        assert_eq!(db.bookings().len(), 1);
        assert_eq!(db.bookings()[0].id, booking.id);
    }

    #[test]
    fn keeps_explicit_total_price() {
        let (host, guest) = (user("host"), user("guest"));
        let place = listing(&host, "100");
        let (service, db) = service(Tables {
            listings: vec![place.clone()],
            users: vec![host, guest.clone()],
            ..Tables::default()
        });

        let booking = block_on(service.execute(CreateBooking {
            total_price: Some("250".parse().unwrap()),
            ..cmd(&place, &guest, stay(10, 13))
        }))
        .unwrap();

        assert_eq!(booking.total_price, "250".parse::<Price>().unwrap());
        assert_eq!(
            db.bookings()[0].total_price,
            "250".parse::<Price>().unwrap(),
        );
    }

    #[test]
    fn checks_listing_then_guest_then_rules() {
        let (host, guest) = (user("host"), user("guest"));
        let place = listing(&host, "100");
        let missing = listing(&host, "100");
        let stranger = user("stranger");
        let (service, db) = service(Tables {
            listings: vec![place.clone()],
            users: vec![host.clone(), guest.clone()],
            ..Tables::default()
        });
        let past = stay(-3, 2);

        let err = block_on(service.execute(cmd(&missing, &host, past)))
            .unwrap_err();
        assert!(
            matches!(
                err.as_ref(),
                ExecutionError::ListingNotExists(id) if *id == missing.id,
            ),
            "{err}",
        );

        let err = block_on(service.execute(cmd(&place, &stranger, past)))
            .unwrap_err();
        assert!(
            matches!(
                err.as_ref(),
                ExecutionError::UserNotExists(id) if *id == stranger.id,
            ),
            "{err}",
        );

        let err =
            block_on(service.execute(cmd(&place, &host, past))).unwrap_err();
        assert!(
            matches!(
                err.as_ref(),
                ExecutionError::UserIsHost(id) if *id == host.id,
            ),
            "{err}",
        );

        let err =
            block_on(service.execute(cmd(&place, &guest, past))).unwrap_err();
        assert!(
            matches!(
                err.as_ref(),
                ExecutionError::Validation(ValidationError::CheckInInPast(d))
                    if *d == past.check_in,
            ),
            "{err}",
        );

        assert!(db.bookings().is_empty());
    }

    #[test]
    fn rejects_stay_held_by_active_booking() {
        let (host, guest, other) = (user("host"), user("guest"), user("other"));
        let place = listing(&host, "100");
        let (cancelled, held) = (stay(10, 15), stay(20, 25));
        let (service, db) = service(Tables {
            listings: vec![place.clone()],
            bookings: vec![
                booked(&place, &other, cancelled, booking::Status::Cancelled),
                booked(&place, &other, held, booking::Status::Confirmed),
            ],
            users: vec![host, guest.clone(), other],
            ..Tables::default()
        });

        let err = block_on(service.execute(cmd(&place, &guest, stay(24, 27))))
            .unwrap_err();
        assert!(
            matches!(
                err.as_ref(),
                ExecutionError::Validation(ValidationError::Overlap(s))
                    if *s == held,
            ),
            "{err}",
        );

        _ = block_on(service.execute(cmd(&place, &guest, stay(11, 14))))
            .unwrap();
        assert_eq!(db.bookings().len(), 3);
    }
}
