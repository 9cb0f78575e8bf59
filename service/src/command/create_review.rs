//! [`Command`] for creating a new [`Review`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{booking::Status, User};
use crate::{
    domain::{
        booking, listing,
        review::{self, History, ValidationError},
        user, Listing, Review,
    },
    infra::{database, Database},
    Service,
};

use super::{conflict_or, Command};

/// [`Command`] for creating a new [`Review`].
#[derive(Clone, Debug)]
pub struct CreateReview {
    /// ID of the [`Listing`] to review.
    pub listing_id: listing::Id,

    /// ID of the [`User`] writing the [`Review`].
    pub user_id: user::Id,

    /// ID of the [`Status::Completed`] [`booking`] the [`Review`] originates
    /// from.
    ///
    /// If [`None`], then the most recent one is used.
    pub booking_id: Option<booking::Id>,

    /// Requested number of stars.
    pub rating: i32,

    /// [`review::Comment`] of the [`Review`].
    pub comment: review::Comment,
}

impl<Db> Command<CreateReview> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Listing>, listing::Id>>,
            Ok = Option<Listing>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<History, (user::Id, listing::Id)>>,
            Ok = History,
            Err = Traced<database::Error>,
        > + Database<Insert<Review>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Review;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateReview) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateReview {
            listing_id,
            user_id,
            booking_id,
            rating,
            comment,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let listing = tx
            .execute(Select(By::<Option<Listing>, _>::new(listing_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ListingNotExists(listing_id))
            .map_err(tracerr::wrap!())?;
        if listing.host_id == user_id {
            return Err(tracerr::new!(E::UserIsHost(user_id)));
        }

        let history = tx
            .execute(Select(By::<History, _>::new((user_id, listing.id))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let rating = history
            .validate(rating)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let booking_id = match booking_id {
            Some(id) if history.completed_bookings.contains(&id) => id,
            Some(id) => return Err(tracerr::new!(E::BookingNotEligible(id))),
            // Validated `History` always has a completed `Booking`.
            None => history
                .completed_bookings
                .first()
                .copied()
                .ok_or(E::Validation(ValidationError::NotEligible))
                .map_err(tracerr::wrap!())?,
        };

        let now = DateTime::now();
        let review = Review {
            id: review::Id::new(),
            listing_id: listing.id,
            user_id,
            booking_id: Some(booking_id),
            rating,
            comment,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };
        tx.execute(Insert(review.clone()))
            .await
            .map_err(conflict_or(E::Conflict))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(conflict_or(E::Conflict))
            .map(drop)?;

        Ok(review)
    }
}

/// Error of [`CreateReview`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Listing`] doesn't exist.
    #[display("`Listing(id: {_0})` does not exist")]
    #[from(ignore)]
    ListingNotExists(#[error(not(source))] listing::Id),

    /// [`User`] tries to review the [`Listing`] they host.
    #[display("`User(id: {_0})` can't review their own `Listing`")]
    #[from(ignore)]
    UserIsHost(#[error(not(source))] user::Id),

    /// Provided [`booking`] is not a completed one of the [`User`] on the
    /// [`Listing`].
    #[display("`Booking(id: {_0})` is not eligible for a review")]
    #[from(ignore)]
    BookingNotEligible(#[error(not(source))] booking::Id),

    /// Requested [`Review`] breaks a review rule.
    #[display("{_0}")]
    Validation(ValidationError),

    /// Persisting the [`Review`] violated a database constraint.
    #[display("`Review` conflicts with existing data: `{_0}` violated")]
    #[from(ignore)]
    Conflict(#[error(not(source))] String),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{Date, DateTime};
    use futures::executor::block_on;

    use crate::{
        domain::{
            booking::{self, Stay},
            listing,
            review::{self, ValidationError},
            user, Booking, Listing, Review, User,
        },
        infra::database::memory::{Memory, Tables},
        Command as _, Config, Service,
    };

    use super::{CreateReview, ExecutionError};

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

    fn listing(host: &User) -> Listing {
        Listing {
            id: listing::Id::new(),
            host_id: host.id,
            title: listing::Title::new("Loft").unwrap(),
            description: listing::Description::new("Loft downtown").unwrap(),
            location: listing::Location::new("Austin, TX").unwrap(),
            price_per_night: "90".parse().unwrap(),
            max_guests: listing::MaxGuests::new(2).unwrap(),
            bedrooms: listing::RoomCount::default(),
            bathrooms: listing::RoomCount::default(),
            amenities: listing::Amenities::default(),
            is_available: true,
            category: listing::Category::default(),
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        }
    }

    /// [`booking::Status::Completed`] [`Booking`] of the `guest` checking
    /// out the provided number of days ago.
    fn completed(listing: &Listing, guest: &User, days_ago: i64) -> Booking {
        let check_out = Date::today().add_days(-days_ago).unwrap();
        Booking {
            id: booking::Id::new(),
            listing_id: listing.id,
            user_id: guest.id,
            stay: Stay {
                check_in: check_out.add_days(-3).unwrap(),
                check_out,
            },
            num_guests: booking::NumGuests::new(1).unwrap(),
            total_price: "270".parse().unwrap(),
            status: booking::Status::Completed,
            special_requests: None,
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        }
    }

    fn cmd(listing: &Listing, author: &User) -> CreateReview {
        CreateReview {
            listing_id: listing.id,
            user_id: author.id,
            booking_id: None,
            rating: 4,
            comment: review::Comment::new("Quiet and clean").unwrap(),
        }
    }

    #[test]
    fn links_most_recent_completed_booking() {
        let (host, guest) = (user("host"), user("guest"));
        let place = listing(&host);
        let older = completed(&place, &guest, 40);
        let recent = completed(&place, &guest, 5);
        let (service, db) = service(Tables {
            listings: vec![place.clone()],
            bookings: vec![older, recent.clone()],
            ..Tables::default()
        });

        let review: Review =
            block_on(service.execute(cmd(&place, &guest))).unwrap();

        assert_eq!(review.booking_id, Some(recent.id));
        assert_eq!(review.rating.stars(), 4);
        assert_eq!(db.reviews().len(), 1);
    }

    #[test]
    fn links_requested_completed_booking() {
        let (host, guest) = (user("host"), user("guest"));
        let place = listing(&host);
        let older = completed(&place, &guest, 40);
        let recent = completed(&place, &guest, 5);
        let (service, _) = service(Tables {
            listings: vec![place.clone()],
            bookings: vec![older.clone(), recent],
            ..Tables::default()
        });

        let review = block_on(service.execute(CreateReview {
            booking_id: Some(older.id),
            ..cmd(&place, &guest)
        }))
        .unwrap();

        assert_eq!(review.booking_id, Some(older.id));
    }

    #[test]
    fn rejects_booking_of_another_guest() {
        let (host, guest, other) = (user("host"), user("guest"), user("other"));
        let place = listing(&host);
        let own = completed(&place, &guest, 5);
        let foreign = completed(&place, &other, 5);
        let (service, db) = service(Tables {
            listings: vec![place.clone()],
            bookings: vec![own, foreign.clone()],
            ..Tables::default()
        });

        let err = block_on(service.execute(CreateReview {
            booking_id: Some(foreign.id),
            ..cmd(&place, &guest)
        }))
        .unwrap_err();

        assert!(
            matches!(
                err.as_ref(),
                ExecutionError::BookingNotEligible(id) if *id == foreign.id,
            ),
            "{err}",
        );
        assert!(db.reviews().is_empty());
    }

    #[test]
    fn checks_listing_then_host_then_history() {
        let (host, guest) = (user("host"), user("guest"));
        let place = listing(&host);
        let missing = listing(&host);
        let (service, db) = service(Tables {
            listings: vec![place.clone()],
            ..Tables::default()
        });

        let err =
            block_on(service.execute(cmd(&missing, &host))).unwrap_err();
        assert!(
            matches!(
                err.as_ref(),
                ExecutionError::ListingNotExists(id) if *id == missing.id,
            ),
            "{err}",
        );

        let err = block_on(service.execute(cmd(&place, &host))).unwrap_err();
        assert!(
            matches!(
                err.as_ref(),
                ExecutionError::UserIsHost(id) if *id == host.id,
            ),
            "{err}",
        );

        let err = block_on(service.execute(cmd(&place, &guest))).unwrap_err();
        assert!(
            matches!(
                err.as_ref(),
                ExecutionError::Validation(ValidationError::NotEligible),
            ),
            "{err}",
        );

        assert!(db.reviews().is_empty());
    }
}
