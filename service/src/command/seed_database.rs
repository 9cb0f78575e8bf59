//! [`Command`] for populating the [`Database`] with sample data.

use common::{
    operations::{By, Commit, Delete, Insert, Select, Transact, Transacted},
    Date,
};
use derive_more::{Display, Error, From};
use rand::{rngs::StdRng, SeedableRng as _};
use tracerr::Traced;

use crate::{
    domain::{user, Booking, Listing, Review, User},
    infra::{database, Database},
    read::Totals,
    seed::{self, Generator},
    Service,
};

use super::Command;

/// [`Command`] for populating the [`Database`] with sample data.
///
/// Sample [`User`]s existing already are reused.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeedDatabase {
    /// Requested amounts of generated entities.
    pub counts: seed::Counts,

    /// Indicator whether all the existing data should be removed first.
    pub clear: bool,

    /// Seed of the random generator.
    ///
    /// If [`None`], then the generated data differs between runs.
    pub rng_seed: Option<u64>,
}

impl<Db> Command<SeedDatabase> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Totals, ()>>,
            Ok = Totals,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Delete<By<Review, ()>>,
            Ok = u64,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Booking, ()>>,
            Ok = u64,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Listing, ()>>,
            Ok = u64,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<User, ()>>,
            Ok = u64,
            Err = Traced<database::Error>,
        > + for<'l> Database<
            Select<By<Option<User>, &'l user::Username>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Insert<Listing>, Err = Traced<database::Error>>
        + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Insert<Review>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Totals;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SeedDatabase) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SeedDatabase {
            counts,
            clear,
            rng_seed,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if clear {
            tracing::info!("Clearing existing data...");
            let reviews = tx
                .execute(Delete(By::<Review, _>::new(())))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            let bookings = tx
                .execute(Delete(By::<Booking, _>::new(())))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            let listings = tx
                .execute(Delete(By::<Listing, _>::new(())))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            let users = tx
                .execute(Delete(By::<User, _>::new(())))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            tracing::info!(
                users,
                listings,
                bookings,
                reviews,
                "Existing data cleared",
            );
        }

        tracing::info!("Creating users...");
        let roster = seed::roster();
        let mut users = Vec::with_capacity(roster.len());
        for user in roster {
            let existing = tx
                .execute(Select(By::new(&user.username)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if let Some(existing) = existing {
                tracing::debug!("`{}` user exists already", existing.username);
                users.push(existing.id);
                continue;
            }
            users.push(user.id);
            tx.execute(Insert(user))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        let rng =
            rng_seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let seed::Plan {
            listings,
            bookings,
            reviews,
        } = Generator::new(rng, Date::today()).plan(&users, counts);

        tracing::info!("Creating {} listings...", listings.len());
        for listing in listings {
            tx.execute(Insert(listing))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }
        tracing::info!("Creating {} bookings...", bookings.len());
        for booking in bookings {
            tx.execute(Insert(booking))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }
        tracing::info!("Creating {} reviews...", reviews.len());
        for review in reviews {
            tx.execute(Insert(review))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.database()
            .execute(Select(By::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`SeedDatabase`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
