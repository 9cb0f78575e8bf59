//! In-memory [`Database`] for testing [`Command`]s without a server.
//!
//! [`Command`]: crate::Command

use std::{cell::RefCell, rc::Rc};

use common::operations::{By, Commit, Insert, Lock, Select, Transact};
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, Stay},
        listing, review, user, Booking, Listing, Review, User,
    },
    infra::{database, Database},
    read,
};

/// Stored entities of a [`Memory`] database.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    /// Stored [`Listing`]s.
    pub(crate) listings: Vec<Listing>,

    /// Stored [`User`]s.
    pub(crate) users: Vec<User>,

    /// Stored [`Booking`]s.
    pub(crate) bookings: Vec<Booking>,

    /// Stored [`Review`]s.
    pub(crate) reviews: Vec<Review>,
}

/// [`Database`] keeping its [`Tables`] in memory.
///
/// Transactions share the [`Tables`] with the [`Memory`] they are opened
/// on, and are never rolled back.
#[derive(Clone, Debug, Default)]
pub(crate) struct Memory(Rc<RefCell<Tables>>);

impl Memory {
    /// Creates a new [`Memory`] database filled with the provided
    /// [`Tables`].
    pub(crate) fn new(tables: Tables) -> Self {
        Self(Rc::new(RefCell::new(tables)))
    }

    /// Returns the stored [`Booking`]s.
    pub(crate) fn bookings(&self) -> Vec<Booking> {
        self.0.borrow().bookings.clone()
    }

    /// Returns the stored [`Review`]s.
    pub(crate) fn reviews(&self) -> Vec<Review> {
        self.0.borrow().reviews.clone()
    }
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Lock<By<Listing, listing::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Listing, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Option<Listing>, listing::Id>>> for Memory {
    type Ok = Option<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.0.borrow().listings.iter().find(|l| l.id == id).cloned())
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.0.borrow().users.iter().find(|u| u.id == id).cloned())
    }
}

impl Database<Select<By<read::booking::ActiveStays, listing::Id>>>
    for Memory
{
    type Ok = read::booking::ActiveStays;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::booking::ActiveStays, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let listing_id = by.into_inner();
        let stays: Vec<Stay> = self
            .0
            .borrow()
            .bookings
            .iter()
            .filter(|b| b.listing_id == listing_id && b.status.is_active())
            .map(|b| b.stay)
            .collect();
        Ok(read::booking::ActiveStays(stays))
    }
}

impl Database<Select<By<review::History, (user::Id, listing::Id)>>>
    for Memory
{
    type Ok = review::History;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<review::History, (user::Id, listing::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (user_id, listing_id) = by.into_inner();
        let tables = self.0.borrow();

        let mut completed: Vec<&Booking> = tables
            .bookings
            .iter()
            .filter(|b| {
                b.user_id == user_id
                    && b.listing_id == listing_id
                    && b.status == booking::Status::Completed
            })
            .collect();
        completed.sort_by(|a, b| {
            (b.stay.check_out, b.id).cmp(&(a.stay.check_out, a.id))
        });

        Ok(review::History {
            completed_bookings: completed.into_iter().map(|b| b.id).collect(),
            existing_review: tables
                .reviews
                .iter()
                .find(|r| r.user_id == user_id && r.listing_id == listing_id)
                .map(|r| r.id),
        })
    }
}

impl Database<Insert<Booking>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.borrow_mut().bookings.push(booking);
        Ok(())
    }
}

impl Database<Insert<Review>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(review): Insert<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.borrow_mut().reviews.push(review);
        Ok(())
    }
}
