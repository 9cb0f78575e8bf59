//! [`Query`] collection related to a single [`User`].

use common::operations::By;

use crate::domain::{user, User};
#[cfg(doc)]
use crate::{
    domain::{Booking, Listing, Review},
    Query,
};

use super::DatabaseQuery;

/// Queries a [`User`] by its [`user::Id`].
///
/// Resolves hosts of [`Listing`]s, guests of [`Booking`]s and authors of
/// [`Review`]s.
pub type ById = DatabaseQuery<By<Option<User>, user::Id>>;
