//! [`Query`] collection related to a single [`Listing`].

use common::operations::By;

use crate::{
    domain::{listing, Listing},
    read,
};
#[cfg(doc)]
use crate::{domain::Review, Query};

use super::DatabaseQuery;

/// Queries a [`Listing`] by its [`listing::Id`].
pub type ById = DatabaseQuery<By<Option<Listing>, listing::Id>>;

/// Queries the [`Review`] ratings summary of a [`Listing`].
pub type RatingSummary =
    DatabaseQuery<By<read::listing::RatingSummary, listing::Id>>;
