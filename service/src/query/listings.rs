//! [`Query`] collection related to the multiple [`Listing`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Listing, Query};

use super::DatabaseQuery;

/// Queries a list of [`Listing`]s.
pub type List = DatabaseQuery<
    By<read::listing::list::Page, read::listing::list::Selector>,
>;

/// Queries total count of [`Listing`]s matching a filter.
pub type TotalCount = DatabaseQuery<
    By<read::listing::list::TotalCount, read::listing::list::Filter>,
>;
