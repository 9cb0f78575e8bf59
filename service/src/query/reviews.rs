//! [`Query`] collection related to the multiple [`Review`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Review, Query};

use super::DatabaseQuery;

/// Queries a list of [`Review`]s.
pub type List =
    DatabaseQuery<By<read::review::list::Page, read::review::list::Selector>>;

/// Queries total count of [`Review`]s matching a filter.
pub type TotalCount = DatabaseQuery<
    By<read::review::list::TotalCount, read::review::list::Filter>,
>;
