//! [`Review`]-related read definitions.
//!
//! [`Review`]: crate::domain::Review

pub mod list {
    //! [`Review`] list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{listing, review, user};
    #[cfg(doc)]
    use crate::domain::{Listing, Review, User};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = review::Id;

    /// Cursor pointing to a specific [`Review`] in a list.
    pub type Cursor = review::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the reviewed [`Listing`].
        pub listing_id: Option<listing::Id>,

        /// ID of the [`User`] who wrote the [`Review`]s.
        pub user_id: Option<user::Id>,
    }

    /// Total count of [`Review`] list items.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
