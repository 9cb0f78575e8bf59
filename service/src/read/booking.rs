//! [`Booking`]-related read definitions.

use crate::domain::booking;
#[cfg(doc)]
use crate::domain::{Booking, Listing};

/// [`booking::Stay`]s of a [`Listing`] held by active [`Booking`]s.
#[derive(Clone, Debug, Default)]
pub struct ActiveStays(pub Vec<booking::Stay>);

pub mod list {
    //! [`Booking`] list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{booking, listing, user};
    #[cfg(doc)]
    use crate::domain::{Booking, Listing, User};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = booking::Id;

    /// Cursor pointing to a specific [`Booking`] in a list.
    pub type Cursor = booking::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the [`Listing`] to select [`Booking`]s of.
        pub listing_id: Option<listing::Id>,

        /// ID of the guest [`User`] to select [`Booking`]s of.
        pub user_id: Option<user::Id>,

        /// [`booking::Status`] to select only.
        pub status: Option<booking::Status>,
    }

    /// Total count of [`Booking`] list items.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
