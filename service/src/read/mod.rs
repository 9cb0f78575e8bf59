//! Read entities definitions.

pub mod booking;
pub mod listing;
pub mod review;

#[cfg(doc)]
use crate::domain::{Booking, Listing, Review, User};

/// Total numbers of stored entities.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Totals {
    /// Number of [`User`]s.
    pub users: u64,

    /// Number of [`Listing`]s.
    pub listings: u64,

    /// Number of [`Booking`]s.
    pub bookings: u64,

    /// Number of [`Review`]s.
    pub reviews: u64,
}
